pub mod footer_year;
pub mod link_guard;
pub mod nav_auth;
pub mod nav_toggle;
pub mod reveal;
pub mod toast;

pub use link_guard::LinkGuard;
pub use nav_auth::NavAuth;
pub use nav_toggle::NavToggle;
pub use reveal::RevealObserver;
pub use toast::Toast;
