pub mod bridge;
pub mod session;

pub use bridge::{SiteState, StorageArea, TestBridge};
pub use session::{BrowserConfig, BrowserKind, new_session};
