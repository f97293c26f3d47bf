#![forbid(unsafe_code)]
//! Sitekit Core
//!
//! Platform-agnostic logic behind the site's browser helpers: credential-marker
//! auth state, the one-shot flash relay, toast and menu models, protected
//! route matching and the reveal rule. Nothing here touches the DOM; the web
//! crate supplies browser-backed implementations of the traits below.

pub mod auth;
pub mod config;
pub mod error;
pub mod flash;
pub mod memory;
pub mod menu;
pub mod reveal;
pub mod routes;
pub mod toast;

// Re-export commonly used types
pub use auth::{AuthSnapshot, AuthState};
pub use config::{Messages, Pages, RevealConfig, SiteConfig, StorageKeys, ToastConfig};
pub use error::{AuthError, ConfigError, NavigationError, StoreError};
pub use flash::FlashRelay;
pub use memory::{MemoryStore, RecordingNavigator};
pub use menu::{AUTH_MARKER_ATTR, MENU_OPEN_CLASS, MenuState, NavAction, NavEntry, auth_entries};
pub use reveal::{
    DEFAULT_REVEAL_THRESHOLD, REVEAL_CLASS, RevealRule, RevealTracker, VISIBLE_CLASS,
};
pub use routes::{ProtectedRoutes, join_base, normalize_path};
pub use toast::{ExpireOutcome, HideTicket, ToastState};

use std::fmt;
use std::rc::Rc;

/// Which browser storage area a store is backed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreScope {
    /// Survives reloads and new tabs (`localStorage`).
    Durable,
    /// Lives as long as the tab (`sessionStorage`).
    Tab,
}

impl fmt::Display for StoreScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Durable => "local",
            Self::Tab => "session",
        })
    }
}

/// Trait for abstracting key/value storage
/// Platform-specific implementations should provide this
pub trait SessionStore {
    /// Read a value
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value; deleting a missing key is not an error
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Trait for full-page navigation
pub trait Navigator {
    /// Leave the current page for `href`
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the navigation.
    fn redirect(&self, href: &str) -> Result<(), NavigationError>;
}

impl<N: Navigator + ?Sized> Navigator for &N {
    fn redirect(&self, href: &str) -> Result<(), NavigationError> {
        (**self).redirect(href)
    }
}

impl<N: Navigator + ?Sized> Navigator for Rc<N> {
    fn redirect(&self, href: &str) -> Result<(), NavigationError> {
        (**self).redirect(href)
    }
}
