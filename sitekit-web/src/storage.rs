//! `localStorage`/`sessionStorage` behind the core [`SessionStore`] trait.

use crate::dom;
use sitekit_core::{SessionStore, StoreError, StoreScope};
use web_sys::Storage;

/// Handle to one browser storage area; the `Storage` object is looked up
/// per call so a store built before the page settles stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserStore {
    scope: StoreScope,
}

impl BrowserStore {
    #[must_use]
    pub const fn durable() -> Self {
        Self {
            scope: StoreScope::Durable,
        }
    }

    #[must_use]
    pub const fn tab() -> Self {
        Self {
            scope: StoreScope::Tab,
        }
    }

    #[must_use]
    pub const fn scope(self) -> StoreScope {
        self.scope
    }

    fn storage(self) -> Result<Storage, StoreError> {
        let unavailable = |message: String| StoreError::Unavailable {
            scope: self.scope,
            message,
        };
        let win = dom::window().ok_or_else(|| unavailable("no window".to_string()))?;
        let area = match self.scope {
            StoreScope::Durable => win.local_storage(),
            StoreScope::Tab => win.session_storage(),
        };
        area.map_err(|err| unavailable(dom::js_error_message(&err)))?
            .ok_or_else(|| unavailable("storage area missing".to_string()))
    }
}

impl SessionStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(key)
            .map_err(|err| StoreError::Read {
                scope: self.scope,
                key: key.to_string(),
                message: dom::js_error_message(&err),
            })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| StoreError::Write {
                scope: self.scope,
                key: key.to_string(),
                message: dom::js_error_message(&err),
            })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.storage()?
            .remove_item(key)
            .map_err(|err| StoreError::Remove {
                scope: self.scope,
                key: key.to_string(),
                message: dom::js_error_message(&err),
            })
    }
}
