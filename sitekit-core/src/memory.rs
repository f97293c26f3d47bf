//! In-memory stand-ins for browser storage and navigation.
//!
//! Clones share state, so a test can hand one clone to the component under
//! test and inspect another.

use crate::error::{NavigationError, StoreError};
use crate::{Navigator, SessionStore, StoreScope};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct MemoryStore {
    scope: StoreScope,
    entries: Rc<RefCell<HashMap<String, String>>>,
    disabled: Rc<Cell<bool>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(scope: StoreScope) -> Self {
        Self {
            scope,
            entries: Rc::default(),
            disabled: Rc::default(),
        }
    }

    #[must_use]
    pub fn durable() -> Self {
        Self::new(StoreScope::Durable)
    }

    #[must_use]
    pub fn tab() -> Self {
        Self::new(StoreScope::Tab)
    }

    /// Make every later call fail like storage blocked by browser settings.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.disabled.get() {
            return Err(StoreError::Unavailable {
                scope: self.scope,
                message: "storage disabled".to_string(),
            });
        }
        Ok(())
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check()?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Navigator that records targets instead of leaving the page.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    visits: Rc<RefCell<Vec<String>>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.visits.borrow().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, href: &str) -> Result<(), NavigationError> {
        self.visits.borrow_mut().push(href.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let store = MemoryStore::tab();
        let view = store.clone();
        store.set("flash", "Hello").unwrap();
        assert_eq!(view.get("flash").unwrap().as_deref(), Some("Hello"));
        view.remove("flash").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn disabled_store_fails_every_call() {
        let store = MemoryStore::durable();
        store.set("access_token", "abc").unwrap();
        store.set_disabled(true);
        assert!(matches!(
            store.get("access_token"),
            Err(StoreError::Unavailable {
                scope: StoreScope::Durable,
                ..
            })
        ));
        assert!(store.remove("access_token").is_err());
        store.set_disabled(false);
        assert!(store.contains("access_token"));
    }

    #[test]
    fn recording_navigator_keeps_order() {
        let nav = RecordingNavigator::new();
        nav.redirect("login.html").unwrap();
        nav.redirect("index.html").unwrap();
        assert_eq!(nav.visits(), vec!["login.html", "index.html"]);
        assert_eq!(nav.last().as_deref(), Some("index.html"));
    }

    #[test]
    fn shared_navigator_records_through_trait_object() {
        let nav = RecordingNavigator::new();
        let shared: Rc<dyn Navigator> = Rc::new(nav.clone());
        shared.redirect("login.html").unwrap();
        assert_eq!(nav.visits(), vec!["login.html"]);
    }
}
