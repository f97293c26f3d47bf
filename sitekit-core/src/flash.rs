use crate::SessionStore;
use crate::error::StoreError;

/// One-shot message carried across a full page load in tab-scoped storage.
///
/// At most one message is pending; posting again before the next page reads
/// it replaces the earlier text.
#[derive(Debug, Clone)]
pub struct FlashRelay<S> {
    store: S,
    key: String,
}

impl<S: SessionStore> FlashRelay<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Leave a message for the next page load
    ///
    /// # Errors
    ///
    /// Returns an error if tab storage rejects the write.
    pub fn post(&self, message: &str) -> Result<(), StoreError> {
        self.store.set(&self.key, message)
    }

    /// Read and delete the pending message.
    ///
    /// Storage failures are swallowed: the caller just sees no message.
    #[must_use]
    pub fn take(&self) -> Option<String> {
        let message = match self.store.get(&self.key) {
            Ok(Some(message)) if !message.is_empty() => message,
            Ok(_) => return None,
            Err(err) => {
                log::debug!("flash read skipped: {err}");
                return None;
            }
        };
        if let Err(err) = self.store.remove(&self.key) {
            log::debug!("flash delete skipped: {err}");
            return None;
        }
        Some(message)
    }

    /// Look at the pending message without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<String> {
        self.store.get(&self.key).ok().flatten()
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}
