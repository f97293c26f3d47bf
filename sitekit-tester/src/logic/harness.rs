use sitekit_core::{AuthState, FlashRelay, MemoryStore, RecordingNavigator, SiteConfig};
use std::rc::Rc;

pub type HarnessAuth = AuthState<MemoryStore, MemoryStore, RecordingNavigator>;

/// A fresh page session: empty storage areas, a navigator that records
/// redirects and the default site configuration.
#[derive(Debug, Clone)]
pub struct Harness {
    pub durable: MemoryStore,
    pub tab: MemoryStore,
    pub navigator: RecordingNavigator,
    pub config: Rc<SiteConfig>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::with_config(SiteConfig::default())
    }
}

impl Harness {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: SiteConfig) -> Self {
        Self {
            durable: MemoryStore::durable(),
            tab: MemoryStore::tab(),
            navigator: RecordingNavigator::new(),
            config: Rc::new(config),
        }
    }

    /// Auth state sharing this harness's storage and navigator.
    #[must_use]
    pub fn auth(&self) -> HarnessAuth {
        AuthState::new(
            self.durable.clone(),
            self.tab.clone(),
            self.navigator.clone(),
            Rc::clone(&self.config),
        )
    }

    #[must_use]
    pub fn flash(&self) -> FlashRelay<MemoryStore> {
        FlashRelay::new(self.tab.clone(), self.config.storage.flash.clone())
    }
}
