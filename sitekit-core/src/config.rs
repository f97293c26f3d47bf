use crate::error::ConfigError;
use crate::reveal::RevealRule;
use crate::routes::join_base;
use serde::{Deserialize, Serialize};

/// Storage keys shared with the other pages of the site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub access_token: String,
    pub token_type: String,
    pub flash: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            access_token: "access_token".to_string(),
            token_type: "token_type".to_string(),
            flash: "flash".to_string(),
        }
    }
}

/// Page file names used for redirects and injected menu links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pages {
    pub login: String,
    pub home: String,
    pub profile: String,
}

impl Default for Pages {
    fn default() -> Self {
        Self {
            login: "login.html".to_string(),
            home: "index.html".to_string(),
            profile: "profile.html".to_string(),
        }
    }
}

/// User-facing flash texts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub login_required: String,
    pub protected_link: String,
    pub signed_out: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            login_required: "Please log in to continue.".to_string(),
            protected_link: "Please log in to create a report.".to_string(),
            signed_out: "Signed out.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    pub title: String,
    pub duration_ms: u32,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            title: "Notice".to_string(),
            duration_ms: 2600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub threshold: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: crate::reveal::DEFAULT_REVEAL_THRESHOLD,
        }
    }
}

/// Site-wide settings for every helper component.
///
/// Every field has a default, so a partial JSON document only overrides
/// what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Deployment prefix such as `/portal`; empty means pages are addressed
    /// relative to the current page.
    pub base_path: String,
    pub storage: StorageKeys,
    pub pages: Pages,
    /// Pages that require a credential marker, relative to `base_path`.
    pub protected_paths: Vec<String>,
    pub messages: Messages,
    pub toast: ToastConfig,
    pub reveal: RevealConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            storage: StorageKeys::default(),
            pages: Pages::default(),
            protected_paths: vec!["createreport.html".to_string()],
            messages: Messages::default(),
            toast: ToastConfig::default(),
            reveal: RevealConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Parse and validate a JSON config document
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot constrain
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.toast.duration_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "toast.duration_ms",
                reason: "must be positive".to_string(),
            });
        }
        RevealRule::new(self.reveal.threshold)?;
        let keys = [
            ("storage.access_token", &self.storage.access_token),
            ("storage.token_type", &self.storage.token_type),
            ("storage.flash", &self.storage.flash),
        ];
        for (field, key) in keys {
            if key.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "storage key must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Address of a site page, prefixed by the base path when one is set.
    #[must_use]
    pub fn page_href(&self, page: &str) -> String {
        if self.base_path.trim_end_matches('/').trim().is_empty() {
            page.to_string()
        } else {
            join_base(&self.base_path, page)
        }
    }

    #[must_use]
    pub fn login_href(&self) -> String {
        self.page_href(&self.pages.login)
    }

    #[must_use]
    pub fn home_href(&self) -> String {
        self.page_href(&self.pages.home)
    }

    #[must_use]
    pub fn profile_href(&self) -> String {
        self.page_href(&self.pages.profile)
    }
}
