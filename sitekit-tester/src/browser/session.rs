use std::time::Duration;
use thirtyfour::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BrowserKind {
    Chrome,
    Edge,
    Firefox,
    Safari,
}

impl BrowserKind {
    /// Where the vendor's driver listens when started with its defaults.
    #[must_use]
    pub const fn default_driver_url(self) -> &'static str {
        match self {
            Self::Chrome => "http://localhost:9515",
            Self::Edge => "http://localhost:17556",
            Self::Firefox => "http://localhost:4444",
            Self::Safari => "http://localhost:4445",
        }
    }

    #[must_use]
    pub fn label(self) -> String {
        format!("{self:?}").to_lowercase()
    }
}

#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub headless: bool,
    pub implicit_wait_secs: u64,
    pub remote_hub: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            implicit_wait_secs: 3,
            remote_hub: None,
        }
    }
}

impl BrowserConfig {
    #[must_use]
    pub fn driver_url(&self, kind: BrowserKind) -> &str {
        self.remote_hub
            .as_deref()
            .unwrap_or_else(|| kind.default_driver_url())
    }
}

pub async fn new_session(kind: BrowserKind, cfg: &BrowserConfig) -> WebDriverResult<WebDriver> {
    let url = cfg.driver_url(kind);
    let driver = match kind {
        BrowserKind::Chrome => {
            let mut caps = DesiredCapabilities::chrome();
            if cfg.headless {
                caps.set_headless()?;
            }
            WebDriver::new(url, caps).await?
        }
        BrowserKind::Edge => {
            let mut caps = DesiredCapabilities::edge();
            if cfg.headless {
                caps.set_headless()?;
            }
            WebDriver::new(url, caps).await?
        }
        BrowserKind::Firefox => {
            let mut caps = DesiredCapabilities::firefox();
            if cfg.headless {
                caps.set_headless()?;
            }
            WebDriver::new(url, caps).await?
        }
        // safaridriver has no headless mode.
        BrowserKind::Safari => WebDriver::new(url, DesiredCapabilities::safari()).await?,
    };

    driver
        .set_implicit_wait_timeout(Duration::from_secs(cfg.implicit_wait_secs))
        .await?;
    Ok(driver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_driver_urls_follow_vendor_defaults() {
        let cfg = BrowserConfig::default();
        assert_eq!(cfg.driver_url(BrowserKind::Chrome), "http://localhost:9515");
        assert_eq!(cfg.driver_url(BrowserKind::Firefox), "http://localhost:4444");
    }

    #[test]
    fn hub_overrides_every_driver() {
        let cfg = BrowserConfig {
            remote_hub: Some("http://grid:4444/wd/hub".to_string()),
            ..BrowserConfig::default()
        };
        assert_eq!(cfg.driver_url(BrowserKind::Safari), "http://grid:4444/wd/hub");
        assert_eq!(BrowserKind::Edge.label(), "edge");
    }
}
