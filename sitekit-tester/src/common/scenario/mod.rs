use anyhow::Result;
use thirtyfour::prelude::*;

use crate::browser::TestBridge;
use crate::logic::Harness;

pub mod access;
pub mod menu;
pub mod notices;
pub mod page;

#[derive(Debug, Clone)]
pub struct ScenarioCtx<'a> {
    pub base_url: String,
    pub bridge: TestBridge<'a>,
    pub verbose: bool,
}

impl ScenarioCtx<'_> {
    /// Load the start page and wait for the test bridge.
    pub async fn open(&self, driver: &WebDriver) -> Result<()> {
        driver.goto(&self.base_url).await?;
        self.bridge.ensure_available().await
    }

    /// Load the start page with empty storage.
    pub async fn open_fresh(&self, driver: &WebDriver) -> Result<()> {
        self.open(driver).await?;
        self.bridge.clear_storage().await?;
        driver.refresh().await?;
        self.bridge.ensure_available().await
    }
}

// Logic test scenario
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub check: fn(&Harness) -> Result<()>,
}

impl TestScenario {
    #[must_use]
    pub fn new(name: impl Into<String>, check: fn(&Harness) -> Result<()>) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

// Browser test scenario
#[async_trait::async_trait]
pub trait BrowserScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()>;
}

// Combined scenario that can run both logic and browser tests
pub trait CombinedScenario: BrowserScenario {
    fn as_logic_scenario(&self) -> Option<TestScenario>;
}

pub fn get_scenario(name: &str) -> Option<Box<dyn CombinedScenario + Send + Sync>> {
    match name.to_lowercase().as_str() {
        "nav-toggle" | "menu" => Some(Box::new(menu::NavToggleScenario)),
        "nav-auth" => Some(Box::new(menu::NavAuthScenario)),
        "toast" => Some(Box::new(notices::ToastScenario)),
        "flash" => Some(Box::new(notices::FlashScenario)),
        "auth-guard" | "require-auth" => Some(Box::new(access::AuthGuardScenario)),
        "logout" => Some(Box::new(access::LogoutScenario)),
        "link-guard" => Some(Box::new(access::LinkGuardScenario)),
        "reveal" => Some(Box::new(page::RevealScenario)),
        "footer-year" | "year" => Some(Box::new(page::FooterYearScenario)),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("nav-toggle", "Mobile Menu Toggle"),
        ("nav-auth", "Auth-Aware Menu Items"),
        ("toast", "Toast Notifications"),
        ("flash", "Flash Message Relay"),
        ("auth-guard", "Require Auth Redirect"),
        ("logout", "Logout Flow"),
        ("link-guard", "Protected Link Guard"),
        ("reveal", "Reveal On Scroll"),
        ("footer-year", "Footer Year Stamp"),
    ]
}
