use anyhow::Result;
use std::time::Duration;
use thirtyfour::prelude::*;

use super::{BrowserScenario, CombinedScenario, ScenarioCtx, TestScenario};
use crate::browser::StorageArea;
use crate::logic::Harness;
use sitekit_core::{ExpireOutcome, SiteConfig, ToastState};

const TOAST_MESSAGE: &str = "Hello from the tester";

pub struct ToastScenario;

#[async_trait::async_trait]
impl BrowserScenario for ToastScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        ctx.open(driver).await?;
        ctx.bridge.toast(TOAST_MESSAGE).await?;

        let body = driver.find(By::Css(".toast p")).await?.text().await?;
        anyhow::ensure!(body == TOAST_MESSAGE, "toast body was {body:?}");
        let state = ctx.bridge.state().await?;
        anyhow::ensure!(state.toast_attached, "page should have a toast element");
        anyhow::ensure!(state.toast.visible, "toast should be showing");
        anyhow::ensure!(state.toast.title == "Notice", "toast title was {:?}", state.toast.title);

        let hide_after = u64::from(SiteConfig::default().toast.duration_ms) + 400;
        tokio::time::sleep(Duration::from_millis(hide_after)).await;
        let state = ctx.bridge.state().await?;
        anyhow::ensure!(!state.toast.visible, "toast should hide itself");

        ctx.bridge.toast("Close me").await?;
        driver.find(By::Css(".close-toast")).await?.click().await?;
        let state = ctx.bridge.state().await?;
        anyhow::ensure!(!state.toast.visible, "close button should hide the toast");
        if ctx.verbose {
            println!("  🔔 Toast shown, expired and dismissed");
        }
        Ok(())
    }
}

impl CombinedScenario for ToastScenario {
    fn as_logic_scenario(&self) -> Option<TestScenario> {
        Some(TestScenario::new("Toast Notifications", toast_check))
    }
}

fn toast_check(harness: &Harness) -> Result<()> {
    let toast_cfg = &harness.config.toast;
    let mut toast = ToastState::new();

    let first = toast.show(&toast_cfg.title, "first", toast_cfg.duration_ms);
    anyhow::ensure!(toast.visible && toast.body == "first", "show should display");
    anyhow::ensure!(
        first.delay_ms == toast_cfg.duration_ms,
        "hide delay should follow config"
    );

    let second = toast.show(&toast_cfg.title, "second", toast_cfg.duration_ms);
    anyhow::ensure!(toast.body == "second", "newer message replaces older");
    anyhow::ensure!(
        toast.expire(first) == ExpireOutcome::HidNewer,
        "older timer still hides the newer message"
    );
    anyhow::ensure!(
        toast.expire(second) == ExpireOutcome::AlreadyHidden,
        "second timer finds nothing to hide"
    );

    let _ = toast.show(&toast_cfg.title, "third", toast_cfg.duration_ms);
    toast.dismiss();
    anyhow::ensure!(!toast.visible, "dismiss hides immediately");
    Ok(())
}

pub struct FlashScenario;

#[async_trait::async_trait]
impl BrowserScenario for FlashScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        ctx.open_fresh(driver).await?;
        ctx.bridge
            .set_item(StorageArea::Session, "flash", "Saved!")
            .await?;

        let delivered = ctx.bridge.deliver_flash().await?;
        anyhow::ensure!(
            delivered.as_deref() == Some("Saved!"),
            "flash delivery returned {delivered:?}"
        );
        let stored = ctx.bridge.item(StorageArea::Session, "flash").await?;
        anyhow::ensure!(stored.is_none(), "flash should be consumed, found {stored:?}");

        let state = ctx.bridge.state().await?;
        anyhow::ensure!(state.pending_flash.is_none(), "bridge still sees a pending flash");
        anyhow::ensure!(state.toast.body == "Saved!", "toast shows the flash");
        anyhow::ensure!(
            ctx.bridge.deliver_flash().await?.is_none(),
            "flash must be delivered only once"
        );
        Ok(())
    }
}

impl CombinedScenario for FlashScenario {
    fn as_logic_scenario(&self) -> Option<TestScenario> {
        Some(TestScenario::new("Flash Message Relay", flash_check))
    }
}

fn flash_check(harness: &Harness) -> Result<()> {
    let flash = harness.flash();
    anyhow::ensure!(flash.take().is_none(), "nothing pending on a fresh tab");

    flash.post("first")?;
    flash.post("second")?;
    anyhow::ensure!(
        flash.peek().as_deref() == Some("second"),
        "a later post overwrites an undelivered one"
    );
    anyhow::ensure!(flash.take().as_deref() == Some("second"), "take delivers");
    anyhow::ensure!(flash.take().is_none(), "take consumes");
    anyhow::ensure!(harness.tab.is_empty(), "key removed after delivery");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitekit_core::SessionStore;

    #[test]
    fn toast_check_passes() {
        toast_check(&Harness::new()).expect("toast check");
    }

    #[test]
    fn flash_check_leaves_tab_empty() {
        let harness = Harness::new();
        flash_check(&harness).expect("flash check");
        assert!(harness.tab.is_empty());
    }

    #[test]
    fn flash_check_fails_with_leftover_message() {
        let harness = Harness::new();
        harness.tab.set("flash", "stale").unwrap();
        assert!(flash_check(&harness).is_err());
    }
}
