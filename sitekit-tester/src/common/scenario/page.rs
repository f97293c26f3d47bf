use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use std::time::Duration;
use thirtyfour::prelude::*;

use super::{BrowserScenario, CombinedScenario, ScenarioCtx, TestScenario};
use crate::logic::Harness;
use sitekit_core::{RevealRule, RevealTracker};

pub struct RevealScenario;

#[async_trait::async_trait]
impl BrowserScenario for RevealScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        ctx.open(driver).await?;
        tokio::time::sleep(Duration::from_millis(300)).await;

        let before = ctx.bridge.state().await?.revealed;
        anyhow::ensure!(before >= 1, "the hero section should reveal on load");
        let below = driver.find(By::Css("#below-fold")).await?;
        anyhow::ensure!(
            !below.class_name().await?.unwrap_or_default().contains("visible"),
            "below-the-fold section revealed too early"
        );

        below.scroll_into_view().await?;
        tokio::time::sleep(Duration::from_millis(300)).await;
        let classes = below.class_name().await?.unwrap_or_default();
        anyhow::ensure!(classes.contains("visible"), "scrolled section stays hidden");
        let after = ctx.bridge.state().await?.revealed;
        anyhow::ensure!(after > before, "reveal count did not grow ({before} -> {after})");

        // Scrolling away must not hide it again.
        driver.execute("window.scrollTo(0, 0)", vec![]).await?;
        tokio::time::sleep(Duration::from_millis(200)).await;
        let classes = below.class_name().await?.unwrap_or_default();
        anyhow::ensure!(classes.contains("visible"), "revealed section was hidden again");
        Ok(())
    }
}

impl CombinedScenario for RevealScenario {
    fn as_logic_scenario(&self) -> Option<TestScenario> {
        Some(TestScenario::new("Reveal On Scroll", reveal_check))
    }
}

fn reveal_check(harness: &Harness) -> Result<()> {
    let rule = RevealRule::new(harness.config.reveal.threshold)
        .context("configured reveal threshold")?;
    let mut tracker = RevealTracker::new(rule);

    anyhow::ensure!(!tracker.record("hero", true, 0.05), "5% is below the threshold");
    anyhow::ensure!(!tracker.record("hero", false, 0.5), "not intersecting");
    anyhow::ensure!(tracker.record("hero", true, 0.12), "12% reveals");
    anyhow::ensure!(
        !tracker.record("hero", true, 1.0),
        "an element is revealed only once"
    );
    tracker.record("hero", false, 0.0);
    anyhow::ensure!(tracker.is_revealed(&"hero"), "leaving view does not hide");
    anyhow::ensure!(tracker.revealed_count() == 1, "only the hero was revealed");
    anyhow::ensure!(RevealRule::new(0.0).is_err(), "zero threshold is rejected");
    Ok(())
}

pub struct FooterYearScenario;

#[async_trait::async_trait]
impl BrowserScenario for FooterYearScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        ctx.open(driver).await?;
        let text = driver.find(By::Id("year")).await?.text().await?;
        let year = Local::now().year().to_string();
        anyhow::ensure!(text == year, "footer says {text:?}, expected {year}");
        anyhow::ensure!(
            ctx.bridge.state().await?.year_stamped,
            "bridge should report the stamp"
        );
        Ok(())
    }
}

// The stamp is a single DOM write with nothing to model outside a browser.
impl CombinedScenario for FooterYearScenario {
    fn as_logic_scenario(&self) -> Option<TestScenario> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitekit_core::SiteConfig;

    #[test]
    fn reveal_check_passes_with_defaults() {
        reveal_check(&Harness::new()).expect("reveal check");
    }

    #[test]
    fn reveal_check_rejects_bad_threshold() {
        let mut config = SiteConfig::default();
        config.reveal.threshold = 1.5;
        let err = reveal_check(&Harness::with_config(config)).expect_err("bad threshold");
        assert!(format!("{err:#}").contains("reveal threshold"));
    }

    #[test]
    fn footer_year_is_browser_only() {
        assert!(FooterYearScenario.as_logic_scenario().is_none());
    }
}
