use anyhow::{Context, Result};
use thirtyfour::prelude::*;

use super::{BrowserScenario, CombinedScenario, ScenarioCtx, TestScenario};
use crate::browser::StorageArea;
use crate::logic::Harness;
use sitekit_core::{AUTH_MARKER_ATTR, MenuState, NavAction, auth_entries};

pub struct NavToggleScenario;

#[async_trait::async_trait]
impl BrowserScenario for NavToggleScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        ctx.open(driver).await?;
        let toggle = driver.find(By::Css(".nav-toggle")).await?;

        for expected in [true, false] {
            toggle.click().await?;
            let state = ctx.bridge.state().await?;
            let menu = state.menu.context("page has no menu")?;
            anyhow::ensure!(
                menu.aria_expanded == expected && menu.open == expected,
                "after click expected open={expected}, got {menu:?}"
            );
            if ctx.verbose {
                println!("  🍔 Menu open: {expected}");
            }
        }
        Ok(())
    }
}

impl CombinedScenario for NavToggleScenario {
    fn as_logic_scenario(&self) -> Option<TestScenario> {
        Some(TestScenario::new("Mobile Menu Toggle", nav_toggle_check))
    }
}

fn nav_toggle_check(_harness: &Harness) -> Result<()> {
    let mut state = MenuState::from_aria(None);
    anyhow::ensure!(!state.expanded, "missing aria-expanded should read as closed");
    anyhow::ensure!(state.toggle() == "true", "first click should open the menu");
    anyhow::ensure!(state.toggle() == "false", "second click should close it");

    let mut odd = MenuState::from_aria(Some("yes"));
    anyhow::ensure!(
        odd.toggle() == "true",
        "values other than \"true\" count as closed"
    );
    Ok(())
}

pub struct NavAuthScenario;

#[async_trait::async_trait]
impl BrowserScenario for NavAuthScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        ctx.open_fresh(driver).await?;
        let selector = format!("#menu [{AUTH_MARKER_ATTR}] a");

        let anonymous = menu_labels(driver, &selector).await?;
        anyhow::ensure!(anonymous == ["Login"], "anonymous menu was {anonymous:?}");

        ctx.bridge
            .set_item(StorageArea::Local, "access_token", "tester-token")
            .await?;
        driver.refresh().await?;
        ctx.bridge.ensure_available().await?;

        let signed_in = menu_labels(driver, &selector).await?;
        anyhow::ensure!(
            signed_in == ["Profile", "Logout"],
            "signed-in menu was {signed_in:?}"
        );
        Ok(())
    }
}

async fn menu_labels(driver: &WebDriver, selector: &str) -> Result<Vec<String>> {
    let mut labels = Vec::new();
    for link in driver.find_all(By::Css(selector)).await? {
        labels.push(link.text().await?);
    }
    Ok(labels)
}

impl CombinedScenario for NavAuthScenario {
    fn as_logic_scenario(&self) -> Option<TestScenario> {
        Some(TestScenario::new("Auth-Aware Menu Items", nav_auth_check))
    }
}

fn nav_auth_check(harness: &Harness) -> Result<()> {
    let auth = harness.auth();
    let anonymous = auth_entries(auth.is_authenticated()?, &harness.config);
    anyhow::ensure!(
        anonymous.len() == 1 && anonymous[0].href == "login.html",
        "anonymous visitors should only see Login, got {anonymous:?}"
    );

    auth.sign_in("tester-token", "bearer")?;
    let signed_in = auth_entries(auth.is_authenticated()?, &harness.config);
    let labels: Vec<_> = signed_in.iter().map(|entry| entry.label).collect();
    anyhow::ensure!(
        labels == ["Profile", "Logout"],
        "signed-in visitors should see Profile and Logout, got {labels:?}"
    );
    anyhow::ensure!(
        signed_in[1].action == NavAction::Logout && signed_in[1].href == "#",
        "Logout must not navigate on its own"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nav_toggle_exposes_logic_check() {
        let logic = NavToggleScenario.as_logic_scenario().expect("logic scenario");
        assert_eq!(logic.name, "Mobile Menu Toggle");
        (logic.check)(&Harness::new()).expect("toggle check passes");
    }

    #[test]
    fn nav_auth_check_signs_in_through_harness() {
        let harness = Harness::new();
        nav_auth_check(&harness).expect("menu check passes");
        assert!(harness.durable.contains("access_token"));
    }
}
