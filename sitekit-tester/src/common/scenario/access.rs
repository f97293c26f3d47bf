use anyhow::Result;
use std::time::Duration;
use thirtyfour::prelude::*;

use super::{BrowserScenario, CombinedScenario, ScenarioCtx, TestScenario};
use crate::browser::StorageArea;
use crate::common::{page_url, wait_for_page};
use crate::logic::Harness;
use sitekit_core::{ProtectedRoutes, SessionStore};
use url::Url;

const REDIRECT_TIMEOUT: Duration = Duration::from_secs(5);
const ORIGIN: &str = "https://reports.example";

async fn toast_text(driver: &WebDriver) -> Result<String> {
    Ok(driver.find(By::Css(".toast p")).await?.text().await?)
}

pub struct AuthGuardScenario;

#[async_trait::async_trait]
impl BrowserScenario for AuthGuardScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        ctx.open_fresh(driver).await?;
        driver.goto(&page_url(&ctx.base_url, "profile.html")).await?;
        wait_for_page(driver, "login.html", REDIRECT_TIMEOUT).await?;

        let message = toast_text(driver).await?;
        anyhow::ensure!(
            message == "Please log in to continue.",
            "login page toast was {message:?}"
        );

        ctx.open(driver).await?;
        ctx.bridge
            .set_item(StorageArea::Local, "access_token", "tester-token")
            .await?;
        driver.goto(&page_url(&ctx.base_url, "profile.html")).await?;
        ctx.bridge.ensure_available().await?;
        wait_for_page(driver, "profile.html", REDIRECT_TIMEOUT).await?;
        let state = ctx.bridge.state().await?;
        anyhow::ensure!(state.auth.authenticated, "signed-in visitor should stay");
        Ok(())
    }
}

impl CombinedScenario for AuthGuardScenario {
    fn as_logic_scenario(&self) -> Option<TestScenario> {
        Some(TestScenario::new("Require Auth Redirect", auth_guard_check))
    }
}

fn auth_guard_check(harness: &Harness) -> Result<()> {
    let auth = harness.auth();
    anyhow::ensure!(!auth.require_auth()?, "anonymous visitors are turned away");
    anyhow::ensure!(
        harness.navigator.visits() == ["login.html"],
        "redirect goes to the login page, got {:?}",
        harness.navigator.visits()
    );
    anyhow::ensure!(
        auth.flash().peek().as_deref() == Some("Please log in to continue."),
        "the login page gets an explanation"
    );

    harness.durable.set("access_token", "")?;
    anyhow::ensure!(
        !auth.is_authenticated()?,
        "an empty marker is not a credential"
    );

    auth.sign_in("tester-token", "bearer")?;
    anyhow::ensure!(auth.require_auth()?, "signed-in visitors pass");
    anyhow::ensure!(
        harness.navigator.visits().len() == 1,
        "no redirect once signed in"
    );
    anyhow::ensure!(
        auth.authorization_header()?.as_deref() == Some("bearer tester-token"),
        "API calls carry the stored credential"
    );
    Ok(())
}

pub struct LogoutScenario;

#[async_trait::async_trait]
impl BrowserScenario for LogoutScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        ctx.open_fresh(driver).await?;
        ctx.bridge
            .set_item(StorageArea::Local, "access_token", "tester-token")
            .await?;
        ctx.bridge
            .set_item(StorageArea::Local, "token_type", "bearer")
            .await?;
        driver.goto(&page_url(&ctx.base_url, "profile.html")).await?;
        ctx.bridge.ensure_available().await?;

        let state = ctx.bridge.state().await?;
        anyhow::ensure!(
            state.auth.token_type.as_deref() == Some("bearer"),
            "bridge should see the stored token type"
        );
        // The menu may be collapsed on narrow windows.
        if state.menu.is_some_and(|menu| !menu.open)
            && let Ok(toggle) = driver.find(By::Css(".nav-toggle")).await
            && toggle.is_displayed().await.unwrap_or(false)
        {
            toggle.click().await?;
        }
        driver
            .find(By::Css("#menu [data-auth] a[href='#']"))
            .await?
            .click()
            .await?;
        wait_for_page(driver, "index.html", REDIRECT_TIMEOUT).await?;

        let message = toast_text(driver).await?;
        anyhow::ensure!(message == "Signed out.", "home page toast was {message:?}");
        let token = ctx.bridge.item(StorageArea::Local, "access_token").await?;
        anyhow::ensure!(token.is_none(), "token should be gone, found {token:?}");
        Ok(())
    }
}

impl CombinedScenario for LogoutScenario {
    fn as_logic_scenario(&self) -> Option<TestScenario> {
        Some(TestScenario::new("Logout Flow", logout_check))
    }
}

fn logout_check(harness: &Harness) -> Result<()> {
    let auth = harness.auth();
    auth.sign_in("tester-token", "bearer")?;
    auth.logout()?;

    anyhow::ensure!(harness.durable.is_empty(), "both auth keys are removed");
    anyhow::ensure!(
        harness.navigator.last().as_deref() == Some("index.html"),
        "logout lands on the home page"
    );
    anyhow::ensure!(
        harness.flash().take().as_deref() == Some("Signed out."),
        "home page says goodbye"
    );

    // Logging out twice is harmless.
    auth.logout()?;
    anyhow::ensure!(harness.navigator.visits().len() == 2, "second logout still redirects");
    Ok(())
}

pub struct LinkGuardScenario;

#[async_trait::async_trait]
impl BrowserScenario for LinkGuardScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        ctx.open_fresh(driver).await?;
        let state = ctx.bridge.state().await?;
        anyhow::ensure!(
            state.protected_paths.iter().any(|p| p.ends_with("/createreport.html")),
            "guard lists {:?}",
            state.protected_paths
        );
        driver
            .find(By::Css("#guide-link"))
            .await?
            .click()
            .await?;
        wait_for_page(driver, "blog/createreport.html", REDIRECT_TIMEOUT).await?;

        ctx.open(driver).await?;
        // Script click: the menu entry may be hidden behind the toggle.
        driver
            .execute(
                "document.querySelector(\"#menu a[href='createreport.html']\").click()",
                vec![],
            )
            .await?;
        wait_for_page(driver, "login.html", REDIRECT_TIMEOUT).await?;
        let message = toast_text(driver).await?;
        anyhow::ensure!(
            message == "Please log in to create a report.",
            "login page toast was {message:?}"
        );
        Ok(())
    }
}

impl CombinedScenario for LinkGuardScenario {
    fn as_logic_scenario(&self) -> Option<TestScenario> {
        Some(TestScenario::new("Protected Link Guard", link_guard_check))
    }
}

/// Whether the guard stops a click on `href` from `page`: same origin, and
/// the resolved pathname is on the allow-list.
fn guards(routes: &ProtectedRoutes, page: &Url, href: &str) -> bool {
    page.join(href).is_ok_and(|target| {
        target.origin() == page.origin() && routes.is_protected(target.path())
    })
}

fn link_guard_check(harness: &Harness) -> Result<()> {
    let routes = ProtectedRoutes::from_config(&harness.config);

    let guarded = [
        ("/index.html", "createreport.html"),
        ("/index.html", "/createreport.html?draft=1"),
        ("/index.html", "createreport.html#step:2"),
        ("/createreport.html", "?draft=1"),
        ("/blog/post.html", "../createreport.html"),
        ("/index.html", "HTTPS://Reports.Example/createreport.html"),
    ];
    for (page, href) in guarded {
        let page = Url::parse(ORIGIN)?.join(page)?;
        anyhow::ensure!(
            guards(&routes, &page, href),
            "{href} from {page} should be guarded"
        );
    }

    let open = [
        ("/index.html", "blog/createreport.html"),
        ("/index.html", "https://elsewhere.example/createreport.html"),
        ("/index.html", "//elsewhere.example/createreport.html"),
        ("/index.html", "#createreport.html"),
        ("/index.html", "mailto:createreport.html"),
    ];
    for (page, href) in open {
        let page = Url::parse(ORIGIN)?.join(page)?;
        anyhow::ensure!(
            !guards(&routes, &page, href),
            "{href} from {page} should not be guarded"
        );
    }

    let auth = harness.auth();
    let message = &harness.config.messages.protected_link;
    anyhow::ensure!(!auth.require_auth_with(message)?, "anonymous click is stopped");
    anyhow::ensure!(
        auth.flash().peek().as_deref() == Some("Please log in to create a report."),
        "guarded links explain why"
    );
    Ok(())
}
