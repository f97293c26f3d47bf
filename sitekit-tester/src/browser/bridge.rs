use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use thirtyfour::prelude::*;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToastView {
    pub title: String,
    pub body: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuView {
    pub aria_expanded: bool,
    pub open: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthView {
    pub authenticated: bool,
    pub token_type: Option<String>,
}

/// What `window.__sitekitTest.state()` reports about the mounted page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteState {
    pub toast: ToastView,
    pub toast_attached: bool,
    pub menu: Option<MenuView>,
    pub auth: AuthView,
    pub pending_flash: Option<String>,
    pub revealed: usize,
    pub year_stamped: bool,
    pub protected_paths: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageArea {
    Local,
    Session,
}

impl StorageArea {
    const fn js_name(self) -> &'static str {
        match self {
            Self::Local => "localStorage",
            Self::Session => "sessionStorage",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TestBridge<'a> {
    driver: &'a WebDriver,
}

impl<'a> TestBridge<'a> {
    pub const fn new(driver: &'a WebDriver) -> Self {
        Self { driver }
    }

    pub async fn ensure_available(&self) -> Result<()> {
        let result = self
            .driver
            .execute("return !!window.__sitekitTest", vec![])
            .await?;
        let ok = result.json().as_bool().unwrap_or(false);
        if !ok {
            bail!("__sitekitTest is not available. Did you pass ?test=1 and load the wasm bundle?");
        }
        Ok(())
    }

    pub async fn state(&self) -> Result<SiteState> {
        let result = self
            .driver
            .execute("return window.__sitekitTest.state()", vec![])
            .await?;
        parse_state(result.json().clone())
    }

    pub async fn toast(&self, message: &str) -> Result<()> {
        self.driver
            .execute(
                "window.__sitekitTest.toast(arguments[0])",
                vec![message.into()],
            )
            .await?;
        Ok(())
    }

    /// Re-run flash delivery; returns the message that was shown, if any.
    pub async fn deliver_flash(&self) -> Result<Option<String>> {
        let result = self
            .driver
            .execute("return window.__sitekitTest.deliverFlash()", vec![])
            .await?;
        Ok(result.json().as_str().map(str::to_string))
    }

    pub async fn set_item(&self, area: StorageArea, key: &str, value: &str) -> Result<()> {
        let script = format!("window.{}.setItem(arguments[0], arguments[1])", area.js_name());
        self.driver
            .execute(&script, vec![key.into(), value.into()])
            .await?;
        Ok(())
    }

    pub async fn item(&self, area: StorageArea, key: &str) -> Result<Option<String>> {
        let script = format!("return window.{}.getItem(arguments[0])", area.js_name());
        let result = self.driver.execute(&script, vec![key.into()]).await?;
        Ok(result.json().as_str().map(str::to_string))
    }

    pub async fn clear_storage(&self) -> Result<()> {
        self.driver
            .execute("localStorage.clear(); sessionStorage.clear();", vec![])
            .await?;
        Ok(())
    }
}

fn parse_state(value: Value) -> Result<SiteState> {
    if value.is_null() {
        bail!("site is not mounted yet");
    }
    serde_json::from_value(value).context("parsing SiteState")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_bridge_snapshot() {
        let state = parse_state(json!({
            "toast": { "title": "Notice", "body": "Signed out.", "visible": true },
            "toastAttached": true,
            "menu": { "ariaExpanded": false, "open": false },
            "auth": { "authenticated": false, "tokenType": null },
            "pendingFlash": null,
            "revealed": 1,
            "yearStamped": true,
            "protectedPaths": ["/createreport.html"]
        }))
        .expect("state parses");
        assert_eq!(state.toast.body, "Signed out.");
        assert_eq!(state.menu, Some(MenuView::default()));
        assert_eq!(state.revealed, 1);
    }

    #[test]
    fn null_snapshot_means_unmounted() {
        let err = parse_state(Value::Null).expect_err("null should fail");
        assert!(err.to_string().contains("not mounted"));
    }

    #[test]
    fn storage_areas_map_to_globals() {
        assert_eq!(StorageArea::Local.js_name(), "localStorage");
        assert_eq!(StorageArea::Session.js_name(), "sessionStorage");
    }
}
