use crate::dom;
use sitekit_core::{NavigationError, Navigator};

/// Navigates by assigning `window.location.href`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn redirect(&self, href: &str) -> Result<(), NavigationError> {
        let failed = |message: String| NavigationError {
            target: href.to_string(),
            message,
        };
        let win = dom::window().ok_or_else(|| failed("no window".to_string()))?;
        win.location()
            .set_href(href)
            .map_err(|err| failed(dom::js_error_message(&err)))
    }
}
