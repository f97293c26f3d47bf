use crate::config::SiteConfig;

/// Attribute marking menu items injected by the auth renderer.
pub const AUTH_MARKER_ATTR: &str = "data-auth";

/// Class that opens the mobile menu panel.
pub const MENU_OPEN_CLASS: &str = "show";

/// Mobile menu expansion as mirrored by the toggle's `aria-expanded`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    pub expanded: bool,
}

impl MenuState {
    /// Read the current state from an `aria-expanded` value; anything other
    /// than `"true"` is collapsed.
    #[must_use]
    pub fn from_aria(value: Option<&str>) -> Self {
        Self {
            expanded: value == Some("true"),
        }
    }

    /// Flip the state and return the new `aria-expanded` value.
    pub fn toggle(&mut self) -> &'static str {
        self.expanded = !self.expanded;
        self.aria_value()
    }

    #[must_use]
    pub const fn aria_value(self) -> &'static str {
        if self.expanded { "true" } else { "false" }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    /// Plain navigation.
    Link,
    /// Suppress navigation and sign out.
    Logout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub label: &'static str,
    pub href: String,
    pub action: NavAction,
}

/// Menu items to inject for the given auth state, in display order.
#[must_use]
pub fn auth_entries(authenticated: bool, config: &SiteConfig) -> Vec<NavEntry> {
    if authenticated {
        vec![
            NavEntry {
                label: "Profile",
                href: config.profile_href(),
                action: NavAction::Link,
            },
            NavEntry {
                label: "Logout",
                href: "#".to_string(),
                action: NavAction::Logout,
            },
        ]
    } else {
        vec![NavEntry {
            label: "Login",
            href: config.login_href(),
            action: NavAction::Link,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_toggle_restores_state() {
        let mut state = MenuState::from_aria(Some("false"));
        assert_eq!(state.toggle(), "true");
        assert_eq!(state.toggle(), "false");
        assert!(!state.expanded);
    }

    #[test]
    fn missing_or_odd_aria_reads_collapsed() {
        assert!(!MenuState::from_aria(None).expanded);
        assert!(!MenuState::from_aria(Some("TRUE")).expanded);
        assert!(MenuState::from_aria(Some("true")).expanded);
    }

    #[test]
    fn signed_in_menu_offers_profile_and_logout() {
        let entries = auth_entries(true, &SiteConfig::default());
        let labels: Vec<_> = entries.iter().map(|e| e.label).collect();
        assert_eq!(labels, ["Profile", "Logout"]);
        assert_eq!(entries[0].href, "profile.html");
        assert_eq!(entries[1].action, NavAction::Logout);
    }

    #[test]
    fn anonymous_menu_offers_login() {
        let entries = auth_entries(false, &SiteConfig::default());
        assert_eq!(
            entries,
            vec![NavEntry {
                label: "Login",
                href: "login.html".to_string(),
                action: NavAction::Link,
            }]
        );
    }
}
