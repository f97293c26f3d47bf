//! Toast notification model.
//!
//! Every `show` hands back a [`HideTicket`]; the platform fires it after the
//! configured delay. Tickets are not cancelled by later calls, so a ticket
//! from an older message still hides a newer one (last write wins, no queue).

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HideTicket {
    pub generation: u64,
    pub delay_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpireOutcome {
    /// The ticket's own message was hidden.
    Hid,
    /// A newer message was hidden before its own ticket came due.
    HidNewer,
    /// Nothing was showing.
    AlreadyHidden,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastState {
    pub title: String,
    pub body: String,
    pub visible: bool,
    #[serde(skip)]
    generation: u64,
}

impl ToastState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the message and make the toast visible.
    pub fn show(&mut self, title: &str, message: &str, delay_ms: u32) -> HideTicket {
        self.generation = self.generation.wrapping_add(1);
        title.clone_into(&mut self.title);
        message.clone_into(&mut self.body);
        self.visible = true;
        HideTicket {
            generation: self.generation,
            delay_ms,
        }
    }

    /// Apply a ticket whose delay has elapsed.
    pub fn expire(&mut self, ticket: HideTicket) -> ExpireOutcome {
        if !self.visible {
            return ExpireOutcome::AlreadyHidden;
        }
        self.visible = false;
        if ticket.generation == self.generation {
            ExpireOutcome::Hid
        } else {
            ExpireOutcome::HidNewer
        }
    }

    /// Close-button dismissal, independent of any pending ticket.
    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_sets_title_body_and_visibility() {
        let mut toast = ToastState::new();
        let ticket = toast.show("Notice", "X", 2600);
        assert!(toast.visible);
        assert_eq!(toast.title, "Notice");
        assert_eq!(toast.body, "X");
        assert_eq!(ticket.delay_ms, 2600);
        assert_eq!(toast.expire(ticket), ExpireOutcome::Hid);
        assert!(!toast.visible);
    }

    #[test]
    fn stale_ticket_hides_newer_message() {
        let mut toast = ToastState::new();
        let first = toast.show("Notice", "first", 2600);
        let second = toast.show("Notice", "second", 2600);
        assert_eq!(toast.body, "second");
        assert_eq!(toast.expire(first), ExpireOutcome::HidNewer);
        assert!(!toast.visible);
        assert_eq!(toast.expire(second), ExpireOutcome::AlreadyHidden);
    }

    #[test]
    fn dismiss_is_independent_of_ticket() {
        let mut toast = ToastState::new();
        let ticket = toast.show("Notice", "bye", 2600);
        toast.dismiss();
        assert!(!toast.visible);
        assert_eq!(toast.body, "bye");
        assert_eq!(toast.expire(ticket), ExpireOutcome::AlreadyHidden);
    }

    #[test]
    fn serializes_for_diagnostics() {
        let mut toast = ToastState::new();
        let _ = toast.show("Notice", "Hello", 2600);
        let json = serde_json::to_value(&toast).unwrap();
        assert_eq!(json["body"], "Hello");
        assert_eq!(json["visible"], true);
        assert!(json.get("generation").is_none());
    }
}
