use crate::dom;
use sitekit_core::{ExpireOutcome, HideTicket, SiteConfig, ToastState};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, Event};

pub const TOAST_SELECTOR: &str = ".toast";
pub const CLOSE_SELECTOR: &str = ".close-toast";
pub const SHOW_CLASS: &str = "show";

/// The page's toast bubble.
///
/// Pages without a `.toast` element get a blocking `alert` instead.
pub struct Toast {
    root: Option<Element>,
    state: Rc<RefCell<ToastState>>,
    title: String,
    duration_ms: u32,
    close: Option<(Element, Closure<dyn FnMut(Event)>)>,
}

impl Toast {
    /// Bind to `.toast` and wire the `.close-toast` button when both exist.
    #[must_use]
    pub fn attach(doc: &Document, config: &SiteConfig) -> Self {
        let mut toast = Self::lookup(doc, config);
        if let (Some(root), Some(button)) = (&toast.root, dom::query(doc, CLOSE_SELECTOR)) {
            let handler = wire_close(&button, root, &toast.state);
            toast.close = Some((button, handler));
        }
        if toast.root.is_none() {
            log::debug!("no {TOAST_SELECTOR} element, toasts fall back to alert");
        }
        toast
    }

    /// Bind to `.toast` without registering any listener, for one-off calls
    /// made before the page is mounted.
    #[must_use]
    pub fn lookup(doc: &Document, config: &SiteConfig) -> Self {
        Self {
            root: dom::query(doc, TOAST_SELECTOR),
            state: Rc::new(RefCell::new(ToastState::new())),
            title: config.toast.title.clone(),
            duration_ms: config.toast.duration_ms,
            close: None,
        }
    }

    pub fn show(&self, message: &str) {
        let Some(root) = &self.root else {
            dom::alert(message);
            return;
        };
        let ticket = self
            .state
            .borrow_mut()
            .show(&self.title, message, self.duration_ms);

        if let Ok(Some(title)) = root.query_selector("strong") {
            title.set_text_content(Some(&self.title));
        }
        match body_element(root) {
            Some(body) => body.set_text_content(Some(message)),
            None => log::warn!("toast has no body paragraph or .toast-inner"),
        }
        let _ = root.class_list().add_1(SHOW_CLASS);
        schedule_hide(root.clone(), Rc::clone(&self.state), ticket);
    }

    pub fn hide(&self) {
        if let Some(root) = &self.root {
            let _ = root.class_list().remove_1(SHOW_CLASS);
        }
        self.state.borrow_mut().dismiss();
    }

    #[must_use]
    pub fn snapshot(&self) -> ToastState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.root.is_some()
    }
}

impl Drop for Toast {
    fn drop(&mut self) {
        if let Some((button, handler)) = &self.close {
            let _ = button
                .remove_event_listener_with_callback("click", handler.as_ref().unchecked_ref());
        }
    }
}

fn body_element(root: &Element) -> Option<Element> {
    if let Ok(Some(body)) = root.query_selector("p") {
        return Some(body);
    }
    let inner = root.query_selector(".toast-inner").ok().flatten()?;
    let body = root.owner_document()?.create_element("p").ok()?;
    inner.append_child(&body).ok()?;
    Some(body)
}

fn schedule_hide(root: Element, state: Rc<RefCell<ToastState>>, ticket: HideTicket) {
    let delay = i32::try_from(ticket.delay_ms).unwrap_or(i32::MAX);
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = dom::sleep_ms(delay).await {
            log::warn!("toast timer failed: {}", dom::js_error_message(&err));
            return;
        }
        let outcome = state.borrow_mut().expire(ticket);
        if outcome == ExpireOutcome::HidNewer {
            log::debug!("toast timer {} hid a newer message", ticket.generation);
        }
        let _ = root.class_list().remove_1(SHOW_CLASS);
    });
}

fn wire_close(
    button: &Element,
    root: &Element,
    state: &Rc<RefCell<ToastState>>,
) -> Closure<dyn FnMut(Event)> {
    let root = root.clone();
    let state = Rc::clone(state);
    let closure = Closure::wrap(Box::new(move |_event: Event| {
        let _ = root.class_list().remove_1(SHOW_CLASS);
        state.borrow_mut().dismiss();
    }) as Box<dyn FnMut(Event)>);
    let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure
}
