use crate::app::{PageAuth, SharedNavigator};
use crate::components::nav_toggle::MENU_SELECTOR;
use crate::dom;
use sitekit_core::{AUTH_MARKER_ATTR, NavAction, NavEntry, Navigator, auth_entries};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, Event};

/// Login, or Profile plus Logout, appended to `#menu` according to the
/// credential marker.
pub struct NavAuth<N = SharedNavigator> {
    menu: Element,
    auth: Rc<PageAuth<N>>,
    handlers: RefCell<Vec<(Element, Closure<dyn FnMut(Event)>)>>,
}

impl<N: Navigator + 'static> NavAuth<N> {
    #[must_use]
    pub fn attach(doc: &Document, auth: Rc<PageAuth<N>>) -> Option<Self> {
        let menu = dom::query(doc, MENU_SELECTOR)?;
        Some(Self {
            menu,
            auth,
            handlers: RefCell::new(Vec::new()),
        })
    }

    /// Purge previously injected items and paint fresh ones. Safe to repeat.
    pub fn render(&self) {
        self.purge();
        let Some(doc) = self.menu.owner_document() else {
            return;
        };
        let authenticated = self.auth.snapshot().authenticated;
        for entry in auth_entries(authenticated, self.auth.config()) {
            match self.build_item(&doc, &entry) {
                Some(item) => {
                    let _ = self.menu.append_child(&item);
                }
                None => log::warn!("could not build menu item {}", entry.label),
            }
        }
    }

    fn build_item(&self, doc: &Document, entry: &NavEntry) -> Option<Element> {
        let item = doc.create_element("li").ok()?;
        item.set_attribute(AUTH_MARKER_ATTR, "1").ok()?;
        let link = doc.create_element("a").ok()?;
        link.set_attribute("href", &entry.href).ok()?;
        link.set_text_content(Some(entry.label));

        if entry.action == NavAction::Logout {
            let auth = Rc::clone(&self.auth);
            let handler = Closure::wrap(Box::new(move |event: Event| {
                event.prevent_default();
                if let Err(err) = auth.logout() {
                    log::error!("logout failed: {err}");
                }
            }) as Box<dyn FnMut(Event)>);
            link.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())
                .ok()?;
            self.handlers.borrow_mut().push((link.clone(), handler));
        }

        item.append_child(&link).ok()?;
        Some(item)
    }
}

impl<N> NavAuth<N> {
    fn purge(&self) {
        if let Ok(stale) = self.menu.query_selector_all(&format!("[{AUTH_MARKER_ATTR}]")) {
            for item in dom::elements(&stale) {
                item.remove();
            }
        }
        for (link, handler) in self.handlers.borrow_mut().drain(..) {
            let _ = link
                .remove_event_listener_with_callback("click", handler.as_ref().unchecked_ref());
        }
    }
}

impl<N> Drop for NavAuth<N> {
    fn drop(&mut self) {
        self.purge();
    }
}
