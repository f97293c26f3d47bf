use crate::app::{PageAuth, SharedNavigator};
use crate::dom;
use sitekit_core::{Navigator, ProtectedRoutes};
use std::marker::PhantomData;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, Event, HtmlAnchorElement};

/// Document-wide click listener that sends anonymous visitors to the login
/// page instead of a protected page.
pub struct LinkGuard<N = SharedNavigator> {
    doc: Document,
    routes: Rc<ProtectedRoutes>,
    click: Closure<dyn FnMut(Event)>,
    _auth: PhantomData<N>,
}

impl<N: Navigator + 'static> LinkGuard<N> {
    #[must_use]
    pub fn attach(doc: &Document, auth: Rc<PageAuth<N>>, routes: ProtectedRoutes) -> Option<Self> {
        let routes = Rc::new(routes);
        let guarded = Rc::clone(&routes);
        let click = Closure::wrap(Box::new(move |event: Event| {
            intercept(&event, &auth, &guarded);
        }) as Box<dyn FnMut(Event)>);
        doc.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())
            .ok()?;
        log::debug!("guarding {:?}", routes.paths());
        Some(Self {
            doc: doc.clone(),
            routes,
            click,
            _auth: PhantomData,
        })
    }

    #[must_use]
    pub fn routes(&self) -> &ProtectedRoutes {
        &self.routes
    }
}

impl<N> Drop for LinkGuard<N> {
    fn drop(&mut self) {
        let _ = self
            .doc
            .remove_event_listener_with_callback("click", self.click.as_ref().unchecked_ref());
    }
}

fn protected_anchor(event: &Event, routes: &ProtectedRoutes) -> Option<HtmlAnchorElement> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let anchor = target
        .closest("a[href]")
        .ok()
        .flatten()?
        .dyn_into::<HtmlAnchorElement>()
        .ok()?;
    let page_origin = dom::window()?.location().origin().ok()?;
    if anchor.origin() != page_origin {
        return None;
    }
    routes.is_protected(&anchor.pathname()).then_some(anchor)
}

fn intercept<N: Navigator>(event: &Event, auth: &PageAuth<N>, routes: &ProtectedRoutes) {
    let Some(anchor) = protected_anchor(event, routes) else {
        return;
    };
    match auth.is_authenticated() {
        Ok(true) => {}
        Ok(false) => {
            event.prevent_default();
            log::debug!("blocked {} for anonymous visitor", anchor.pathname());
            let message = &auth.config().messages.protected_link;
            if let Err(err) = auth.require_auth_with(message) {
                log::error!("login redirect failed: {err}");
            }
        }
        Err(err) => log::warn!("auth state unreadable, letting link through: {err}"),
    }
}
