//! Page bootstrap: builds every component once and keeps it alive for the
//! lifetime of the page.

use crate::components::{LinkGuard, NavAuth, NavToggle, RevealObserver, Toast, footer_year};
use crate::navigator::LocationNavigator;
use crate::storage::BrowserStore;
use crate::{config, dom};
use serde::Serialize;
use sitekit_core::{
    AuthSnapshot, AuthState, Navigator, ProtectedRoutes, RevealRule, SiteConfig, ToastState,
};
use std::cell::{OnceCell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Document;

/// Auth state over the browser's storage areas, with a pluggable navigator.
pub type PageAuth<N> = AuthState<BrowserStore, BrowserStore, N>;
pub type SharedNavigator = Rc<dyn Navigator>;
pub type WebAuth = PageAuth<SharedNavigator>;

thread_local! {
    static CONFIG: OnceCell<Rc<SiteConfig>> = const { OnceCell::new() };
    static SITE: RefCell<Option<Site>> = const { RefCell::new(None) };
    static NAVIGATOR: RefCell<SharedNavigator> = RefCell::new(Rc::new(LocationNavigator));
}

/// Shared site configuration, loaded on first use.
#[must_use]
pub fn site_config() -> Rc<SiteConfig> {
    CONFIG.with(|cell| Rc::clone(cell.get_or_init(|| Rc::new(config::load()))))
}

/// Swap the navigator behind every auth state built from now on and return
/// the previous one. Already mounted components keep theirs.
pub fn replace_navigator(navigator: SharedNavigator) -> SharedNavigator {
    NAVIGATOR.with(|slot| slot.replace(navigator))
}

#[must_use]
pub fn new_auth(config: Rc<SiteConfig>) -> WebAuth {
    let navigator = NAVIGATOR.with(|slot| slot.borrow().clone());
    AuthState::new(BrowserStore::durable(), BrowserStore::tab(), navigator, config)
}

/// Auth state for entry points that may run before the page is mounted.
#[must_use]
pub fn auth() -> Rc<WebAuth> {
    with_site(|site| Rc::clone(&site.auth)).unwrap_or_else(|| Rc::new(new_auth(site_config())))
}

/// Run `f` against the mounted site, if there is one.
pub fn with_site<R>(f: impl FnOnce(&Site) -> R) -> Option<R> {
    SITE.with(|slot| slot.borrow().as_ref().map(f))
}

/// Show a toast through the mounted site, or a one-off lookup before mount.
pub fn show_toast(message: &str) {
    if with_site(|site| site.toast.show(message)).is_some() {
        return;
    }
    match dom::document() {
        Some(doc) => Toast::lookup(&doc, &site_config()).show(message),
        None => log::warn!("no document to show toast: {message}"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSnapshot {
    pub aria_expanded: bool,
    pub open: bool,
}

/// Diagnostic view of every component, exposed through the test bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSnapshot {
    pub toast: ToastState,
    pub toast_attached: bool,
    pub menu: Option<MenuSnapshot>,
    pub auth: AuthSnapshot,
    pub pending_flash: Option<String>,
    pub revealed: usize,
    pub year_stamped: bool,
    pub protected_paths: Vec<String>,
}

pub struct Site {
    auth: Rc<WebAuth>,
    toast: Toast,
    reveal: RevealObserver,
    nav_toggle: Option<NavToggle>,
    nav_auth: Option<NavAuth>,
    link_guard: Option<LinkGuard>,
    year_stamped: bool,
}

impl Site {
    /// Wire every component against `doc`, deliver any pending flash message
    /// and paint the auth menu items.
    #[must_use]
    pub fn mount(doc: &Document, config: Rc<SiteConfig>) -> Self {
        let auth = Rc::new(new_auth(Rc::clone(&config)));
        let rule = RevealRule::new(config.reveal.threshold).unwrap_or_default();

        let reveal = RevealObserver::attach(doc, rule);
        let nav_toggle = NavToggle::attach(doc);
        if nav_toggle.is_none() {
            log::debug!("no nav toggle or menu, mobile menu disabled");
        }
        let toast = Toast::attach(doc, &config);
        let year_stamped = footer_year::stamp(doc);
        let nav_auth = NavAuth::attach(doc, Rc::clone(&auth));
        let link_guard =
            LinkGuard::attach(doc, Rc::clone(&auth), ProtectedRoutes::from_config(&config));

        let site = Self {
            auth,
            toast,
            reveal,
            nav_toggle,
            nav_auth,
            link_guard,
            year_stamped,
        };
        site.deliver_flash();
        site.refresh_nav();
        site
    }

    /// Show and consume the message left by the previous page.
    pub fn deliver_flash(&self) -> Option<String> {
        let message = self.auth.flash().take()?;
        self.toast.show(&message);
        Some(message)
    }

    /// Repaint the Login/Profile/Logout items after the auth state changed.
    pub fn refresh_nav(&self) {
        if let Some(nav) = &self.nav_auth {
            nav.render();
        }
    }

    #[must_use]
    pub fn toast(&self) -> &Toast {
        &self.toast
    }

    #[must_use]
    pub fn auth(&self) -> &WebAuth {
        &self.auth
    }

    #[must_use]
    pub fn snapshot(&self) -> SiteSnapshot {
        SiteSnapshot {
            toast: self.toast.snapshot(),
            toast_attached: self.toast.is_attached(),
            menu: self.nav_toggle.as_ref().map(|nav| MenuSnapshot {
                aria_expanded: nav.state().expanded,
                open: nav.menu_open(),
            }),
            auth: self.auth.snapshot(),
            pending_flash: self.auth.flash().peek(),
            revealed: self.reveal.revealed_count(),
            year_stamped: self.year_stamped,
            protected_paths: self
                .link_guard
                .as_ref()
                .map(|guard| guard.routes().paths().to_vec())
                .unwrap_or_default(),
        }
    }
}

/// Mount once the DOM is parsed; immediately if that already happened.
pub fn boot() {
    let Some(doc) = dom::document() else {
        log::warn!("no document, nothing to mount");
        return;
    };
    if doc.ready_state() == "loading" {
        let on_ready = Closure::once(mount_document);
        if let Err(err) = doc
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
        {
            log::error!("could not wait for DOMContentLoaded: {}", dom::js_error_message(&err));
            return;
        }
        on_ready.forget();
    } else {
        mount_document();
    }
}

/// Drop the mounted site, detaching its document-level listeners.
pub fn unmount() -> bool {
    SITE.with(|slot| slot.borrow_mut().take()).is_some()
}

fn mount_document() {
    if with_site(Site::refresh_nav).is_some() {
        return;
    }
    let Some(doc) = dom::document() else {
        return;
    };
    let site = Site::mount(&doc, site_config());
    SITE.with(|slot| *slot.borrow_mut() = Some(site));
    log::debug!("site helpers mounted");
    crate::test_bridge::install();
}
