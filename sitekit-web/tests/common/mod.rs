#![allow(dead_code)]

use sitekit_core::{AuthState, RecordingNavigator, SiteConfig};
use sitekit_web::app::PageAuth;
use sitekit_web::{BrowserStore, dom};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, Event, EventInit, HtmlElement};

pub const FIXTURE_ID: &str = "sitekit-fixture";

/// Header, reveal targets above and below the fold, toast and footer.
pub const PAGE: &str = r#"
<header>
  <button class="nav-toggle" aria-expanded="false">Menu</button>
  <ul id="menu"><li><a href="/index.html">Home</a></li></ul>
</header>
<main>
  <section class="reveal" id="hero">Hero</section>
  <div style="height: 400vh"></div>
  <section class="reveal" id="below">Below the fold</section>
  <a id="protected" href="/createreport.html"><span id="protected-label">Create report</span></a>
  <a id="guide" href="/blog/createreport.html">Guide</a>
</main>
<div class="toast" role="status">
  <div class="toast-inner"><strong></strong><p></p></div>
  <button class="close-toast" aria-label="Close">x</button>
</div>
<footer>&copy; <span id="year"></span></footer>
"#;

/// Replace the fixture with `markup`, wipe both storage areas and drop any
/// site mounted at startup so its listeners stay out of the way.
pub fn mount(markup: &str) -> Document {
    sitekit_web::app::unmount();
    let doc = dom::document().expect("document");
    if let Some(stale) = doc.get_element_by_id(FIXTURE_ID) {
        stale.remove();
    }
    let root = doc.create_element("div").expect("create fixture");
    root.set_id(FIXTURE_ID);
    root.set_inner_html(markup);
    let body = doc.body().expect("document body");
    body.insert_before(&root, body.first_child().as_ref())
        .expect("insert fixture");
    clear_storage();
    doc
}

pub fn clear_storage() {
    let win = dom::window().expect("window");
    for area in [win.local_storage(), win.session_storage()] {
        area.expect("storage access")
            .expect("storage area")
            .clear()
            .expect("clear storage");
    }
}

pub fn local(key: &str) -> Option<String> {
    dom::window()
        .expect("window")
        .local_storage()
        .expect("storage access")
        .expect("storage area")
        .get_item(key)
        .expect("read local storage")
}

pub fn session(key: &str) -> Option<String> {
    dom::window()
        .expect("window")
        .session_storage()
        .expect("storage access")
        .expect("storage area")
        .get_item(key)
        .expect("read session storage")
}

pub fn set_local(key: &str, value: &str) {
    dom::window()
        .expect("window")
        .local_storage()
        .expect("storage access")
        .expect("storage area")
        .set_item(key, value)
        .expect("write local storage");
}

pub fn set_session(key: &str, value: &str) {
    dom::window()
        .expect("window")
        .session_storage()
        .expect("storage access")
        .expect("storage area")
        .set_item(key, value)
        .expect("write session storage");
}

pub fn config() -> Rc<SiteConfig> {
    Rc::new(SiteConfig::default())
}

/// Browser-backed auth that records redirects instead of leaving the runner.
pub fn recording_auth(
    config: Rc<SiteConfig>,
) -> (Rc<PageAuth<RecordingNavigator>>, RecordingNavigator) {
    let nav = RecordingNavigator::new();
    let auth = AuthState::new(
        BrowserStore::durable(),
        BrowserStore::tab(),
        nav.clone(),
        config,
    );
    (Rc::new(auth), nav)
}

pub fn element(doc: &Document, selector: &str) -> Element {
    doc.query_selector(selector)
        .expect("valid selector")
        .unwrap_or_else(|| panic!("{selector} present"))
}

pub fn click(el: &Element) {
    el.dyn_ref::<HtmlElement>().expect("html element").click();
}

/// Dispatch a bubbling, cancelable `click` and report whether it survived
/// every listener without `preventDefault`.
///
/// A trailing document listener cancels it afterwards so the runner page
/// never follows the link.
pub fn click_survives(doc: &Document, el: &Element) -> bool {
    let init = EventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    let event = Event::new_with_event_init_dict("click", &init).expect("click event");

    let seen = Rc::new(Cell::new(None));
    let sink = Rc::clone(&seen);
    let stopper = Closure::wrap(Box::new(move |event: Event| {
        sink.set(Some(event.default_prevented()));
        event.prevent_default();
    }) as Box<dyn FnMut(Event)>);
    doc.add_event_listener_with_callback("click", stopper.as_ref().unchecked_ref())
        .expect("add stopper");
    el.dispatch_event(&event).expect("dispatch click");
    doc.remove_event_listener_with_callback("click", stopper.as_ref().unchecked_ref())
        .expect("remove stopper");
    !seen.get().expect("stopper ran")
}

pub async fn settle(ms: i32) {
    dom::sleep_ms(ms).await.expect("timer");
}
