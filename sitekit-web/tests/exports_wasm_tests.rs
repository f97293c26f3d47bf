#![cfg(target_arch = "wasm32")]

mod common;

use js_sys::{Function, Reflect};
use sitekit_core::RecordingNavigator;
use sitekit_web::{app, dom, exports};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn global(name: &str) -> Function {
    let window = dom::window().expect("window");
    Reflect::get(&window, &JsValue::from_str(name))
        .expect("read global")
        .dyn_into::<Function>()
        .unwrap_or_else(|_| panic!("{name} is a function"))
}

fn call(name: &str) -> JsValue {
    global(name)
        .call0(&JsValue::NULL)
        .unwrap_or_else(|err| panic!("{name} threw {err:?}"))
}

/// Fresh fixture and globals, with redirects recorded instead of followed.
fn setup() -> (web_sys::Document, RecordingNavigator, app::SharedNavigator) {
    let doc = common::mount(common::PAGE);
    let nav = RecordingNavigator::new();
    let previous = app::replace_navigator(Rc::new(nav.clone()));
    exports::install_globals();
    (doc, nav, previous)
}

#[wasm_bindgen_test]
fn signed_out_globals_report_nothing() {
    let (_doc, nav, previous) = setup();

    assert_eq!(call("isAuthenticated").as_bool(), Some(false));
    assert!(call("getToken").is_null());
    assert!(call("authHeader").is_null());
    assert!(nav.visits().is_empty());

    app::replace_navigator(previous);
}

#[wasm_bindgen_test]
fn require_auth_sends_anonymous_visitor_to_login() {
    let (_doc, nav, previous) = setup();

    assert_eq!(call("requireAuth").as_bool(), Some(false));
    assert_eq!(nav.visits(), vec!["login.html"]);
    assert_eq!(
        common::session("flash").as_deref(),
        Some("Please log in to continue.")
    );

    app::replace_navigator(previous);
}

#[wasm_bindgen_test]
fn sign_in_without_type_defaults_to_bearer() {
    let (_doc, nav, previous) = setup();

    global("signIn")
        .call2(&JsValue::NULL, &JsValue::from_str("abc"), &JsValue::NULL)
        .expect("signIn");

    assert_eq!(common::local("access_token").as_deref(), Some("abc"));
    assert_eq!(common::local("token_type").as_deref(), Some("bearer"));
    assert_eq!(call("isAuthenticated").as_bool(), Some(true));
    assert_eq!(call("getToken").as_string().as_deref(), Some("abc"));
    assert_eq!(call("authHeader").as_string().as_deref(), Some("bearer abc"));
    assert_eq!(call("requireAuth").as_bool(), Some(true));
    assert!(nav.visits().is_empty());

    app::replace_navigator(previous);
}

#[wasm_bindgen_test]
fn logout_clears_marker_and_goes_home() {
    let (_doc, nav, previous) = setup();
    common::set_local("access_token", "abc");
    common::set_local("token_type", "bearer");

    assert!(call("logout").is_undefined());

    assert_eq!(common::local("access_token"), None);
    assert_eq!(common::local("token_type"), None);
    assert_eq!(common::session("flash").as_deref(), Some("Signed out."));
    assert_eq!(nav.visits(), vec!["index.html"]);

    app::replace_navigator(previous);
}

#[wasm_bindgen_test]
fn show_toast_coerces_non_string_messages() {
    let (doc, _nav, previous) = setup();

    global("showToast")
        .call1(&JsValue::NULL, &JsValue::from_f64(42.0))
        .expect("showToast");

    assert_eq!(
        common::element(&doc, ".toast p").text_content().as_deref(),
        Some("42")
    );
    assert!(common::element(&doc, ".toast").class_list().contains("show"));

    app::replace_navigator(previous);
}
