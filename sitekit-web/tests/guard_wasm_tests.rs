#![cfg(target_arch = "wasm32")]

mod common;

use sitekit_core::ProtectedRoutes;
use sitekit_web::components::LinkGuard;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn routes() -> ProtectedRoutes {
    ProtectedRoutes::new("", ["createreport.html"])
}

#[wasm_bindgen_test]
fn anonymous_click_on_protected_link_goes_to_login() {
    let doc = common::mount(common::PAGE);
    let (auth, nav) = common::recording_auth(common::config());
    let _guard = LinkGuard::attach(&doc, auth, routes()).expect("guard attached");

    let label = common::element(&doc, "#protected-label");
    assert!(!common::click_survives(&doc, &label));

    assert_eq!(nav.visits(), vec!["login.html"]);
    assert_eq!(
        common::session("flash").as_deref(),
        Some("Please log in to create a report.")
    );
}

#[wasm_bindgen_test]
fn signed_in_click_passes_through() {
    let doc = common::mount(common::PAGE);
    common::set_local("access_token", "abc");
    let (auth, nav) = common::recording_auth(common::config());
    let _guard = LinkGuard::attach(&doc, auth, routes()).expect("guard attached");

    assert!(common::click_survives(&doc, &common::element(&doc, "#protected")));
    assert!(nav.visits().is_empty());
    assert_eq!(common::session("flash"), None);
}

#[wasm_bindgen_test]
fn same_file_name_elsewhere_is_not_guarded() {
    let doc = common::mount(common::PAGE);
    let (auth, nav) = common::recording_auth(common::config());
    let _guard = LinkGuard::attach(&doc, auth, routes()).expect("guard attached");

    assert!(common::click_survives(&doc, &common::element(&doc, "#guide")));
    assert!(nav.visits().is_empty());
}

#[wasm_bindgen_test]
fn dropped_guard_stops_listening() {
    let doc = common::mount(common::PAGE);
    let (auth, nav) = common::recording_auth(common::config());
    drop(LinkGuard::attach(&doc, auth, routes()));

    assert!(common::click_survives(&doc, &common::element(&doc, "#protected")));
    assert!(nav.visits().is_empty());
}
