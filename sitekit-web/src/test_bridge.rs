//! `window.__sitekitTest`, installed only when the page URL has `?test=1`.

use crate::{app, dom};
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

struct BridgeBindings {
    state: Closure<dyn FnMut() -> JsValue>,
    toast: Closure<dyn FnMut(JsValue)>,
    flash: Closure<dyn FnMut() -> JsValue>,
}

thread_local! {
    static BRIDGE: RefCell<Option<BridgeBindings>> = const { RefCell::new(None) };
}

fn test_mode_enabled() -> bool {
    dom::query_flag("test", "1")
}

fn build_bridge() -> BridgeBindings {
    let state = Closure::wrap(Box::new(|| {
        app::with_site(app::Site::snapshot)
            .and_then(|snapshot| serde_wasm_bindgen::to_value(&snapshot).ok())
            .unwrap_or(JsValue::NULL)
    }) as Box<dyn FnMut() -> JsValue>);

    let toast = Closure::wrap(Box::new(|message: JsValue| {
        app::show_toast(&dom::js_text(&message));
    }) as Box<dyn FnMut(JsValue)>);

    // Re-run the page-load delivery, for flash messages written by the test.
    let flash = Closure::wrap(Box::new(|| {
        app::with_site(app::Site::deliver_flash)
            .flatten()
            .map_or(JsValue::NULL, |message| JsValue::from_str(&message))
    }) as Box<dyn FnMut() -> JsValue>);

    BridgeBindings {
        state,
        toast,
        flash,
    }
}

fn attach_bridge(bindings: &BridgeBindings) {
    let Some(window) = dom::window() else {
        return;
    };
    let bridge = js_sys::Object::new();
    let _ = js_sys::Reflect::set(
        &bridge,
        &JsValue::from_str("state"),
        bindings.state.as_ref().unchecked_ref(),
    );
    let _ = js_sys::Reflect::set(
        &bridge,
        &JsValue::from_str("toast"),
        bindings.toast.as_ref().unchecked_ref(),
    );
    let _ = js_sys::Reflect::set(
        &bridge,
        &JsValue::from_str("deliverFlash"),
        bindings.flash.as_ref().unchecked_ref(),
    );
    let _ = js_sys::Reflect::set(&window, &JsValue::from_str("__sitekitTest"), &bridge);
}

pub fn install() {
    if !test_mode_enabled() {
        return;
    }
    BRIDGE.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_none() {
            let bindings = build_bridge();
            attach_bridge(&bindings);
            log::info!("test bridge installed");
            *slot = Some(bindings);
        }
    });
}
