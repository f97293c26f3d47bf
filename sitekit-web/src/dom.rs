use js_sys::{Function, Promise};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, NodeList, Window};

/// Retrieve the global `window` object, if running in a browser.
#[must_use]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Retrieve the document object for DOM interactions.
#[must_use]
pub fn document() -> Option<Document> {
    window().and_then(|win| win.document())
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Render an arbitrary JavaScript value the way `textContent = value` would.
#[must_use]
pub fn js_text(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(number) = value.as_f64() {
        return number.to_string();
    }
    if let Some(flag) = value.as_bool() {
        return flag.to_string();
    }
    if value.is_null() {
        return "null".to_string();
    }
    if value.is_undefined() {
        return "undefined".to_string();
    }
    value
        .dyn_ref::<js_sys::Object>()
        .map(|obj| String::from(obj.to_string()))
        .unwrap_or_default()
}

/// Blocking browser alert; silently skipped outside a browser.
pub fn alert(message: &str) {
    if let Some(win) = window()
        && let Err(err) = win.alert_with_message(message)
    {
        log::warn!("alert failed: {}", js_error_message(&err));
    }
}

/// First element matching `selector`, treating bad selectors as no match.
#[must_use]
pub fn query(doc: &Document, selector: &str) -> Option<Element> {
    doc.query_selector(selector).ok().flatten()
}

/// Collect the elements of a `NodeList`, skipping non-element nodes.
#[must_use]
pub fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|idx| list.get(idx))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Whether the page URL carries `key=value` in its query string.
#[must_use]
pub fn query_flag(key: &str, value: &str) -> bool {
    let needle = format!("{key}={value}");
    window()
        .and_then(|win| win.location().search().ok())
        .is_some_and(|search| {
            search
                .trim_start_matches('?')
                .split('&')
                .any(|pair| pair == needle)
        })
}

/// Yield execution for the requested number of milliseconds.
///
/// # Errors
/// Returns an error if no browser `window` is available, the timer cannot be
/// scheduled, or the underlying JavaScript promise rejects.
#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
pub async fn sleep_ms(duration_ms: i32) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
    let mut resolve_slot: Option<Function> = None;
    let promise = Promise::new(&mut |resolve, _reject| {
        resolve_slot = Some(resolve);
    });

    let resolve =
        resolve_slot.ok_or_else(|| JsValue::from_str("resolve function should be set"))?;
    let closure = Closure::once(move || {
        let _ = resolve.call0(&JsValue::UNDEFINED);
    });

    let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        duration_ms,
    )?;
    closure.forget();

    JsFuture::from(promise).await?;
    Ok(())
}
