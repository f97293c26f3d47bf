//! Entry points for the site's other scripts.
//!
//! Each function is exported from the wasm module and also installed on
//! `window` so inline page scripts can call `requireAuth()` and friends.

use crate::{app, dom};
use sitekit_core::{AuthError, StoreError};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

fn store_err(err: StoreError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn auth_err(err: AuthError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn nullable(value: Option<String>) -> JsValue {
    value.map_or(JsValue::NULL, |text| JsValue::from_str(&text))
}

#[wasm_bindgen(js_name = showToast)]
pub fn show_toast(message: &str) {
    app::show_toast(message);
}

/// # Errors
/// Throws if `localStorage` is unreadable.
#[wasm_bindgen(js_name = isAuthenticated)]
pub fn is_authenticated() -> Result<bool, JsValue> {
    app::auth().is_authenticated().map_err(store_err)
}

/// # Errors
/// Throws if storage or navigation fails.
#[wasm_bindgen(js_name = requireAuth)]
pub fn require_auth() -> Result<bool, JsValue> {
    app::auth().require_auth().map_err(auth_err)
}

/// # Errors
/// Throws if storage or navigation fails.
#[wasm_bindgen]
pub fn logout() -> Result<(), JsValue> {
    app::auth().logout().map_err(auth_err)
}

/// The stored token, or `null` when signed out.
///
/// # Errors
/// Throws if `localStorage` is unreadable.
#[wasm_bindgen(js_name = getToken)]
pub fn get_token() -> Result<JsValue, JsValue> {
    app::auth().token().map(nullable).map_err(store_err)
}

/// Store the login response's `access_token`/`token_type` and repaint the menu.
///
/// # Errors
/// Throws if `localStorage` rejects the write.
#[wasm_bindgen(js_name = signIn)]
pub fn sign_in(token: &str, token_type: Option<String>) -> Result<(), JsValue> {
    let kind = token_type.as_deref().unwrap_or("bearer");
    app::auth().sign_in(token, kind).map_err(store_err)?;
    let _ = app::with_site(app::Site::refresh_nav);
    Ok(())
}

/// # Errors
/// Throws if `localStorage` is unreadable.
#[wasm_bindgen(js_name = authHeader)]
pub fn auth_header() -> Result<JsValue, JsValue> {
    app::auth()
        .authorization_header()
        .map(nullable)
        .map_err(store_err)
}

fn optional_text(value: &JsValue) -> Option<String> {
    (!value.is_null() && !value.is_undefined()).then(|| dom::js_text(value))
}

fn set_global(window: &web_sys::Window, name: &str, value: &JsValue) {
    if let Err(err) = js_sys::Reflect::set(window, &JsValue::from_str(name), value) {
        log::warn!("could not install {name}: {}", dom::js_error_message(&err));
    }
}

type Getter<T> = Box<dyn FnMut() -> Result<T, JsValue>>;

/// Publish the entry points on `window`. The closures live for the page.
pub fn install_globals() {
    let Some(window) = dom::window() else {
        return;
    };

    let show = Closure::wrap(Box::new(|message: JsValue| {
        show_toast(&dom::js_text(&message));
    }) as Box<dyn FnMut(JsValue)>);
    set_global(&window, "showToast", &show.into_js_value());

    let is_auth = Closure::wrap(Box::new(is_authenticated) as Getter<bool>);
    set_global(&window, "isAuthenticated", &is_auth.into_js_value());

    let require = Closure::wrap(Box::new(require_auth) as Getter<bool>);
    set_global(&window, "requireAuth", &require.into_js_value());

    let sign_out = Closure::wrap(Box::new(logout) as Getter<()>);
    set_global(&window, "logout", &sign_out.into_js_value());

    let token = Closure::wrap(Box::new(get_token) as Getter<JsValue>);
    set_global(&window, "getToken", &token.into_js_value());

    let store = Closure::wrap(Box::new(|token: JsValue, kind: JsValue| {
        sign_in(&dom::js_text(&token), optional_text(&kind))
    }) as Box<dyn FnMut(JsValue, JsValue) -> Result<(), JsValue>>);
    set_global(&window, "signIn", &store.into_js_value());

    let header = Closure::wrap(Box::new(auth_header) as Getter<JsValue>);
    set_global(&window, "authHeader", &header.into_js_value());
}
