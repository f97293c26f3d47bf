#![forbid(unsafe_code)]
//! Browser side of sitekit: DOM components built on `web-sys` around the
//! platform-agnostic models in `sitekit-core`.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod app;
pub mod components;
pub mod config;
pub mod dom;
pub mod exports;
pub mod navigator;
pub mod storage;
pub mod test_bridge;

pub use app::{Site, WebAuth};
pub use navigator::LocationNavigator;
pub use storage::BrowserStore;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let level = if cfg!(feature = "verbose-log") {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    // A host page may have installed a logger already.
    let _ = console_log::init_with_level(level);
    exports::install_globals();
    app::boot();
}
