//! WASM bindings for the Prism paper-analysis front-end
//!
//! State lives in Rust (`prism-core`); JavaScript renders snapshots and
//! forwards DOM events.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { PrismApp, PdfViewer, init_pdf_js } from './pkg/prism_wasm.js';
//!
//! await init();
//! await init_pdf_js();
//!
//! const app = new PrismApp({ base_url: "http://127.0.0.1:5000" });
//! const viewer = new PdfViewer();
//!
//! const snapshot = await app.selectFile(file.name, file.type, bytes);
//! app.documentLoaded(snapshot.generation, await viewer.load(bytes));
//! await viewer.render(app.currentPage, canvas, app.zoom);
//!
//! await app.sendChat("What does p<.001 mean?");
//! ```

pub mod app;
pub mod fetch;
pub mod logging;
pub mod pdf_viewer;

use prism_core::Route;
use wasm_bindgen::prelude::*;

pub use app::PrismApp;
pub use fetch::FetchTransport;
pub use pdf_viewer::PdfViewer;

/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Screen for a location path, as `{screen, id?}`
#[wasm_bindgen(js_name = resolveRoute)]
pub fn resolve_route(path: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&Route::parse(path))
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
