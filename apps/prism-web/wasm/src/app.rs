//! The application object driven by the page script
//!
//! JavaScript owns the DOM and the file picker; every state change goes
//! through `PrismApp` and comes back as a serialized snapshot to render.

use prism_core::{ClientConfig, LocalFile, Prism};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::fetch::FetchTransport;
use crate::logging;

#[wasm_bindgen]
pub struct PrismApp {
    inner: Prism<FetchTransport>,
}

#[wasm_bindgen]
impl PrismApp {
    /// Create the app. `config` is a `ClientConfig`-shaped object, its JSON
    /// text, or `undefined` for the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<PrismApp, JsValue> {
        let config = if let Some(json) = config.as_string() {
            parse_config(Some(&json))
        } else if config.is_undefined() || config.is_null() {
            Ok(ClientConfig::default())
        } else {
            config_from_object(config)
        }
        .map_err(|e| JsValue::from_str(&e))?;
        logging::init(&config.log_level);
        tracing::info!(base_url = %config.base_url, "prism app created");

        Ok(Self {
            inner: Prism::new(config, FetchTransport),
        })
    }

    /// Pick a local file. Non-PDF files are ignored.
    #[wasm_bindgen(js_name = selectFile)]
    pub async fn select_file(
        &self,
        name: String,
        mime: String,
        bytes: Vec<u8>,
    ) -> Result<JsValue, JsValue> {
        self.inner
            .select_local_file(LocalFile::new(name, mime, bytes))
            .await;
        self.snapshot()
    }

    #[wasm_bindgen(js_name = openDocument)]
    pub async fn open_document(&self, id: String) -> Result<JsValue, JsValue> {
        self.inner.select_remote_document(&id).await;
        self.snapshot()
    }

    /// Follow a location path; resolves to the route that was shown.
    pub async fn navigate(&self, path: String) -> Result<JsValue, JsValue> {
        let route = self.inner.navigate(&path).await;
        to_js(&route)
    }

    #[wasm_bindgen(js_name = sendChat)]
    pub async fn send_chat(&self, text: String) -> Result<JsValue, JsValue> {
        self.inner.send_chat(&text).await;
        self.snapshot()
    }

    #[wasm_bindgen(js_name = canSend)]
    pub fn can_send(&self, text: &str) -> bool {
        self.inner.session().chat().can_send(text)
    }

    #[wasm_bindgen(js_name = refreshDocuments)]
    pub async fn refresh_documents(&self) -> Result<JsValue, JsValue> {
        let state = self.inner.refresh_documents().await;
        to_js(&state)
    }

    #[wasm_bindgen(js_name = fetchArxiv)]
    pub async fn fetch_arxiv(&self) -> Result<JsValue, JsValue> {
        let state = self.inner.fetch_arxiv().await;
        to_js(&state)
    }

    #[wasm_bindgen(js_name = documentCards)]
    pub fn document_cards(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.document_cards())
    }

    #[wasm_bindgen(js_name = arxivCards)]
    pub fn arxiv_cards(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.arxiv_cards())
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.snapshot())
    }

    /// Report the page count pdf.js found. `generation` is the snapshot
    /// generation the load was started for; counts for a replaced paper are
    /// ignored.
    #[wasm_bindgen(js_name = documentLoaded)]
    pub fn document_loaded(&self, generation: u32, page_count: u32) -> Result<JsValue, JsValue> {
        self.inner.apply_page_count(generation, page_count);
        self.snapshot()
    }

    #[wasm_bindgen(js_name = nextPage)]
    pub fn next_page(&self) -> bool {
        self.inner.with_session(|s| s.viewer_mut().go_to_page(1))
    }

    #[wasm_bindgen(js_name = previousPage)]
    pub fn previous_page(&self) -> bool {
        self.inner.with_session(|s| s.viewer_mut().go_to_page(-1))
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&self) -> bool {
        self.inner.with_session(|s| s.viewer_mut().zoom_in())
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&self) -> bool {
        self.inner.with_session(|s| s.viewer_mut().zoom_out())
    }

    /// Generation of the current subject, for `documentLoaded`
    #[wasm_bindgen(getter)]
    pub fn generation(&self) -> u32 {
        self.inner.session().generation()
    }

    #[wasm_bindgen(getter, js_name = currentPage)]
    pub fn current_page(&self) -> u32 {
        self.inner.session().viewer().current_page()
    }

    /// Render scale for pdf.js
    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.session().viewer().zoom()
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn config_from_object(value: JsValue) -> Result<ClientConfig, String> {
    let config: ClientConfig = serde_wasm_bindgen::from_value(value)
        .map_err(|e| format!("Invalid configuration: {}", e))?;
    config.validate().map_err(|e| e.user_message())?;
    Ok(config)
}

/// Parse an optional JSON config; `None` or blank gives the defaults.
pub fn parse_config(json: Option<&str>) -> Result<ClientConfig, String> {
    match json.map(str::trim) {
        None | Some("") => Ok(ClientConfig::default()),
        Some(json) => ClientConfig::from_json(json).map_err(|e| e.user_message()),
    }
}
