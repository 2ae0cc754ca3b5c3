//! PDF.js integration for rendering the selected paper

use js_sys::{Reflect, Uint8Array};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

const PDF_WORKER_SRC: &str =
    "https://cdn.jsdelivr.net/npm/pdfjs-dist@3.11.174/build/pdf.worker.min.js";

// External JavaScript functions from pdf-bridge.js
#[wasm_bindgen(module = "/www/js/pdf-bridge.js")]
extern "C" {
    #[wasm_bindgen(js_name = initPdfJs)]
    async fn init_pdf_js_internal(worker_src: &str) -> JsValue;

    #[wasm_bindgen(js_name = loadDocument)]
    async fn load_document_internal(data: Uint8Array) -> JsValue;

    #[wasm_bindgen(js_name = loadDocumentUrl)]
    async fn load_document_url_internal(url: &str) -> JsValue;

    #[wasm_bindgen(js_name = renderPage)]
    async fn render_page_internal(page_num: u32, canvas: &HtmlCanvasElement, scale: f64)
        -> JsValue;
}

/// Holds the pdf.js document proxy for the current paper
#[wasm_bindgen]
pub struct PdfViewer {
    document_proxy: Option<JsValue>,
    page_count: u32,
}

#[wasm_bindgen]
impl PdfViewer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            document_proxy: None,
            page_count: 0,
        }
    }

    /// Load a locally selected file. Returns the page count.
    pub async fn load(&mut self, bytes: Vec<u8>) -> Result<u32, JsValue> {
        let data = Uint8Array::new_with_length(bytes.len() as u32);
        data.copy_from(&bytes);
        let proxy = load_document_internal(data).await;
        self.accept(proxy)
    }

    /// Load a stored document from its public URL. Returns the page count.
    #[wasm_bindgen(js_name = loadUrl)]
    pub async fn load_url(&mut self, url: String) -> Result<u32, JsValue> {
        let proxy = load_document_url_internal(&url).await;
        self.accept(proxy)
    }

    #[wasm_bindgen(getter, js_name = pageCount)]
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    #[wasm_bindgen(js_name = isLoaded)]
    pub fn is_loaded(&self) -> bool {
        self.document_proxy.is_some() && self.page_count > 0
    }

    pub fn unload(&mut self) {
        self.document_proxy = None;
        self.page_count = 0;
    }

    /// Render one page at `scale` (1.0 = 100%)
    pub async fn render(
        &self,
        page_num: u32,
        canvas: HtmlCanvasElement,
        scale: f64,
    ) -> Result<(), JsValue> {
        self.check_page(page_num).map_err(|e| JsValue::from_str(&e))?;
        render_page_internal(page_num, &canvas, scale).await;
        Ok(())
    }
}

impl PdfViewer {
    fn accept(&mut self, proxy: JsValue) -> Result<u32, JsValue> {
        if proxy.is_undefined() || proxy.is_null() {
            self.unload();
            return Err(JsValue::from_str("Failed to load PDF document"));
        }

        self.page_count = Reflect::get(&proxy, &JsValue::from_str("numPages"))
            .ok()
            .and_then(|n| n.as_f64())
            .map(|n| n as u32)
            .unwrap_or(0);
        self.document_proxy = Some(proxy);
        tracing::debug!(pages = self.page_count, "pdf.js document loaded");
        Ok(self.page_count)
    }

    fn check_page(&self, page_num: u32) -> Result<(), String> {
        if self.document_proxy.is_none() {
            return Err("No document loaded".to_string());
        }
        if page_num < 1 || page_num > self.page_count {
            return Err(format!(
                "Invalid page number: {} (document has {} pages)",
                page_num, self.page_count
            ));
        }
        Ok(())
    }
}

impl Default for PdfViewer {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize pdf.js. Pass a worker URL to override the CDN default.
#[wasm_bindgen]
pub async fn init_pdf_js(worker_src: Option<String>) -> Result<(), JsValue> {
    init_pdf_js_internal(worker_src.as_deref().unwrap_or(PDF_WORKER_SRC)).await;
    Ok(())
}
