//! `Transport` backed by the browser Fetch API

use async_trait::async_trait;
use js_sys::{Array, Uint8Array};
use prism_core::{ClientError, FilePart, HttpRequest, HttpResponse, RequestBody, Transport};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Request, RequestInit, RequestMode, Response};

#[derive(Debug, Default, Clone, Copy)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        fetch(&request)
            .await
            .map_err(|e| ClientError::Network(js_error_text(&e)))
    }
}

async fn fetch(request: &HttpRequest) -> Result<HttpResponse, JsValue> {
    let window = web_sys::window().ok_or("No window")?;

    let opts = RequestInit::new();
    opts.set_method(request.method.as_str());
    opts.set_mode(RequestMode::Cors);

    let mut content_type = None;
    match &request.body {
        RequestBody::Empty => {}
        RequestBody::Json(json) => {
            opts.set_body(&JsValue::from_str(json));
            content_type = Some("application/json");
        }
        // The browser sets the multipart boundary header itself
        RequestBody::Multipart(part) => {
            let form: FormData = form_data(part)?;
            opts.set_body(&form);
        }
    }

    let js_request = Request::new_with_str_and_init(&request.url, &opts)?;
    if let Some(content_type) = content_type {
        js_request.headers().set("Content-Type", content_type)?;
    }

    let response = JsFuture::from(window.fetch_with_request(&js_request)).await?;
    let response: Response = response.dyn_into()?;

    let buffer = JsFuture::from(response.array_buffer()?).await?;
    Ok(HttpResponse {
        status: response.status(),
        status_text: response.status_text(),
        body: Uint8Array::new(&buffer).to_vec(),
    })
}

fn form_data(part: &FilePart) -> Result<FormData, JsValue> {
    let bytes = Uint8Array::from(&part.bytes[..]);
    let props = BlobPropertyBag::new();
    props.set_type(&part.content_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&Array::of1(&bytes), &props)?;

    let form = FormData::new()?;
    form.append_with_blob_and_filename(&part.field, &blob, &part.filename)?;
    Ok(form)
}

fn js_error_text(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    match value.dyn_ref::<js_sys::Error>() {
        Some(err) => String::from(err.message()),
        None => "Request failed".to_string(),
    }
}
