//! Remote analysis client
//!
//! Wraps the five backend endpoints. Request building and response decoding
//! live here; moving bytes is the transport's job.

use prism_types::{
    AnalysisResults, ArxivPaper, ArxivResponse, ChatMessage, ChatRequest, ChatResponse,
    Document, DocumentListResponse, ErrorBody, UploadResponse,
};
use std::rc::Rc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::files::LocalFile;
use crate::transport::{FilePart, HttpRequest, HttpResponse, Transport};

/// Multipart field name the upload endpoint reads the PDF from
pub const UPLOAD_FIELD: &str = "file";

/// Result of one chat round-trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub assistant: String,
    pub conversation_id: Option<String>,
}

pub struct RemoteClient<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> RemoteClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Upload a PDF and wait for the backend to analyze it.
    pub async fn upload_and_analyze(&self, file: &LocalFile) -> Result<AnalysisResults, ClientError> {
        if !file.is_pdf() {
            return Err(ClientError::Validation(format!(
                "{} is not a PDF (type: {})",
                file.name, file.mime
            )));
        }

        let part = FilePart {
            field: UPLOAD_FIELD.to_string(),
            filename: file.name.clone(),
            content_type: file.mime.clone(),
            bytes: Rc::clone(&file.bytes),
        };
        let url = self.config.endpoint("/upload");
        debug!(file = %file.name, size = file.bytes.len(), "uploading for analysis");

        let response = self.execute(HttpRequest::post_multipart(url, part)).await?;
        let body: UploadResponse = decode(&response)?;
        Ok(body.results)
    }

    pub async fn fetch_document(&self, id: &str) -> Result<Document, ClientError> {
        let url = self.config.endpoint(&format!("/documents/{}", id));
        let response = self.execute(HttpRequest::get(url)).await?;
        decode(&response)
    }

    /// List stored documents. An empty list is a normal answer.
    pub async fn list_documents(&self) -> Result<Vec<Document>, ClientError> {
        let url = self.config.endpoint("/documents");
        let response = self.execute(HttpRequest::get(url)).await?;
        let body: DocumentListResponse = decode(&response)?;
        Ok(body.documents)
    }

    /// Send one chat turn. `history` already ends with the new user message.
    pub async fn chat_turn(
        &self,
        history: &[ChatMessage],
        conversation_id: Option<&str>,
        context: Option<&str>,
    ) -> Result<ChatReply, ClientError> {
        let request = ChatRequest {
            messages: history.to_vec(),
            conversation_id: conversation_id.map(str::to_string),
            context: context.map(str::to_string),
        };
        let json = serde_json::to_string(&request)
            .map_err(|e| ClientError::Validation(format!("Failed to encode chat request: {}", e)))?;

        let url = self.config.endpoint("/chat");
        let response = self.execute(HttpRequest::post_json(url, json)).await?;
        let body: ChatResponse = decode(&response)?;
        Ok(ChatReply {
            assistant: body.assistant,
            conversation_id: body.conversation_id,
        })
    }

    /// Ask the backend to pull and analyze recent arXiv papers.
    pub async fn fetch_arxiv(&self) -> Result<Vec<ArxivPaper>, ClientError> {
        let url = self.config.endpoint("/arxiv");
        let response = self.execute(HttpRequest::get(url)).await?;
        let body: ArxivResponse = decode(&response)?;
        Ok(body.papers)
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let method = request.method.as_str();
        let url = request.url.clone();

        let response = self.transport.send(request).await.inspect_err(|e| {
            warn!(%method, %url, error = %e, "request failed");
        })?;
        debug!(%method, %url, status = response.status, "response received");

        if !response.is_success() {
            return Err(ClientError::Http {
                status: response.status,
                message: error_message(&response),
            });
        }
        Ok(response)
    }
}

fn decode<D: DeserializeOwned>(response: &HttpResponse) -> Result<D, ClientError> {
    serde_json::from_slice(&response.body).map_err(ClientError::from)
}

/// Best available description of a failed response.
///
/// Tries the JSON `error` field, then the raw body text, then a generic
/// `HTTP <status>: <reason>` line. Never fails.
pub fn error_message(response: &HttpResponse) -> String {
    let generic = if response.status_text.is_empty() {
        format!("HTTP {}", response.status)
    } else {
        format!("HTTP {}: {}", response.status, response.status_text)
    };

    if let Ok(body) = serde_json::from_slice::<ErrorBody>(&response.body) {
        return match body.error {
            Some(message) if !message.trim().is_empty() => message,
            _ => generic,
        };
    }

    let text = response.text();
    if text.trim().is_empty() {
        generic
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::{response, MockTransport};
    use crate::transport::{HttpMethod, RequestBody};
    use pretty_assertions::assert_eq;
    use prism_types::Role;
    use serde_json::json;

    fn client() -> RemoteClient<MockTransport> {
        RemoteClient::new(
            ClientConfig::default().with_base_url("http://127.0.0.1:5000"),
            MockTransport::new(),
        )
    }

    fn pdf() -> LocalFile {
        LocalFile::new("paper.pdf", "application/pdf", b"%PDF-1.7\n%%EOF".to_vec())
    }

    #[test]
    fn test_error_message_prefers_json_error() {
        let resp = response(400, r#"{"error": "Only PDF files are supported"}"#);
        assert_eq!(error_message(&resp), "Only PDF files are supported");
    }

    #[test]
    fn test_error_message_json_without_error_field() {
        let resp = response(500, r#"{"detail": "boom"}"#);
        assert_eq!(error_message(&resp), "HTTP 500: Internal Server Error");
    }

    #[test]
    fn test_error_message_falls_back_to_text() {
        let resp = response(502, "<html>Bad gateway</html>");
        assert_eq!(error_message(&resp), "<html>Bad gateway</html>");
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        let resp = response(404, "");
        assert_eq!(error_message(&resp), "HTTP 404: Not Found");

        let mut resp = response(418, "   ");
        resp.status_text.clear();
        assert_eq!(error_message(&resp), "HTTP 418");
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_file_field() {
        let client = client();
        client
            .transport()
            .reply_json(json!({"success": true, "results": {"stat_tests": [], "grim_checks": []}}));

        let results = client.upload_and_analyze(&pdf()).await.unwrap();
        assert!(results.is_empty());

        let request = client.transport().last_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "http://127.0.0.1:5000/api/upload");
        match request.body {
            RequestBody::Multipart(part) => {
                assert_eq!(part.field, "file");
                assert_eq!(part.filename, "paper.pdf");
                assert_eq!(part.content_type, "application/pdf");
            }
            other => panic!("expected multipart body, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_part_shares_file_bytes() {
        let client = client();
        client
            .transport()
            .reply_json(json!({"success": true, "results": {"stat_tests": [], "grim_checks": []}}));

        let file = pdf();
        client.upload_and_analyze(&file).await.unwrap();

        match client.transport().last_request().body {
            RequestBody::Multipart(part) => assert!(Rc::ptr_eq(&part.bytes, &file.bytes)),
            other => panic!("expected multipart body, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_rejects_non_pdf_without_sending() {
        let client = client();
        let file = LocalFile::new("notes.txt", "text/plain", b"hello".to_vec());

        let err = client.upload_and_analyze(&file).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(client.transport().requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_upload_error_uses_backend_message() {
        let client = client();
        client
            .transport()
            .reply(500, r#"{"error": "pipeline crashed"}"#);

        let err = client.upload_and_analyze(&pdf()).await.unwrap_err();
        assert_eq!(
            err,
            ClientError::Http {
                status: 500,
                message: "pipeline crashed".to_string()
            }
        );
        assert_eq!(err.user_message(), "HTTP 500: pipeline crashed");
    }

    #[tokio::test]
    async fn test_upload_network_failure() {
        let client = client();
        client.transport().fail("connection refused");

        let err = client.upload_and_analyze(&pdf()).await.unwrap_err();
        assert_eq!(err, ClientError::Network("connection refused".to_string()));
    }

    #[tokio::test]
    async fn test_upload_malformed_success_body_is_parse_error() {
        let client = client();
        client.transport().reply(200, "definitely not json");

        let err = client.upload_and_analyze(&pdf()).await.unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_document_404_carries_status() {
        let client = client();
        client.transport().reply(404, "");

        let err = client.fetch_document("42").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.user_message().contains("404"));
        assert_eq!(
            client.transport().last_request().url,
            "http://127.0.0.1:5000/api/documents/42"
        );
    }

    #[tokio::test]
    async fn test_fetch_document_decodes_results() {
        let client = client();
        client.transport().reply_json(json!({
            "id": 42,
            "filename": "paper.pdf",
            "public_url": "https://storage/paper.pdf",
            "uploaded_at": "2024-05-01T12:00:00Z",
            "results": {
                "stat_tests": [{"test": "t test", "significant": true, "note": "ok"}],
                "grim_checks": []
            }
        }));

        let doc = client.fetch_document("42").await.unwrap();
        assert_eq!(doc.id, "42");
        assert_eq!(doc.results.unwrap().stat_tests.len(), 1);
    }

    #[tokio::test]
    async fn test_list_documents_empty_is_ok() {
        let client = client();
        client.transport().reply_json(json!({"documents": []}));

        let docs = client.list_documents().await.unwrap();
        assert!(docs.is_empty());
        assert_eq!(client.transport().last_request().method, HttpMethod::Get);
    }

    #[tokio::test]
    async fn test_chat_turn_payload() {
        let client = client();
        client
            .transport()
            .reply_json(json!({"assistant": "It means...", "conversation_id": "c-1"}));

        let history = vec![ChatMessage::user("What does p<.001 mean?")];
        let reply = client
            .chat_turn(&history, None, Some("File: paper.pdf"))
            .await
            .unwrap();

        assert_eq!(reply.assistant, "It means...");
        assert_eq!(reply.conversation_id.as_deref(), Some("c-1"));
        assert_eq!(
            client.transport().last_json(),
            json!({
                "messages": [{"role": "user", "content": "What does p<.001 mean?"}],
                "context": "File: paper.pdf"
            })
        );
        assert_eq!(history[0].role, Role::User);
    }

    #[tokio::test]
    async fn test_fetch_arxiv_error_body() {
        let client = client();
        client
            .transport()
            .reply(502, r#"{"error": "arXiv unavailable"}"#);

        let err = client.fetch_arxiv().await.unwrap_err();
        assert_eq!(err.user_message(), "HTTP 502: arXiv unavailable");
    }
}
