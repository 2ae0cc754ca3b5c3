//! Request and response envelopes of the `/api` endpoints.

use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;
use crate::types::{AnalysisResults, ArxivPaper, Document};

/// `POST /api/upload`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub filename: Option<String>,
    pub results: AnalysisResults,
}

/// `GET /api/documents`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentListResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
}

/// `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub assistant: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// `GET /api/arxiv`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArxivResponse {
    #[serde(default)]
    pub papers: Vec<ArxivPaper>,
}

/// Error body the backend sends with non-2xx statuses, when it sends one at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chat_request_omits_absent_fields() {
        let req = ChatRequest {
            messages: vec![ChatMessage::user("hello")],
            conversation_id: None,
            context: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"messages": [{"role": "user", "content": "hello"}]})
        );
    }

    #[test]
    fn test_document_list_tolerates_missing_key() {
        let list: DocumentListResponse = serde_json::from_str("{}").unwrap();
        assert!(list.documents.is_empty());
    }

    #[test]
    fn test_upload_response_extra_fields() {
        let json = r#"{"success": true, "filename": "paper.pdf", "results": {"stat_tests": [], "grim_checks": []}}"#;
        let resp: UploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.filename.as_deref(), Some("paper.pdf"));
        assert!(resp.results.is_empty());
    }
}
