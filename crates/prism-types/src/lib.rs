//! Shared data model for the Prism paper-analysis front-end.
//!
//! Everything here mirrors the JSON exchanged with the analysis backend.
//! The client never computes these values; it only decodes and renders them.

pub mod chat;
pub mod types;
pub mod wire;

pub use chat::{ChatMessage, Role};
pub use types::{
    AnalysisResults, AnalysisSummary, ArxivPaper, Document, GrimOutcome, GrimResult,
    StatTestResult,
};
pub use wire::{
    ArxivResponse, ChatRequest, ChatResponse, DocumentListResponse, ErrorBody, UploadResponse,
};
