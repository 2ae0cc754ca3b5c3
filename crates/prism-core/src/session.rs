//! Analysis session: which paper is being looked at, and what we know about it
//!
//! The subject is either a file the user just picked or a document the
//! backend already stores, never both. Every subject change bumps a
//! generation counter; results are only applied when the generation they
//! were requested under is still current.

use prism_types::{AnalysisResults, AnalysisSummary, ChatMessage, Document};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::ChatReply;
use crate::chat::{build_context, ChatController, ChatTurn};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::files::{inspect_pdf, LocalFile};
use crate::viewer::{ViewerControls, ViewerState};

pub const DOCUMENT_NOT_FOUND: &str = "Document not found.";

#[derive(Debug, Clone, PartialEq)]
pub enum Subject {
    LocalFile(LocalFile),
    RemoteDocument(String),
}

/// What the results panel shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum ResultsState {
    Idle,
    Loading,
    Loaded(AnalysisResults),
    Failed(String),
}

/// Stored-document record behind the viewer (remote subjects only)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum DocumentState {
    None,
    Loading,
    Loaded(Document),
    NotFound,
    Failed(String),
}

/// Request the caller must perform for a subject change
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisRequest {
    Upload(LocalFile),
    Fetch(String),
}

/// Handle tying a backend response to the subject that asked for it
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAnalysis {
    generation: u32,
    pub request: AnalysisRequest,
}

/// Where the renderer should load the PDF from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewerSource {
    None,
    LocalFile { name: String },
    Url { url: String },
}

pub struct SessionController {
    context_budget: usize,
    subject: Option<Subject>,
    generation: u32,
    results: ResultsState,
    document: DocumentState,
    viewer: ViewerState,
    chat: ChatController,
}

impl SessionController {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            context_budget: config.context_budget,
            subject: None,
            generation: 0,
            results: ResultsState::Idle,
            document: DocumentState::None,
            viewer: ViewerState::new(config.viewer),
            chat: ChatController::new(),
        }
    }

    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    pub fn results(&self) -> &ResultsState {
        &self.results
    }

    pub fn document(&self) -> &DocumentState {
        &self.document
    }

    pub fn viewer(&self) -> &ViewerState {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut ViewerState {
        &mut self.viewer
    }

    pub fn chat(&self) -> &ChatController {
        &self.chat
    }

    pub fn local_file(&self) -> Option<&LocalFile> {
        match &self.subject {
            Some(Subject::LocalFile(file)) => Some(file),
            _ => None,
        }
    }

    pub fn document_id(&self) -> Option<&str> {
        match &self.subject {
            Some(Subject::RemoteDocument(id)) => Some(id),
            _ => None,
        }
    }

    /// Make a freshly picked file the subject and request its analysis.
    ///
    /// Non-PDF files are ignored: nothing changes and `None` is returned.
    pub fn select_local_file(&mut self, file: LocalFile) -> Option<PendingAnalysis> {
        if !file.is_pdf() {
            debug!(file = %file.name, mime = %file.mime, "ignoring non-PDF selection");
            return None;
        }

        self.start_subject(Subject::LocalFile(file.clone()));
        self.document = DocumentState::None;

        // Pre-size the viewer; pdf.js reports the authoritative count later.
        match inspect_pdf(&file.bytes) {
            Ok(info) => self.viewer.document_loaded(info.page_count),
            Err(e) => debug!(file = %file.name, error = %e, "could not pre-read page count"),
        }

        info!(file = %file.name, generation = self.generation, "local file selected");
        Some(PendingAnalysis {
            generation: self.generation,
            request: AnalysisRequest::Upload(file),
        })
    }

    /// Make a stored document the subject and request it by id.
    pub fn select_remote_document(&mut self, id: &str) -> PendingAnalysis {
        self.start_subject(Subject::RemoteDocument(id.to_string()));
        self.document = DocumentState::Loading;

        info!(document = %id, generation = self.generation, "remote document selected");
        PendingAnalysis {
            generation: self.generation,
            request: AnalysisRequest::Fetch(id.to_string()),
        }
    }

    /// Drop the subject and return to the upload screen state.
    pub fn clear(&mut self) {
        self.subject = None;
        self.generation = self.generation.wrapping_add(1);
        self.results = ResultsState::Idle;
        self.document = DocumentState::None;
        self.chat.clear();
        self.viewer.reset();
    }

    fn start_subject(&mut self, subject: Subject) {
        self.subject = Some(subject);
        self.generation = self.generation.wrapping_add(1);
        self.results = ResultsState::Loading;
        self.chat.clear();
        self.viewer.reset();
    }

    /// Token identifying the current subject. Renderer callbacks echo it
    /// back so a late page count cannot resize the viewer of a newer paper.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_current(&self, pending: &PendingAnalysis) -> bool {
        pending.generation == self.generation
    }

    /// Apply the renderer's page count for the subject loaded under
    /// `generation`. Returns `false` and leaves the viewer alone when the
    /// subject has changed since.
    pub fn apply_page_count(&mut self, generation: u32, page_count: u32) -> bool {
        if generation != self.generation {
            debug!(
                stale = generation,
                current = self.generation,
                page_count,
                "discarding stale page count"
            );
            return false;
        }
        self.viewer.document_loaded(page_count);
        true
    }

    /// Apply upload-and-analyze results. Returns `false` for a stale request.
    pub fn apply_analysis(
        &mut self,
        pending: &PendingAnalysis,
        outcome: Result<AnalysisResults, ClientError>,
    ) -> bool {
        if !self.accept(pending) {
            return false;
        }

        self.results = match outcome {
            Ok(results) => ResultsState::Loaded(results),
            Err(err) => {
                warn!(error = %err, "analysis failed");
                ResultsState::Failed(err.user_message())
            }
        };
        true
    }

    /// Apply a fetched document record. Returns `false` for a stale request.
    pub fn apply_document(
        &mut self,
        pending: &PendingAnalysis,
        outcome: Result<Document, ClientError>,
    ) -> bool {
        if !self.accept(pending) {
            return false;
        }

        match outcome {
            Ok(document) => {
                self.results = ResultsState::Loaded(document.results.clone().unwrap_or_default());
                self.document = DocumentState::Loaded(document);
            }
            Err(err) => {
                warn!(error = %err, "document fetch failed");
                self.results = ResultsState::Failed(err.user_message());
                self.document = if err.is_not_found() {
                    DocumentState::NotFound
                } else {
                    DocumentState::Failed(err.user_message())
                };
            }
        }
        true
    }

    fn accept(&self, pending: &PendingAnalysis) -> bool {
        if self.is_current(pending) {
            true
        } else {
            debug!(
                stale = pending.generation,
                current = self.generation,
                "discarding stale response"
            );
            false
        }
    }

    /// Context attached to the next chat turn
    pub fn chat_context(&self) -> Option<String> {
        let results = match &self.results {
            ResultsState::Loaded(results) => Some(results),
            _ => None,
        };
        let file_name = self.local_file().map(|f| f.name.as_str());
        build_context(results, file_name, self.context_budget)
    }

    pub fn begin_chat(&mut self, text: &str) -> Option<ChatTurn> {
        let context = self.chat_context();
        self.chat.begin_send(text, context)
    }

    pub fn complete_chat(&mut self, turn: &ChatTurn, outcome: Result<ChatReply, ClientError>) -> bool {
        self.chat.complete(turn, outcome)
    }

    pub fn viewer_source(&self) -> ViewerSource {
        match (&self.subject, &self.document) {
            (Some(Subject::LocalFile(file)), _) => ViewerSource::LocalFile {
                name: file.name.clone(),
            },
            (Some(Subject::RemoteDocument(_)), DocumentState::Loaded(doc))
                if !doc.public_url.is_empty() =>
            {
                ViewerSource::Url {
                    url: doc.public_url.clone(),
                }
            }
            _ => ViewerSource::None,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let summary = match &self.results {
            ResultsState::Loaded(results) => Some(results.summary()),
            _ => None,
        };

        SessionSnapshot {
            generation: self.generation,
            file_name: self.local_file().map(|f| f.name.clone()),
            document_id: self.document_id().map(str::to_string),
            results: self.results.clone(),
            summary,
            document: self.document.clone(),
            document_message: self.document_message(),
            viewer: self.viewer.clone(),
            controls: ViewerControls::from(&self.viewer),
            viewer_source: self.viewer_source(),
            messages: self.chat.messages().to_vec(),
            awaiting_reply: self.chat.is_awaiting_reply(),
        }
    }

    /// Placeholder text for the viewer pane, if it shows one
    pub fn document_message(&self) -> Option<String> {
        match &self.document {
            DocumentState::NotFound => Some(DOCUMENT_NOT_FOUND.to_string()),
            DocumentState::Failed(message) => Some(message.clone()),
            DocumentState::Loading => Some("Loading...".to_string()),
            DocumentState::Loaded(_) => None,
            DocumentState::None if self.subject.is_none() => {
                Some("Upload a PDF to get started".to_string())
            }
            DocumentState::None => None,
        }
    }
}

/// Read-only view of a session for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub generation: u32,
    pub file_name: Option<String>,
    pub document_id: Option<String>,
    pub results: ResultsState,
    pub summary: Option<AnalysisSummary>,
    pub document: DocumentState,
    pub document_message: Option<String>,
    pub viewer: ViewerState,
    pub controls: ViewerControls,
    pub viewer_source: ViewerSource,
    pub messages: Vec<ChatMessage>,
    pub awaiting_reply: bool,
}
