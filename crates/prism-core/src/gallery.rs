//! Document and arXiv galleries
//!
//! Both are lists loaded in one request. `Gallery` tracks the load with the
//! same generation guard as the session so an older load can never
//! overwrite a newer one.

use chrono::{DateTime, NaiveDateTime};
use prism_types::{ArxivPaper, Document};
use serde::Serialize;
use tracing::debug;

use crate::error::ClientError;
use crate::routes::Route;

pub const EMPTY_DOCUMENTS: &str = "No documents uploaded yet. Upload a PDF to get started.";
pub const EMPTY_ARXIV: &str =
    "Click \"Fetch Latest Papers\" to load recent statistics papers from arXiv";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(Vec<T>),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug)]
pub struct Gallery<T> {
    state: LoadState<T>,
    generation: u64,
}

impl<T> Default for Gallery<T> {
    fn default() -> Self {
        Self {
            state: LoadState::Idle,
            generation: 0,
        }
    }
}

impl<T: Clone> Gallery<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    pub fn items(&self) -> &[T] {
        match &self.state {
            LoadState::Loaded(items) => items,
            _ => &[],
        }
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        LoadTicket(self.generation)
    }

    /// Returns `false` if a newer load started after `ticket`.
    pub fn apply(&mut self, ticket: LoadTicket, outcome: Result<Vec<T>, ClientError>) -> bool {
        if ticket.0 != self.generation {
            debug!(stale = ticket.0, current = self.generation, "discarding stale gallery load");
            return false;
        }
        self.state = match outcome {
            Ok(items) => LoadState::Loaded(items),
            Err(err) => LoadState::Failed(err.user_message()),
        };
        true
    }
}

/// Card for one stored document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentCard {
    pub id: String,
    pub filename: String,
    pub uploaded_label: String,
    pub href: String,
}

impl From<&Document> for DocumentCard {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            filename: doc.filename.clone(),
            uploaded_label: format!("Uploaded: {}", format_timestamp(&doc.uploaded_at)),
            href: Route::DocumentDetail(doc.id.clone()).path(),
        }
    }
}

/// Where an arXiv card's button leads
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardAction {
    ViewAnalysis { href: String },
    ViewOnArxiv { url: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArxivCard {
    pub title: String,
    pub arxiv_label: String,
    pub updated_label: String,
    pub authors: String,
    pub abstract_preview: String,
    pub analyzed: bool,
    pub error: Option<String>,
    pub action: CardAction,
}

impl ArxivCard {
    pub fn new(paper: &ArxivPaper, abstract_preview: usize) -> Self {
        let action = match paper.analysis_id() {
            Some(id) => CardAction::ViewAnalysis {
                href: Route::DocumentDetail(id.to_string()).path(),
            },
            None => CardAction::ViewOnArxiv {
                url: paper.pdf_url.clone(),
            },
        };

        Self {
            title: paper.title.clone(),
            arxiv_label: format!("arXiv:{}", paper.arxiv_id),
            updated_label: format_date(&paper.updated),
            authors: author_line(&paper.authors),
            abstract_preview: truncate_abstract(&paper.summary, abstract_preview),
            analyzed: paper.analysis_complete,
            error: paper.error.clone(),
            action,
        }
    }
}

/// First three authors, then a count of the rest
pub fn author_line(authors: &[String]) -> String {
    let shown = authors
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if authors.len() > 3 {
        format!("{} +{} more", shown, authors.len() - 3)
    } else {
        shown
    }
}

pub fn truncate_abstract(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// `2024-05-01 12:00 UTC`, or the input unchanged when it is not a timestamp
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.naive_utc().format("%Y-%m-%d %H:%M UTC").to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format("%Y-%m-%d %H:%M UTC").to_string();
    }
    raw.to_string()
}

pub fn format_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.naive_utc().format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paper(complete: bool, id: Option<&str>) -> ArxivPaper {
        ArxivPaper {
            id: id.map(str::to_string),
            title: "Bayesian things".to_string(),
            authors: vec!["Ada".to_string(), "Bo".to_string()],
            summary: "short".to_string(),
            pdf_url: "https://arxiv.org/pdf/2401.00001".to_string(),
            arxiv_id: "2401.00001".to_string(),
            updated: "2024-01-02T03:04:05Z".to_string(),
            filename: None,
            public_url: None,
            analysis_complete: complete,
            error: None,
        }
    }

    #[test]
    fn test_gallery_empty_is_loaded_not_error() {
        let mut gallery: Gallery<Document> = Gallery::new();
        let ticket = gallery.begin_load();
        assert!(gallery.is_loading());
        assert!(gallery.apply(ticket, Ok(vec![])));
        assert_eq!(gallery.state(), &LoadState::Loaded(vec![]));
        assert!(gallery.items().is_empty());
    }

    #[test]
    fn test_gallery_failure_message() {
        let mut gallery: Gallery<Document> = Gallery::new();
        let ticket = gallery.begin_load();
        gallery.apply(
            ticket,
            Err(ClientError::Http {
                status: 500,
                message: "HTTP 500: Internal Server Error".to_string(),
            }),
        );
        assert_eq!(
            gallery.state(),
            &LoadState::Failed("HTTP 500: Internal Server Error".to_string())
        );
    }

    #[test]
    fn test_gallery_stale_load_dropped() {
        let mut gallery: Gallery<u32> = Gallery::new();
        let old = gallery.begin_load();
        let new = gallery.begin_load();

        assert!(gallery.apply(new, Ok(vec![2])));
        assert!(!gallery.apply(old, Ok(vec![1])));
        assert_eq!(gallery.items(), &[2]);
    }

    #[test]
    fn test_document_card() {
        let doc = Document {
            id: "42".to_string(),
            filename: "paper.pdf".to_string(),
            public_url: String::new(),
            uploaded_at: "2024-05-01T12:30:00+02:00".to_string(),
            results: None,
        };
        let card = DocumentCard::from(&doc);
        assert_eq!(card.href, "/documents/42");
        assert_eq!(card.uploaded_label, "Uploaded: 2024-05-01 10:30 UTC");
    }

    #[test]
    fn test_format_timestamp_variants() {
        assert_eq!(
            format_timestamp("2024-05-01T12:00:00.123456"),
            "2024-05-01 12:00 UTC"
        );
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        assert_eq!(format_date("2024-01-02T03:04:05Z"), "2024-01-02");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_author_line() {
        let names = |n: usize| (0..n).map(|i| format!("A{}", i)).collect::<Vec<_>>();
        assert_eq!(author_line(&names(0)), "");
        assert_eq!(author_line(&names(3)), "A0, A1, A2");
        assert_eq!(author_line(&names(5)), "A0, A1, A2 +2 more");
    }

    #[test]
    fn test_truncate_abstract() {
        assert_eq!(truncate_abstract("abcdef", 3), "abc...");
        assert_eq!(truncate_abstract("abc", 3), "abc");
        assert_eq!(truncate_abstract("αβγδ", 2), "αβ...");
    }

    #[test]
    fn test_arxiv_card_links_to_analysis() {
        let card = ArxivCard::new(&paper(true, Some("9")), 200);
        assert_eq!(
            card.action,
            CardAction::ViewAnalysis {
                href: "/documents/9".to_string()
            }
        );
        assert_eq!(card.arxiv_label, "arXiv:2401.00001");
        assert_eq!(card.updated_label, "2024-01-02");
    }

    #[test]
    fn test_arxiv_card_falls_back_to_pdf_url() {
        let failed = ArxivCard::new(&paper(false, Some("9")), 200);
        let missing_id = ArxivCard::new(&paper(true, None), 200);
        for card in [failed, missing_id] {
            assert_eq!(
                card.action,
                CardAction::ViewOnArxiv {
                    url: "https://arxiv.org/pdf/2401.00001".to_string()
                }
            );
        }
    }
}
