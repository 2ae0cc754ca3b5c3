//! Ties the remote client to the controllers
//!
//! All methods take `&self`. State sits behind `RefCell`s that are only
//! borrowed between awaits, so a new selection can start while an older
//! request is still in flight; the older one is then discarded on arrival.

use std::cell::{Ref, RefCell};

use prism_types::{ArxivPaper, Document};
use tracing::debug;

use crate::api::RemoteClient;
use crate::config::ClientConfig;
use crate::files::LocalFile;
use crate::gallery::{ArxivCard, DocumentCard, Gallery, LoadState};
use crate::routes::Route;
use crate::session::{AnalysisRequest, PendingAnalysis, SessionController, SessionSnapshot};
use crate::transport::Transport;

pub struct Prism<T> {
    client: RemoteClient<T>,
    session: RefCell<SessionController>,
    documents: RefCell<Gallery<Document>>,
    arxiv: RefCell<Gallery<ArxivPaper>>,
}

impl<T: Transport> Prism<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        let session = SessionController::new(&config);
        Self {
            client: RemoteClient::new(config, transport),
            session: RefCell::new(session),
            documents: RefCell::new(Gallery::new()),
            arxiv: RefCell::new(Gallery::new()),
        }
    }

    pub fn client(&self) -> &RemoteClient<T> {
        &self.client
    }

    pub fn config(&self) -> &ClientConfig {
        self.client.config()
    }

    pub fn session(&self) -> Ref<'_, SessionController> {
        self.session.borrow()
    }

    /// Run `f` against the session, e.g. to move the viewer.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut SessionController) -> R) -> R {
        f(&mut self.session.borrow_mut())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.borrow().snapshot()
    }

    /// Page count reported by the renderer for the subject of `generation`.
    pub fn apply_page_count(&self, generation: u32, page_count: u32) -> bool {
        self.session
            .borrow_mut()
            .apply_page_count(generation, page_count)
    }

    /// Select a local file and analyze it.
    ///
    /// Returns `false` if the file was ignored (not a PDF) or if a newer
    /// selection replaced it before the analysis came back.
    pub async fn select_local_file(&self, file: LocalFile) -> bool {
        let pending = self.session.borrow_mut().select_local_file(file);
        let Some(pending) = pending else {
            return false;
        };
        self.run_analysis(pending).await
    }

    /// Select a stored document and fetch it with its results.
    pub async fn select_remote_document(&self, id: &str) -> bool {
        let pending = self.session.borrow_mut().select_remote_document(id);
        self.run_analysis(pending).await
    }

    /// Follow a client route. Detail routes load their document.
    pub async fn navigate(&self, path: &str) -> Route {
        let route = Route::parse(path);
        match &route {
            Route::DocumentDetail(id) => {
                let already_open = self.session.borrow().document_id() == Some(id.as_str());
                if !already_open {
                    self.select_remote_document(id).await;
                }
            }
            Route::Home | Route::Documents => self.session.borrow_mut().clear(),
            Route::NotFound => {}
        }
        route
    }

    async fn run_analysis(&self, pending: PendingAnalysis) -> bool {
        match &pending.request {
            AnalysisRequest::Upload(file) => {
                let outcome = self.client.upload_and_analyze(file).await;
                self.session.borrow_mut().apply_analysis(&pending, outcome)
            }
            AnalysisRequest::Fetch(id) => {
                let outcome = self.client.fetch_document(id).await;
                self.session.borrow_mut().apply_document(&pending, outcome)
            }
        }
    }

    /// Send a chat message. Returns `false` if the input was rejected or the
    /// reply arrived after the subject changed.
    pub async fn send_chat(&self, text: &str) -> bool {
        let turn = self.session.borrow_mut().begin_chat(text);
        let Some(turn) = turn else {
            debug!("chat send ignored");
            return false;
        };

        let outcome = self
            .client
            .chat_turn(
                &turn.messages,
                turn.conversation_id.as_deref(),
                turn.context.as_deref(),
            )
            .await;
        self.session.borrow_mut().complete_chat(&turn, outcome)
    }

    pub async fn refresh_documents(&self) -> LoadState<DocumentCard> {
        let ticket = self.documents.borrow_mut().begin_load();
        let outcome = self.client.list_documents().await;
        self.documents.borrow_mut().apply(ticket, outcome);
        self.document_cards()
    }

    pub async fn fetch_arxiv(&self) -> LoadState<ArxivCard> {
        let ticket = self.arxiv.borrow_mut().begin_load();
        let outcome = self.client.fetch_arxiv().await;
        self.arxiv.borrow_mut().apply(ticket, outcome);
        self.arxiv_cards()
    }

    pub fn document_cards(&self) -> LoadState<DocumentCard> {
        map_state(self.documents.borrow().state(), |d| DocumentCard::from(d))
    }

    pub fn arxiv_cards(&self) -> LoadState<ArxivCard> {
        let preview = self.config().abstract_preview;
        map_state(self.arxiv.borrow().state(), |p| ArxivCard::new(p, preview))
    }
}

fn map_state<T, U>(state: &LoadState<T>, f: impl Fn(&T) -> U) -> LoadState<U> {
    match state {
        LoadState::Idle => LoadState::Idle,
        LoadState::Loading => LoadState::Loading,
        LoadState::Loaded(items) => LoadState::Loaded(items.iter().map(f).collect()),
        LoadState::Failed(message) => LoadState::Failed(message.clone()),
    }
}
