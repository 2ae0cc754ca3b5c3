//! Prism client core
//!
//! Platform-independent half of the paper-analysis front-end:
//! - `api::RemoteClient`: the five backend calls, over a pluggable `Transport`
//! - `session::SessionController`: current paper, its results, viewer and chat
//! - `gallery::Gallery`: stored documents and arXiv papers
//! - `driver::Prism`: wires the client to the controllers
//!
//! The browser bindings live in the `prism-wasm` app; this crate is tested
//! natively with a scripted transport.

pub mod api;
pub mod chat;
pub mod config;
pub mod driver;
pub mod error;
pub mod files;
pub mod gallery;
pub mod routes;
pub mod session;
pub mod transport;
pub mod viewer;

pub use api::{error_message, ChatReply, RemoteClient};
pub use chat::{build_context, ChatController, ChatTurn};
pub use config::{ClientConfig, ViewerLimits};
pub use driver::Prism;
pub use error::ClientError;
pub use files::{inspect_pdf, LocalFile, PdfInfo, PDF_MIME};
pub use gallery::{ArxivCard, CardAction, DocumentCard, Gallery, LoadState};
pub use routes::Route;
pub use session::{
    DocumentState, ResultsState, SessionController, SessionSnapshot, Subject, ViewerSource,
};
pub use transport::{FilePart, HttpMethod, HttpRequest, HttpResponse, RequestBody, Transport};
pub use viewer::{ViewerControls, ViewerState};
