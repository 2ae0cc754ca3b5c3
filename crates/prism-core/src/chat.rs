//! Assistant conversation state
//!
//! A turn is a two-phase transition: [`ChatController::begin_send`] appends
//! the user message right away and hands out a [`ChatTurn`] describing the
//! request; [`ChatController::complete`] later appends the reply (or an
//! inline error) if that turn is still current.

use prism_types::{AnalysisResults, ChatMessage};
use tracing::{debug, warn};

use crate::api::ChatReply;
use crate::error::ClientError;

/// Everything needed to perform one backend round-trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    epoch: u64,
    pub messages: Vec<ChatMessage>,
    pub conversation_id: Option<String>,
    pub context: Option<String>,
}

#[derive(Debug, Default)]
pub struct ChatController {
    messages: Vec<ChatMessage>,
    conversation_id: Option<String>,
    awaiting_reply: bool,
    // Bumped by `clear` so replies for a previous subject are dropped.
    epoch: u64,
}

impl ChatController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Whether a send with this input would be accepted
    pub fn can_send(&self, text: &str) -> bool {
        !text.trim().is_empty() && !self.awaiting_reply
    }

    /// Forget the conversation. Any turn still in flight becomes stale.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.conversation_id = None;
        self.awaiting_reply = false;
        self.epoch += 1;
    }

    /// Append the user's message and describe the request to send.
    ///
    /// Returns `None` (and changes nothing) for blank input or while the
    /// previous turn is still waiting for its reply.
    pub fn begin_send(&mut self, text: &str, context: Option<String>) -> Option<ChatTurn> {
        if !self.can_send(text) {
            return None;
        }

        self.messages.push(ChatMessage::user(text.trim()));
        self.awaiting_reply = true;

        Some(ChatTurn {
            epoch: self.epoch,
            messages: self.messages.clone(),
            conversation_id: self.conversation_id.clone(),
            context,
        })
    }

    /// Apply the outcome of `turn`. Returns `false` if the conversation was
    /// cleared since the turn began.
    pub fn complete(&mut self, turn: &ChatTurn, outcome: Result<ChatReply, ClientError>) -> bool {
        if turn.epoch != self.epoch {
            debug!("dropping chat reply for a cleared conversation");
            return false;
        }

        self.awaiting_reply = false;
        match outcome {
            Ok(reply) => {
                self.messages.push(ChatMessage::assistant(reply.assistant));
                if reply.conversation_id.is_some() {
                    self.conversation_id = reply.conversation_id;
                }
            }
            Err(err) => {
                warn!(error = %err, "chat turn failed");
                self.messages
                    .push(ChatMessage::assistant(format!("Error: {}", err.user_message())));
            }
        }
        true
    }
}

/// Context string attached to a chat turn.
///
/// Analysis results win over a bare file name; results are serialized as
/// JSON and cut to `budget` characters.
pub fn build_context(
    results: Option<&AnalysisResults>,
    file_name: Option<&str>,
    budget: usize,
) -> Option<String> {
    if let Some(results) = results {
        return match serde_json::to_string(results) {
            Ok(json) => Some(truncate_chars(&json, budget)),
            Err(e) => {
                warn!(error = %e, "could not serialize results for chat context");
                file_name.map(file_context)
            }
        };
    }
    file_name.map(file_context)
}

pub fn file_context(file_name: &str) -> String {
    format!("Document: {}", file_name)
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
