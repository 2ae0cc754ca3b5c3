use thiserror::Error;

/// Everything that can go wrong between a UI action and the backend.
///
/// None of these are fatal: each is caught at the component boundary and
/// rendered inline. Nothing is retried automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx status. `message` is the best text we could extract.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// A 2xx body that does not decode into the expected shape.
    #[error("Invalid response: {0}")]
    Parse(String),

    /// Rejected locally before anything was sent.
    #[error("Invalid input: {0}")]
    Validation(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Text shown in place of the failed view.
    ///
    /// Status errors always carry the code, even when the backend supplied
    /// its own message.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http { status, message } if message.contains(&status.to_string()) => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Parse(err.to_string())
    }
}
