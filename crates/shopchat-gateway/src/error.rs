/// Failure of a single gateway call
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request never produced a response
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a non-2xx status
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend answered 2xx but the body was not the expected JSON
    #[error("unreadable backend response: {0}")]
    Decode(String),

    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl GatewayError {
    /// Text shown to the user in the conversation.
    ///
    /// For status errors this is the server's body, or a generic
    /// `Request failed: <status>` when the body is empty.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Status { status, body } => {
                if body.trim().is_empty() {
                    format!("Request failed: {}", status)
                } else {
                    body.clone()
                }
            }
            GatewayError::Transport(message) | GatewayError::Decode(message) => message.clone(),
            GatewayError::Encode(e) => e.to_string(),
        }
    }
}
