use super::types::{Draft, Message, MessageId, SendErrorBody};

/// Blocking client for the webmail backend's three endpoints.
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response (connect, DNS, reset, ...).
    Transport(String),
    /// The server answered with a non-success status.
    Rejected { status: u16, error: Option<String> },
    /// A success response whose body was not what we expected.
    Parse(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Transport(e) => write!(f, "transport error: {}", e),
            ApiError::Rejected {
                status,
                error: Some(e),
            } => write!(f, "HTTP {}: {}", status, e),
            ApiError::Rejected {
                status,
                error: None,
            } => write!(f, "HTTP {}", status),
            ApiError::Parse(e) => write!(f, "parse error: {}", e),
        }
    }
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        // No overall timeout: a stuck request only delays the next update.
        let agent = ureq::AgentBuilder::new().build();
        ApiClient {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/messages`
    pub fn list_messages(&self) -> Result<Vec<Message>, ApiError> {
        let url = self.url("/api/messages");
        log::debug!("GET {}", url);

        let response = self.agent.get(&url).call().map_err(classify)?;
        let messages: Vec<Message> = response
            .into_json()
            .map_err(|e| ApiError::Parse(format!("message list: {}", e)))?;

        log::debug!("GET {} returned {} messages", url, messages.len());
        Ok(messages)
    }

    /// `GET /api/messages/{id}`
    pub fn get_message(&self, id: &MessageId) -> Result<Message, ApiError> {
        let url = self.url(&format!("/api/messages/{}", id));
        log::debug!("GET {}", url);

        let response = self.agent.get(&url).call().map_err(classify)?;
        response
            .into_json()
            .map_err(|e| ApiError::Parse(format!("message {}: {}", id, e)))
    }

    /// `POST /api/send`. The body of a success response is ignored; a
    /// rejection carries the server's `error` text when it sent one.
    pub fn send(&self, draft: &Draft) -> Result<(), ApiError> {
        let url = self.url("/api/send");
        log::debug!("POST {} (to: {})", url, draft.to);

        match self.agent.post(&url).send_json(draft) {
            Ok(response) => {
                log::debug!("POST {} returned {}", url, response.status());
                Ok(())
            }
            Err(ureq::Error::Status(status, response)) => {
                let error = response
                    .into_json::<SendErrorBody>()
                    .ok()
                    .and_then(|body| body.error)
                    .filter(|e| !e.is_empty());
                log::warn!("POST {} rejected with {}: {:?}", url, status, error);
                Err(ApiError::Rejected { status, error })
            }
            Err(e) => {
                log::error!("POST {} failed: {}", url, e);
                Err(ApiError::Transport(e.to_string()))
            }
        }
    }
}

fn classify(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(status, _) => ApiError::Rejected {
            status,
            error: None,
        },
        ureq::Error::Transport(t) => ApiError::Transport(t.to_string()),
    }
}
