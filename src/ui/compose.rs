use crate::api::client::ApiError;
use crate::api::types::Draft;
use std::time::{Duration, Instant};

pub const STATUS_REQUIRED: &str = "From and To are required";
pub const STATUS_SENDING: &str = "Sending…";
pub const STATUS_SENT: &str = "Sent ✅";
pub const STATUS_FAILED: &str = "Failed to send";
pub const STATUS_NETWORK: &str = "Network error";

/// How long a successful send stays visible before the panel closes.
pub const AUTO_CLOSE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Idle,
    Sending,
    Succeeded,
    Failed,
}

impl Submission {
    pub fn as_str(self) -> &'static str {
        match self {
            Submission::Idle => "idle",
            Submission::Sending => "sending",
            Submission::Succeeded => "succeeded",
            Submission::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Closed by the user; the draft is thrown away.
    Dismissed,
    /// Closed automatically after a successful send; from/to are kept.
    AfterSend,
}

/// Why a send attempt did not go through, as shown in the panel status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendFailure {
    Validation,
    Rejected(Option<String>),
    Transport,
}

impl SendFailure {
    pub fn from_api(err: &ApiError) -> Self {
        match err {
            ApiError::Rejected { error, .. } => SendFailure::Rejected(error.clone()),
            ApiError::Transport(_) | ApiError::Parse(_) => SendFailure::Transport,
        }
    }

    pub fn status_text(&self) -> &str {
        match self {
            SendFailure::Validation => STATUS_REQUIRED,
            SendFailure::Rejected(Some(error)) => error,
            SendFailure::Rejected(None) => STATUS_FAILED,
            SendFailure::Transport => STATUS_NETWORK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    From,
    To,
    Subject,
    Body,
}

impl Field {
    pub fn next(self) -> Field {
        match self {
            Field::From => Field::To,
            Field::To => Field::Subject,
            Field::Subject => Field::Body,
            Field::Body => Field::From,
        }
    }

    pub fn prev(self) -> Field {
        match self {
            Field::From => Field::Body,
            Field::To => Field::From,
            Field::Subject => Field::To,
            Field::Body => Field::Subject,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::From => "From",
            Field::To => "To",
            Field::Subject => "Subject",
            Field::Body => "Body",
        }
    }
}

/// The form inputs backing a draft.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposeFields {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl ComposeFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::From => &self.from,
            Field::To => &self.to,
            Field::Subject => &self.subject,
            Field::Body => &self.body,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::From => &mut self.from,
            Field::To => &mut self.to,
            Field::Subject => &mut self.subject,
            Field::Body => &mut self.body,
        }
    }
}

/// Compose panel: open/closed state, the draft fields, the send sub-state
/// and the status line.
#[derive(Debug)]
pub struct ComposePanel {
    state: PanelState,
    submission: Submission,
    fields: ComposeFields,
    focus: Field,
    status: String,
    close_at: Option<Instant>,
    default_from: String,
}

impl ComposePanel {
    pub fn new(default_from: Option<String>) -> Self {
        let default_from = default_from.unwrap_or_default();
        ComposePanel {
            state: PanelState::Closed,
            submission: Submission::Idle,
            fields: ComposeFields {
                from: default_from.clone(),
                ..ComposeFields::default()
            },
            focus: Field::From,
            status: String::new(),
            close_at: None,
            default_from,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == PanelState::Open
    }

    pub fn submission(&self) -> Submission {
        self.submission
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn fields(&self) -> &ComposeFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut ComposeFields {
        &mut self.fields
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    #[cfg(test)]
    pub fn close_pending(&self) -> bool {
        self.close_at.is_some()
    }

    pub fn open(&mut self) {
        if self.state == PanelState::Open {
            return;
        }
        self.state = PanelState::Open;
        self.submission = Submission::Idle;
        self.status.clear();
        self.close_at = None;
        self.focus = if self.fields.from.trim().is_empty() {
            Field::From
        } else {
            Field::To
        };
    }

    pub fn close(&mut self, reason: CloseReason) {
        self.state = PanelState::Closed;
        self.submission = Submission::Idle;
        self.status.clear();
        self.close_at = None;
        if reason == CloseReason::Dismissed {
            self.fields = ComposeFields {
                from: self.default_from.clone(),
                ..ComposeFields::default()
            };
        }
    }

    /// Validate the draft and start sending it. Returns the payload to post,
    /// or `None` when nothing should go out.
    pub fn submit(&mut self) -> Option<Draft> {
        if self.state != PanelState::Open {
            return None;
        }
        if self.submission == Submission::Sending {
            log::debug!("send ignored: previous send still in flight");
            return None;
        }

        let from = self.fields.from.trim();
        let to = self.fields.to.trim();
        if from.is_empty() || to.is_empty() {
            self.fail(SendFailure::Validation);
            return None;
        }

        let draft = Draft {
            from: from.to_string(),
            to: to.to_string(),
            subject: self.fields.subject.clone(),
            body: self.fields.body.clone(),
        };
        self.submission = Submission::Sending;
        self.status = STATUS_SENDING.to_string();
        Some(draft)
    }

    /// Apply the outcome of a send. Returns true on success, in which case
    /// the caller refreshes the message list.
    pub fn on_sent(&mut self, result: &Result<(), ApiError>, now: Instant) -> bool {
        match result {
            Ok(()) => {
                self.submission = Submission::Succeeded;
                self.status = STATUS_SENT.to_string();
                self.close_at = Some(now + AUTO_CLOSE_DELAY);
                self.fields.subject.clear();
                self.fields.body.clear();
                true
            }
            Err(e) => {
                self.fail(SendFailure::from_api(e));
                false
            }
        }
    }

    /// Run the scheduled auto-close if it is due. Returns true if it closed.
    pub fn poll_close(&mut self, now: Instant) -> bool {
        match self.close_at {
            Some(at) if now >= at => {
                self.close(CloseReason::AfterSend);
                true
            }
            _ => false,
        }
    }

    fn fail(&mut self, failure: SendFailure) {
        self.submission = Submission::Failed;
        self.status = failure.status_text().to_string();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn insert_char(&mut self, c: char) {
        self.fields.get_mut(self.focus).push(c);
    }

    pub fn backspace(&mut self) {
        self.fields.get_mut(self.focus).pop();
    }
}
