use crate::api::client::ApiError;
use crate::api::types::MessageId;
use crate::backend::{BackendCommand, BackendResponse};
use crate::ui::compose::{CloseReason, ComposePanel};
use crate::ui::detail::DetailPane;
use crate::ui::list::ListPane;
use crate::ui::poller::Poller;
use crate::ui::DEFAULT_DATE_FORMAT;
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Startup settings for the page.
#[derive(Debug, Clone)]
pub struct Settings {
    pub poll_interval: Option<Duration>,
    pub date_format: String,
    pub default_from: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            poll_interval: Some(Duration::from_secs(6)),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            default_from: None,
        }
    }
}

/// The page: built once at startup, holds every pane plus the handle to the
/// backend. Front ends feed it input, timer ticks and backend responses, one
/// at a time.
pub struct App {
    cmd_tx: mpsc::Sender<BackendCommand>,
    date_format: String,
    poller: Poller,
    in_flight: usize,
    pub list: ListPane,
    pub detail: DetailPane,
    pub compose: ComposePanel,
}

impl App {
    pub fn new(cmd_tx: mpsc::Sender<BackendCommand>, settings: Settings) -> Self {
        App {
            cmd_tx,
            date_format: settings.date_format,
            poller: Poller::new(settings.poll_interval),
            in_flight: 0,
            list: ListPane::new(),
            detail: DetailPane::new(),
            compose: ComposePanel::new(settings.default_from),
        }
    }

    /// Fetch the list right away and arm the recurring poll.
    pub fn start(&mut self, now: Instant) {
        log::info!("starting; poll interval {:?}", self.poller.interval());
        self.fetch_messages();
        self.poller.start(now);
    }

    /// Number of requests issued whose response has not been handled yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn dispatch(&mut self, cmd: BackendCommand) -> bool {
        match self.cmd_tx.send(cmd) {
            Ok(()) => {
                self.in_flight += 1;
                true
            }
            Err(_) => {
                log::error!("backend channel closed; request dropped");
                false
            }
        }
    }

    pub fn fetch_messages(&mut self) {
        self.dispatch(BackendCommand::FetchMessages);
    }

    pub fn show_message(&mut self, id: MessageId) {
        log::debug!("loading message {}", id);
        self.dispatch(BackendCommand::GetMessage { id });
    }

    /// Row activation (click, Enter). Returns false for the placeholder or an
    /// index past the end.
    pub fn activate_row(&mut self, index: usize) -> bool {
        match self.list.activate(index) {
            Some(id) => {
                self.show_message(id);
                true
            }
            None => false,
        }
    }

    pub fn open_compose(&mut self) {
        self.compose.open();
    }

    pub fn close_compose(&mut self) {
        self.compose.close(CloseReason::Dismissed);
    }

    pub fn submit_compose(&mut self, now: Instant) {
        let draft = match self.compose.submit() {
            Some(draft) => draft,
            None => return,
        };
        log::info!("sending message to {}", draft.to);
        if !self.dispatch(BackendCommand::Send { draft }) {
            let unavailable = Err(ApiError::Transport("backend unavailable".to_string()));
            self.compose.on_sent(&unavailable, now);
        }
    }

    /// Apply one backend response. Returns true if anything visible changed.
    pub fn handle_response(&mut self, response: BackendResponse, now: Instant) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        match response {
            BackendResponse::Messages(Ok(messages)) => {
                log::debug!("rendering {} messages", messages.len());
                self.list.render(&messages, &self.date_format);
                true
            }
            BackendResponse::Messages(Err(ApiError::Rejected { status, .. })) => {
                log::debug!("message list not refreshed: HTTP {}", status);
                false
            }
            BackendResponse::Messages(Err(e)) => {
                log::warn!("Failed to fetch messages: {}", e);
                false
            }
            BackendResponse::Message { id, result } => match *result {
                Ok(message) => {
                    self.detail.show(&message, &self.date_format);
                    true
                }
                Err(e) => {
                    log::warn!("Failed to load message {}: {}", id, e);
                    false
                }
            },
            BackendResponse::Sent(result) => {
                if self.compose.on_sent(&result, now) {
                    log::info!("message sent");
                    self.fetch_messages();
                } else if let Err(e) = &result {
                    log::warn!("send failed: {}", e);
                }
                true
            }
        }
    }

    /// Timer work: the recurring poll and the compose auto-close.
    /// Returns true if anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.poller.due(now) {
            self.fetch_messages();
        }
        self.compose.poll_close(now)
    }
}
