use super::{format_received, NO_SUBJECT};
use crate::api::types::{Message, MessageId};

/// The reading pane. Until a message has loaded the placeholder is shown
/// instead. Every field is plain text, never markup.
#[derive(Debug, Default)]
pub struct DetailPane {
    visible: bool,
    id: Option<MessageId>,
    subject: String,
    from: String,
    to: String,
    date: String,
    body: String,
    scroll: usize,
}

impl DetailPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: &Message, date_format: &str) {
        self.visible = true;
        self.id = Some(message.id.clone());
        self.subject = message
            .subject
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_SUBJECT)
            .to_string();
        self.from = message.from.clone().unwrap_or_default();
        self.to = message.to.as_deref().unwrap_or(&[]).join(", ");
        self.date = format_received(message.received_at.as_ref(), date_format);
        self.body = message.body.clone().unwrap_or_default();
        self.scroll = 0;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn placeholder_visible(&self) -> bool {
        !self.visible
    }

    pub fn id(&self) -> Option<&MessageId> {
        self.id.as_ref()
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let max = self.body.lines().count().saturating_sub(1);
        self.scroll = if delta < 0 {
            self.scroll.saturating_sub(delta.unsigned_abs())
        } else {
            (self.scroll + delta as usize).min(max)
        };
    }
}
