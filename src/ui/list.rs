use super::{format_received, NO_SUBJECT};
use crate::api::types::{Message, MessageId};
use crate::escape::escape_html;

pub const EMPTY_PLACEHOLDER: &str = "No messages";

const UNKNOWN_SENDER: &str = "unknown";

/// One rendered list entry, bound to the message it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: MessageId,
    pub from: String,
    pub subject: String,
    pub received: String,
}

impl Row {
    fn from_message(message: &Message, date_format: &str) -> Self {
        Row {
            id: message.id.clone(),
            from: message
                .from
                .as_deref()
                .filter(|f| !f.is_empty())
                .unwrap_or(UNKNOWN_SENDER)
                .to_string(),
            subject: message
                .subject
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or(NO_SUBJECT)
                .to_string(),
            received: format_received(message.received_at.as_ref(), date_format),
        }
    }

    /// HTML fragment for this row. Sender and subject are untrusted.
    pub fn markup(&self) -> String {
        format!(
            concat!(
                "<li data-id=\"{}\">",
                "<div class=\"msg-left\"><div>",
                "<div class=\"msg-from\">{}</div>",
                "<div class=\"msg-subject\">{}</div>",
                "</div></div>",
                "<div class=\"msg-time\">{}</div>",
                "</li>"
            ),
            escape_html(Some(&self.id.to_string())),
            escape_html(Some(&self.from)),
            escape_html(Some(&self.subject)),
            escape_html(Some(&self.received)),
        )
    }
}

/// The message list region: count label, rows or placeholder, and the
/// keyboard selection.
#[derive(Debug, Default)]
pub struct ListPane {
    count_label: String,
    rows: Vec<Row>,
    placeholder: Option<&'static str>,
    cursor: usize,
}

impl ListPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list with `messages`, in the order given.
    pub fn render(&mut self, messages: &[Message], date_format: &str) {
        let selected = self.rows.get(self.cursor).map(|r| r.id.clone());

        self.rows.clear();
        self.placeholder = None;
        self.count_label = format!("{} messages", messages.len());

        if messages.is_empty() {
            self.placeholder = Some(EMPTY_PLACEHOLDER);
            self.cursor = 0;
            return;
        }

        self.rows = messages
            .iter()
            .map(|m| Row::from_message(m, date_format))
            .collect();

        // Keep the selection on the same message when it is still listed.
        self.cursor = selected
            .and_then(|id| self.rows.iter().position(|r| r.id == id))
            .unwrap_or_else(|| self.cursor.min(self.rows.len() - 1));
    }

    pub fn count_label(&self) -> &str {
        &self.count_label
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        self.cursor = if delta < 0 {
            self.cursor.saturating_sub(delta.unsigned_abs())
        } else {
            (self.cursor + delta as usize).min(last)
        };
    }

    pub fn cursor_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_to_end(&mut self) {
        self.cursor = self.rows.len().saturating_sub(1);
    }

    /// Select the row at `index` and return the message it is bound to.
    /// The placeholder is not activatable.
    pub fn activate(&mut self, index: usize) -> Option<MessageId> {
        let id = self.rows.get(index)?.id.clone();
        self.cursor = index;
        Some(id)
    }

    /// List items as HTML.
    pub fn markup(&self) -> String {
        match self.placeholder {
            Some(text) => format!("<li class='empty'>{}</li>", text),
            None => self
                .rows
                .iter()
                .map(Row::markup)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ReceivedAt;
    use crate::ui::DEFAULT_DATE_FORMAT;

    fn message(id: i64, from: Option<&str>, subject: Option<&str>) -> Message {
        Message {
            id: MessageId::Number(id),
            from: from.map(str::to_string),
            subject: subject.map(str::to_string),
            to: None,
            body: None,
            received_at: Some(ReceivedAt::Text("2024-06-10T08:00:00Z".to_string())),
        }
    }

    #[test]
    fn test_count_label_matches_length() {
        let mut pane = ListPane::new();
        for n in [0usize, 1, 2, 17] {
            let messages: Vec<Message> = (0..n as i64)
                .map(|i| message(i, Some("a@x"), Some("s")))
                .collect();
            pane.render(&messages, DEFAULT_DATE_FORMAT);
            assert_eq!(pane.count_label(), format!("{} messages", n));
            assert_eq!(pane.rows().len(), n);
        }
    }

    #[test]
    fn test_empty_list_shows_single_placeholder() {
        let mut pane = ListPane::new();
        pane.render(&[message(1, Some("a@x"), None)], DEFAULT_DATE_FORMAT);
        pane.render(&[], DEFAULT_DATE_FORMAT);

        assert_eq!(pane.placeholder(), Some("No messages"));
        assert!(pane.rows().is_empty());
        assert_eq!(pane.activate(0), None);
        assert_eq!(pane.markup(), "<li class='empty'>No messages</li>");
    }

    #[test]
    fn test_row_shows_sender_and_subject() {
        let mut pane = ListPane::new();
        pane.render(&[message(1, Some("a@x"), Some("Hi"))], DEFAULT_DATE_FORMAT);

        let row = &pane.rows()[0];
        assert_eq!(row.from, "a@x");
        assert_eq!(row.subject, "Hi");
        let markup = row.markup();
        assert!(markup.contains("<div class=\"msg-from\">a@x</div>"));
        assert!(markup.contains("<div class=\"msg-subject\">Hi</div>"));
        assert!(markup.contains("data-id=\"1\""));
        assert_eq!(pane.activate(0), Some(MessageId::Number(1)));
    }

    #[test]
    fn test_row_fallbacks() {
        let mut pane = ListPane::new();
        pane.render(&[message(3, None, None)], DEFAULT_DATE_FORMAT);
        assert_eq!(pane.rows()[0].from, "unknown");
        assert_eq!(pane.rows()[0].subject, "(no subject)");

        // The backend stores empty subjects for SMTP mail without one.
        pane.render(&[message(3, Some(""), Some(""))], DEFAULT_DATE_FORMAT);
        assert_eq!(pane.rows()[0].from, "unknown");
        assert_eq!(pane.rows()[0].subject, "(no subject)");
    }

    #[test]
    fn test_markup_escapes_untrusted_text() {
        let mut pane = ListPane::new();
        pane.render(
            &[message(
                1,
                Some("<script>evil</script>@x"),
                Some("Tom & \"Jerry\"'s"),
            )],
            DEFAULT_DATE_FORMAT,
        );
        let markup = pane.markup();
        assert!(!markup.contains("<script>"));
        assert!(markup.contains("&lt;script&gt;evil&lt;/script&gt;@x"));
        assert!(markup.contains("Tom &amp; &quot;Jerry&quot;&#39;s"));
    }

    #[test]
    fn test_any_numeric_id_renders_a_row() {
        let messages: Vec<Message> = serde_json::from_str(
            r#"[{"id": 1, "from": "a@x"}, {"id": 1.5, "from": "b@x"}, {"id": 1e3}]"#,
        )
        .unwrap();
        let mut pane = ListPane::new();
        pane.render(&messages, DEFAULT_DATE_FORMAT);

        assert_eq!(pane.count_label(), "3 messages");
        assert_eq!(pane.rows().len(), 3);
        assert!(pane.rows()[1].markup().starts_with("<li data-id=\"1.5\">"));
        assert!(pane.rows()[2].markup().starts_with("<li data-id=\"1000\">"));
        assert_eq!(pane.activate(1), Some(messages[1].id.clone()));
    }

    #[test]
    fn test_order_preserved() {
        let mut pane = ListPane::new();
        pane.render(
            &[
                message(3, Some("c"), None),
                message(1, Some("a"), None),
                message(2, Some("b"), None),
            ],
            DEFAULT_DATE_FORMAT,
        );
        let ids: Vec<String> = pane.rows().iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_selection_follows_message_across_renders() {
        let mut pane = ListPane::new();
        pane.render(
            &[message(1, Some("a"), None), message(2, Some("b"), None)],
            DEFAULT_DATE_FORMAT,
        );
        pane.move_cursor(1);
        assert_eq!(pane.cursor(), 1);

        // A new message arrives at the top; selection stays on id 2.
        pane.render(
            &[
                message(9, Some("z"), None),
                message(1, Some("a"), None),
                message(2, Some("b"), None),
            ],
            DEFAULT_DATE_FORMAT,
        );
        assert_eq!(pane.cursor(), 2);

        // Selected message gone: clamp.
        pane.render(&[message(9, Some("z"), None)], DEFAULT_DATE_FORMAT);
        assert_eq!(pane.cursor(), 0);
    }

    #[test]
    fn test_cursor_movement_is_clamped() {
        let mut pane = ListPane::new();
        pane.move_cursor(3);
        assert_eq!(pane.cursor(), 0);

        pane.render(
            &[message(1, None, None), message(2, None, None)],
            DEFAULT_DATE_FORMAT,
        );
        pane.move_cursor(10);
        assert_eq!(pane.cursor(), 1);
        pane.move_cursor(-10);
        assert_eq!(pane.cursor(), 0);
        pane.cursor_to_end();
        assert_eq!(pane.cursor(), 1);
        pane.cursor_to_start();
        assert_eq!(pane.cursor(), 0);
    }
}
