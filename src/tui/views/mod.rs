pub mod compose;
pub mod detail;
pub mod help;
pub mod list;

use super::screen::{Rect, Terminal};
use crate::app::App;
use std::io;

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
    Compose,
}

/// Screen split: header on rows 1-2, list on the left, detail or compose on
/// the right, status bar on the last row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub list: Rect,
    pub right: Rect,
    pub divider_col: u16,
    pub status_row: u16,
}

impl Layout {
    pub fn compute(rows: u16, cols: u16) -> Self {
        let body_height = rows.saturating_sub(3);
        let list_width = (cols * 2 / 5).max(20).min(cols);
        let right_col = list_width + 2;
        Layout {
            list: Rect {
                row: 3,
                col: 1,
                width: list_width,
                height: body_height,
            },
            right: Rect {
                row: 3,
                col: right_col,
                width: cols.saturating_sub(right_col - 1),
                height: body_height,
            },
            divider_col: list_width + 1,
            status_row: rows.max(1),
        }
    }

    pub fn body(&self) -> Rect {
        Rect {
            row: self.list.row,
            col: 1,
            width: self.list.width + 1 + self.right.width,
            height: self.list.height,
        }
    }
}

pub fn render(
    app: &App,
    focus: Focus,
    show_help: bool,
    server: &str,
    term: &mut Terminal,
) -> io::Result<()> {
    term.clear()?;
    let layout = Layout::compute(term.rows, term.cols);

    term.move_to(1, 1)?;
    term.set_bold()?;
    let count = if app.list.count_label().is_empty() {
        "loading..."
    } else {
        app.list.count_label()
    };
    term.write_padded(&format!(" wmc  {}  [{}]", count, server), term.cols)?;
    term.reset_attr()?;
    term.move_to(2, 1)?;
    term.write_str(&"-".repeat(term.cols as usize))?;

    if show_help {
        help::render(term, layout.body())?;
    } else {
        list::render(&app.list, focus == Focus::List, term, layout.list)?;
        for row in layout.list.row..layout.list.row + layout.list.height {
            term.move_to(row, layout.divider_col)?;
            term.write_str("|")?;
        }
        if app.compose.is_open() {
            compose::render(&app.compose, focus == Focus::Compose, term, layout.right)?;
        } else {
            detail::render(&app.detail, focus == Focus::Detail, term, layout.right)?;
        }
    }

    term.move_to(layout.status_row, 1)?;
    term.set_reverse()?;
    let status = if show_help {
        " any key: close help".to_string()
    } else if app.compose.is_open() {
        let hints = "Tab:next field  C-s:send  Esc:close";
        if app.compose.status().is_empty() {
            format!(" {}", hints)
        } else {
            format!(" {} | {}", app.compose.status(), hints)
        }
    } else if app.in_flight() > 0 {
        " Loading... | q:quit".to_string()
    } else {
        " j/k:move  RET:open  Tab:switch pane  g:refresh  c:compose  ?:help  q:quit".to_string()
    };
    term.write_padded(&status, term.cols)?;
    term.reset_attr()?;

    term.flush()
}
