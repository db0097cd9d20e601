use crate::tui::screen::{Rect, Terminal};
use crate::ui::detail::DetailPane;
use std::io;

const PLACEHOLDER: &str = "Select a message to read it.";

pub fn render(pane: &DetailPane, focused: bool, term: &mut Terminal, area: Rect) -> io::Result<()> {
    if area.height == 0 || area.width == 0 {
        return Ok(());
    }

    if pane.placeholder_visible() {
        term.move_to(area.row, area.col)?;
        term.set_dim()?;
        term.write_truncated(PLACEHOLDER, area.width)?;
        return term.reset_attr();
    }

    let headers = [
        ("From", pane.from()),
        ("To", pane.to()),
        ("Date", pane.date()),
        ("Subject", pane.subject()),
    ];
    let mut row = area.row;
    let bottom = area.row + area.height;
    for (label, value) in headers {
        if row >= bottom {
            return Ok(());
        }
        term.move_to(row, area.col)?;
        term.set_bold()?;
        term.write_truncated(&format!("{}: ", label), area.width)?;
        term.reset_attr()?;
        let used = label.len() as u16 + 2;
        term.write_truncated(value, area.width.saturating_sub(used))?;
        row += 1;
    }

    // blank separator line, focus marker on it
    if row < bottom && focused {
        term.move_to(row, area.col)?;
        term.set_dim()?;
        term.write_truncated(&"-".repeat(area.width as usize), area.width)?;
        term.reset_attr()?;
    }
    row += 1;

    for line in pane.body().lines().skip(pane.scroll()) {
        if row >= bottom {
            break;
        }
        term.move_to(row, area.col)?;
        term.write_truncated(line, area.width)?;
        row += 1;
    }
    Ok(())
}
