use crate::tui::screen::{fit, Rect, Terminal};
use crate::ui::list::{ListPane, Row};
use std::io;

const FROM_WIDTH: usize = 18;

/// First row index shown so that `cursor` stays on screen.
pub fn scroll_offset(cursor: usize, height: usize) -> usize {
    if height == 0 || cursor < height {
        0
    } else {
        cursor - height + 1
    }
}

/// Map a mouse click to the list row under it.
pub fn row_at(pane: &ListPane, area: Rect, row: u16, col: u16) -> Option<usize> {
    if !area.contains(row, col) || pane.placeholder().is_some() {
        return None;
    }
    let offset = scroll_offset(pane.cursor(), area.height as usize);
    let index = offset + (row - area.row) as usize;
    (index < pane.rows().len()).then_some(index)
}

fn format_row(row: &Row, width: usize) -> String {
    let from = fit(&row.from, FROM_WIDTH);
    let left = format!(" {:<fw$} {}", from, row.subject, fw = FROM_WIDTH);
    // room for the timestamp only on wide panes
    let time_width = row.received.chars().count() + 2;
    if width >= 60 && left.chars().count() + time_width <= width {
        let pad = width - left.chars().count() - time_width;
        format!("{}{}  {}", left, " ".repeat(pad), row.received)
    } else if width >= 60 {
        let keep = width.saturating_sub(time_width);
        format!("{}  {}", fit(&left, keep), row.received)
    } else {
        left
    }
}

pub fn render(pane: &ListPane, focused: bool, term: &mut Terminal, area: Rect) -> io::Result<()> {
    if area.height == 0 {
        return Ok(());
    }

    if let Some(text) = pane.placeholder() {
        term.move_to(area.row, area.col)?;
        term.set_dim()?;
        term.write_truncated(&format!(" {}", text), area.width)?;
        return term.reset_attr();
    }

    let offset = scroll_offset(pane.cursor(), area.height as usize);
    for (i, row) in pane
        .rows()
        .iter()
        .enumerate()
        .skip(offset)
        .take(area.height as usize)
    {
        term.move_to(area.row + (i - offset) as u16, area.col)?;
        if i == pane.cursor() {
            if focused {
                term.set_reverse()?;
            } else {
                term.set_bold()?;
            }
        }
        term.write_padded(&format_row(row, area.width as usize), area.width)?;
        term.reset_attr()?;
    }
    Ok(())
}
