use crate::tui::screen::{Rect, Terminal};
use crate::ui::compose::{ComposePanel, Field};
use std::io;

const LABEL_WIDTH: usize = 8;

/// The single-line fields show their tail so the insertion point stays
/// visible while typing.
fn tail(value: &str, width: usize) -> String {
    let count = value.chars().count();
    value.chars().skip(count.saturating_sub(width)).collect()
}

pub fn render(
    panel: &ComposePanel,
    focused: bool,
    term: &mut Terminal,
    area: Rect,
) -> io::Result<()> {
    if area.height == 0 || area.width == 0 {
        return Ok(());
    }
    let bottom = area.row + area.height;

    term.move_to(area.row, area.col)?;
    term.set_bold()?;
    term.write_truncated("New message", area.width)?;
    term.reset_attr()?;

    let value_width = (area.width as usize).saturating_sub(LABEL_WIDTH + 3);
    let mut row = area.row + 2;
    for field in [Field::From, Field::To, Field::Subject] {
        if row >= bottom {
            return Ok(());
        }
        let active = focused && panel.focus() == field;
        term.move_to(row, area.col)?;
        if active {
            term.set_reverse()?;
        }
        term.write_str(&format!("{:>w$}:", field.label(), w = LABEL_WIDTH))?;
        term.reset_attr()?;
        let mut value = tail(panel.fields().get(field), value_width);
        if active {
            value.push('_');
        }
        term.write_str(" ")?;
        term.write_truncated(&value, value_width as u16 + 1)?;
        row += 1;
    }

    // body gets everything down to the status line
    if row + 1 >= bottom {
        return Ok(());
    }
    row += 1;
    term.move_to(row, area.col)?;
    let body_active = focused && panel.focus() == Field::Body;
    if body_active {
        term.set_reverse()?;
    }
    term.write_str(&format!("{:>w$}:", Field::Body.label(), w = LABEL_WIDTH))?;
    term.reset_attr()?;
    row += 1;

    let status_row = bottom - 1;
    let available = status_row.saturating_sub(row) as usize;
    let mut lines: Vec<String> = panel.fields().body.split('\n').map(str::to_string).collect();
    if body_active {
        if let Some(last) = lines.last_mut() {
            last.push('_');
        }
    }
    let skip = lines.len().saturating_sub(available);
    for line in lines.iter().skip(skip) {
        if row >= status_row {
            break;
        }
        term.move_to(row, area.col + 2)?;
        term.write_truncated(line, area.width.saturating_sub(2))?;
        row += 1;
    }

    if !panel.status().is_empty() && status_row > area.row {
        term.move_to(status_row, area.col)?;
        term.set_bold()?;
        term.write_truncated(panel.status(), area.width)?;
        term.reset_attr()?;
    }
    Ok(())
}
