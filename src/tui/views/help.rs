use crate::tui::screen::{Rect, Terminal};
use std::io;

const HELP: &[&str] = &[
    "wmc - Web Mail Console",
    "======================",
    "",
    "Message list",
    "------------",
    "  j/Down      Next message",
    "  k/Up        Previous message",
    "  Home/End    First / last message",
    "  Enter       Open selected message",
    "  Click       Open clicked message",
    "  Tab         Switch between list and reading pane",
    "  g           Refresh now (the list also refreshes on its own)",
    "  c           Compose",
    "  ?           Show this help",
    "  q           Quit",
    "",
    "Reading pane",
    "------------",
    "  j/k         Scroll one line",
    "  PgDn/PgUp   Scroll one page",
    "",
    "Compose",
    "-------",
    "  Tab         Next field",
    "  Shift-Tab   Previous field",
    "  Enter       Next field (new line in Body)",
    "  Ctrl-S      Send",
    "  Esc         Close and discard the draft",
];

pub fn render(term: &mut Terminal, area: Rect) -> io::Result<()> {
    for (i, line) in HELP.iter().take(area.height as usize).enumerate() {
        term.move_to(area.row + i as u16, area.col)?;
        if i == 0 {
            term.set_bold()?;
        }
        term.write_truncated(line, area.width)?;
        term.reset_attr()?;
    }
    Ok(())
}
