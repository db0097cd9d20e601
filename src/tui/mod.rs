pub mod input;
pub mod screen;
pub mod views;

use crate::api::client::ApiClient;
use crate::app::{App, Settings};
use crate::backend::{self, BackendCommand};
use crate::ui::compose::Field;
use input::{read_key, Key};
use screen::Terminal;
use std::io;
use std::time::Instant;
use views::{Focus, Layout};

/// Front-end state that is not part of the page itself.
#[derive(Debug)]
pub struct UiState {
    pub focus: Focus,
    pub show_help: bool,
}

impl UiState {
    pub fn new() -> Self {
        UiState {
            focus: Focus::List,
            show_help: false,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Redraw,
    Ignored,
    Quit,
}

pub fn run(client: ApiClient, settings: Settings, mouse: bool) -> io::Result<()> {
    let server = client.base_url().to_string();
    let (cmd_tx, resp_rx) = backend::spawn(client);
    let mut term = Terminal::new(mouse)?;

    let mut app = App::new(cmd_tx.clone(), settings);
    let mut ui = UiState::new();
    app.start(Instant::now());

    views::render(&app, ui.focus, ui.show_help, &server, &mut term)?;

    loop {
        let mut needs_render = term.check_resize();

        // Backend completions, in arrival order.
        while let Ok(response) = resp_rx.try_recv() {
            if app.handle_response(response, Instant::now()) {
                needs_render = true;
            }
        }

        if app.tick(Instant::now()) {
            needs_render = true;
        }

        // Blocks for at most 100ms (VTIME), which paces the loop.
        if let Some(key) = read_key() {
            let layout = Layout::compute(term.rows, term.cols);
            match handle_key(&mut app, &mut ui, key, &layout, Instant::now()) {
                KeyOutcome::Quit => break,
                KeyOutcome::Redraw => needs_render = true,
                KeyOutcome::Ignored => {}
            }
        }

        // Auto-close or Esc hands the keyboard back to the list.
        if ui.focus == Focus::Compose && !app.compose.is_open() {
            ui.focus = Focus::List;
            needs_render = true;
        }

        if needs_render {
            views::render(&app, ui.focus, ui.show_help, &server, &mut term)?;
        }
    }

    let _ = cmd_tx.send(BackendCommand::Shutdown);
    log::info!("exiting");
    Ok(())
}

pub fn handle_key(
    app: &mut App,
    ui: &mut UiState,
    key: Key,
    layout: &Layout,
    now: Instant,
) -> KeyOutcome {
    if ui.show_help {
        ui.show_help = false;
        return KeyOutcome::Redraw;
    }

    if ui.focus == Focus::Compose && app.compose.is_open() {
        return handle_compose_key(app, key, now);
    }

    let page = layout.list.height.max(1) as isize;
    match key {
        Key::Char('q') | Key::Ctrl('c') => KeyOutcome::Quit,
        Key::Char('?') => {
            ui.show_help = true;
            KeyOutcome::Redraw
        }
        Key::Char('c') => {
            app.open_compose();
            ui.focus = Focus::Compose;
            KeyOutcome::Redraw
        }
        Key::Char('g') => {
            app.fetch_messages();
            KeyOutcome::Redraw
        }
        Key::Tab | Key::BackTab => {
            ui.focus = match ui.focus {
                Focus::List if app.detail.is_visible() => Focus::Detail,
                Focus::List => Focus::List,
                _ if app.compose.is_open() => Focus::Compose,
                _ => Focus::List,
            };
            KeyOutcome::Redraw
        }
        Key::MouseClick { row, col } => {
            match views::list::row_at(&app.list, layout.list, row, col) {
                Some(index) => {
                    app.activate_row(index);
                    ui.focus = Focus::List;
                    KeyOutcome::Redraw
                }
                None if app.compose.is_open() && layout.right.contains(row, col) => {
                    ui.focus = Focus::Compose;
                    KeyOutcome::Redraw
                }
                None => KeyOutcome::Ignored,
            }
        }
        Key::Enter if ui.focus == Focus::List => {
            app.activate_row(app.list.cursor());
            KeyOutcome::Redraw
        }
        _ if ui.focus == Focus::Detail => scroll_detail(app, key, page),
        Key::Char('j') | Key::Down | Key::ScrollDown => {
            app.list.move_cursor(1);
            KeyOutcome::Redraw
        }
        Key::Char('k') | Key::Up | Key::ScrollUp => {
            app.list.move_cursor(-1);
            KeyOutcome::Redraw
        }
        Key::PageDown => {
            app.list.move_cursor(page);
            KeyOutcome::Redraw
        }
        Key::PageUp => {
            app.list.move_cursor(-page);
            KeyOutcome::Redraw
        }
        Key::Home => {
            app.list.cursor_to_start();
            KeyOutcome::Redraw
        }
        Key::End => {
            app.list.cursor_to_end();
            KeyOutcome::Redraw
        }
        _ => KeyOutcome::Ignored,
    }
}

fn scroll_detail(app: &mut App, key: Key, page: isize) -> KeyOutcome {
    let delta = match key {
        Key::Char('j') | Key::Down | Key::ScrollDown => 1,
        Key::Char('k') | Key::Up | Key::ScrollUp => -1,
        Key::PageDown | Key::Char(' ') => page,
        Key::PageUp => -page,
        Key::Home => isize::MIN / 2,
        Key::End => isize::MAX / 2,
        _ => return KeyOutcome::Ignored,
    };
    app.detail.scroll_by(delta);
    KeyOutcome::Redraw
}

fn handle_compose_key(app: &mut App, key: Key, now: Instant) -> KeyOutcome {
    match key {
        Key::Escape => app.close_compose(),
        Key::Ctrl('s') => app.submit_compose(now),
        Key::Tab | Key::Down => app.compose.focus_next(),
        Key::BackTab | Key::Up => app.compose.focus_prev(),
        Key::Enter if app.compose.focus() == Field::Body => app.compose.insert_char('\n'),
        Key::Enter => app.compose.focus_next(),
        Key::Backspace => app.compose.backspace(),
        Key::Char(c) => app.compose.insert_char(c),
        _ => return KeyOutcome::Ignored,
    }
    KeyOutcome::Redraw
}
