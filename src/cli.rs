use crate::api::client::ApiClient;
use crate::api::types::MessageId;
use crate::app::{App, Settings};
use crate::backend::{self, BackendCommand, BackendResponse};
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Longest `wait` a single command may ask for.
const MAX_WAIT_MS: u64 = 60_000;

enum Step {
    Reply(Value),
    Quit(Value),
}

fn ok_response(app: &App) -> Value {
    json!({"ok": true, "page": page_snapshot(app)})
}

fn err_response(msg: &str) -> Value {
    json!({"ok": false, "error": msg})
}

/// JSON projection of everything the page currently shows.
pub fn page_snapshot(app: &App) -> Value {
    let rows: Vec<Value> = app
        .list
        .rows()
        .iter()
        .map(|row| {
            json!({
                "id": row.id,
                "from": row.from,
                "subject": row.subject,
                "received": row.received,
                "markup": row.markup(),
            })
        })
        .collect();

    let fields = app.compose.fields();
    json!({
        "list": {
            "count": app.list.count_label(),
            "placeholder": app.list.placeholder(),
            "cursor": app.list.cursor(),
            "rows": rows,
        },
        "detail": {
            "visible": app.detail.is_visible(),
            "id": app.detail.id(),
            "subject": app.detail.subject(),
            "from": app.detail.from(),
            "to": app.detail.to(),
            "date": app.detail.date(),
            "body": app.detail.body(),
        },
        "compose": {
            "open": app.compose.is_open(),
            "submission": app.compose.submission().as_str(),
            "status": app.compose.status(),
            "from": fields.from,
            "to": fields.to,
            "subject": fields.subject,
            "body": fields.body,
        },
    })
}

/// Handle backend responses until every request issued so far (including
/// follow-ups such as the refresh after a send) has completed.
fn settle(app: &mut App, resp_rx: &mpsc::Receiver<BackendResponse>) -> Result<(), String> {
    while app.in_flight() > 0 {
        let response = resp_rx
            .recv()
            .map_err(|_| "backend channel closed".to_string())?;
        app.handle_response(response, Instant::now());
    }
    Ok(())
}

fn handle_command(
    app: &mut App,
    resp_rx: &mpsc::Receiver<BackendResponse>,
    cmd: &Value,
) -> Step {
    let name = match cmd.get("command").and_then(|v| v.as_str()) {
        Some(name) => name,
        None => return Step::Reply(err_response("missing 'command'")),
    };

    let result: Result<(), String> = match name {
        "state" => Ok(()),
        "refresh" => {
            app.fetch_messages();
            Ok(())
        }
        "show" => match cmd.get("id").cloned().map(serde_json::from_value::<MessageId>) {
            Some(Ok(id)) => {
                app.show_message(id);
                Ok(())
            }
            _ => Err("'show' needs a string or integer 'id'".to_string()),
        },
        "select" => match cmd.get("index").and_then(|v| v.as_u64()) {
            Some(index) if app.activate_row(index as usize) => Ok(()),
            Some(index) => Err(format!("no message row at index {}", index)),
            None => Err("'select' needs an integer 'index'".to_string()),
        },
        "compose_open" => {
            app.open_compose();
            Ok(())
        }
        "compose_close" => {
            app.close_compose();
            Ok(())
        }
        "compose_set" => {
            let fields = app.compose.fields_mut();
            for (key, slot) in [
                ("from", &mut fields.from),
                ("to", &mut fields.to),
                ("subject", &mut fields.subject),
                ("body", &mut fields.body),
            ] {
                if let Some(value) = cmd.get(key).and_then(|v| v.as_str()) {
                    *slot = value.to_string();
                }
            }
            Ok(())
        }
        "send" => {
            app.submit_compose(Instant::now());
            Ok(())
        }
        "wait" => match cmd.get("ms").and_then(|v| v.as_u64()) {
            Some(ms) => {
                std::thread::sleep(Duration::from_millis(ms.min(MAX_WAIT_MS)));
                app.tick(Instant::now());
                Ok(())
            }
            None => Err("'wait' needs an integer 'ms'".to_string()),
        },
        "quit" => return Step::Quit(ok_response(app)),
        other => Err(format!("unknown command '{}'", other)),
    };

    if let Err(e) = result {
        return Step::Reply(err_response(&e));
    }
    match settle(app, resp_rx) {
        Ok(()) => Step::Reply(ok_response(app)),
        Err(e) => Step::Quit(err_response(&e)),
    }
}

/// JSON-over-stdin/stdout mode: one command object per line in, one reply
/// object per line out. The recurring poll is off; `refresh` fetches.
pub fn run_cli(client: ApiClient, settings: Settings) {
    let (cmd_tx, resp_rx) = backend::spawn(client);
    let mut app = App::new(
        cmd_tx.clone(),
        Settings {
            poll_interval: None,
            ..settings
        },
    );

    app.start(Instant::now());
    if let Err(e) = settle(&mut app, &resp_rx) {
        log::error!("initial fetch: {}", e);
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("reading stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let step = match serde_json::from_str::<Value>(&line) {
            Ok(cmd) => handle_command(&mut app, &resp_rx, &cmd),
            Err(e) => Step::Reply(err_response(&format!("invalid JSON: {}", e))),
        };
        let (reply, quit) = match step {
            Step::Reply(reply) => (reply, false),
            Step::Quit(reply) => (reply, true),
        };
        if writeln!(stdout, "{}", reply).and_then(|_| stdout.flush()).is_err() || quit {
            break;
        }
    }

    let _ = cmd_tx.send(BackendCommand::Shutdown);
}

pub fn print_help_cli() {
    println!("wmc --cli: JSON commands on stdin, one per line; one JSON reply per line.");
    println!();
    println!("Every successful reply is {{\"ok\": true, \"page\": {{...}}}} where page holds");
    println!("\"list\" (count, placeholder, cursor, rows[id, from, subject, received, markup]),");
    println!("\"detail\" (visible, id, subject, from, to, date, body) and");
    println!("\"compose\" (open, submission, status, from, to, subject, body).");
    println!("Failures reply {{\"ok\": false, \"error\": \"...\"}}.");
    println!();
    println!("Commands:");
    println!("  {{\"command\": \"state\"}}");
    println!("  {{\"command\": \"refresh\"}}");
    println!("  {{\"command\": \"show\", \"id\": 1718000000000}}");
    println!("  {{\"command\": \"select\", \"index\": 0}}");
    println!("  {{\"command\": \"compose_open\"}}");
    println!("  {{\"command\": \"compose_close\"}}");
    println!("  {{\"command\": \"compose_set\", \"from\": \"a@x\", \"to\": \"b@y\", \"subject\": \"Hi\", \"body\": \"...\"}}");
    println!("  {{\"command\": \"send\"}}");
    println!("  {{\"command\": \"wait\", \"ms\": 600}}");
    println!("  {{\"command\": \"quit\"}}");
    println!();
    println!("The message list is fetched once at startup. Commands that issue requests");
    println!("reply after every response, including the refresh that follows a send,");
    println!("has been applied.");
}
