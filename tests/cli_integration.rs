
use mock_api::MockApiServer;
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

fn sample_messages() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "from": "alice@example.com",
            "to": ["me@example.com", "team@example.com"],
            "subject": "<script>alert(1)</script>",
            "body": "Hello & welcome",
            "received_at": "2024-06-10T08:00:00Z",
            "helo": "mx.example.com"
        }),
        json!({"id": "abc"}),
    ]
}

fn write_config(dir: &std::path::Path, base_url: &str) -> std::path::PathBuf {
    let config_path = dir.join("config.toml");
    let config_content = format!(
        r#"[server]
base_url = "{}"

[ui]
poll_interval_secs = 0
"#,
        base_url
    );
    std::fs::write(&config_path, config_content).expect("write config");
    config_path
}

struct CliHarness {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
    server: Option<MockApiServer>,
    _config_dir: tempfile::TempDir,
}

impl CliHarness {
    fn start() -> Self {
        Self::start_with_messages(sample_messages())
    }

    fn start_with_messages(messages: Vec<Value>) -> Self {
        let server = MockApiServer::start(messages);
        let url = server.url();
        Self::spawn(&url, Some(server))
    }

    /// Nothing listens on port 1, so every request fails in transport.
    fn start_unreachable() -> Self {
        Self::spawn("http://127.0.0.1:1", None)
    }

    fn spawn(base_url: &str, server: Option<MockApiServer>) -> Self {
        let config_dir = tempfile::tempdir().expect("create temp dir");
        let config_path = write_config(config_dir.path(), base_url);

        let wmc_bin = env!("CARGO_BIN_EXE_wmc");
        let mut child = Command::new(wmc_bin)
            .arg("--cli")
            .arg(format!("--config={}", config_path.display()))
            .env("XDG_STATE_HOME", config_dir.path())
            .env_remove("RUST_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn wmc --cli");

        let stdin = child.stdin.take().expect("take stdin");
        let stdout = child.stdout.take().expect("take stdout");
        let reader = BufReader::new(stdout);

        CliHarness {
            child,
            stdin,
            reader,
            server,
            _config_dir: config_dir,
        }
    }

    fn server(&self) -> &MockApiServer {
        self.server.as_ref().expect("harness has a mock server")
    }

    fn send(&mut self, cmd: Value) -> Value {
        let line = serde_json::to_string(&cmd).expect("serialize command");
        writeln!(self.stdin, "{}", line).expect("write to stdin");
        self.stdin.flush().expect("flush stdin");

        let mut response_line = String::new();
        self.reader
            .read_line(&mut response_line)
            .expect("read response");
        serde_json::from_str(response_line.trim()).expect("parse response JSON")
    }

    /// Send and return the page of a successful reply.
    fn page(&mut self, cmd: Value) -> Value {
        let resp = self.send(cmd);
        assert_eq!(resp["ok"], true, "command failed: {}", resp);
        resp["page"].clone()
    }

    fn compose(&mut self, from: &str, to: &str, subject: &str, body: &str) -> Value {
        self.page(json!({"command": "compose_open"}));
        self.page(json!({
            "command": "compose_set",
            "from": from,
            "to": to,
            "subject": subject,
            "body": body,
        }));
        self.page(json!({"command": "send"}))
    }
}

impl Drop for CliHarness {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[test]
fn test_startup_renders_list() {
    let mut h = CliHarness::start();
    let page = h.page(json!({"command": "state"}));

    assert_eq!(page["list"]["count"], "2 messages");
    assert!(page["list"]["placeholder"].is_null());
    let rows = page["list"]["rows"].as_array().expect("rows array");
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0]["id"], 1);
    assert_eq!(rows[0]["from"], "alice@example.com");
    let markup = rows[0]["markup"].as_str().unwrap();
    assert!(markup.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!markup.contains("<script>"));

    assert_eq!(rows[1]["id"], "abc");
    assert_eq!(rows[1]["from"], "unknown");
    assert_eq!(rows[1]["subject"], "(no subject)");
    assert_eq!(rows[1]["received"], "Invalid Date");

    assert_eq!(page["detail"]["visible"], false);
    assert_eq!(page["compose"]["open"], false);
}

#[test]
fn test_empty_list_shows_placeholder() {
    let mut h = CliHarness::start_with_messages(vec![]);
    let page = h.page(json!({"command": "state"}));

    assert_eq!(page["list"]["count"], "0 messages");
    assert_eq!(page["list"]["placeholder"], "No messages");
    assert_eq!(page["list"]["rows"].as_array().unwrap().len(), 0);
}

#[test]
fn test_non_integer_numeric_ids() {
    let mut h = CliHarness::start_with_messages(vec![
        json!({"id": 1.5, "subject": "half"}),
        json!({"id": 18446744073709551615u64, "subject": "huge"}),
        json!({"id": 3, "subject": "plain"}),
    ]);
    let page = h.page(json!({"command": "state"}));
    assert_eq!(page["list"]["count"], "3 messages");
    assert_eq!(page["list"]["rows"][0]["id"], 1.5);
    assert_eq!(page["list"]["rows"][2]["subject"], "plain");

    let page = h.page(json!({"command": "select", "index": 0}));
    assert_eq!(page["detail"]["visible"], true);
    assert_eq!(page["detail"]["subject"], "half");
}

#[test]
fn test_refresh_replaces_rows() {
    let mut h = CliHarness::start();
    h.server().set_messages(vec![json!({"id": 7, "subject": "only"})]);

    let page = h.page(json!({"command": "refresh"}));
    assert_eq!(page["list"]["count"], "1 messages");
    assert_eq!(page["list"]["rows"][0]["id"], 7);
    assert_eq!(page["list"]["rows"][0]["subject"], "only");
}

#[test]
fn test_select_shows_detail() {
    let mut h = CliHarness::start();
    let page = h.page(json!({"command": "select", "index": 0}));

    let detail = &page["detail"];
    assert_eq!(detail["visible"], true);
    assert_eq!(detail["id"], 1);
    assert_eq!(detail["subject"], "<script>alert(1)</script>");
    assert_eq!(detail["from"], "alice@example.com");
    assert_eq!(detail["to"], "me@example.com, team@example.com");
    assert_eq!(detail["body"], "Hello & welcome");
    assert_ne!(detail["date"], "Invalid Date");
}

#[test]
fn test_detail_of_bare_message_uses_fallbacks() {
    let mut h = CliHarness::start();
    let page = h.page(json!({"command": "show", "id": "abc"}));

    let detail = &page["detail"];
    assert_eq!(detail["visible"], true);
    assert_eq!(detail["subject"], "(no subject)");
    assert_eq!(detail["from"], "");
    assert_eq!(detail["to"], "");
    assert_eq!(detail["date"], "Invalid Date");
    assert_eq!(detail["body"], "");
}

#[test]
fn test_missing_message_leaves_detail_untouched() {
    let mut h = CliHarness::start();
    h.page(json!({"command": "select", "index": 0}));

    let page = h.page(json!({"command": "show", "id": 999}));
    assert_eq!(page["detail"]["visible"], true);
    assert_eq!(page["detail"]["id"], 1);
}

#[test]
fn test_select_out_of_range_is_an_error() {
    let mut h = CliHarness::start();
    let resp = h.send(json!({"command": "select", "index": 5}));
    assert_eq!(resp["ok"], false);
    assert_eq!(resp["error"], "no message row at index 5");
}

#[test]
fn test_send_requires_from_and_to() {
    let mut h = CliHarness::start();
    let page = h.compose("   ", "bob@example.com", "Hi", "Hello");

    assert_eq!(page["compose"]["open"], true);
    assert_eq!(page["compose"]["status"], "From and To are required");
    assert!(h.server().sent().is_empty());
}

#[test]
fn test_send_success_refreshes_and_closes() {
    let mut h = CliHarness::start();
    let page = h.compose(" me@example.com ", " bob@example.com", "Lunch?", " noon ");

    assert_eq!(page["compose"]["status"], "Sent ✅");
    assert_eq!(page["compose"]["submission"], "succeeded");
    assert_eq!(page["compose"]["open"], true);
    assert_eq!(page["list"]["count"], "3 messages");
    assert_eq!(page["list"]["rows"][2]["subject"], "Lunch?");

    let sent = h.server().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["from"], "me@example.com");
    assert_eq!(sent[0]["to"], "bob@example.com");
    assert_eq!(sent[0]["subject"], "Lunch?");
    assert_eq!(sent[0]["body"], " noon ");

    let page = h.page(json!({"command": "wait", "ms": 600}));
    assert_eq!(page["compose"]["open"], false);
    assert_eq!(page["compose"]["status"], "");
    assert_eq!(page["compose"]["to"], " bob@example.com");
    assert_eq!(page["compose"]["subject"], "");
}

#[test]
fn test_send_rejection_shows_server_error() {
    let mut h = CliHarness::start();
    let page = h.compose("me@example.com", "reject@example.com", "x", "y");

    assert_eq!(page["compose"]["open"], true);
    assert_eq!(page["compose"]["submission"], "failed");
    assert_eq!(page["compose"]["status"], "bad address");
    assert_eq!(page["list"]["count"], "2 messages");

    // the panel stays open after the auto-close delay
    let page = h.page(json!({"command": "wait", "ms": 600}));
    assert_eq!(page["compose"]["open"], true);
}

#[test]
fn test_send_rejection_without_error_text() {
    let mut h = CliHarness::start();
    let page = h.compose("me@example.com", "bare@example.com", "x", "y");
    assert_eq!(page["compose"]["status"], "Failed to send");

    h.page(json!({"command": "compose_set", "to": "garbled@example.com"}));
    let page = h.page(json!({"command": "send"}));
    assert_eq!(page["compose"]["status"], "Failed to send");
    assert_eq!(h.server().sent().len(), 2);
}

#[test]
fn test_unreachable_server() {
    let mut h = CliHarness::start_unreachable();
    let page = h.page(json!({"command": "refresh"}));
    assert!(page["list"]["rows"].as_array().unwrap().is_empty());

    let page = h.compose("me@example.com", "bob@example.com", "x", "y");
    assert_eq!(page["compose"]["status"], "Network error");
    assert_eq!(page["compose"]["open"], true);
}

#[test]
fn test_close_discards_draft() {
    let mut h = CliHarness::start();
    h.page(json!({"command": "compose_open"}));
    h.page(json!({"command": "compose_set", "to": "bob@example.com", "body": "draft"}));

    let page = h.page(json!({"command": "compose_close"}));
    assert_eq!(page["compose"]["open"], false);

    let page = h.page(json!({"command": "compose_open"}));
    assert_eq!(page["compose"]["to"], "");
    assert_eq!(page["compose"]["body"], "");
    assert_eq!(page["compose"]["status"], "");
}

#[test]
fn test_unknown_command_and_bad_json() {
    let mut h = CliHarness::start();
    let resp = h.send(json!({"command": "launch"}));
    assert_eq!(resp["ok"], false);
    assert_eq!(resp["error"], "unknown command 'launch'");

    writeln!(h.stdin, "not json").unwrap();
    h.stdin.flush().unwrap();
    let mut line = String::new();
    h.reader.read_line(&mut line).unwrap();
    let resp: Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(resp["ok"], false);
}

#[test]
fn test_once_prints_escaped_markup() {
    let server = MockApiServer::start(sample_messages());
    let config_dir = tempfile::tempdir().expect("create temp dir");
    let config_path = write_config(config_dir.path(), &server.url());

    let output = Command::new(env!("CARGO_BIN_EXE_wmc"))
        .arg("--once")
        .arg(format!("--config={}", config_path.display()))
        .env("XDG_STATE_HOME", config_dir.path())
        .output()
        .expect("run wmc --once");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<span id=\"count\">2 messages</span>"));
    assert!(stdout.contains("<li data-id=\"1\">"));
    assert!(stdout.contains("&lt;script&gt;"));
    assert!(stdout.contains("<div class=\"msg-from\">unknown</div>"));
}

#[test]
fn test_once_against_unreachable_server_fails() {
    let config_dir = tempfile::tempdir().expect("create temp dir");
    let config_path = write_config(config_dir.path(), "http://127.0.0.1:1");

    let output = Command::new(env!("CARGO_BIN_EXE_wmc"))
        .arg("--once")
        .arg(format!("--config={}", config_path.display()))
        .env("XDG_STATE_HOME", config_dir.path())
        .output()
        .expect("run wmc --once");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to fetch messages"));
}
