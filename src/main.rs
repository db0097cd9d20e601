mod api;
mod app;
mod backend;
mod cli;
mod config;
mod escape;
mod log;
mod tui;
mod ui;

use api::client::ApiClient;
use app::Settings;
use config::Config;
use std::path::PathBuf;
use std::process::Command;
use ui::list::ListPane;

fn default_config_path() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("wmc").join("config.toml")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home)
            .join(".config")
            .join("wmc")
            .join("config.toml")
    } else {
        PathBuf::from("config.toml")
    }
}

fn show_log() {
    let path = log::log_path();
    if !path.exists() {
        eprintln!("No log file found at {}", path.display());
        std::process::exit(1);
    }
    let pager = std::env::var("PAGER").unwrap_or_else(|_| "less".to_string());
    let status = Command::new(&pager).arg(&path).status();
    match status {
        Ok(s) if s.success() => {}
        Ok(s) => std::process::exit(s.code().unwrap_or(1)),
        Err(e) => {
            eprintln!("Failed to launch pager '{}': {}", pager, e);
            std::process::exit(1);
        }
    }
}

/// Fetch the list once and print what the page would hold.
fn print_once(client: &ApiClient, date_format: &str) -> Result<(), String> {
    let messages = client
        .list_messages()
        .map_err(|e| format!("Failed to fetch messages: {}", e))?;
    let mut list = ListPane::new();
    list.render(&messages, date_format);
    println!("<span id=\"count\">{}</span>", escape::escape_html(Some(list.count_label())));
    println!("<ul id=\"messages\">{}</ul>", list.markup());
    Ok(())
}

fn print_help_config() {
    let config_path = default_config_path();
    println!("Default config file: {}", config_path.display());
    println!("A missing default file means every option takes its default.");
    println!();
    println!("Available options:");
    println!();
    println!("[server]");
    println!("  base_url = \"http://127.0.0.1:8000\"  # Backend serving /api/messages and /api/send");
    println!();
    println!("[ui]");
    println!("  poll_interval_secs = 6      # Message list refresh interval (default: 6, 0 = off, max 86400)");
    println!("  mouse = true                # Enable mouse support (default: true)");
    println!("  date_format = \"%-m/%-d/%Y, %-I:%M:%S %p\"  # strftime format for received dates");
    println!();
    println!("[compose]");
    println!("  from = \"me@example.com\"     # Prefill the From field of new drafts");
    println!();
    println!("[log]");
    println!("  level = \"info\"              # Log filter (RUST_LOG overrides)");
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: wmc [OPTIONS]");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --config=PATH    Use config file at PATH instead of default");
        eprintln!("  --server=URL     Override [server] base_url");
        eprintln!("  --once           Fetch the message list once and print its markup");
        eprintln!("  --cli            Run in JSON-over-stdin/stdout CLI mode");
        eprintln!("  --clear-log      Truncate the log file at startup");
        eprintln!("  --log            View the log file in $PAGER");
        eprintln!("  --help-cli       Print CLI mode protocol documentation");
        eprintln!("  --help-config    Print default config path and all options");
        eprintln!("  --help           Show this help");
        std::process::exit(0);
    }

    if args.iter().any(|a| a == "--clear-log") {
        if let Err(e) = log::clear() {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }

    if args.iter().any(|a| a == "--log") {
        show_log();
        std::process::exit(0);
    }

    if args.iter().any(|a| a == "--help-cli") {
        cli::print_help_cli();
        std::process::exit(0);
    }

    if args.iter().any(|a| a == "--help-config") {
        print_help_config();
        std::process::exit(0);
    }

    let explicit_config = args
        .iter()
        .find(|a| a.starts_with("--config="))
        .map(|a| PathBuf::from(&a["--config=".len()..]));
    let config_path = explicit_config
        .clone()
        .unwrap_or_else(default_config_path);

    let mut config = if explicit_config.is_none() && !config_path.exists() {
        Config::default()
    } else {
        match Config::load(&config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config from {}: {}", config_path.display(), e);
                eprintln!("Run `wmc --help-config` for the available options.");
                std::process::exit(1);
            }
        }
    };

    if let Some(server) = args.iter().find(|a| a.starts_with("--server=")) {
        let url = server["--server=".len()..].trim().to_string();
        if let Err(e) = config::validate_base_url(&url) {
            eprintln!("Invalid --server: {}", e);
            std::process::exit(1);
        }
        config.server.base_url = url;
    }

    log::init(&config.log.level);
    ::log::info!(
        "wmc {} using {}",
        env!("CARGO_PKG_VERSION"),
        config.server.base_url
    );

    let client = ApiClient::new(&config.server.base_url);
    let settings = Settings {
        poll_interval: config.ui.poll_interval,
        date_format: config.ui.date_format.clone(),
        default_from: config.compose.from.clone(),
    };

    if args.iter().any(|a| a == "--once") {
        if let Err(e) = print_once(&client, &settings.date_format) {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        std::process::exit(0);
    }

    if args.iter().any(|a| a == "--cli") {
        cli::run_cli(client, settings);
        std::process::exit(0);
    }

    if let Err(e) = tui::run(client, settings, config.ui.mouse) {
        eprintln!("TUI error: {}", e);
        std::process::exit(1);
    }
}
