use std::fs::{self, OpenOptions};
use std::path::PathBuf;

/// Directory holding the log file, following the XDG state convention.
fn state_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        PathBuf::from(xdg).join("wmc")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".local").join("state").join("wmc")
    } else {
        std::env::temp_dir().join("wmc")
    }
}

pub fn log_path() -> PathBuf {
    state_dir().join("wmc.log")
}

/// Route the `log` facade to the log file.
///
/// The terminal front end owns stdout and the CLI mode speaks JSON on it, so
/// records never go to the console once a log file is available. `RUST_LOG`
/// takes precedence over the configured level.
pub fn init(level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.format_timestamp_millis();

    let path = log_path();
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!("Cannot open log file {}: {}", path.display(), e);
            builder.filter_level(log::LevelFilter::Off);
        }
    }

    // A second init (tests, repeated calls) keeps the first logger.
    let _ = builder.try_init();
}

pub fn clear() -> Result<(), String> {
    let path = log_path();
    if !path.exists() {
        return Ok(());
    }
    OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(&path)
        .map(|_| ())
        .map_err(|e| format!("failed to clear log file {}: {}", path.display(), e))
}
