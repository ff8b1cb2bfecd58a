//! Where scoutflow keeps its files.

use std::io;
use std::path::PathBuf;

/// Environment variable overriding the scoutflow home directory.
pub const HOME_ENV: &str = "SCOUTFLOW_HOME";

/// `$SCOUTFLOW_HOME`, else `~/.scoutflow`, else `./.scoutflow`.
pub fn scoutflow_home() -> PathBuf {
    match std::env::var_os(HOME_ENV) {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".scoutflow"),
    }
}

/// `<home>/logs`
pub fn logs_dir() -> PathBuf {
    scoutflow_home().join("logs")
}

/// Create `<home>/logs` if needed and return it.
pub fn ensure_logs_dir() -> io::Result<PathBuf> {
    let dir = logs_dir();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
