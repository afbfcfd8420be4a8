//! Tracing initialization.
//!
//! The terminal belongs to the TUI, so log lines go to a file instead of stderr.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "VELLUM_LOG";

#[must_use]
/// Default log file, `<data dir>/vellum/vellum.log`.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("vellum").join("vellum.log"))
}

/// Initialize tracing to append to `path`. Safe to call multiple times.
///
/// Without a usable path logging stays disabled.
pub fn init(path: Option<&Path>) {
    INIT.call_once(|| {
        let Some(file) = path.and_then(open_log) else {
            return;
        };

        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("vellum=info"));

        let result = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_span_events(FmtSpan::NONE)
            .compact()
            .with_writer(Mutex::new(file))
            .try_init();

        if let Err(e) = result {
            eprintln!("Failed to initialize tracing: {e}");
        }
    });
}

fn open_log(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    File::options().create(true).append(true).open(path).ok()
}
