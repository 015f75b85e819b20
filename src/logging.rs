use std::fs;
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "ftp_site_editor=info";

/// Initializes the logging system with both console and file output.
pub fn init_logging(dir: &Path) {
    // Ensure logs directory exists
    let _ = fs::create_dir_all(dir);

    // Daily rotated JSON file alongside human readable console output
    let file_appender = tracing_appender::rolling::daily(dir, "site-editor.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);
    // stdout is reserved for command output
    let console_layer = fmt::layer().with_writer(std::io::stderr);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    // Only the first init in a process takes effect
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    // Keep the writer alive for the life of the process so logs are flushed
    std::mem::forget(guard);
}
