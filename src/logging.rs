//! Tracing initialization.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing, writing to a file when `BOOKWORM_LOG` names one.
///
/// With the variable unset nothing is initialized and the CLI stays
/// quiet; faults in the feed and session paths are only ever logged,
/// never printed over command output. `RUST_LOG` controls the filter
/// as usual, defaulting to `info`.
///
/// The file gets a `{path}.{timestamp}.{pid}` suffix so two commands
/// running at once write to separate files.
pub fn init_tracing() {
    let Some(log_path) = std::env::var("BOOKWORM_LOG").ok() else {
        return;
    };

    let pid = std::process::id();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let unique_path = format!("{}.{}.{}", log_path, timestamp, pid);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Ok(file) = std::fs::File::create(&unique_path) else {
        eprintln!("Warning: failed to create log file: {}", unique_path);
        return;
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}
