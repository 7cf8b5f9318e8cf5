use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_DIR: &str = "logs";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("slot_seeder=info"))
}

/// Initializes logging: JSON lines to a daily file under `logs/`, human
/// output on stderr. Stdout is reserved for the generated SQL.
///
/// Keep the returned guard alive until exit so the file writer flushes.
pub fn init_logging() -> Option<WorkerGuard> {
    if fs::create_dir_all(LOG_DIR).is_err() {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(LOG_DIR, "slot_seeder.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().json().with_writer(non_blocking_writer))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    Some(guard)
}
