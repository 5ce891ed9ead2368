use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Sets up tracing for a pipeline run: human-readable output on stdout plus a
/// daily-rotated JSON log under `logs/` for after-the-fact auditing of what
/// each run rejected.
pub fn init_logging() {
    // The appender refuses to start without its directory
    let _ = fs::create_dir_all("logs");

    let file_appender = tracing_appender::rolling::daily("logs", "scrubber.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::from_default_env().add_directive("trip_scrubber=info".parse().unwrap());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_writer(file_writer))
        .with(fmt::layer().with_writer(std::io::stdout))
        .init();

    // The writer guard must outlive the process or buffered lines are lost;
    // logging stays active until exit, so leak it.
    std::mem::forget(guard);
}
