#[cfg(feature = "trace")]
use std::path::Path;

/// Install a JSON file subscriber for the `trace` feature.
///
/// The returned guard must be held for the life of the process so buffered
/// events flush on exit (phonotool is a short-lived batch tool, so the
/// caller keeps it rather than leaking it).
#[cfg(feature = "trace")]
pub fn init_tracing(log_dir: &Path) -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::never(log_dir, "phonotool-trace.jsonl");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .json()
        .with_writer(non_blocking)
        .with_target(true)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("phonalign=debug")),
        )
        .init();
    guard
}

#[cfg(not(feature = "trace"))]
pub fn init_tracing(_log_dir: &std::path::Path) {}
