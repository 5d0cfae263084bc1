use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logger system
///
/// Console output always; a daily rolling file when `log_dir` is given.
/// The returned guard must be held for as long as file logs should flush.
pub fn init_logger(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Capture log macro logs (reqwest, hyper internals)
    let _ = tracing_log::LogTracer::init();

    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::Layer::new().with_target(false).with_level(true);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            if let Err(e) = std::fs::create_dir_all(dir) {
                eprintln!("Failed to create log directory {:?}: {}", dir, e);
                (None, None)
            } else {
                let file_appender = tracing_appender::rolling::daily(dir, "server.log");
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                let layer = fmt::Layer::new()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_target(true)
                    .with_level(true);
                (Some(layer), Some(guard))
            }
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    guard
}
