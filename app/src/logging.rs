use crate::config::AppConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber: stdout plus a daily log file in the cache
/// directory. The returned guard flushes the file writer when dropped.
pub fn init(cfg: &AppConfig, file_name: &str) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    #[cfg(feature = "tokio-console")]
    if cfg.debug_console {
        console_subscriber::init();
        return Ok(None);
    }

    std::fs::create_dir_all(&cfg.cache_path)?;
    let file_appender = rolling::daily(&cfg.cache_path, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cfg.log_level.clone()))
        .with_writer(std::io::stdout.and(file_writer))
        .try_init()
        .map_err(|e| -> Box<dyn std::error::Error> { e })?;
    Ok(Some(guard))
}
