use crate::config::AppConfig;
use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "param-editor.log";

/// Install the global subscriber. The interactive UI owns stdout, so logs go
/// to a file when a log dir is configured, to stderr in headless runs, and
/// nowhere otherwise. Keep the returned guard alive until exit.
pub fn init(cfg: &AppConfig) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("param_editor=info"));
    if let Some(dir) = &cfg.log_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("creating log dir {dir:?}"))?;
        let appender = tracing_appender::rolling::never(dir, LOG_FILE);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .try_init()
            .map_err(|e| anyhow!("installing tracing subscriber: {e}"))?;
        return Ok(Some(guard));
    }
    if cfg.headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow!("installing tracing subscriber: {e}"))?;
    }
    Ok(None)
}
