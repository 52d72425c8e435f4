use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Initialize stderr logging. Stdout stays reserved for command output.
pub fn init_logging(format: LogFormat, level: Option<&str>) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives(level)))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false);

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}

/// Filter directives for the stderr subscriber.
///
/// An explicit `--log-level` wins, then `RUST_LOG`, then `info`. The value
/// is a full directive string, so `tracklink_bridge=trace` surfaces the
/// worker's packet traffic without drowning the watch output.
fn directives(level: Option<&str>) -> String {
    if let Some(level) = level {
        return level.to_string();
    }
    std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
}
