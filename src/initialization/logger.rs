//! Logger initialization.
//!
//! Configures `env_logger` for the importer, in plain (colored) or JSON lines
//! format.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter, Record};

/// Dependencies whose debug output drowns the import progress lines.
const QUIET_MODULES: [&str; 3] = ["reqwest", "hyper", "hyper_util"];

/// Initializes the logger with the specified level and format.
///
/// `RUST_LOG` is read first and `level` overrides it, so `--log-level`
/// always wins over the environment. HTTP client internals are capped at
/// `Info`.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug traffic_import access.log --log-level info
/// RUST_LOG=traffic_import=debug traffic_import access.log
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for module in QUIET_MODULES {
        builder.filter_module(module, LevelFilter::Info.min(level));
    }
    builder.filter_module(env!("CARGO_CRATE_NAME"), level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| writeln!(buf, "{}", json_line(record)));
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    chrono::Local::now()
                        .format("%H:%M:%S%.3f")
                        .to_string()
                        .dimmed(),
                    record.target().cyan(),
                    paint_level(record.level()),
                    record.args()
                )
            });
        }
    }

    builder.try_init().map_err(InitializationError::from)
}

fn json_line(record: &Record<'_>) -> serde_json::Value {
    serde_json::json!({
        "ts": chrono::Utc::now().timestamp_millis(),
        "level": record.level().as_str(),
        "target": record.target(),
        "msg": record.args().to_string(),
    })
}

fn paint_level(level: Level) -> ColoredString {
    let name = level.as_str();
    match level {
        Level::Error => name.red().bold(),
        Level::Warn => name.yellow(),
        Level::Info => name.green(),
        Level::Debug => name.blue(),
        Level::Trace => name.purple(),
    }
}
