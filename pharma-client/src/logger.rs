//! Logging setup
//!
//! Console output is human readable or JSON; an optional log directory adds
//! a daily rotating file (`pharma-dash.YYYY-MM-DD`). Rotated files older
//! than [`LOG_RETENTION_DAYS`] are removed at startup.

use chrono::{Local, NaiveDate};
use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use crate::{ClientError, ClientResult};

pub const LOG_RETENTION_DAYS: i64 = 14;
const LOG_PREFIX: &str = "pharma-dash";

/// Console-only logging
pub fn init_logger(level: &str, json_format: bool) -> ClientResult<()> {
    init_logger_with_file(level, json_format, None)
}

/// Console logging plus, when `log_dir` is given, a daily rotating file
///
/// `RUST_LOG` overrides `level` when set.
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&Path>,
) -> ClientResult<()> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .with_filter(filter())
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .with_filter(filter())
            .boxed()
    };

    let file = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            if let Err(e) = cleanup_old_logs(dir, LOG_RETENTION_DAYS) {
                eprintln!("log cleanup failed: {e}");
            }
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_PREFIX);
            Some(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(appender))
                    .with_filter(filter())
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| ClientError::Config(format!("logger already initialized: {e}")))
}

/// Delete rotated log files older than `keep_days`; returns how many were removed
pub fn cleanup_old_logs(log_dir: &Path, keep_days: i64) -> ClientResult<usize> {
    let cutoff = Local::now().date_naive() - chrono::Duration::days(keep_days);
    let prefix = format!("{LOG_PREFIX}.");
    let mut removed = 0;

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();
        let Some(date) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix(&prefix))
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        else {
            continue;
        };
        if date < cutoff {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_removes_only_old_rotations() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("pharma-dash.2000-01-01");
        let today = dir
            .path()
            .join(format!("pharma-dash.{}", Local::now().format("%Y-%m-%d")));
        let other = dir.path().join("notes.txt");
        for p in [&old, &today, &other] {
            fs::write(p, "x").unwrap();
        }

        assert_eq!(cleanup_old_logs(dir.path(), 14).unwrap(), 1);
        assert!(!old.exists());
        assert!(today.exists());
        assert!(other.exists());
    }
}
