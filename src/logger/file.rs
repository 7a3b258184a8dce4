/// File persistence for log output
///
/// One file per day under the logs directory (`tgauth_YYYY-MM-DD.log`).
/// Until `init_file_logging` is called every write is a no-op, which keeps
/// library consumers and tests free of disk side effects.
use super::config::with_logger_config;
use chrono::Local;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};

struct LogFile {
    date: String,
    writer: BufWriter<File>,
}

static LOG_FILE: Lazy<Mutex<Option<LogFile>>> = Lazy::new(|| Mutex::new(None));
static FILE_LOGGING_ENABLED: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(false));

fn open_for_date(date: &str) -> Option<LogFile> {
    let dir = crate::paths::get_logs_directory();
    if std::fs::create_dir_all(&dir).is_err() {
        return None;
    }

    let path = dir.join(format!("tgauth_{}.log", date));
    let file = OpenOptions::new().create(true).append(true).open(path).ok()?;

    Some(LogFile {
        date: date.to_string(),
        writer: BufWriter::new(file),
    })
}

/// Enable file logging (honors `--no-log-file`)
pub fn init_file_logging() {
    if !with_logger_config(|config| config.file_logging) {
        return;
    }

    let today = Local::now().format("%Y-%m-%d").to_string();
    *LOG_FILE.lock() = open_for_date(&today);
    *FILE_LOGGING_ENABLED.lock() = true;
}

/// Append one line to today's log file, rotating at midnight
pub fn write_to_file(line: &str) {
    if !*FILE_LOGGING_ENABLED.lock() {
        return;
    }

    let today = Local::now().format("%Y-%m-%d").to_string();
    let mut guard = LOG_FILE.lock();

    let needs_rotation = guard.as_ref().map(|f| f.date != today).unwrap_or(true);
    if needs_rotation {
        if let Some(mut old) = guard.take() {
            let _ = old.writer.flush();
        }
        *guard = open_for_date(&today);
    }

    if let Some(file) = guard.as_mut() {
        let _ = writeln!(file.writer, "{}", line);
    }
}

/// Flush buffered log lines to disk
pub fn flush_file_logging() {
    if let Some(file) = LOG_FILE.lock().as_mut() {
        let _ = file.writer.flush();
    }
}
