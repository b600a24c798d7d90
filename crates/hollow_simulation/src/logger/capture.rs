//! Capturing printer для тестов
//!
//! Тесты идут параллельно в одном процессе, поэтому записи помечаются
//! потоком: каждый тест видит только свои сообщения.

use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use once_cell::sync::Lazy;

use super::{set_logger, LogLevel, LogPrinter};

type Records = Arc<Mutex<Vec<(ThreadId, LogLevel, String)>>>;

static RECORDS: Lazy<Records> = Lazy::new(|| {
    let records = Records::default();
    set_logger(Box::new(CapturingLogger {
        records: Arc::clone(&records),
    }));
    records
});

struct CapturingLogger {
    records: Records,
}

impl LogPrinter for CapturingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push((thread::current().id(), level, message.to_owned()));
        }
    }
}

/// Подменяет глобальный printer (один раз на процесс)
pub fn install() {
    Lazy::force(&RECORDS);
}

/// Сообщения уровня `level` из текущего потока, содержащие `needle`
pub fn count_on_this_thread(level: LogLevel, needle: &str) -> usize {
    let current = thread::current().id();
    RECORDS
        .lock()
        .map(|records| {
            records
                .iter()
                .filter(|(thread, record_level, message)| {
                    *thread == current && *record_level == level && message.contains(needle)
                })
                .count()
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{log_info, log_warning};

    #[test]
    fn test_capture_is_per_thread() {
        install();
        log_warning("capture check: main");
        let other = thread::spawn(|| {
            log_warning("capture check: other");
            count_on_this_thread(LogLevel::Warning, "capture check")
        })
        .join()
        .expect("logging thread");

        assert_eq!(other, 1);
        assert_eq!(count_on_this_thread(LogLevel::Warning, "capture check"), 1);
        log_info("capture check: info");
        assert_eq!(count_on_this_thread(LogLevel::Info, "capture check"), 1);
    }
}
