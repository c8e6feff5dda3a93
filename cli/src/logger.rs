//! Console logger

use log::{Level, LevelFilter, Log, Metadata, Record};

static LOGGER: Logger = Logger;

/// Logs records to stderr, tagged by level
pub struct Logger;

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", tag(record.level()), record.args());
        }
    }

    fn flush(&self) {}
}

fn tag(level: Level) -> char {
    match level {
        Level::Error => 'E',
        Level::Warn => 'W',
        Level::Info => 'I',
        Level::Debug => 'D',
        Level::Trace => 'T',
    }
}

/// Level named by the first byte of `value`, warn otherwise
pub fn parse_level(value: Option<&str>) -> LevelFilter {
    match value.and_then(|v| v.bytes().next()) {
        Some(b'e') => LevelFilter::Error,
        Some(b'w') => LevelFilter::Warn,
        Some(b'i') => LevelFilter::Info,
        Some(b'd') => LevelFilter::Debug,
        Some(b't') => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    }
}

/// Install the logger, level taken from `LOG_LEVEL`
pub fn init() {
    let level = parse_level(std::env::var("LOG_LEVEL").ok().as_deref());
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
