use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record};

/// Environment variable holding the log level (`error`, `warn`, `info`, `debug`, `trace`).
pub(crate) const LOG_ENV: &str = "ARBOLB_LOG";

/// Writes log lines to stderr so stdout stays a single JSON reply.
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(
                std::io::stderr().lock(),
                "[{:<5} {}] {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Parses a level name; anything unrecognised falls back to `warn`.
pub(crate) fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(LevelFilter::Warn)
}

/// Installs the stderr logger at the level named by [`LOG_ENV`].
pub(crate) fn init() {
    let level = level_from(std::env::var(LOG_ENV).ok().as_deref());
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
