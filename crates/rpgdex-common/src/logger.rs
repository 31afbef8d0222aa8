//! Injected logging capability.
//!
//! Components never reach for a global logger. They take a `&dyn Logger`
//! and report through it, so callers decide where diagnostics end up.

use parking_lot::Mutex;

/// Severity of a captured log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// Logging capability passed into every component that emits diagnostics.
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }
}

/// Forwards to the `log` crate under a fixed target.
#[derive(Debug, Clone, Copy)]
pub struct LogFacade {
    target: &'static str,
}

impl LogFacade {
    pub const fn new(target: &'static str) -> Self {
        Self { target }
    }
}

impl Default for LogFacade {
    fn default() -> Self {
        Self::new("rpgdex")
    }
}

impl Logger for LogFacade {
    fn log(&self, level: Level, message: &str) {
        let level = match level {
            Level::Debug => log::Level::Debug,
            Level::Info => log::Level::Info,
            Level::Warn => log::Level::Warn,
            Level::Error => log::Level::Error,
        };
        log::log!(target: self.target, level, "{message}");
    }
}

/// Captures log lines in memory.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured lines, in emission order.
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().clone()
    }

    /// Captured lines at exactly `level`.
    pub fn at(&self, level: Level) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.at(Level::Warn)
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: Level, message: &str) {
        self.lines.lock().push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_logger_captures_in_order() {
        let logger = MemoryLogger::new();
        logger.info("first");
        logger.warn("second");
        logger.debug("third");

        let lines = logger.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], (Level::Info, "first".to_string()));
        assert_eq!(logger.warnings(), vec!["second".to_string()]);
    }

    #[test]
    fn test_logger_usable_as_trait_object() {
        let logger = MemoryLogger::new();
        let dyn_logger: &dyn Logger = &logger;
        dyn_logger.error("boom");
        assert_eq!(logger.at(Level::Error), vec!["boom".to_string()]);
    }
}
