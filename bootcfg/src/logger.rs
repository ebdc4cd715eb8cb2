//! Boot log for config loading
//!
//! Keeps the most recent MAX_LOG_ENTRIES lines so the menu can dump them
//! when loading fails.

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;
use spin::Mutex;

/// Lines kept in the global log
pub const MAX_LOG_ENTRIES: usize = 64;

/// Bounded log ring. Oldest lines are dropped first.
#[derive(Debug, Default)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    total: usize,
}

impl LogBuffer {
    /// Empty buffer
    pub const fn new() -> Self {
        Self {
            lines: VecDeque::new(),
            total: 0,
        }
    }

    /// Append a line, dropping the oldest when full
    pub fn push(&mut self, message: &str) {
        if self.lines.len() == MAX_LOG_ENTRIES {
            self.lines.pop_front();
        }
        self.lines.push_back(String::from(message));
        self.total += 1;
    }

    /// Retained lines, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    /// Retained line count
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if nothing is retained
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines ever logged, including dropped ones
    pub fn total(&self) -> usize {
        self.total
    }
}

static LOG: Mutex<LogBuffer> = Mutex::new(LogBuffer::new());

/// Append a line to the global log
pub fn log(message: &str) {
    LOG.lock().push(message);
}

/// Copy of the retained lines, oldest first
pub fn get_logs() -> Vec<String> {
    LOG.lock().lines()
}

/// Number of retained lines
pub fn log_count() -> usize {
    LOG.lock().len()
}

#[doc(hidden)]
pub use alloc::format;

/// Log a line, with optional format arguments
#[macro_export]
macro_rules! log_info {
    ($msg:expr) => {
        $crate::logger::log($msg)
    };
    ($fmt:expr, $($arg:tt)+) => {
        $crate::logger::log(&$crate::logger::format!($fmt, $($arg)+))
    };
}
