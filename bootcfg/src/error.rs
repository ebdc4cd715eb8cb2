//! Error types for boot configuration loading

use alloc::string::String;
use core::fmt;

/// Result type for boot configuration operations
pub type Result<T> = core::result::Result<T, BootConfigError>;

/// Errors reported by the filesystem capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    /// File or directory does not exist
    NotFound,

    /// Access to the file was refused
    AccessDenied,

    /// The device reported a hardware/media error
    DeviceError,

    /// Operation not supported by the filesystem
    Unsupported,

    /// Raw firmware status with no better mapping
    Status(usize),
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "Not found"),
            Self::AccessDenied => write!(f, "Access denied"),
            Self::DeviceError => write!(f, "Device error"),
            Self::Unsupported => write!(f, "Unsupported operation"),
            Self::Status(status) => write!(f, "Firmware status {:#x}", status),
        }
    }
}

/// Errors that can occur while loading boot configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootConfigError {
    /// Volumes could not be listed at all
    VolumeEnumeration(FsError),

    /// Open/read failure other than "not found"
    Io(FsError),

    /// Directive line seen before any `:` header
    DirectiveBeforeHeader {
        /// 1-based line number
        line: usize,
    },

    /// `MODULE=` value without a comma, or with an empty tag/path
    InvalidModule {
        /// 1-based line number
        line: usize,
    },

    /// `PROTOCOL=` value outside LINUX/MB2/STIVALE
    UnknownProtocol {
        /// 1-based line number
        line: usize,
        /// The rejected value
        value: String,
    },

    /// Line exceeds `MAX_LINE_LENGTH`
    LineTooLong {
        /// 1-based line number
        line: usize,
    },

    /// Line is not valid UTF-8 / UTF-16
    InvalidEncoding {
        /// 1-based line number
        line: usize,
    },

    /// Registry position out of range
    EntryOutOfRange(usize),
}

impl BootConfigError {
    /// True for errors caused by the config text itself
    pub const fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::DirectiveBeforeHeader { .. }
                | Self::InvalidModule { .. }
                | Self::UnknownProtocol { .. }
                | Self::LineTooLong { .. }
                | Self::InvalidEncoding { .. }
        )
    }

    /// Line the error was detected on, if it came from the parser
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::DirectiveBeforeHeader { line }
            | Self::InvalidModule { line }
            | Self::UnknownProtocol { line, .. }
            | Self::LineTooLong { line }
            | Self::InvalidEncoding { line } => Some(*line),
            _ => None,
        }
    }
}

impl From<FsError> for BootConfigError {
    fn from(err: FsError) -> Self {
        Self::Io(err)
    }
}

impl fmt::Display for BootConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VolumeEnumeration(e) => write!(f, "Volume enumeration failed: {}", e),
            Self::Io(e) => write!(f, "File I/O error: {}", e),
            Self::DirectiveBeforeHeader { line } => {
                write!(f, "Line {}: directive before entry header", line)
            }
            Self::InvalidModule { line } => {
                write!(f, "Line {}: MODULE must be `<tag>,<path>`", line)
            }
            Self::UnknownProtocol { line, value } => {
                write!(f, "Line {}: unknown protocol `{}`", line, value)
            }
            Self::LineTooLong { line } => write!(f, "Line {}: line too long", line),
            Self::InvalidEncoding { line } => write!(f, "Line {}: invalid text encoding", line),
            Self::EntryOutOfRange(index) => write!(f, "No boot entry at position {}", index),
        }
    }
}
