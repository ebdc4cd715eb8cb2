//! Config parser and registry builder
//!
//! Runs the header/directive state machine over the lines of one config file
//! and appends the resulting entries to a [`Registry`].
//!
//! A failure aborts the whole parse. Entries appended before the failing line
//! stay in the registry as they are; the failing line itself changes nothing.

pub mod directive;

pub use directive::{Directive, DirectiveError};

use crate::error::{BootConfigError, Result};
use crate::log_info;
use crate::registry::Registry;
use crate::types::{BootEntry, VolumeId, HEADER_MARKER};
use crate::volume::lines::{LineError, LineReader};
use crate::volume::FileHandle;
use alloc::string::{String, ToString};

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// No header seen yet in this file
    NoCurrentEntry,
    /// Directives apply to the entry at this registry position
    HaveCurrentEntry(usize),
}

/// Parse one config file from `volume` into `registry`.
///
/// # Errors
///
/// - `DirectiveBeforeHeader` for any non-header line before the first header
/// - `InvalidModule` / `UnknownProtocol` for bad `MODULE=` / `PROTOCOL=` values
/// - `LineTooLong` / `InvalidEncoding` from the line reader
/// - `Io` if reading the file fails
pub fn parse_config<F: FileHandle>(
    volume: VolumeId,
    file: F,
    registry: &mut Registry,
) -> Result<()> {
    let mut reader = LineReader::new(file);
    let mut state = ParseState::NoCurrentEntry;

    loop {
        let line = match reader.next_line() {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(line_error(e, reader.line_number())),
        };
        state = apply_line(state, &line, reader.line_number(), volume, registry)?;
    }

    Ok(())
}

/// Parse in-memory config text; convenience over [`parse_config`]
pub fn parse_config_str(volume: VolumeId, text: &str, registry: &mut Registry) -> Result<()> {
    parse_config(volume, text.as_bytes(), registry)
}

fn apply_line(
    state: ParseState,
    line: &str,
    line_number: usize,
    volume: VolumeId,
    registry: &mut Registry,
) -> Result<ParseState> {
    if let Some(name) = line.strip_prefix(HEADER_MARKER) {
        let index = registry.push(BootEntry::new(name.to_string(), volume));
        log_info!("Adding {}", name);
        return Ok(ParseState::HaveCurrentEntry(index));
    }

    // Values are only looked at once an entry is open
    let index = match state {
        ParseState::HaveCurrentEntry(index) => index,
        ParseState::NoCurrentEntry => {
            return Err(BootConfigError::DirectiveBeforeHeader { line: line_number })
        }
    };
    let directive = Directive::parse(line).map_err(|e| directive_error(e, line_number))?;
    let entry = match registry.get_mut(index) {
        Some(entry) => entry,
        // Current entry is always registry-owned
        None => return Err(BootConfigError::EntryOutOfRange(index)),
    };

    match directive {
        Directive::Path(path) => entry.path = path.to_string(),
        Directive::Cmdline(cmdline) => entry.cmdline = cmdline.to_string(),
        Directive::Module { tag, path } => entry.add_module(tag.to_string(), path.to_string()),
        Directive::Protocol(protocol) => entry.protocol = protocol,
        Directive::Unrecognized(_) | Directive::Header(_) => return Ok(state),
    }

    #[cfg(feature = "trace")]
    log_info!("  {}", line);

    Ok(state)
}

fn directive_error(err: DirectiveError<'_>, line: usize) -> BootConfigError {
    match err {
        DirectiveError::InvalidModule => BootConfigError::InvalidModule { line },
        DirectiveError::UnknownProtocol(value) => {
            log_info!("Unknown protocol `{}` on line {}", value, line);
            BootConfigError::UnknownProtocol {
                line,
                value: String::from(value),
            }
        }
    }
}

fn line_error(err: LineError, line: usize) -> BootConfigError {
    match err {
        LineError::Io(e) => BootConfigError::Io(e),
        LineError::TooLong => BootConfigError::LineTooLong { line },
        LineError::InvalidEncoding => BootConfigError::InvalidEncoding { line },
    }
}
