//! Single-line directive classification

use crate::types::{BootProtocol, HEADER_MARKER};

const PATH_KEY: &str = "PATH=";
const CMDLINE_KEY: &str = "CMDLINE=";
const MODULE_KEY: &str = "MODULE=";
const PROTOCOL_KEY: &str = "PROTOCOL=";

/// One parsed config line, borrowing from the line buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `:<name>` starts a new entry
    Header(&'a str),
    /// `PATH=<path>`
    Path(&'a str),
    /// `CMDLINE=<cmdline>`
    Cmdline(&'a str),
    /// `MODULE=<tag>,<path>`
    Module {
        /// Text before the first comma
        tag: &'a str,
        /// Text after the first comma
        path: &'a str,
    },
    /// `PROTOCOL=<LINUX|MB2|STIVALE>`
    Protocol(BootProtocol),
    /// Anything else, ignored inside an entry
    Unrecognized(&'a str),
}

/// Why a line could not be classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveError<'a> {
    /// `MODULE=` without comma, or with an empty side
    InvalidModule,
    /// `PROTOCOL=` value not recognized
    UnknownProtocol(&'a str),
}

impl<'a> Directive<'a> {
    /// Classify `line`. Keys are literal, case-sensitive prefixes; values run
    /// to the end of the line untouched.
    pub fn parse(line: &'a str) -> Result<Self, DirectiveError<'a>> {
        if let Some(name) = line.strip_prefix(HEADER_MARKER) {
            return Ok(Self::Header(name));
        }
        if let Some(path) = line.strip_prefix(PATH_KEY) {
            return Ok(Self::Path(path));
        }
        if let Some(cmdline) = line.strip_prefix(CMDLINE_KEY) {
            return Ok(Self::Cmdline(cmdline));
        }
        if let Some(value) = line.strip_prefix(MODULE_KEY) {
            return parse_module(value);
        }
        if let Some(value) = line.strip_prefix(PROTOCOL_KEY) {
            return BootProtocol::from_config(value)
                .map(Self::Protocol)
                .ok_or(DirectiveError::UnknownProtocol(value));
        }
        Ok(Self::Unrecognized(line))
    }

    /// Whether this line starts an entry
    pub fn is_header(&self) -> bool {
        matches!(self, Self::Header(_))
    }
}

fn parse_module(value: &str) -> Result<Directive<'_>, DirectiveError<'_>> {
    let (tag, path) = value.split_once(',').ok_or(DirectiveError::InvalidModule)?;
    if tag.is_empty() || path.is_empty() {
        return Err(DirectiveError::InvalidModule);
    }
    Ok(Directive::Module { tag, path })
}
