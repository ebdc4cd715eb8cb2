//! Line reader over a file handle
//!
//! Config files are either ASCII/UTF-8 or UCS-2 (UTF-16LE with a `FF FE`
//! byte-order mark, as written by firmware shells). Lines end at `\n`; one
//! trailing `\r` is dropped. A line longer than [`MAX_LINE_LENGTH`] code units
//! is an error, never truncated.

use super::FileHandle;
use crate::error::FsError;
use crate::types::MAX_LINE_LENGTH;
use alloc::string::String;
use alloc::vec::Vec;

const READ_CHUNK: usize = 512;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];

/// Failure while reading one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineError {
    /// Underlying read failed
    Io(FsError),
    /// Line exceeds the maximum length
    TooLong,
    /// Bytes are not valid text
    InvalidEncoding,
}

impl From<FsError> for LineError {
    fn from(err: FsError) -> Self {
        Self::Io(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Utf8,
    Utf16Le,
}

/// Buffered line reader
pub struct LineReader<F: FileHandle> {
    file: F,
    chunk: [u8; READ_CHUNK],
    pos: usize,
    len: usize,
    eof: bool,
    encoding: Option<Encoding>,
    max_len: usize,
    line_number: usize,
}

impl<F: FileHandle> LineReader<F> {
    /// Reader with the default [`MAX_LINE_LENGTH`]
    pub fn new(file: F) -> Self {
        Self::with_max_length(file, MAX_LINE_LENGTH)
    }

    /// Reader with a custom line limit
    pub fn with_max_length(file: F, max_len: usize) -> Self {
        Self {
            file,
            chunk: [0u8; READ_CHUNK],
            pos: 0,
            len: 0,
            eof: false,
            encoding: None,
            max_len,
            line_number: 0,
        }
    }

    /// 1-based number of the line last returned (or being read)
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Next line without its terminator, `None` at end of file
    pub fn next_line(&mut self) -> Result<Option<String>, LineError> {
        let encoding = self.detect_encoding()?;
        if self.at_end()? {
            return Ok(None);
        }
        self.line_number += 1;

        match encoding {
            Encoding::Utf8 => self.read_utf8_line().map(Some),
            Encoding::Utf16Le => self.read_utf16_line().map(Some),
        }
    }

    fn read_utf8_line(&mut self) -> Result<String, LineError> {
        let mut line: Vec<u8> = Vec::new();
        while let Some(byte) = self.next_byte()? {
            if byte == b'\n' {
                break;
            }
            line.push(byte);
            // Room for a trailing '\r'
            if line.len() > self.max_len + 1 {
                return Err(LineError::TooLong);
            }
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if line.len() > self.max_len {
            return Err(LineError::TooLong);
        }
        String::from_utf8(line).map_err(|_| LineError::InvalidEncoding)
    }

    fn read_utf16_line(&mut self) -> Result<String, LineError> {
        let mut units: Vec<u16> = Vec::new();
        loop {
            let low = match self.next_byte()? {
                Some(b) => b,
                None => break,
            };
            // Odd trailing byte
            let high = self.next_byte()?.ok_or(LineError::InvalidEncoding)?;
            let unit = u16::from_le_bytes([low, high]);
            if unit == u16::from(b'\n') {
                break;
            }
            units.push(unit);
            if units.len() > self.max_len + 1 {
                return Err(LineError::TooLong);
            }
        }
        if units.last() == Some(&u16::from(b'\r')) {
            units.pop();
        }
        if units.len() > self.max_len {
            return Err(LineError::TooLong);
        }
        char::decode_utf16(units.iter().copied())
            .collect::<Result<String, _>>()
            .map_err(|_| LineError::InvalidEncoding)
    }

    fn detect_encoding(&mut self) -> Result<Encoding, LineError> {
        if let Some(encoding) = self.encoding {
            return Ok(encoding);
        }
        // Short reads may split the byte-order mark
        while !self.eof && self.len < UTF8_BOM.len() {
            let count = self.file.read(&mut self.chunk[self.len..])?;
            if count == 0 {
                self.eof = true;
            }
            self.len += count;
        }
        let head = &self.chunk[..self.len];
        let encoding = if head.starts_with(&UTF16LE_BOM) {
            self.pos = UTF16LE_BOM.len();
            Encoding::Utf16Le
        } else {
            if head.starts_with(&UTF8_BOM) {
                self.pos = UTF8_BOM.len();
            }
            Encoding::Utf8
        };
        self.encoding = Some(encoding);
        Ok(encoding)
    }

    fn at_end(&mut self) -> Result<bool, FsError> {
        if self.pos == self.len {
            self.fill()?;
        }
        Ok(self.pos == self.len)
    }

    fn next_byte(&mut self) -> Result<Option<u8>, FsError> {
        if self.at_end()? {
            return Ok(None);
        }
        let byte = self.chunk[self.pos];
        self.pos += 1;
        Ok(Some(byte))
    }

    /// Refill an exhausted chunk
    fn fill(&mut self) -> Result<(), FsError> {
        if self.eof || self.pos < self.len {
            return Ok(());
        }
        let count = self.file.read(&mut self.chunk)?;
        self.pos = 0;
        self.len = count;
        if count == 0 {
            self.eof = true;
        }
        Ok(())
    }
}
