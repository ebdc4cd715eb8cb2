//! Filesystem capability
//!
//! The loader only needs four things from the firmware: list the volumes,
//! open a volume root, open a file below it, and read bytes. Handles are
//! closed when dropped, so every exit path releases them.

pub mod lines;

pub use lines::LineReader;

use crate::error::FsError;
use alloc::vec::Vec;

/// Source of every volume exposing a filesystem
pub trait VolumeSource {
    /// Volume handle type
    type Volume: Volume;

    /// List the volumes.
    ///
    /// The position of a volume in the returned list is its
    /// [`VolumeId`](crate::VolumeId).
    fn volumes(&mut self) -> Result<Vec<Self::Volume>, FsError>;
}

/// A mounted filesystem
pub trait Volume {
    /// Root directory handle type
    type Root: Directory;

    /// Open the root directory
    fn open_root(&mut self) -> Result<Self::Root, FsError>;
}

/// An open directory
pub trait Directory {
    /// File handle type
    type File: FileHandle;

    /// Open `path` (relative, `/`-separated) for reading.
    ///
    /// A missing file must be reported as [`FsError::NotFound`].
    fn open(&mut self, path: &str) -> Result<Self::File, FsError>;
}

/// An open file
pub trait FileHandle {
    /// Read into `buf`, returning the byte count. `Ok(0)` means end of file.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError>;
}

impl<F: FileHandle + ?Sized> FileHandle for &mut F {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        (**self).read(buf)
    }
}

/// In-memory text
impl FileHandle for &[u8] {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        let count = buf.len().min(self.len());
        let (head, tail) = self.split_at(count);
        buf[..count].copy_from_slice(head);
        *self = tail;
        Ok(count)
    }
}
