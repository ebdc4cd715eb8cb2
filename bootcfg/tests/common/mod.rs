//! Common test utilities and in-memory volumes

#![allow(dead_code)]

use bootcfg::volume::{Directory, FileHandle, Volume, VolumeSource};
use bootcfg::FsError;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Counts handles opened and closed on one volume
#[derive(Debug, Default)]
pub struct HandleTracker {
    pub opened: Cell<usize>,
    pub closed: Cell<usize>,
    /// Every path passed to `open`, in call order
    pub attempts: RefCell<Vec<String>>,
}

impl HandleTracker {
    pub fn open_handles(&self) -> usize {
        self.opened.get() - self.closed.get()
    }
}

/// Increments `closed` when dropped
struct HandleGuard {
    tracker: Rc<HandleTracker>,
}

impl HandleGuard {
    fn new(tracker: &Rc<HandleTracker>) -> Self {
        tracker.opened.set(tracker.opened.get() + 1);
        Self {
            tracker: Rc::clone(tracker),
        }
    }
}

impl Drop for HandleGuard {
    fn drop(&mut self) {
        self.tracker.closed.set(self.tracker.closed.get() + 1);
    }
}

/// In-memory volume with optional injected failures
#[derive(Clone, Default)]
pub struct MemoryVolume {
    files: HashMap<String, Vec<u8>>,
    tracker: Rc<HandleTracker>,
    fail_root: Option<FsError>,
    fail_open: HashMap<String, FsError>,
    fail_read: Option<FsError>,
    chunk_limit: Option<usize>,
}

impl MemoryVolume {
    pub fn new() -> Self {
        Self::default()
    }

    /// Volume holding `boot/tomatboot.cfg`
    pub fn with_config(text: &str) -> Self {
        Self::new().with_file("boot/tomatboot.cfg", text)
    }

    pub fn with_file(mut self, path: &str, text: &str) -> Self {
        self.files.insert(path.to_string(), text.as_bytes().to_vec());
        self
    }

    pub fn with_bytes(mut self, path: &str, data: &[u8]) -> Self {
        self.files.insert(path.to_string(), data.to_vec());
        self
    }

    pub fn failing_root(mut self, err: FsError) -> Self {
        self.fail_root = Some(err);
        self
    }

    pub fn failing_open(mut self, path: &str, err: FsError) -> Self {
        self.fail_open.insert(path.to_string(), err);
        self
    }

    pub fn failing_read(mut self, err: FsError) -> Self {
        self.fail_read = Some(err);
        self
    }

    /// Return at most `limit` bytes per read call
    pub fn short_reads(mut self, limit: usize) -> Self {
        self.chunk_limit = Some(limit);
        self
    }

    pub fn tracker(&self) -> Rc<HandleTracker> {
        Rc::clone(&self.tracker)
    }
}

pub struct MemoryRoot {
    volume: MemoryVolume,
    _guard: HandleGuard,
}

pub struct MemoryFile {
    data: Vec<u8>,
    pos: usize,
    fail_read: Option<FsError>,
    chunk_limit: Option<usize>,
    _guard: HandleGuard,
}

impl Volume for MemoryVolume {
    type Root = MemoryRoot;

    fn open_root(&mut self) -> Result<MemoryRoot, FsError> {
        if let Some(err) = self.fail_root {
            return Err(err);
        }
        Ok(MemoryRoot {
            volume: self.clone(),
            _guard: HandleGuard::new(&self.tracker),
        })
    }
}

impl Directory for MemoryRoot {
    type File = MemoryFile;

    fn open(&mut self, path: &str) -> Result<MemoryFile, FsError> {
        let volume = &self.volume;
        volume.tracker.attempts.borrow_mut().push(path.to_string());

        if let Some(&err) = volume.fail_open.get(path) {
            return Err(err);
        }
        let data = volume.files.get(path).ok_or(FsError::NotFound)?;
        Ok(MemoryFile {
            data: data.clone(),
            pos: 0,
            fail_read: volume.fail_read,
            chunk_limit: volume.chunk_limit,
            _guard: HandleGuard::new(&volume.tracker),
        })
    }
}

impl FileHandle for MemoryFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        if let Some(err) = self.fail_read {
            return Err(err);
        }
        let remaining = &self.data[self.pos..];
        let mut count = buf.len().min(remaining.len());
        if let Some(limit) = self.chunk_limit {
            count = count.min(limit);
        }
        buf[..count].copy_from_slice(&remaining[..count]);
        self.pos += count;
        Ok(count)
    }
}

/// Volume table for the scanner
#[derive(Default)]
pub struct MemoryVolumes {
    pub volumes: Vec<MemoryVolume>,
    pub fail: Option<FsError>,
}

impl MemoryVolumes {
    pub fn new(volumes: Vec<MemoryVolume>) -> Self {
        Self {
            volumes,
            fail: None,
        }
    }

    pub fn failing(err: FsError) -> Self {
        Self {
            volumes: Vec::new(),
            fail: Some(err),
        }
    }
}

impl VolumeSource for MemoryVolumes {
    type Volume = MemoryVolume;

    fn volumes(&mut self) -> Result<Vec<MemoryVolume>, FsError> {
        match self.fail {
            Some(err) => Err(err),
            None => Ok(self.volumes.clone()),
        }
    }
}

/// Config from the end-to-end example
pub const TWO_ENTRY_CONFIG: &str = ":Linux
PATH=/boot/vmlinuz
CMDLINE=root=/dev/sda1
PROTOCOL=LINUX
:Stivale Kernel
PATH=/boot/kernel.elf
MODULE=initrd,/boot/initrd.img
";
