//! UEFI volume backend
//!
//! Volumes are the handles carrying `EFI_SIMPLE_FILE_SYSTEM_PROTOCOL`. File
//! handles close themselves on drop.

pub mod protocols;

pub use protocols::{BootServices, FileProtocol, SimpleFileSystemProtocol};

use crate::error::FsError;
use crate::types::VolumeId;
use crate::volume::{Directory, FileHandle, Volume, VolumeSource};
use alloc::vec;
use alloc::vec::Vec;
use core::ptr::{self, NonNull};
use protocols::{
    path_to_ucs2, status_to_result, BY_PROTOCOL, EFI_BUFFER_TOO_SMALL, EFI_FILE_MODE_READ,
    SIMPLE_FILE_SYSTEM_PROTOCOL_GUID,
};

/// Table of every Simple File System instance found at boot
pub struct UefiVolumes {
    protocols: Vec<NonNull<SimpleFileSystemProtocol>>,
}

impl UefiVolumes {
    /// Locate all handles supporting the Simple File System protocol.
    ///
    /// # Safety
    /// `bs` must be the firmware's boot services table and boot services must
    /// not have been exited. The table stays valid only until ExitBootServices.
    pub unsafe fn locate(bs: &BootServices) -> Result<Self, FsError> {
        // Get buffer size needed for all handles
        let mut buffer_size: usize = 0;
        let status = (bs.locate_handle)(
            BY_PROTOCOL,
            &SIMPLE_FILE_SYSTEM_PROTOCOL_GUID,
            ptr::null(),
            &mut buffer_size,
            ptr::null_mut(),
        );
        if status != EFI_BUFFER_TOO_SMALL {
            status_to_result(status)?;
        }

        let count = buffer_size / core::mem::size_of::<*mut ()>();
        let mut handles: Vec<*mut ()> = vec![ptr::null_mut(); count];
        if count > 0 {
            let status = (bs.locate_handle)(
                BY_PROTOCOL,
                &SIMPLE_FILE_SYSTEM_PROTOCOL_GUID,
                ptr::null(),
                &mut buffer_size,
                handles.as_mut_ptr(),
            );
            status_to_result(status)?;
            handles.truncate(buffer_size / core::mem::size_of::<*mut ()>());
        }

        let mut protocols = Vec::with_capacity(handles.len());
        for handle in handles {
            let mut interface: *mut () = ptr::null_mut();
            let status =
                (bs.handle_protocol)(handle, &SIMPLE_FILE_SYSTEM_PROTOCOL_GUID, &mut interface);
            status_to_result(status)?;
            let fs = NonNull::new(interface as *mut SimpleFileSystemProtocol)
                .ok_or(FsError::Unsupported)?;
            protocols.push(fs);
        }

        Ok(Self { protocols })
    }

    /// Build the table from already located protocol instances.
    ///
    /// # Safety
    /// Every pointer must reference a live Simple File System protocol for as
    /// long as this table and the volumes it hands out are used.
    pub unsafe fn from_protocols(protocols: Vec<NonNull<SimpleFileSystemProtocol>>) -> Self {
        Self { protocols }
    }

    /// Number of volumes
    pub fn len(&self) -> usize {
        self.protocols.len()
    }

    /// True if no filesystem was found
    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }

    /// Resolve an entry's volume back to its filesystem
    pub fn get(&self, id: VolumeId) -> Option<UefiVolume> {
        self.protocols.get(id.index()).map(|&fs| UefiVolume { fs })
    }
}

impl VolumeSource for UefiVolumes {
    type Volume = UefiVolume;

    fn volumes(&mut self) -> Result<Vec<UefiVolume>, FsError> {
        Ok(self.protocols.iter().map(|&fs| UefiVolume { fs }).collect())
    }
}

/// One Simple File System instance
#[derive(Clone, Copy)]
pub struct UefiVolume {
    fs: NonNull<SimpleFileSystemProtocol>,
}

impl Volume for UefiVolume {
    type Root = UefiFile;

    fn open_root(&mut self) -> Result<UefiFile, FsError> {
        let fs = self.fs.as_ptr();
        let mut root: *mut FileProtocol = ptr::null_mut();
        // SAFETY: `fs` is live per the UefiVolumes construction contract
        let status = unsafe { ((*fs).open_volume)(fs, &mut root) };
        status_to_result(status)?;
        // SAFETY: firmware returned a fresh handle
        unsafe { UefiFile::from_raw(root) }.ok_or(FsError::DeviceError)
    }
}

/// Open file or directory handle, closed on drop
pub struct UefiFile {
    handle: NonNull<FileProtocol>,
}

impl UefiFile {
    /// Take ownership of a raw handle.
    ///
    /// # Safety
    /// `handle` must be an open `EFI_FILE_PROTOCOL` not owned by anything else.
    pub unsafe fn from_raw(handle: *mut FileProtocol) -> Option<Self> {
        NonNull::new(handle).map(|handle| Self { handle })
    }
}

impl Directory for UefiFile {
    type File = UefiFile;

    fn open(&mut self, path: &str) -> Result<UefiFile, FsError> {
        let name = path_to_ucs2(path);
        let this = self.handle.as_ptr();
        let mut file: *mut FileProtocol = ptr::null_mut();
        // SAFETY: `this` is an open handle owned by self
        let status = unsafe { ((*this).open)(this, &mut file, name.as_ptr(), EFI_FILE_MODE_READ, 0) };
        status_to_result(status)?;
        // SAFETY: firmware returned a fresh handle
        unsafe { UefiFile::from_raw(file) }.ok_or(FsError::DeviceError)
    }
}

impl FileHandle for UefiFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        let this = self.handle.as_ptr();
        let mut size = buf.len();
        // SAFETY: `this` is an open handle owned by self
        let status = unsafe { ((*this).read)(this, &mut size, buf.as_mut_ptr()) };
        status_to_result(status)?;
        Ok(size.min(buf.len()))
    }
}

impl Drop for UefiFile {
    fn drop(&mut self) {
        let this = self.handle.as_ptr();
        // SAFETY: handle is open and closed exactly once here
        unsafe {
            ((*this).close)(this);
        }
    }
}
