//! UEFI Simple File System Protocol bindings

use crate::error::FsError;

/// Raw `EFI_STATUS`
pub type EfiStatus = usize;

/// `EFI_SIMPLE_FILE_SYSTEM_PROTOCOL` GUID, in memory byte order
pub const SIMPLE_FILE_SYSTEM_PROTOCOL_GUID: [u8; 16] = [
    0x22, 0x5b, 0x4e, 0x96, 0x59, 0x64, 0xd2, 0x11, 0x8e, 0x39, 0x00, 0xa0, 0xc9, 0x69, 0x72, 0x3b,
];

// Status codes
const ERROR_BIT: usize = 1 << (usize::BITS - 1);

/// Operation completed
pub const EFI_SUCCESS: EfiStatus = 0;
/// Bad argument
pub const EFI_INVALID_PARAMETER: EfiStatus = ERROR_BIT | 2;
/// Operation not supported
pub const EFI_UNSUPPORTED: EfiStatus = ERROR_BIT | 3;
/// Buffer too small, required size returned
pub const EFI_BUFFER_TOO_SMALL: EfiStatus = ERROR_BIT | 5;
/// Hardware error
pub const EFI_DEVICE_ERROR: EfiStatus = ERROR_BIT | 7;
/// Filesystem damaged
pub const EFI_VOLUME_CORRUPTED: EfiStatus = ERROR_BIT | 10;
/// No medium in the device
pub const EFI_NO_MEDIA: EfiStatus = ERROR_BIT | 12;
/// Item not found
pub const EFI_NOT_FOUND: EfiStatus = ERROR_BIT | 14;
/// Access refused
pub const EFI_ACCESS_DENIED: EfiStatus = ERROR_BIT | 15;

/// `LocateHandle` search type: handles supporting a protocol
pub const BY_PROTOCOL: usize = 2;

/// Open for reading
pub const EFI_FILE_MODE_READ: u64 = 0x0000000000000001;

/// Map an EFI status to `Ok(())` or the closest [`FsError`]
pub fn status_to_result(status: EfiStatus) -> Result<(), FsError> {
    match status {
        EFI_SUCCESS => Ok(()),
        EFI_NOT_FOUND => Err(FsError::NotFound),
        EFI_ACCESS_DENIED => Err(FsError::AccessDenied),
        EFI_DEVICE_ERROR | EFI_VOLUME_CORRUPTED | EFI_NO_MEDIA => Err(FsError::DeviceError),
        EFI_UNSUPPORTED => Err(FsError::Unsupported),
        other => Err(FsError::Status(other)),
    }
}

/// Boot services table, up to `LocateHandle`
#[repr(C)]
pub struct BootServices {
    /// Table header
    pub header: [u8; 24],
    // Task Priority Services
    /// Placeholder for RaiseTPL
    pub raise_tpl: usize,
    /// Placeholder for RestoreTPL
    pub restore_tpl: usize,
    // Memory Services
    /// Placeholder for AllocatePages
    pub allocate_pages: usize,
    /// Placeholder for FreePages
    pub free_pages: usize,
    /// Placeholder for GetMemoryMap
    pub get_memory_map: usize,
    /// Placeholder for AllocatePool
    pub allocate_pool: usize,
    /// Placeholder for FreePool
    pub free_pool: usize,
    // Event & Timer Services
    /// Placeholder for CreateEvent
    pub create_event: usize,
    /// Placeholder for SetTimer
    pub set_timer: usize,
    /// Placeholder for WaitForEvent
    pub wait_for_event: usize,
    /// Placeholder for SignalEvent
    pub signal_event: usize,
    /// Placeholder for CloseEvent
    pub close_event: usize,
    /// Placeholder for CheckEvent
    pub check_event: usize,
    // Protocol Handler Services
    /// Placeholder for InstallProtocolInterface
    pub install_protocol_interface: usize,
    /// Placeholder for ReinstallProtocolInterface
    pub reinstall_protocol_interface: usize,
    /// Placeholder for UninstallProtocolInterface
    pub uninstall_protocol_interface: usize,
    /// HandleProtocol
    pub handle_protocol: extern "efiapi" fn(
        handle: *mut (),
        protocol: *const [u8; 16],
        interface: *mut *mut (),
    ) -> EfiStatus,
    /// Reserved slot
    pub reserved: usize,
    /// Placeholder for RegisterProtocolNotify
    pub register_protocol_notify: usize,
    /// LocateHandle
    pub locate_handle: extern "efiapi" fn(
        search_type: usize,
        protocol: *const [u8; 16],
        search_key: *const (),
        buffer_size: *mut usize,
        buffer: *mut *mut (),
    ) -> EfiStatus,
}

/// `EFI_SIMPLE_FILE_SYSTEM_PROTOCOL`
#[repr(C)]
pub struct SimpleFileSystemProtocol {
    /// Protocol revision
    pub revision: u64,
    /// OpenVolume: root directory handle
    pub open_volume: extern "efiapi" fn(
        this: *mut SimpleFileSystemProtocol,
        root: *mut *mut FileProtocol,
    ) -> EfiStatus,
}

/// `EFI_FILE_PROTOCOL`
#[repr(C)]
pub struct FileProtocol {
    /// Protocol revision
    pub revision: u64,
    /// Open a file relative to this handle
    pub open: extern "efiapi" fn(
        this: *mut FileProtocol,
        new_handle: *mut *mut FileProtocol,
        file_name: *const u16,
        open_mode: u64,
        attributes: u64,
    ) -> EfiStatus,
    /// Close this handle
    pub close: extern "efiapi" fn(this: *mut FileProtocol) -> EfiStatus,
    /// Placeholder for Delete
    pub delete: usize,
    /// Read bytes, updating the size in place
    pub read: extern "efiapi" fn(
        this: *mut FileProtocol,
        buffer_size: *mut usize,
        buffer: *mut u8,
    ) -> EfiStatus,
    /// Placeholder for Write
    pub write: usize,
    /// Placeholder for GetPosition
    pub get_position: usize,
    /// Placeholder for SetPosition
    pub set_position: usize,
    /// Placeholder for GetInfo
    pub get_info: usize,
    /// Placeholder for SetInfo
    pub set_info: usize,
    /// Placeholder for Flush
    pub flush: usize,
}

/// Null-terminated UCS-2 path, `/` separators turned into `\`
pub fn path_to_ucs2(path: &str) -> alloc::vec::Vec<u16> {
    let mut buf: alloc::vec::Vec<u16> = path
        .encode_utf16()
        .map(|unit| if unit == u16::from(b'/') { u16::from(b'\\') } else { unit })
        .collect();
    buf.push(0);
    buf
}
