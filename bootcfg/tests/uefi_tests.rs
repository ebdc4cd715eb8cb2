//! UEFI backend tests against mock firmware tables

#![cfg(feature = "uefi")]

mod common;

use bootcfg::uefi::protocols::{
    EfiStatus, EFI_BUFFER_TOO_SMALL, EFI_DEVICE_ERROR, EFI_NOT_FOUND, EFI_SUCCESS,
};
use bootcfg::uefi::{BootServices, FileProtocol, SimpleFileSystemProtocol, UefiVolumes};
use bootcfg::{
    load_boot_entries, BootConfigError, BootProtocol, FsError, LoaderOptions, VolumeId,
};
use common::TWO_ENTRY_CONFIG;
use core::ptr::{self, NonNull};
use std::sync::atomic::{AtomicUsize, Ordering};

type Children = &'static [(&'static str, &'static [u8])];

/// File handle; the protocol table must stay the first field
#[repr(C)]
struct MockFile {
    proto: FileProtocol,
    data: &'static [u8],
    pos: usize,
    children: Children,
    closes: &'static AtomicUsize,
}

#[repr(C)]
struct MockFs {
    proto: SimpleFileSystemProtocol,
    children: Children,
    closes: &'static AtomicUsize,
    fail_open_volume: bool,
}

fn new_file(data: &'static [u8], children: Children, closes: &'static AtomicUsize) -> *mut FileProtocol {
    let file = Box::new(MockFile {
        proto: FileProtocol {
            revision: 0x0001_0000,
            open: mock_open,
            close: mock_close,
            delete: 0,
            read: mock_read,
            write: 0,
            get_position: 0,
            set_position: 0,
            get_info: 0,
            set_info: 0,
            flush: 0,
        },
        data,
        pos: 0,
        children,
        closes,
    });
    Box::into_raw(file) as *mut FileProtocol
}

extern "efiapi" fn mock_open(
    this: *mut FileProtocol,
    new_handle: *mut *mut FileProtocol,
    file_name: *const u16,
    _open_mode: u64,
    _attributes: u64,
) -> EfiStatus {
    let dir = unsafe { &*(this as *mut MockFile) };
    let mut units = Vec::new();
    let mut i = 0;
    loop {
        let unit = unsafe { *file_name.add(i) };
        if unit == 0 {
            break;
        }
        units.push(unit);
        i += 1;
    }
    let name = String::from_utf16_lossy(&units);

    match dir.children.iter().find(|(path, _)| path.replace('/', "\\") == name) {
        Some(&(_, data)) => {
            unsafe { *new_handle = new_file(data, &[], dir.closes) };
            EFI_SUCCESS
        }
        None => EFI_NOT_FOUND,
    }
}

extern "efiapi" fn mock_close(this: *mut FileProtocol) -> EfiStatus {
    let file = unsafe { Box::from_raw(this as *mut MockFile) };
    file.closes.fetch_add(1, Ordering::SeqCst);
    EFI_SUCCESS
}

extern "efiapi" fn mock_read(
    this: *mut FileProtocol,
    buffer_size: *mut usize,
    buffer: *mut u8,
) -> EfiStatus {
    let file = unsafe { &mut *(this as *mut MockFile) };
    let remaining = &file.data[file.pos..];
    let count = unsafe { *buffer_size }.min(remaining.len());
    unsafe {
        ptr::copy_nonoverlapping(remaining.as_ptr(), buffer, count);
        *buffer_size = count;
    }
    file.pos += count;
    EFI_SUCCESS
}

extern "efiapi" fn mock_open_volume(
    this: *mut SimpleFileSystemProtocol,
    root: *mut *mut FileProtocol,
) -> EfiStatus {
    let fs = unsafe { &*(this as *mut MockFs) };
    if fs.fail_open_volume {
        return EFI_DEVICE_ERROR;
    }
    unsafe { *root = new_file(&[], fs.children, fs.closes) };
    EFI_SUCCESS
}

fn mock_fs(children: Children, fail_open_volume: bool) -> (NonNull<SimpleFileSystemProtocol>, &'static AtomicUsize) {
    let closes: &'static AtomicUsize = Box::leak(Box::new(AtomicUsize::new(0)));
    let fs = Box::leak(Box::new(MockFs {
        proto: SimpleFileSystemProtocol {
            revision: 0x0001_0000,
            open_volume: mock_open_volume,
        },
        children,
        closes,
        fail_open_volume,
    }));
    (NonNull::from(&mut fs.proto), closes)
}

// Volume contents; `mock_open` hands out `'static` slices of these
static TWO_ENTRY_VOLUME: [(&str, &[u8]); 1] = [("boot/tomatboot.cfg", TWO_ENTRY_CONFIG.as_bytes())];
static ROOT_LEVEL_VOLUME: [(&str, &[u8]); 1] = [("tomatboot.cfg", b":Root\nPROTOCOL=MB2\n")];
static SECOND_VOLUME: [(&str, &[u8]); 1] = [("boot/tomatboot.cfg", b":Second\n")];
static HEADERLESS_VOLUME: [(&str, &[u8]); 1] = [("boot/tomatboot.cfg", b"PATH=/x\n")];
static FIRST_LOCATED: [(&str, &[u8]); 1] = [("boot/tomatboot.cfg", b":First\n")];
static SECOND_LOCATED: [(&str, &[u8]); 1] = [("tomatboot.cfg", b":Second\n")];

#[test]
fn test_loads_entries_through_file_protocol() {
    let (fs, closes) = mock_fs(&TWO_ENTRY_VOLUME, false);
    let mut volumes = unsafe { UefiVolumes::from_protocols(vec![fs]) };

    let registry = load_boot_entries(&mut volumes, &LoaderOptions::default()).unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.get(0).unwrap().protocol, BootProtocol::Linux);
    assert_eq!(registry.get(1).unwrap().modules[0].path, "/boot/initrd.img");
    // Root directory and config file
    assert_eq!(closes.load(Ordering::SeqCst), 2);
}

#[test]
fn test_root_level_config() {
    let (fs, closes) = mock_fs(&ROOT_LEVEL_VOLUME, false);
    let mut volumes = unsafe { UefiVolumes::from_protocols(vec![fs]) };

    let registry = load_boot_entries(&mut volumes, &LoaderOptions::default()).unwrap();

    assert_eq!(registry.get(0).unwrap().protocol, BootProtocol::Multiboot2);
    assert_eq!(closes.load(Ordering::SeqCst), 2);
}

#[test]
fn test_volume_without_config() {
    let (empty, empty_closes) = mock_fs(&[], false);
    let (configured, _) = mock_fs(&SECOND_VOLUME, false);
    let mut volumes = unsafe { UefiVolumes::from_protocols(vec![empty, configured]) };

    let registry = load_boot_entries(&mut volumes, &LoaderOptions::default()).unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get(0).unwrap().volume, VolumeId(1));
    assert_eq!(empty_closes.load(Ordering::SeqCst), 1);
    assert!(volumes.get(VolumeId(1)).is_some());
    assert!(volumes.get(VolumeId(2)).is_none());
}

#[test]
fn test_open_volume_failure() {
    let (fs, _) = mock_fs(&[], true);
    let mut volumes = unsafe { UefiVolumes::from_protocols(vec![fs]) };

    let result = load_boot_entries(&mut volumes, &LoaderOptions::default());
    assert_eq!(result.err(), Some(BootConfigError::Io(FsError::DeviceError)));
}

#[test]
fn test_malformed_config_closes_handles() {
    let (fs, closes) = mock_fs(&HEADERLESS_VOLUME, false);
    let mut volumes = unsafe { UefiVolumes::from_protocols(vec![fs]) };

    let result = load_boot_entries(&mut volumes, &LoaderOptions::default());

    assert_eq!(result.err(), Some(BootConfigError::DirectiveBeforeHeader { line: 1 }));
    assert_eq!(closes.load(Ordering::SeqCst), 2);
}

// Handle addresses served by `mock_locate_handle`
static LOCATED: [AtomicUsize; 2] = [AtomicUsize::new(0), AtomicUsize::new(0)];

extern "efiapi" fn mock_locate_handle(
    _search_type: usize,
    _protocol: *const [u8; 16],
    _search_key: *const (),
    buffer_size: *mut usize,
    buffer: *mut *mut (),
) -> EfiStatus {
    let needed = LOCATED.len() * core::mem::size_of::<*mut ()>();
    unsafe {
        if buffer.is_null() || *buffer_size < needed {
            *buffer_size = needed;
            return EFI_BUFFER_TOO_SMALL;
        }
        for (i, slot) in LOCATED.iter().enumerate() {
            *buffer.add(i) = slot.load(Ordering::SeqCst) as *mut ();
        }
        *buffer_size = needed;
    }
    EFI_SUCCESS
}

extern "efiapi" fn mock_locate_none(
    _search_type: usize,
    _protocol: *const [u8; 16],
    _search_key: *const (),
    _buffer_size: *mut usize,
    _buffer: *mut *mut (),
) -> EfiStatus {
    EFI_NOT_FOUND
}

// Handles double as the protocol interface
extern "efiapi" fn mock_handle_protocol(
    handle: *mut (),
    _protocol: *const [u8; 16],
    interface: *mut *mut (),
) -> EfiStatus {
    unsafe { *interface = handle };
    EFI_SUCCESS
}

fn boot_services(
    locate_handle: extern "efiapi" fn(usize, *const [u8; 16], *const (), *mut usize, *mut *mut ()) -> EfiStatus,
) -> BootServices {
    BootServices {
        header: [0; 24],
        raise_tpl: 0,
        restore_tpl: 0,
        allocate_pages: 0,
        free_pages: 0,
        get_memory_map: 0,
        allocate_pool: 0,
        free_pool: 0,
        create_event: 0,
        set_timer: 0,
        wait_for_event: 0,
        signal_event: 0,
        close_event: 0,
        check_event: 0,
        install_protocol_interface: 0,
        reinstall_protocol_interface: 0,
        uninstall_protocol_interface: 0,
        handle_protocol: mock_handle_protocol,
        reserved: 0,
        register_protocol_notify: 0,
        locate_handle,
    }
}

#[test]
fn test_locate_finds_every_filesystem() {
    let (first, _) = mock_fs(&FIRST_LOCATED, false);
    let (second, _) = mock_fs(&SECOND_LOCATED, false);
    LOCATED[0].store(first.as_ptr() as usize, Ordering::SeqCst);
    LOCATED[1].store(second.as_ptr() as usize, Ordering::SeqCst);

    let bs = boot_services(mock_locate_handle);
    let mut volumes = unsafe { UefiVolumes::locate(&bs) }.unwrap();
    assert_eq!(volumes.len(), 2);

    let registry = load_boot_entries(&mut volumes, &LoaderOptions::default()).unwrap();
    let names: Vec<_> = registry.iter().map(|e| (e.name.as_str(), e.volume)).collect();
    assert_eq!(names, [("First", VolumeId(0)), ("Second", VolumeId(1))]);
}

#[test]
fn test_locate_without_filesystems_fails() {
    let bs = boot_services(mock_locate_none);
    let result = unsafe { UefiVolumes::locate(&bs) };
    assert_eq!(result.err(), Some(FsError::NotFound));
}
