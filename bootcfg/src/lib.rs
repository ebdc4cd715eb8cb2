//! Boot Configuration Loader
//!
//! A `no_std` loader for the boot menu definitions stored on the machine's volumes.
//!
//! # Overview
//!
//! Every volume exposing a filesystem may carry a plain-text configuration file
//! (`boot/<app>.cfg` or `<app>.cfg`). This crate provides:
//! - Volume scanning with per-volume config discovery
//! - A line reader with a fixed maximum line length (ASCII/UTF-8 and UCS-2 files)
//! - The directive parser that turns lines into [`BootEntry`] records
//! - The ordered [`Registry`] of entries handed to the boot menu
//! - An optional UEFI Simple File System backend (`uefi` feature)
//!
//! # Architecture
//!
//! 1. **Volume layer** - [`volume::VolumeSource`] / [`volume::Volume`] / [`volume::Directory`]
//!    abstract the firmware's filesystem capability
//! 2. **Scanner** - [`enumerate_configs`] walks the volumes and owns the handle lifecycle
//! 3. **Parser** - [`parse_config`] runs the header/directive state machine
//! 4. **Registry** - [`Registry`] keeps entries in declaration order
//!
//! # Config format
//!
//! ```text
//! :Linux
//! PATH=/boot/vmlinuz
//! CMDLINE=root=/dev/sda1
//! PROTOCOL=LINUX
//! :Stivale Kernel
//! PATH=/boot/kernel.elf
//! MODULE=initrd,/boot/initrd.img
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use bootcfg::{load_boot_entries, LoaderOptions};
//!
//! let mut volumes = bootcfg::uefi::UefiVolumes::locate(boot_services)?;
//! let registry = load_boot_entries(&mut volumes, &LoaderOptions::default())?;
//!
//! for (i, entry) in registry.iter().enumerate() {
//!     // hand to the menu
//! }
//! ```

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

pub mod error;
pub mod logger;
pub mod options;
pub mod parser;
pub mod registry;
pub mod scanner;
pub mod types;
pub mod volume;

#[cfg(feature = "uefi")]
pub mod uefi;

pub use error::{BootConfigError, FsError, Result};
pub use options::{LoaderOptions, MultiVolumePolicy};
pub use registry::Registry;
pub use types::{BootEntry, BootModule, BootProtocol, VolumeId, MAX_LINE_LENGTH};

// High-level API exports
pub use parser::parse_config;
pub use scanner::{enumerate_configs, load_boot_entries};
