//! Boot entry records and constants

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Maximum characters per config line (255-unit line buffer minus terminator)
pub const MAX_LINE_LENGTH: usize = 254;

/// Default application name used to derive the config file paths
pub const DEFAULT_APP_NAME: &str = "tomatboot";

/// Entry header marker
pub const HEADER_MARKER: char = ':';

/// Position of a volume in the table produced by the volume source.
///
/// Entries and modules only refer to their volume through this index; the
/// volume source owns the volumes and must outlive any use of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VolumeId(pub usize);

impl VolumeId {
    /// Index into the volume table
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Launch convention used to hand control to the kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BootProtocol {
    /// Linux boot protocol
    Linux,
    /// Multiboot2
    Multiboot2,
    /// Stivale
    #[default]
    Stivale,
}

impl BootProtocol {
    /// Parse a `PROTOCOL=` value. Case-sensitive, exact match.
    pub fn from_config(value: &str) -> Option<Self> {
        match value {
            "LINUX" => Some(Self::Linux),
            "MB2" => Some(Self::Multiboot2),
            "STIVALE" => Some(Self::Stivale),
            _ => None,
        }
    }

    /// Spelling used in config files
    pub const fn config_name(&self) -> &'static str {
        match self {
            Self::Linux => "LINUX",
            Self::Multiboot2 => "MB2",
            Self::Stivale => "STIVALE",
        }
    }
}

impl fmt::Display for BootProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "Linux"),
            Self::Multiboot2 => write!(f, "Multiboot2"),
            Self::Stivale => write!(f, "Stivale"),
        }
    }
}

/// Auxiliary file loaded alongside a kernel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootModule {
    /// Author-supplied tag, opaque here
    pub tag: String,
    /// Path on the owning volume
    pub path: String,
    /// Volume the path resolves against
    pub volume: VolumeId,
}

/// One selectable boot target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootEntry {
    /// Display name (text after the `:` marker)
    pub name: String,
    /// Kernel image path, empty if never set
    pub path: String,
    /// Kernel command line, empty if never set
    pub cmdline: String,
    /// Boot protocol
    pub protocol: BootProtocol,
    /// Modules in declaration order
    pub modules: Vec<BootModule>,
    /// Volume `path` and every module path resolve against
    pub volume: VolumeId,
}

impl BootEntry {
    /// Fresh entry as created by a header line
    pub fn new(name: String, volume: VolumeId) -> Self {
        Self {
            name,
            path: String::new(),
            cmdline: String::new(),
            protocol: BootProtocol::default(),
            modules: Vec::new(),
            volume,
        }
    }

    /// Append a module on this entry's volume
    pub(crate) fn add_module(&mut self, tag: String, path: String) {
        self.modules.push(BootModule {
            tag,
            path,
            volume: self.volume,
        });
    }

    /// Find a module by tag
    pub fn module(&self, tag: &str) -> Option<&BootModule> {
        self.modules.iter().find(|m| m.tag == tag)
    }

    /// Whether a kernel path was configured
    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }
}
