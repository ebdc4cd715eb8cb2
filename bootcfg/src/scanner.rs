//! Volume scanner
//!
//! Walks every volume, opens the first candidate config file found on it and
//! feeds it to the parser. Root and file handles are scoped to one volume and
//! dropped (closed) before moving on, on success and on error.

use crate::error::{BootConfigError, FsError, Result};
use crate::log_info;
use crate::options::{LoaderOptions, MultiVolumePolicy};
use crate::parser::parse_config;
use crate::registry::Registry;
use crate::types::VolumeId;
use crate::volume::{Directory, Volume, VolumeSource};

/// Load the configs of every volume into a fresh registry
pub fn load_boot_entries<S: VolumeSource>(source: &mut S, options: &LoaderOptions) -> Result<Registry> {
    let mut registry = Registry::new();
    enumerate_configs(source, options, &mut registry)?;
    Ok(registry)
}

/// Load the configs of every volume into `registry`.
///
/// Volumes without a config are skipped. Any other failure aborts the scan;
/// entries already appended stay in the registry.
pub fn enumerate_configs<S: VolumeSource>(
    source: &mut S,
    options: &LoaderOptions,
    registry: &mut Registry,
) -> Result<()> {
    let volumes = source.volumes().map_err(BootConfigError::VolumeEnumeration)?;
    log_info!("Scanning {} volume(s) for boot config", volumes.len());

    for (index, mut volume) in volumes.into_iter().enumerate() {
        load_volume_config(VolumeId(index), &mut volume, options, registry)?;
    }

    log_info!("Loaded {} boot entries", registry.len());
    Ok(())
}

/// Parse the config on one volume. Returns `false` if the volume has none.
pub fn load_volume_config<V: Volume>(
    id: VolumeId,
    volume: &mut V,
    options: &LoaderOptions,
    registry: &mut Registry,
) -> Result<bool> {
    let mut root = volume.open_root()?;

    let mut file = None;
    for path in options.candidate_paths() {
        match root.open(&path) {
            Ok(handle) => {
                log_info!("Volume {}: using {}", id.index(), path);
                file = Some(handle);
                break;
            }
            Err(FsError::NotFound) => continue,
            Err(e) => return Err(BootConfigError::Io(e)),
        }
    }

    // No config on this volume
    let file = match file {
        Some(file) => file,
        None => return Ok(false),
    };

    if options.policy == MultiVolumePolicy::ReplacePerVolume {
        registry.clear();
    }

    parse_config(id, file, registry)?;
    Ok(true)
}
