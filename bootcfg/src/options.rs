//! Loader options

use crate::types::DEFAULT_APP_NAME;
use alloc::format;
use alloc::string::String;

/// What happens when more than one volume carries a config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultiVolumePolicy {
    /// Append the entries of every volume, in volume order
    #[default]
    Accumulate,
    /// Clear the registry before each volume that yields a config (last volume wins)
    ReplacePerVolume,
}

/// Options for [`crate::enumerate_configs`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Application name, config files are `boot/<app>.cfg` and `<app>.cfg`
    pub app_name: String,
    /// Multi-volume behaviour
    pub policy: MultiVolumePolicy,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            app_name: String::from(DEFAULT_APP_NAME),
            policy: MultiVolumePolicy::default(),
        }
    }
}

impl LoaderOptions {
    /// Options for another application name
    pub fn for_app(app_name: &str) -> Self {
        Self {
            app_name: String::from(app_name),
            ..Self::default()
        }
    }

    /// Set the multi-volume policy
    pub fn with_policy(mut self, policy: MultiVolumePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Candidate config paths in priority order, relative to the volume root
    pub fn candidate_paths(&self) -> [String; 2] {
        [
            format!("boot/{}.cfg", self.app_name),
            format!("{}.cfg", self.app_name),
        ]
    }
}
