use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::channel_names::ChannelNames;
use super::error::ConfigError;

/// A well/position pair queued for assembly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub well: String,
    pub position: String,
}

/// Structure representing the application configuration. Contains the experiment path,
/// the channel names and the queued targets.
/// Configs are serializable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data_path: PathBuf,
    /// Blank slots take the filter cube found by discovery
    pub channel_names: ChannelNames,
    pub targets: Vec<Target>,
    /// Queue every well/position of the experiment, ignoring `targets`
    pub all_positions: bool,
}

impl Default for Config {
    /// Generate a new Config object. The data path is invalid and nothing is queued
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("None"),
            channel_names: ChannelNames::default(),
            targets: vec![],
            all_positions: false,
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Write the configuration to a YAML file
    pub fn write_config_file(&self, config_path: &Path) -> Result<(), ConfigError> {
        let yaml_str = serde_yaml::to_string(self)?;
        std::fs::write(config_path, yaml_str)?;
        Ok(())
    }

    /// Check that the experiment directory exists
    pub fn is_data_path_valid(&self) -> bool {
        self.data_path.is_dir()
    }
}
