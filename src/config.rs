//! `Inkproof.toml` configuration.

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::profile::ProfileSource;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "Inkproof.toml";

/// Raw TOML structure of an `Inkproof.toml` file.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    profile: ProfileConfig,
}

/// Press-profile configuration.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileConfig {
    /// Explicit path to a CMYK ICC profile.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Extra directories searched before the built-in candidates.
    #[serde(default)]
    pub search: Vec<PathBuf>,
}

/// A loaded `Inkproof.toml` configuration.
#[derive(Debug, Default)]
pub struct Config {
    pub profile: ProfileConfig,
}

impl Config {
    /// Returns the profile source described by this configuration.
    pub fn profile_source(&self) -> ProfileSource {
        ProfileSource {
            path: self.profile.path.clone(),
            search: self.profile.search.clone(),
        }
    }
}

/// Loads an `Inkproof.toml` configuration file.
///
/// A missing file yields the default configuration; the tool is
/// fully usable without one.
pub fn load_config(config_path: &Path) -> io::Result<Config> {
    if !config_path.exists() {
        return Ok(Config::default());
    }

    let toml_str = std::fs::read_to_string(config_path)?;
    load_config_from_str(&toml_str)
}

/// Parses an `Inkproof.toml` configuration string.
fn load_config_from_str(toml_str: &str) -> io::Result<Config> {
    let raw: RawConfig = toml::from_str(toml_str)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("invalid TOML: {}", e)))?;

    Ok(Config {
        profile: raw.profile,
    })
}
