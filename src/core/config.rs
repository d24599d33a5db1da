// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Host configuration
//!
//! [`Config`] is built once from the command line (and optionally a TOML
//! defaults file) and never mutated afterwards. It is passed by reference to
//! the lifecycle, which forwards the relevant parts to the device.

use crate::core::error::{EmulatorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable naming a default config file
pub const CONFIG_ENV_VAR: &str = "N64RX_CONFIG";

/// Input-device emulation profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ControllerType {
    /// Keyboard mapped onto a standard controller
    #[value(name = "keyboard")]
    Keyboard,
    /// Mayflash N64 adapter
    #[value(name = "mayflash64")]
    Mayflash64,
    /// Retrolink N64 USB controller
    #[value(name = "retrolink")]
    Retrolink,
    /// Wii U pro controller
    #[value(name = "wiiu")]
    WiiU,
    /// Xbox 360 controller
    #[value(name = "x360")]
    X360,
}

impl fmt::Display for ControllerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControllerType::Keyboard => "keyboard",
            ControllerType::Mayflash64 => "mayflash64",
            ControllerType::Retrolink => "retrolink",
            ControllerType::WiiU => "wiiu",
            ControllerType::X360 => "x360",
        };
        f.write_str(name)
    }
}

/// Immutable runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// PIF boot ROM image
    pub pif_rom: PathBuf,
    /// Cartridge image
    pub cartridge: PathBuf,
    /// Controller profile; the device default is used when unset
    pub controller: Option<ControllerType>,
    /// EEPROM backing file
    pub eeprom: Option<PathBuf>,
    /// SRAM backing file
    pub sram: Option<PathBuf>,
    /// Control-channel port; no rendezvous happens when unset
    pub port: Option<u16>,
    /// Run without opening a window; a window is opened when unset
    pub headless: Option<bool>,
}

impl Config {
    /// Create a configuration with only the mandatory images set
    pub fn new(pif_rom: impl Into<PathBuf>, cartridge: impl Into<PathBuf>) -> Self {
        Self {
            pif_rom: pif_rom.into(),
            cartridge: cartridge.into(),
            controller: None,
            eeprom: None,
            sram: None,
            port: None,
            headless: None,
        }
    }

    /// Whether to run without a window
    pub fn is_headless(&self) -> bool {
        self.headless.unwrap_or(false)
    }

    /// Fill every unset option from `defaults`
    pub fn with_defaults(mut self, defaults: &ConfigFile) -> Self {
        self.controller = self.controller.or(defaults.controller);
        self.eeprom = self.eeprom.or_else(|| defaults.eeprom.clone());
        self.sram = self.sram.or_else(|| defaults.sram.clone());
        self.port = self.port.or(defaults.port);
        self.headless = self.headless.or(defaults.headless);
        self
    }
}

/// Optional defaults loaded from a TOML file
///
/// ```toml
/// controller = "x360"
/// eeprom = "saves/game.eep"
/// port = 0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Controller profile
    pub controller: Option<ControllerType>,
    /// EEPROM backing file
    pub eeprom: Option<PathBuf>,
    /// SRAM backing file
    pub sram: Option<PathBuf>,
    /// Control-channel port
    pub port: Option<u16>,
    /// Run without opening a window
    pub headless: Option<bool>,
}

impl ConfigFile {
    /// Load defaults from a TOML file
    ///
    /// # Errors
    ///
    /// Returns `EmulatorError::InvalidArgument` if the file cannot be read or
    /// does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            EmulatorError::InvalidArgument(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&contents).map_err(|e| {
            EmulatorError::InvalidArgument(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Save defaults to a TOML file
    ///
    /// # Errors
    ///
    /// Returns `EmulatorError::InvalidArgument` if serialization or the write
    /// fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| {
            EmulatorError::InvalidArgument(format!("Failed to serialize config: {}", e))
        })?;
        std::fs::write(path, contents).map_err(|e| {
            EmulatorError::InvalidArgument(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_line_wins_over_file() {
        let defaults = ConfigFile {
            controller: Some(ControllerType::X360),
            eeprom: Some(PathBuf::from("file.eep")),
            sram: None,
            port: Some(9000),
            headless: None,
        };

        let mut config = Config::new("pifrom.bin", "game.z64");
        config.port = Some(0);
        let config = config.with_defaults(&defaults);

        assert_eq!(config.port, Some(0));
        assert_eq!(config.controller, Some(ControllerType::X360));
        assert_eq!(config.eeprom, Some(PathBuf::from("file.eep")));
        assert_eq!(config.sram, None);
    }

    #[test]
    fn test_command_line_can_disable_headless() {
        let defaults = ConfigFile {
            headless: Some(true),
            ..ConfigFile::default()
        };

        let mut config = Config::new("pifrom.bin", "game.z64");
        config.headless = Some(false);
        assert!(!config.with_defaults(&defaults).is_headless());

        let config = Config::new("pifrom.bin", "game.z64").with_defaults(&defaults);
        assert!(config.is_headless());
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("n64rx.toml");

        let file = ConfigFile {
            controller: Some(ControllerType::WiiU),
            sram: Some(PathBuf::from("save.bin")),
            headless: Some(true),
            ..ConfigFile::default()
        };
        file.save(&path).unwrap();

        assert_eq!(ConfigFile::load(&path).unwrap(), file);
    }

    #[test]
    fn test_config_file_partial() {
        let parsed: ConfigFile = toml::from_str("controller = \"mayflash64\"\n").unwrap();
        assert_eq!(parsed.controller, Some(ControllerType::Mayflash64));
        assert_eq!(parsed.port, None);
        assert_eq!(parsed.headless, None);
    }

    #[test]
    fn test_config_file_rejects_bad_port() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "port = 70000\n").unwrap();

        assert!(matches!(
            ConfigFile::load(&path),
            Err(EmulatorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_missing_config_file() {
        assert!(matches!(
            ConfigFile::load(Path::new("/nonexistent/n64rx.toml")),
            Err(EmulatorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_controller_display_matches_cli_names() {
        assert_eq!(ControllerType::WiiU.to_string(), "wiiu");
        assert_eq!(ControllerType::Mayflash64.to_string(), "mayflash64");
    }
}
