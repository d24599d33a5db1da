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

//! Simulated device
//!
//! The host never looks inside the simulated hardware. It only needs to
//! configure a device, load a cartridge into it, and advance it one step at
//! a time; the [`Device`] trait captures exactly that.

mod cartridge;

pub use cartridge::{ByteOrder, Cartridge, MIN_CARTRIDGE_SIZE};

use crate::core::config::ControllerType;
use crate::core::error::{EmulatorError, Result};
use std::path::{Path, PathBuf};

/// Size of the PIF boot ROM image in bytes
pub const PIF_ROM_SIZE: usize = 0x7C0;

/// Simulation engine as seen by the host
///
/// A device is created from a PIF ROM, configured, given a cartridge, then
/// cycled until shutdown. It is released by dropping it.
pub trait Device {
    /// Select the input-device emulation profile
    fn set_controller_type(&mut self, controller: ControllerType);

    /// Bind the EEPROM backing file
    fn set_eeprom_file(&mut self, path: &Path);

    /// Bind the SRAM backing file
    fn set_sram_file(&mut self, path: &Path);

    /// Load the cartridge image
    ///
    /// # Errors
    ///
    /// Returns `EmulatorError::CartridgeLoad` if the image cannot be used.
    fn load_cartridge(&mut self, path: &Path) -> Result<()>;

    /// Advance the simulated hardware by one step
    fn cycle(&mut self);
}

/// Default device binding
///
/// Holds the boot ROM, the cartridge image and the persistence bindings, and
/// counts executed cycles.
///
/// # Example
///
/// ```no_run
/// use n64rx::core::device::{Console, Device};
/// use std::path::Path;
///
/// let mut console = Console::new(Path::new("pifrom.bin"))?;
/// console.load_cartridge(Path::new("game.z64"))?;
/// console.cycle();
/// assert_eq!(console.cycles(), 1);
/// # Ok::<(), n64rx::EmulatorError>(())
/// ```
#[derive(Debug)]
pub struct Console {
    /// PIF boot ROM contents
    pif_rom: Vec<u8>,
    /// Loaded cartridge, if any
    cartridge: Option<Cartridge>,
    /// Input profile
    controller: ControllerType,
    /// EEPROM backing file
    eeprom_file: Option<PathBuf>,
    /// SRAM backing file
    sram_file: Option<PathBuf>,
    /// Total cycles executed
    cycles: u64,
}

impl Console {
    /// Create a device from a PIF ROM image
    ///
    /// # Arguments
    ///
    /// * `pif_rom` - Path to the PIF boot ROM
    ///
    /// # Errors
    ///
    /// Returns `EmulatorError::DeviceCreate` if the file cannot be read or is
    /// not exactly [`PIF_ROM_SIZE`] bytes.
    pub fn new(pif_rom: &Path) -> Result<Self> {
        let data = std::fs::read(pif_rom).map_err(|e| {
            EmulatorError::DeviceCreate(format!(
                "Cannot read PIF ROM '{}': {}",
                pif_rom.display(),
                e
            ))
        })?;

        if data.len() != PIF_ROM_SIZE {
            return Err(EmulatorError::DeviceCreate(format!(
                "PIF ROM '{}' is {} bytes, expected {}",
                pif_rom.display(),
                data.len(),
                PIF_ROM_SIZE
            )));
        }

        log::info!("Loaded PIF ROM: {}", pif_rom.display());

        Ok(Self {
            pif_rom: data,
            cartridge: None,
            controller: ControllerType::Keyboard,
            eeprom_file: None,
            sram_file: None,
            cycles: 0,
        })
    }

    /// PIF boot ROM contents
    pub fn pif_rom(&self) -> &[u8] {
        &self.pif_rom
    }

    /// Loaded cartridge
    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    /// Selected input profile
    pub fn controller_type(&self) -> ControllerType {
        self.controller
    }

    /// Bound EEPROM backing file
    pub fn eeprom_file(&self) -> Option<&Path> {
        self.eeprom_file.as_deref()
    }

    /// Bound SRAM backing file
    pub fn sram_file(&self) -> Option<&Path> {
        self.sram_file.as_deref()
    }

    /// Total cycles executed
    #[inline(always)]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}

impl Device for Console {
    fn set_controller_type(&mut self, controller: ControllerType) {
        log::debug!("Controller type: {}", controller);
        self.controller = controller;
    }

    fn set_eeprom_file(&mut self, path: &Path) {
        log::debug!("EEPROM backing file: {}", path.display());
        self.eeprom_file = Some(path.to_path_buf());
    }

    fn set_sram_file(&mut self, path: &Path) {
        log::debug!("SRAM backing file: {}", path.display());
        self.sram_file = Some(path.to_path_buf());
    }

    fn load_cartridge(&mut self, path: &Path) -> Result<()> {
        let cartridge = Cartridge::load(path)?;
        log::info!(
            "Loaded cartridge '{}' ({} KB, {:?})",
            cartridge.title(),
            cartridge.data().len() / 1024,
            cartridge.byte_order()
        );
        self.cartridge = Some(cartridge);
        Ok(())
    }

    #[inline(always)]
    fn cycle(&mut self) {
        self.cycles = self.cycles.wrapping_add(1);
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        log::debug!("Console destroyed after {} cycles", self.cycles);
    }
}
