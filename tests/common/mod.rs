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

//! Shared fixtures for integration tests

#![allow(dead_code)]

use n64rx::core::config::{Config, ControllerType};
use n64rx::core::device::{Console, Device, MIN_CARTRIDGE_SIZE, PIF_ROM_SIZE};
use n64rx::core::event::EventManager;
use n64rx::core::lifecycle::Backend;
use n64rx::frontend::HeadlessDisplay;
use n64rx::Result;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::time::Duration;
use tempfile::TempDir;

/// Upper bound for any wait in a test
pub const TIMEOUT: Duration = Duration::from_secs(10);

/// ROM images on disk plus a config pointing at them
pub struct Fixture {
    pub dir: TempDir,
    pub config: Config,
}

/// Write a valid PIF ROM and a big-endian cartridge
pub fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let pif_rom = dir.path().join("pifrom.bin");
    let cartridge = dir.path().join("game.z64");

    std::fs::write(&pif_rom, vec![0u8; PIF_ROM_SIZE]).unwrap();

    let mut image = vec![0u8; MIN_CARTRIDGE_SIZE];
    image[..4].copy_from_slice(&[0x80, 0x37, 0x12, 0x40]);
    image[0x20..0x24].copy_from_slice(b"TEST");
    std::fs::write(&cartridge, image).unwrap();

    let mut config = Config::new(pif_rom, cartridge);
    config.headless = Some(true);

    Fixture { dir, config }
}

/// Points in construction a test can wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    /// The listening port was advertised
    Advertised(u16),
    /// The cartridge was loaded; construction is complete
    CartridgeLoaded,
}

/// Headless backend that reports milestones over a channel
pub struct ObservedBackend {
    tx: Sender<Milestone>,
}

impl ObservedBackend {
    pub fn new(tx: Sender<Milestone>) -> Self {
        Self { tx }
    }
}

impl Backend for ObservedBackend {
    type Display = HeadlessDisplay;
    type Device = ObservedConsole;

    fn create_display(&mut self) -> Result<HeadlessDisplay> {
        Ok(HeadlessDisplay::new())
    }

    fn create_device(&mut self, pif_rom: &Path) -> Result<ObservedConsole> {
        Ok(ObservedConsole {
            inner: Console::new(pif_rom)?,
            tx: self.tx.clone(),
        })
    }

    fn advertise_port(&mut self, manager: &EventManager) -> Result<u16> {
        let port = manager.resolved_port()?;
        let _ = self.tx.send(Milestone::Advertised(port));
        Ok(port)
    }
}

/// Console that reports when its cartridge is loaded
pub struct ObservedConsole {
    inner: Console,
    tx: Sender<Milestone>,
}

impl ObservedConsole {
    pub fn console(&self) -> &Console {
        &self.inner
    }
}

impl Device for ObservedConsole {
    fn set_controller_type(&mut self, controller: ControllerType) {
        self.inner.set_controller_type(controller);
    }

    fn set_eeprom_file(&mut self, path: &Path) {
        self.inner.set_eeprom_file(path);
    }

    fn set_sram_file(&mut self, path: &Path) {
        self.inner.set_sram_file(path);
    }

    fn load_cartridge(&mut self, path: &Path) -> Result<()> {
        self.inner.load_cartridge(path)?;
        let _ = self.tx.send(Milestone::CartridgeLoaded);
        Ok(())
    }

    fn cycle(&mut self) {
        self.inner.cycle();
    }
}
