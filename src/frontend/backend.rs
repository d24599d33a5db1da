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

//! Stock backends
//!
//! Both pair the default [`Console`] device with a display: a real window
//! for [`DesktopBackend`], nothing for [`HeadlessBackend`].

use super::headless::HeadlessDisplay;
#[cfg(feature = "window")]
use super::window::WindowDisplay;
use crate::core::device::Console;
use crate::core::error::Result;
use crate::core::lifecycle::Backend;
use std::path::Path;

/// Console without a window
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessBackend;

impl Backend for HeadlessBackend {
    type Display = HeadlessDisplay;
    type Device = Console;

    fn create_display(&mut self) -> Result<HeadlessDisplay> {
        Ok(HeadlessDisplay::new())
    }

    fn create_device(&mut self, pif_rom: &Path) -> Result<Console> {
        Console::new(pif_rom)
    }
}

/// Console with a window
#[cfg(feature = "window")]
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopBackend;

#[cfg(feature = "window")]
impl Backend for DesktopBackend {
    type Display = WindowDisplay;
    type Device = Console;

    fn create_display(&mut self) -> Result<WindowDisplay> {
        WindowDisplay::open()
    }

    fn create_device(&mut self, pif_rom: &Path) -> Result<Console> {
        Console::new(pif_rom)
    }
}
