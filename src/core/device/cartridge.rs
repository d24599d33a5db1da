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

//! Cartridge image loading
//!
//! Cartridge dumps circulate in three byte orders. The order is detected from
//! the first header word and the image is normalized to big-endian.

use crate::core::error::{EmulatorError, Result};
use std::path::Path;

/// Header plus boot code; anything shorter cannot boot
pub const MIN_CARTRIDGE_SIZE: usize = 0x1000;

/// Internal name field in the header
const TITLE_RANGE: std::ops::Range<usize> = 0x20..0x34;

/// Byte order of a cartridge dump, identified by its first word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Native big-endian (.z64)
    BigEndian,
    /// 16-bit byte-swapped (.v64)
    ByteSwapped,
    /// 32-bit little-endian (.n64)
    LittleEndian,
}

impl ByteOrder {
    /// Identify the byte order from the first four bytes of an image
    ///
    /// # Example
    ///
    /// ```
    /// use n64rx::core::device::ByteOrder;
    ///
    /// assert_eq!(ByteOrder::detect(&[0x80, 0x37, 0x12, 0x40]), Some(ByteOrder::BigEndian));
    /// assert_eq!(ByteOrder::detect(&[0x00, 0x00, 0x00, 0x00]), None);
    /// ```
    pub fn detect(magic: &[u8]) -> Option<Self> {
        match magic.get(..4)? {
            [0x80, 0x37, 0x12, 0x40] => Some(ByteOrder::BigEndian),
            [0x37, 0x80, 0x40, 0x12] => Some(ByteOrder::ByteSwapped),
            [0x40, 0x12, 0x37, 0x80] => Some(ByteOrder::LittleEndian),
            _ => None,
        }
    }

    /// Rewrite `data` in place as big-endian
    fn normalize(self, data: &mut [u8]) {
        match self {
            ByteOrder::BigEndian => {}
            ByteOrder::ByteSwapped => data.chunks_exact_mut(2).for_each(|half| half.swap(0, 1)),
            ByteOrder::LittleEndian => data.chunks_exact_mut(4).for_each(|word| word.reverse()),
        }
    }
}

/// Cartridge image in big-endian order
#[derive(Debug, Clone)]
pub struct Cartridge {
    data: Vec<u8>,
    byte_order: ByteOrder,
}

impl Cartridge {
    /// Load a cartridge image from disk
    ///
    /// # Errors
    ///
    /// Returns `EmulatorError::CartridgeLoad` if the file cannot be read, is
    /// shorter than [`MIN_CARTRIDGE_SIZE`], or has an unknown header.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| {
            EmulatorError::CartridgeLoad(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_bytes(data).map_err(|e| match e {
            EmulatorError::CartridgeLoad(reason) => {
                EmulatorError::CartridgeLoad(format!("'{}': {}", path.display(), reason))
            }
            other => other,
        })
    }

    /// Build a cartridge from a raw dump in any supported byte order
    ///
    /// # Errors
    ///
    /// Returns `EmulatorError::CartridgeLoad` if the image is too short or
    /// its byte order is not recognized.
    pub fn from_bytes(mut data: Vec<u8>) -> Result<Self> {
        if data.len() < MIN_CARTRIDGE_SIZE {
            return Err(EmulatorError::CartridgeLoad(format!(
                "image is {} bytes, need at least {}",
                data.len(),
                MIN_CARTRIDGE_SIZE
            )));
        }

        let byte_order = ByteOrder::detect(&data).ok_or_else(|| {
            EmulatorError::CartridgeLoad("unrecognized header magic".to_string())
        })?;
        byte_order.normalize(&mut data);

        Ok(Self { data, byte_order })
    }

    /// Image contents, big-endian
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Byte order the image was stored in
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Internal name from the header, trimmed
    pub fn title(&self) -> String {
        String::from_utf8_lossy(&self.data[TITLE_RANGE])
            .trim_end_matches(['\0', ' '])
            .to_string()
    }
}
