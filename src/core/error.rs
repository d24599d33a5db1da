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

//! Error types for the simulator host
//!
//! Every startup stage fails with its own [`EmulatorError`] variant, and each
//! variant maps to a fixed process exit code.

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Errors that abort host startup
///
/// All of these are fatal: construction stops at the failing stage, whatever
/// was built so far is torn down, and the process exits with
/// [`EmulatorError::exit_code`].
#[derive(Error, Debug)]
pub enum EmulatorError {
    /// The process-wide networking subsystem could not be started
    #[error("Failed to initialize networking: {0}")]
    NetworkInit(String),

    /// The windowing system could not be initialized
    #[error("Failed to initialize display subsystem: {0}")]
    DisplayInit(String),

    /// The window could not be opened
    #[error("Failed to open a window: {0}")]
    DisplayCreate(String),

    /// The simulated device could not be created (bad or missing PIF ROM)
    #[error("Failed to create a device: {0}")]
    DeviceCreate(String),

    /// A command-line or config-file value was malformed or out of range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No interface candidate could be bound and put into listening mode
    #[error("Failed to create a socket: {0}")]
    BindFailure(String),

    /// The cartridge image could not be loaded
    #[error("Failed to load the ROM: {0}")]
    CartridgeLoad(String),
}

impl EmulatorError {
    /// Process exit code for this failure stage
    ///
    /// # Example
    ///
    /// ```
    /// use n64rx::EmulatorError;
    ///
    /// let err = EmulatorError::BindFailure("address in use".to_string());
    /// assert_eq!(err.exit_code(), 4);
    /// ```
    pub fn exit_code(&self) -> u8 {
        match self {
            EmulatorError::NetworkInit(_) => 1,
            EmulatorError::DisplayInit(_) | EmulatorError::DisplayCreate(_) => 2,
            EmulatorError::DeviceCreate(_) => 3,
            EmulatorError::BindFailure(_) => 4,
            EmulatorError::CartridgeLoad(_) => 5,
            EmulatorError::InvalidArgument(_) => 255,
        }
    }
}
