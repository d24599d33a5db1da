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

//! n64rx: process host for a Nintendo 64 simulator
//!
//! This crate brings a simulator process up and down: it opens a display,
//! creates the device, optionally lets one external frontend attach over
//! TCP, runs the cycle loop until asked to stop, and releases everything it
//! built, in order, whichever startup stage failed.
//!
//! # Architecture
//!
//! - [`core`]: Lifecycle, rendezvous, shutdown signalling, collaborator traits
//! - [`frontend`]: Command-line parsing and stock display backends
//!
//! # Example
//!
//! ```no_run
//! use n64rx::core::config::Config;
//! use n64rx::core::lifecycle::Lifecycle;
//! use n64rx::frontend::HeadlessBackend;
//!
//! let mut config = Config::new("pifrom.bin", "game.z64");
//! config.port = Some(0); // print an ephemeral port and wait for a frontend
//!
//! let mut lifecycle = Lifecycle::new(HeadlessBackend);
//! lifecycle.execute(&config)?;
//! # Ok::<(), n64rx::core::error::EmulatorError>(())
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`core::error::Result<T>`] which is an alias for
//! `Result<T, EmulatorError>`. Each error variant maps to a process exit code
//! through [`EmulatorError::exit_code`].

pub mod core;
pub mod frontend;

// Re-export commonly used types
pub use core::error::{EmulatorError, Result};
