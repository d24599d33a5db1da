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

//! Frontend module
//!
//! Everything the host needs from the outside world: command-line parsing
//! and the stock display backends.
//!
//! # Architecture
//!
//! - [`cli`]: Argument parsing into a [`Config`](crate::core::config::Config)
//! - [`HeadlessBackend`]: Console with no window
//! - [`DesktopBackend`]: Console with a winit window (feature `window`)
//!
//! # Example
//!
//! ```no_run
//! use n64rx::core::lifecycle::Lifecycle;
//! use n64rx::frontend::cli::{self, Invocation};
//! use n64rx::frontend::HeadlessBackend;
//!
//! if let Invocation::Run(config) = cli::parse_args(std::env::args(), None)? {
//!     Lifecycle::new(HeadlessBackend).execute(&config)?;
//! }
//! # Ok::<(), n64rx::EmulatorError>(())
//! ```

mod backend;
pub mod cli;
pub mod headless;
#[cfg(feature = "window")]
pub mod window;

#[cfg(feature = "window")]
pub use backend::DesktopBackend;
pub use backend::HeadlessBackend;
pub use headless::HeadlessDisplay;
#[cfg(feature = "window")]
pub use window::WindowDisplay;
