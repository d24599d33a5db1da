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

//! Core host components
//!
//! - [`lifecycle`]: State machine, run loop, and teardown of all resources
//! - [`event`]: Frontend rendezvous over TCP
//! - [`shutdown`]: Shutdown signal shared by interrupts and window close
//! - [`device`]: Simulated device interface and default binding
//! - [`display`]: Presentation surface interface
//! - [`config`]: Immutable runtime configuration
//! - [`error`]: Error type and exit codes

pub mod config;
pub mod device;
pub mod display;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod shutdown;
