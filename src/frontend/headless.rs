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

//! Display that never opens a window

use crate::core::display::{Display, PollStatus};

/// Display stand-in for runs without a window
///
/// Never requests close; interrupt signals are the only way to stop.
#[derive(Debug, Default)]
pub struct HeadlessDisplay;

impl HeadlessDisplay {
    /// Create a headless display
    pub fn new() -> Self {
        log::info!("Running headless");
        Self
    }
}

impl Display for HeadlessDisplay {
    #[inline(always)]
    fn poll_events(&mut self) -> PollStatus {
        PollStatus::Continue
    }
}
