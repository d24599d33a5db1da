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

//! Resource teardown
//!
//! Every resource the host builds lives in an optional slot of
//! [`Resources`]. Construction fills slots one by one and may stop anywhere;
//! teardown releases whatever is present, in a fixed order, exactly once.

use crate::core::event::{ClientHandle, EventManager, NetworkSubsystem};

/// One release step, in the order teardown performs them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownStep {
    /// Simulated device destroyed
    Device,
    /// Display destroyed
    Display,
    /// Frontend connection shut down and released
    Client,
    /// Listening socket released
    Listener,
    /// Networking subsystem released
    Network,
}

/// Steps a teardown actually performed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    steps: Vec<TeardownStep>,
}

impl TeardownReport {
    /// Performed steps, in order
    pub fn steps(&self) -> &[TeardownStep] {
        &self.steps
    }

    /// `true` if nothing needed releasing
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Resource slots owned by the lifecycle
///
/// `D` is the device type and `W` the display type.
#[derive(Debug)]
pub struct Resources<D, W> {
    /// Networking subsystem guard
    pub network: Option<NetworkSubsystem>,
    /// Presentation surface
    pub display: Option<W>,
    /// Simulated device
    pub device: Option<D>,
    /// Listening socket, only between bind and a completed accept
    pub listener: Option<EventManager>,
    /// The single frontend connection
    pub client: Option<ClientHandle>,
}

impl<D, W> Resources<D, W> {
    /// Create an empty slot set
    pub fn new() -> Self {
        Self {
            network: None,
            display: None,
            device: None,
            listener: None,
            client: None,
        }
    }

    /// `true` if no slot holds a resource
    pub fn is_empty(&self) -> bool {
        self.network.is_none()
            && self.display.is_none()
            && self.device.is_none()
            && self.listener.is_none()
            && self.client.is_none()
    }

    /// Release every populated slot
    ///
    /// Order: device, display, client connection, listening socket,
    /// networking subsystem. Empty slots are skipped. Slots are emptied as
    /// they are released, so calling this again does nothing.
    ///
    /// # Example
    ///
    /// ```
    /// use n64rx::core::lifecycle::Resources;
    ///
    /// let mut resources: Resources<(), ()> = Resources::new();
    /// assert!(resources.teardown().is_empty());
    /// ```
    pub fn teardown(&mut self) -> TeardownReport {
        let mut report = TeardownReport::default();

        if let Some(device) = self.device.take() {
            drop(device);
            log::debug!("Device destroyed");
            report.steps.push(TeardownStep::Device);
        }

        if let Some(display) = self.display.take() {
            drop(display);
            log::debug!("Display destroyed");
            report.steps.push(TeardownStep::Display);
        }

        if let Some(client) = self.client.take() {
            client.close();
            report.steps.push(TeardownStep::Client);
        }

        if let Some(listener) = self.listener.take() {
            listener.close();
            report.steps.push(TeardownStep::Listener);
        }

        if let Some(network) = self.network.take() {
            drop(network);
            report.steps.push(TeardownStep::Network);
        }

        report
    }
}

impl<D, W> Default for Resources<D, W> {
    fn default() -> Self {
        Self::new()
    }
}
