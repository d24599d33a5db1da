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

//! Device lifecycle
//!
//! [`Lifecycle`] owns every resource of a simulator process and drives it
//! through
//!
//! ```text
//! Uninitialized -> Constructing -> Running -> ShuttingDown -> Terminated
//!                        |                         ^
//!                        +----- (startup error) ---+
//! ```
//!
//! Construction is strictly sequential: networking, display, device, device
//! bindings, optional frontend rendezvous, cartridge. A failure at any stage
//! stops construction and leaves only what was built so far for teardown.
//!
//! The run loop checks the [`ShutdownSignal`] once per simulated step, so a
//! request from any trigger (interrupt signal, window close, another thread)
//! is observed within one step and teardown always runs with ordinary
//! destructors.

mod teardown;

pub use teardown::{Resources, TeardownReport, TeardownStep};

use crate::core::config::Config;
use crate::core::device::Device;
use crate::core::display::{Display, PollStatus};
use crate::core::error::{EmulatorError, Result};
use crate::core::event::{ClientHandle, EventManager, NetworkSubsystem};
use crate::core::shutdown::{ShutdownCheckpoint, ShutdownSignal, SignalBridge};
use std::path::Path;
use std::time::{Duration, Instant};

/// Simulated steps between two display event polls
pub const EVENT_POLL_INTERVAL: u64 = 1024;

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Nothing built yet
    Uninitialized,
    /// Resources are being built
    Constructing,
    /// The run loop is executing
    Running,
    /// The run loop has stopped or construction failed
    ShuttingDown,
    /// Every resource has been released
    Terminated,
}

/// Factories for the host's external collaborators
pub trait Backend {
    /// Presentation surface type
    type Display: Display;
    /// Simulation engine type
    type Device: Device;

    /// Create the display
    ///
    /// # Errors
    ///
    /// `EmulatorError::DisplayInit` or `EmulatorError::DisplayCreate`.
    fn create_display(&mut self) -> Result<Self::Display>;

    /// Create the device from a PIF ROM
    ///
    /// # Errors
    ///
    /// `EmulatorError::DeviceCreate`.
    fn create_device(&mut self, pif_rom: &Path) -> Result<Self::Device>;

    /// Tell the frontend which port to connect to
    ///
    /// Writes the port to stdout by default.
    fn advertise_port(&mut self, manager: &EventManager) -> Result<u16> {
        manager.advertise(&mut std::io::stdout().lock())
    }
}

/// Statistics of one run loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Simulated steps executed
    pub steps: u64,
    /// Wall-clock time spent in the loop
    pub elapsed: Duration,
}

/// Lifecycle context of one simulator process
///
/// # Example
///
/// ```no_run
/// use n64rx::core::config::Config;
/// use n64rx::core::lifecycle::Lifecycle;
/// use n64rx::frontend::HeadlessBackend;
///
/// let config = Config::new("pifrom.bin", "game.z64");
/// let mut lifecycle = Lifecycle::new(HeadlessBackend);
///
/// // Runs until SIGINT; teardown happens before `execute` returns
/// let summary = lifecycle.execute(&config)?;
/// println!("{} steps", summary.steps);
/// # Ok::<(), n64rx::EmulatorError>(())
/// ```
pub struct Lifecycle<B: Backend> {
    /// Display and device factories
    backend: B,
    /// Current state
    state: LifecycleState,
    /// Flag shared by every shutdown trigger
    shutdown: ShutdownSignal,
    /// OS signal registration, alive from construction until teardown
    signals: Option<SignalBridge>,
    /// Resource slots
    resources: Resources<B::Device, B::Display>,
    /// Whether the shutdown checkpoint has been handed out
    checkpoint_issued: bool,
}

impl<B: Backend> Lifecycle<B> {
    /// Create a lifecycle with its own shutdown signal
    pub fn new(backend: B) -> Self {
        Self::with_shutdown_signal(backend, ShutdownSignal::new())
    }

    /// Create a lifecycle that stops when `shutdown` is requested
    pub fn with_shutdown_signal(backend: B, shutdown: ShutdownSignal) -> Self {
        Self {
            backend,
            state: LifecycleState::Uninitialized,
            shutdown,
            signals: None,
            resources: Resources::new(),
            checkpoint_issued: false,
        }
    }

    /// Current state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Handle for requesting shutdown from elsewhere
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Request shutdown
    ///
    /// Safe to call at any time; only the first request has an effect.
    pub fn request_shutdown(&self) -> bool {
        self.shutdown.request()
    }

    /// The backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The device, once created
    pub fn device(&self) -> Option<&B::Device> {
        self.resources.device.as_ref()
    }

    /// The display, once created
    pub fn display(&self) -> Option<&B::Display> {
        self.resources.display.as_ref()
    }

    /// The attached frontend connection
    pub fn client(&self) -> Option<&ClientHandle> {
        self.resources.client.as_ref()
    }

    /// Build every resource `config` asks for
    ///
    /// If shutdown is requested while waiting for the frontend, construction
    /// stops early without an error and the run loop will exit immediately.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing stage. The lifecycle is then in
    /// [`LifecycleState::ShuttingDown`] holding only what was built.
    ///
    /// Returns `EmulatorError::InvalidArgument` without touching any resource
    /// if the lifecycle has already been constructed.
    pub fn construct(&mut self, config: &Config) -> Result<()> {
        if self.state != LifecycleState::Uninitialized {
            return Err(EmulatorError::InvalidArgument(format!(
                "Cannot construct a lifecycle in state {:?}",
                self.state
            )));
        }
        self.transition(LifecycleState::Constructing);

        let result = self.build(config);
        if let Err(e) = &result {
            log::error!("{}", e);
            self.transition(LifecycleState::ShuttingDown);
        }
        result
    }

    fn build(&mut self, config: &Config) -> Result<()> {
        self.resources.network = Some(NetworkSubsystem::startup()?);

        match SignalBridge::install(&self.shutdown) {
            Ok(bridge) => self.signals = Some(bridge),
            Err(e) => log::warn!("Interrupt signals will not stop the console: {}", e),
        }

        self.resources.display = Some(self.backend.create_display()?);

        let device = self
            .resources
            .device
            .insert(self.backend.create_device(&config.pif_rom)?);

        if let Some(controller) = config.controller {
            device.set_controller_type(controller);
        }
        if let Some(path) = &config.eeprom {
            device.set_eeprom_file(path);
        }
        if let Some(path) = &config.sram {
            device.set_sram_file(path);
        }

        if let Some(port) = config.port {
            if !self.rendezvous(port)? {
                return Ok(());
            }
        }

        if let Some(device) = self.resources.device.as_mut() {
            device.load_cartridge(&config.cartridge)?;
        }

        Ok(())
    }

    /// Bind, advertise, accept one frontend, seal
    ///
    /// Returns `false` if shutdown was requested before a client attached.
    fn rendezvous(&mut self, port: u16) -> Result<bool> {
        let manager = self.resources.listener.insert(EventManager::bind(port)?);
        let port = self.backend.advertise_port(manager)?;
        log::info!("Waiting for a frontend on port {}", port);

        let Some(client) = manager.accept(&self.shutdown)? else {
            return Ok(false);
        };

        self.resources.client = Some(client);
        if let Some(listener) = self.resources.listener.take() {
            listener.close();
        }
        Ok(true)
    }

    /// Hand out the shutdown checkpoint
    ///
    /// Succeeds once, right after a successful [`construct`](Self::construct).
    /// Returns `None` on any later call or after a failed construction.
    pub fn register_shutdown_checkpoint(&mut self) -> Option<ShutdownCheckpoint> {
        if self.checkpoint_issued || self.state != LifecycleState::Constructing {
            log::warn!(
                "Shutdown checkpoint unavailable in state {:?} (issued: {})",
                self.state,
                self.checkpoint_issued
            );
            return None;
        }

        self.checkpoint_issued = true;
        Some(ShutdownCheckpoint::new(self.shutdown.clone()))
    }

    /// Cycle the device until shutdown is requested
    ///
    /// The checkpoint is checked before every step, so a request made while
    /// a step executes stops the loop right after that step. The display is
    /// polled every [`EVENT_POLL_INTERVAL`] steps; a close request is routed
    /// into the shutdown signal.
    pub fn run(&mut self, checkpoint: ShutdownCheckpoint) -> RunSummary {
        self.transition(LifecycleState::Running);
        log::info!("== Booting the console ==");

        let started = Instant::now();
        let mut steps: u64 = 0;

        let Resources {
            device, display, ..
        } = &mut self.resources;

        if let Some(device) = device.as_mut() {
            while !checkpoint.is_triggered() {
                device.cycle();
                steps += 1;

                if steps % EVENT_POLL_INTERVAL == 0 {
                    let close = display
                        .as_mut()
                        .is_some_and(|display| display.poll_events() == PollStatus::CloseRequested);
                    if close {
                        log::info!("Display close requested");
                        self.shutdown.request();
                    }
                }
            }
        }

        let summary = RunSummary {
            steps,
            elapsed: started.elapsed(),
        };

        log::info!(
            "Console stopped after {} steps ({:.2}s)",
            summary.steps,
            summary.elapsed.as_secs_f64()
        );
        self.transition(LifecycleState::ShuttingDown);
        summary
    }

    /// Release every constructed resource
    ///
    /// Runs teardown once; later calls return an empty report.
    pub fn terminate(&mut self) -> TeardownReport {
        if self.state == LifecycleState::Terminated {
            return TeardownReport::default();
        }
        if self.state != LifecycleState::ShuttingDown {
            self.transition(LifecycleState::ShuttingDown);
        }

        log::info!("== Destroying the console ==");
        let report = self.resources.teardown();
        self.signals = None;

        self.transition(LifecycleState::Terminated);
        report
    }

    /// Construct, run until shutdown, and tear down
    ///
    /// Teardown runs exactly once whether or not construction succeeded.
    ///
    /// # Errors
    ///
    /// Returns the construction error, after teardown.
    pub fn execute(&mut self, config: &Config) -> Result<RunSummary> {
        let outcome = match self.construct(config) {
            Ok(()) => Ok(self
                .register_shutdown_checkpoint()
                .map(|checkpoint| self.run(checkpoint))
                .unwrap_or_default()),
            Err(e) => Err(e),
        };

        let report = self.terminate();
        log::debug!("Released {:?}", report.steps());

        outcome
    }

    fn transition(&mut self, next: LifecycleState) {
        log::debug!("Lifecycle: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

impl<B: Backend> Drop for Lifecycle<B> {
    fn drop(&mut self) {
        self.terminate();
    }
}
