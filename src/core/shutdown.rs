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

//! Shutdown signalling
//!
//! Both asynchronous triggers (an OS interrupt and a window close request)
//! resolve to the same [`ShutdownSignal`]. The signal is a single-slot flag:
//! the OS handler only stores `true` into it, and the run loop observes it
//! once per simulated step through a [`ShutdownCheckpoint`].

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::SigId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Signals that request a clean shutdown
const SHUTDOWN_SIGNALS: [i32; 2] = [SIGINT, SIGTERM];

/// Single-slot cancellation flag shared by all shutdown triggers
///
/// Cloning is cheap; every clone refers to the same flag. Only the first
/// request has any effect, later ones are no-ops.
///
/// # Example
///
/// ```
/// use n64rx::core::shutdown::ShutdownSignal;
///
/// let signal = ShutdownSignal::new();
/// let trigger = signal.clone();
///
/// assert!(!signal.is_requested());
/// assert!(trigger.request());
/// assert!(!trigger.request()); // already requested
/// assert!(signal.is_requested());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    flag: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// Create a signal in the "not requested" state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown
    ///
    /// # Returns
    ///
    /// `true` if this call was the first request, `false` if shutdown had
    /// already been requested
    pub fn request(&self) -> bool {
        !self.flag.swap(true, Ordering::AcqRel)
    }

    /// Check whether shutdown has been requested
    #[inline(always)]
    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Routes OS interrupt signals into a [`ShutdownSignal`]
///
/// While the bridge is alive, SIGINT and SIGTERM set the shutdown flag
/// instead of terminating the process. The handler does nothing else.
/// Dropping the bridge unregisters both actions.
#[derive(Debug)]
pub struct SignalBridge {
    ids: Vec<SigId>,
}

impl SignalBridge {
    /// Register the interrupt signals against `signal`
    ///
    /// # Errors
    ///
    /// Returns the OS error if any registration fails; registrations made
    /// before the failure are rolled back.
    pub fn install(signal: &ShutdownSignal) -> std::io::Result<Self> {
        let mut bridge = Self { ids: Vec::new() };

        for sig in SHUTDOWN_SIGNALS {
            let id = signal_hook::flag::register(sig, Arc::clone(&signal.flag))?;
            bridge.ids.push(id);
        }

        log::debug!("Signal bridge installed for {:?}", SHUTDOWN_SIGNALS);
        Ok(bridge)
    }
}

impl Drop for SignalBridge {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}

/// Proof that the run loop may start observing shutdown
///
/// Handed out exactly once per lifecycle, right after construction, and
/// consumed by the run loop.
#[derive(Debug)]
pub struct ShutdownCheckpoint {
    signal: ShutdownSignal,
}

impl ShutdownCheckpoint {
    pub(crate) fn new(signal: ShutdownSignal) -> Self {
        Self { signal }
    }

    /// Check whether the loop guarded by this checkpoint must stop
    #[inline(always)]
    pub fn is_triggered(&self) -> bool {
        self.signal.is_requested()
    }
}
