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

//! Window display
//!
//! Opens a resizable window with winit and pumps its events from inside the
//! simulator's run loop instead of handing control to winit's own loop.

use crate::core::display::{Display, PollStatus, Viewport};
use crate::core::error::{EmulatorError, Result};
use std::time::Duration;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowId},
};

/// Window title
pub const WINDOW_TITLE: &str = "n64rx";

/// Initial window size
pub const WINDOW_SIZE: (u32, u32) = (640, 480);

/// Window state driven by winit callbacks
#[derive(Default)]
struct WindowState {
    /// The window, once `resumed` has run
    window: Option<Window>,
    /// Why window creation failed
    create_error: Option<String>,
    /// Set when the user asks to close the window
    close_requested: bool,
    /// Current picture placement
    viewport: Viewport,
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(WINDOW_SIZE.0, WINDOW_SIZE.1))
            .with_resizable(true);

        match event_loop.create_window(attributes) {
            Ok(window) => {
                let size = window.inner_size();
                self.viewport = Viewport::fit(size.width, size.height);
                self.window = Some(window);
                log::info!("Window opened ({}x{})", size.width, size.height);
            }
            Err(e) => self.create_error = Some(e.to_string()),
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                self.viewport = Viewport::fit(size.width, size.height);
                log::debug!("Window resized: {:?}", self.viewport);
            }
            _ => {}
        }
    }
}

/// Window-backed display
pub struct WindowDisplay {
    // Declared first so the window is dropped before its event loop
    state: WindowState,
    event_loop: EventLoop<()>,
}

impl WindowDisplay {
    /// Initialize the windowing system and open the window
    ///
    /// # Errors
    ///
    /// - `EmulatorError::DisplayInit` if the windowing system is unavailable
    /// - `EmulatorError::DisplayCreate` if the window cannot be opened
    pub fn open() -> Result<Self> {
        let mut event_loop =
            EventLoop::new().map_err(|e| EmulatorError::DisplayInit(e.to_string()))?;
        let mut state = WindowState::default();

        // The first pump delivers `resumed`, which creates the window
        event_loop.pump_app_events(Some(Duration::ZERO), &mut state);

        if let Some(reason) = state.create_error.take() {
            return Err(EmulatorError::DisplayCreate(reason));
        }
        if state.window.is_none() {
            return Err(EmulatorError::DisplayCreate(
                "windowing system did not resume".to_string(),
            ));
        }

        Ok(Self { state, event_loop })
    }

    /// Current picture placement
    pub fn viewport(&self) -> Viewport {
        self.state.viewport
    }
}

impl Display for WindowDisplay {
    fn poll_events(&mut self) -> PollStatus {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.state);

        if let PumpStatus::Exit(code) = status {
            log::debug!("Window event loop exited with code {}", code);
            self.state.close_requested = true;
        }

        if self.state.close_requested {
            PollStatus::CloseRequested
        } else {
            PollStatus::Continue
        }
    }
}
