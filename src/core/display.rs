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

//! Presentation surface
//!
//! The host only creates, polls, and destroys the display. Rendering belongs
//! to the simulation engine.

/// Outcome of one display event poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    /// Nothing that concerns the lifecycle happened
    Continue,
    /// The user asked to close the display
    CloseRequested,
}

/// Presentation surface owned by the lifecycle
///
/// Released by dropping it.
pub trait Display {
    /// Process pending window-system events without blocking
    fn poll_events(&mut self) -> PollStatus;
}

/// Aspect ratio of the simulated video output
pub const ASPECT_RATIO: f32 = 4.0 / 3.0;

/// Placement of the 4:3 picture inside a surface
///
/// The picture is scaled to fill the surface along one axis; the other axis
/// gets an orthographic extent larger than 1 so the picture is letterboxed
/// or pillarboxed instead of stretched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    /// Horizontal orthographic half-extent
    pub extent_x: f32,
    /// Vertical orthographic half-extent
    pub extent_y: f32,
}

impl Viewport {
    /// Fit the picture into a `width` x `height` surface
    ///
    /// Zero dimensions are treated as 1.
    ///
    /// # Example
    ///
    /// ```
    /// use n64rx::core::display::Viewport;
    ///
    /// let viewport = Viewport::fit(640, 480);
    /// assert!((viewport.extent_x - 1.0).abs() < 1e-6);
    /// assert!((viewport.extent_y - 1.0).abs() < 1e-6);
    /// ```
    pub fn fit(width: u32, height: u32) -> Self {
        let height = height.max(1);
        let surface = width.max(1) as f32 / height as f32;

        let (extent_x, extent_y) = if surface > ASPECT_RATIO {
            (surface / ASPECT_RATIO, 1.0)
        } else {
            (1.0, ASPECT_RATIO / surface)
        };

        Self {
            width,
            height,
            extent_x,
            extent_y,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::fit(640, 480)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_native_aspect() {
        let viewport = Viewport::fit(320, 240);
        assert!(close(viewport.extent_x, 1.0));
        assert!(close(viewport.extent_y, 1.0));
    }

    #[test]
    fn test_wide_surface_pillarboxes() {
        let viewport = Viewport::fit(1600, 600);
        assert!(close(viewport.extent_x, 2.0));
        assert!(close(viewport.extent_y, 1.0));
    }

    #[test]
    fn test_tall_surface_letterboxes() {
        let viewport = Viewport::fit(400, 600);
        assert!(close(viewport.extent_x, 1.0));
        assert!(close(viewport.extent_y, 2.0));
    }

    #[test]
    fn test_zero_height() {
        let viewport = Viewport::fit(640, 0);
        assert_eq!(viewport.height, 1);
        assert!(viewport.extent_x > 1.0);
    }
}
