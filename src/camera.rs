//! # Arcball Camera
//!
//! An orbit camera: the eye swings around a fixed pivot (`at`) under pointer drag and dollies
//! toward or away from it under the wheel. `at` and `up` never change after construction; every
//! update produces a new `eye` and the matching right-handed view matrix.
//!
//! ## States
//!
//! ```text
//!            button down / wheel != 0
//!   Idle  ─────────────────────────────▶  Orbiting
//!         ◀─────────────────────────────
//!            button up and wheel == 0
//! ```
//!
//! ## Per-update algorithm (while orbiting)
//!
//! 1. `yaw = (last_x - x) * 2π / width`, `pitch = (last_y - y) * π / height`.
//! 2. Rotate `eye - at` about `up` by `yaw`.
//! 3. Rotate the result about the view's right axis (first row of the view matrix) by `pitch`.
//! 4. Dolly the candidate along `-(eye - at).normalize()` by `wheel * zoom_scale`.
//! 5. Rebuild the view matrix from the candidate eye.
//! 6. Commit only if `|dot(-view_dir, up)| < gimbal_threshold`; otherwise keep the old state.
//!
//! Step 6 keeps the view direction away from `up`, where `look_at` loses its basis.
//!
//! The pointer position is recorded on every tick, idle ones included, so `last_x`/`last_y` always
//! refer to the previous tick. A wheel tick that also moves the pointer therefore orbits and
//! dollies in one step.

use nalgebra_glm as glm;

use crate::config::CameraConfig;
use crate::error::{RendererError, Result};

/// One tick's worth of pointer state as reported by the window host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerInput {
    /// Cursor position in surface pixels.
    pub x: f32,
    pub y: f32,
    /// Wheel travel accumulated since the previous tick; positive rolls away from the user.
    pub wheel_delta: f32,
    pub button_down: bool,
}

/// Whether the camera is consuming pointer input this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraState {
    #[default]
    Idle,
    Orbiting,
}

/// Result of feeding one tick of input to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraUpdate {
    /// Idle, or orbiting with no movement this tick.
    Unchanged,
    /// A new eye position and view matrix were committed.
    Moved,
    /// The candidate would have looked along `up`; state kept as it was.
    Rejected,
}

/// Orbit camera around a fixed pivot. Only `eye` and the derived view matrix ever change.
#[derive(Debug, Clone)]
pub struct ArcballCamera {
    eye: glm::Vec3,
    at: glm::Vec3,
    up: glm::Vec3,
    view: glm::Mat4,
    state: CameraState,
    last_pointer: Option<(f32, f32)>,
    gimbal_threshold: f32,
    zoom_scale: f32,
}

impl ArcballCamera {
    /// Builds a camera from its configuration.
    ///
    /// # Errors
    ///
    /// [`RendererError::DegenerateCamera`] if `eye == at`, `up` is zero, or the initial view
    /// already violates the gimbal threshold.
    pub fn new(config: &CameraConfig) -> Result<Self> {
        let eye = glm::Vec3::from(config.eye);
        let at = glm::Vec3::from(config.at);
        let up = glm::Vec3::from(config.up);

        if glm::distance(&eye, &at) <= f32::EPSILON || glm::length(&up) <= f32::EPSILON {
            return Err(RendererError::DegenerateCamera);
        }
        let up = glm::normalize(&up);
        let view = glm::look_at_rh(&eye, &at, &up);
        if !within_gimbal_limit(&view, &up, config.gimbal_threshold) {
            return Err(RendererError::DegenerateCamera);
        }

        Ok(Self {
            eye,
            at,
            up,
            view,
            state: CameraState::Idle,
            last_pointer: None,
            gimbal_threshold: config.gimbal_threshold,
            zoom_scale: config.zoom_scale,
        })
    }

    pub fn eye(&self) -> glm::Vec3 {
        self.eye
    }

    /// The orbit pivot.
    pub fn at(&self) -> glm::Vec3 {
        self.at
    }

    pub fn up(&self) -> glm::Vec3 {
        self.up
    }

    pub fn view(&self) -> &glm::Mat4 {
        &self.view
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Cosine between the view direction (reversed) and `up` for the committed view.
    pub fn up_alignment(&self) -> f32 {
        view_up_cosine(&self.view, &self.up)
    }

    /// Applies one tick of pointer input for a viewport of `width` x `height` pixels.
    pub fn update(&mut self, input: &PointerInput, width: u32, height: u32) -> CameraUpdate {
        let (last_x, last_y) = self.last_pointer.unwrap_or((input.x, input.y));
        self.last_pointer = Some((input.x, input.y));

        self.state = if input.button_down || input.wheel_delta != 0.0 {
            CameraState::Orbiting
        } else {
            CameraState::Idle
        };
        if self.state == CameraState::Idle {
            return CameraUpdate::Unchanged;
        }

        let (dx, dy) = (last_x - input.x, last_y - input.y);
        if dx == 0.0 && dy == 0.0 && input.wheel_delta == 0.0 {
            return CameraUpdate::Unchanged;
        }

        let yaw = dx * (std::f32::consts::TAU / width.max(1) as f32);
        let pitch = dy * (std::f32::consts::PI / height.max(1) as f32);

        let offset = glm::rotate_vec3(&(self.eye - self.at), yaw, &self.up);
        let offset = glm::rotate_vec3(&offset, pitch, &self.right());
        let dolly = input.wheel_delta * self.zoom_scale;
        if dolly >= glm::length(&offset) {
            log::debug!("Rejected camera update: zoom would reach the pivot");
            return CameraUpdate::Rejected;
        }
        let candidate_eye = self.at + offset - glm::normalize(&offset) * dolly;

        let candidate_view = glm::look_at_rh(&candidate_eye, &self.at, &self.up);
        if !within_gimbal_limit(&candidate_view, &self.up, self.gimbal_threshold) {
            log::debug!("Rejected camera update: view direction too close to up");
            return CameraUpdate::Rejected;
        }

        self.eye = candidate_eye;
        self.view = candidate_view;
        CameraUpdate::Moved
    }

    /// Camera right axis in world space: the first row of the view matrix.
    fn right(&self) -> glm::Vec3 {
        glm::vec3(self.view[(0, 0)], self.view[(0, 1)], self.view[(0, 2)])
    }
}

/// `dot(-view_dir, up)`. The third row of a right-handed view matrix is `-forward`.
fn view_up_cosine(view: &glm::Mat4, up: &glm::Vec3) -> f32 {
    let back = glm::vec3(view[(2, 0)], view[(2, 1)], view[(2, 2)]);
    glm::dot(&glm::normalize(&back), up)
}

fn within_gimbal_limit(view: &glm::Mat4, up: &glm::Vec3, threshold: f32) -> bool {
    let cos = view_up_cosine(view, up);
    cos.is_finite() && cos.abs() < threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> ArcballCamera {
        ArcballCamera::new(&CameraConfig::default()).unwrap()
    }

    fn pointer(x: f32, y: f32, button_down: bool) -> PointerInput {
        PointerInput {
            x,
            y,
            wheel_delta: 0.0,
            button_down,
        }
    }

    #[test]
    fn starts_idle_at_configured_eye() {
        let cam = camera();
        assert_eq!(cam.state(), CameraState::Idle);
        assert_eq!(cam.eye(), glm::vec3(0.0, 0.7, 1.5));
        assert!(cam.up_alignment().abs() < 0.99);
    }

    #[test]
    fn button_and_wheel_drive_the_state_machine() {
        let mut cam = camera();
        cam.update(&pointer(10.0, 10.0, true), 800, 400);
        assert_eq!(cam.state(), CameraState::Orbiting);

        cam.update(&pointer(10.0, 10.0, false), 800, 400);
        assert_eq!(cam.state(), CameraState::Idle);

        let wheel = PointerInput {
            wheel_delta: 120.0,
            ..pointer(10.0, 10.0, false)
        };
        assert_eq!(cam.update(&wheel, 800, 400), CameraUpdate::Moved);
        assert_eq!(cam.state(), CameraState::Orbiting);

        cam.update(&pointer(10.0, 10.0, false), 800, 400);
        assert_eq!(cam.state(), CameraState::Idle);
    }

    #[test]
    fn idle_pointer_motion_does_not_move_the_eye() {
        let mut cam = camera();
        let before = cam.eye();
        assert_eq!(cam.update(&pointer(0.0, 0.0, false), 800, 400), CameraUpdate::Unchanged);
        assert_eq!(cam.update(&pointer(300.0, 100.0, false), 800, 400), CameraUpdate::Unchanged);
        assert_eq!(cam.eye(), before);
    }

    #[test]
    fn pressing_the_button_does_not_jump() {
        let mut cam = camera();
        cam.update(&pointer(400.0, 200.0, false), 800, 400);
        let before = cam.eye();
        assert_eq!(cam.update(&pointer(400.0, 200.0, true), 800, 400), CameraUpdate::Unchanged);
        assert_eq!(cam.eye(), before);
    }

    #[test]
    fn wheel_dollies_toward_the_pivot() {
        let mut cam = camera();
        let before = glm::distance(&cam.eye(), &cam.at());
        let wheel = PointerInput {
            wheel_delta: 120.0,
            ..PointerInput::default()
        };
        cam.update(&wheel, 800, 400);
        let after = glm::distance(&cam.eye(), &cam.at());
        assert!((before - after - 0.12).abs() < 1e-5);
    }

    #[test]
    fn vertical_drag_stops_short_of_the_pole() {
        let mut cam = camera();
        cam.update(&pointer(400.0, 400.0, true), 800, 400);
        let mut rejected = false;
        for step in 1..=200 {
            let y = 400.0 + step as f32 * 5.0;
            if cam.update(&pointer(400.0, y, true), 800, 400) == CameraUpdate::Rejected {
                rejected = true;
            }
            assert!(cam.up_alignment().abs() < 0.99);
        }
        assert!(rejected);
    }

    #[test]
    fn pivot_and_up_never_change() {
        let mut cam = camera();
        for step in 0..50 {
            let input = PointerInput {
                x: step as f32 * 7.0,
                y: step as f32 * -3.0,
                wheel_delta: if step % 5 == 0 { -120.0 } else { 0.0 },
                button_down: true,
            };
            cam.update(&input, 800, 400);
        }
        assert_eq!(cam.at(), glm::vec3(0.0, -0.1, 0.0));
        assert_eq!(cam.up(), glm::vec3(0.0, 1.0, 0.0));
    }

    #[test]
    fn wheel_tick_with_pointer_motion_also_orbits() {
        let mut cam = camera();
        cam.update(&pointer(400.0, 200.0, false), 800, 400);
        let before = cam.eye() - cam.at();

        let input = PointerInput {
            wheel_delta: 120.0,
            ..pointer(500.0, 200.0, false)
        };
        assert_eq!(cam.update(&input, 800, 400), CameraUpdate::Moved);
        let after = cam.eye() - cam.at();

        let azimuth = |v: &glm::Vec3| v.x.atan2(v.z);
        let expected = 100.0 * std::f32::consts::TAU / 800.0;
        assert!(((azimuth(&after) - azimuth(&before)).abs() - expected).abs() < 1e-5);
        assert!((glm::length(&before) - glm::length(&after) - 0.12).abs() < 1e-5);
    }

    #[test]
    fn rejected_tick_keeps_eye_and_view() {
        let mut cam = camera();
        cam.update(&pointer(400.0, 400.0, true), 800, 400);
        for step in 1..=200 {
            let eye = cam.eye();
            let view = *cam.view();
            let y = 400.0 + step as f32 * 5.0;
            if cam.update(&pointer(400.0, y, true), 800, 400) == CameraUpdate::Rejected {
                assert_eq!(cam.eye(), eye);
                assert_eq!(*cam.view(), view);
                return;
            }
        }
        panic!("dragging toward the pole was never rejected");
    }

    #[test]
    fn dolly_through_the_pivot_is_rejected() {
        let mut cam = camera();
        let eye = cam.eye();
        let view = *cam.view();
        let input = PointerInput {
            wheel_delta: 5000.0,
            ..PointerInput::default()
        };
        assert_eq!(cam.update(&input, 800, 400), CameraUpdate::Rejected);
        assert_eq!(cam.eye(), eye);
        assert_eq!(*cam.view(), view);
    }

    #[test]
    fn rejects_up_parallel_to_view() {
        let config = CameraConfig {
            eye: [0.0, 5.0, 0.0],
            at: [0.0, 0.0, 0.0],
            ..CameraConfig::default()
        };
        assert!(matches!(
            ArcballCamera::new(&config),
            Err(RendererError::DegenerateCamera)
        ));
    }
}
