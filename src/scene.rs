//! # Scene State
//!
//! The CPU half of the frame loop. [`FrameState`] owns the camera, the transform matrices and the
//! frame counter, and turns one tick of pointer input into the constant buffer contents for that
//! tick. It never touches the GPU, so the whole update path is deterministic and testable without
//! a device.
//!
//! Each tick does exactly one of:
//!
//! - **Orbiting**: the camera consumed the input. A committed move replaces the view matrix; a
//!   rejected or motionless tick leaves everything as it was.
//! - **Idle**: the frame counter advances and, with auto-rotation on, the model matrix becomes a
//!   rotation about +Y proportional to the counter.

use nalgebra_glm as glm;

use crate::camera::{ArcballCamera, CameraState, CameraUpdate, PointerInput};
use crate::config::RendererConfig;
use crate::error::Result;
use crate::transform::TransformState;
use crate::uniform_buffer::ConstantBufferData;

/// Camera, matrices and frame counter for one session.
#[derive(Debug, Clone)]
pub struct FrameState {
    camera: ArcballCamera,
    transform: TransformState,
    frame_counter: u64,
    auto_rotate: bool,
    rotation_per_tick: f32,
    width: u32,
    height: u32,
}

impl FrameState {
    /// Initial state for a `width` x `height` surface. The projection is fixed from here on.
    pub fn new(config: &RendererConfig, width: u32, height: u32) -> Result<Self> {
        let camera = ArcballCamera::new(&config.camera)?;
        let aspect_ratio = width as f32 / height.max(1) as f32;
        let transform = TransformState::new(&config.projection, aspect_ratio, *camera.view());

        Ok(Self {
            camera,
            transform,
            frame_counter: 0,
            auto_rotate: config.auto_rotate,
            rotation_per_tick: config.rotation_per_tick,
            width,
            height,
        })
    }

    pub fn camera(&self) -> &ArcballCamera {
        &self.camera
    }

    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Advances one tick and returns the data to upload before this tick's draw.
    pub fn update(&mut self, input: &PointerInput) -> ConstantBufferData {
        let moved = self.camera.update(input, self.width, self.height);

        match self.camera.state() {
            CameraState::Orbiting => {
                if moved == CameraUpdate::Moved {
                    self.transform.view = *self.camera.view();
                }
            }
            CameraState::Idle => {
                self.frame_counter += 1;
                if self.auto_rotate {
                    self.transform.model = self.model_rotation();
                }
            }
        }

        self.transform.constant_buffer()
    }

    /// Rotation about +Y for the current counter, wrapped to one turn.
    fn model_rotation(&self) -> glm::Mat4 {
        let angle = (self.frame_counter as f64 * self.rotation_per_tick as f64)
            .rem_euclid(std::f64::consts::TAU) as f32;
        glm::rotation(angle, &glm::vec3(0.0, 1.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state(auto_rotate: bool) -> FrameState {
        let config = RendererConfig {
            auto_rotate,
            ..RendererConfig::default()
        };
        FrameState::new(&config, 800, 400).unwrap()
    }

    #[test]
    fn idle_ticks_advance_the_counter_and_spin_the_model() {
        let mut frame = state(true);
        let first = frame.update(&PointerInput::default());
        let second = frame.update(&PointerInput::default());
        assert_eq!(frame.frame_counter(), 2);
        assert_ne!(first, second);

        let expected = glm::rotation(0.02, &glm::vec3(0.0, 1.0, 0.0));
        assert!((frame.transform().model - expected).abs().max() < 1e-6);
    }

    #[test]
    fn without_auto_rotation_the_model_stays_identity() {
        let mut frame = state(false);
        let first = frame.update(&PointerInput::default());
        let second = frame.update(&PointerInput::default());
        assert_eq!(first, second);
        assert_eq!(frame.transform().model, glm::Mat4::identity());
    }

    #[test]
    fn orbiting_pauses_the_counter() {
        let mut frame = state(true);
        frame.update(&PointerInput::default());
        let held = PointerInput {
            x: 100.0,
            y: 100.0,
            button_down: true,
            ..PointerInput::default()
        };
        frame.update(&held);
        frame.update(&PointerInput { x: 120.0, ..held });
        assert_eq!(frame.frame_counter(), 1);
        assert_eq!(frame.transform().view, *frame.camera().view());
    }
}
