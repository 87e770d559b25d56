//! Model, view and projection matrices for the scene, and the rules that produce them.
//!
//! The projection is fixed for the session: it depends only on the field of view, the surface
//! aspect ratio and the clip planes. Surfaces narrower than [`REFERENCE_ASPECT`] widen the vertical
//! field of view so content framed for a 16:9 surface keeps its horizontal extent instead of being
//! cropped at the sides.

use nalgebra_glm as glm;

use crate::config::ProjectionConfig;
use crate::uniform_buffer::ConstantBufferData;

/// Aspect ratio the field of view is tuned for.
pub const REFERENCE_ASPECT: f32 = 16.0 / 9.0;

/// Vertical field of view (radians) after compensating for a surface narrower than `reference`.
///
/// `factor = min(1, aspect / reference)` and `fov' = 2 * atan(tan(fov / 2) / factor)`.
pub fn effective_vertical_fov(fov_y: f32, aspect_ratio: f32, reference: f32) -> f32 {
    let factor = (aspect_ratio / reference).min(1.0);
    if factor >= 1.0 {
        return fov_y;
    }
    2.0 * ((fov_y * 0.5).tan() / factor).atan()
}

/// Right-handed, zero-to-one depth perspective for a surface of `aspect_ratio`.
pub fn compute_projection(fov_y_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> glm::Mat4 {
    projection_for(
        &ProjectionConfig {
            fov_y_degrees,
            near,
            far,
            reference_aspect: REFERENCE_ASPECT,
        },
        aspect_ratio,
    )
}

pub fn projection_for(config: &ProjectionConfig, aspect_ratio: f32) -> glm::Mat4 {
    let fov_y = effective_vertical_fov(
        config.fov_y_degrees.to_radians(),
        aspect_ratio,
        config.reference_aspect,
    );
    glm::perspective_rh_zo(aspect_ratio, fov_y, config.near, config.far)
}

/// Composes the clip-space transform. Column-vector convention: the model applies first.
pub fn compose_frame(model: &glm::Mat4, view: &glm::Mat4, projection: &glm::Mat4) -> glm::Mat4 {
    projection * view * model
}

/// The three scene matrices. Only the frame loop writes them.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformState {
    pub model: glm::Mat4,
    pub view: glm::Mat4,
    pub projection: glm::Mat4,
}

impl TransformState {
    pub fn new(config: &ProjectionConfig, aspect_ratio: f32, view: glm::Mat4) -> Self {
        Self {
            model: glm::Mat4::identity(),
            view,
            projection: projection_for(config, aspect_ratio),
        }
    }

    pub fn mvp(&self) -> glm::Mat4 {
        compose_frame(&self.model, &self.view, &self.projection)
    }

    pub fn constant_buffer(&self) -> ConstantBufferData {
        ConstantBufferData::from_matrix(&self.mvp())
    }
}
