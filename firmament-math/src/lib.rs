//! Firmament wrapper around cgmath
//!
//! Besides type aliases the crate holds the few geometric helpers the sky needs: bounding
//! spheres and the time dependent orientation of the fixed frame.

#![warn(missing_docs)]

mod bounding;
pub mod transforms;

pub use bounding::BoundingSphere;
pub use cgmath::InnerSpace;
pub use cgmath::Rad;
pub use cgmath::SquareMatrix;
pub use cgmath::Zero;
pub use transforms::{TemeToPseudoFixed, TimeTransform};

/// 3x3 Matrix of f32
pub type Mat3 = cgmath::Matrix3<f32>;
/// 4x4 Matrix of f32
pub type Mat4 = cgmath::Matrix4<f32>;
/// 3 dimentional vector of f32
pub type Vec3 = cgmath::Vector3<f32>;

/// Builds a model matrix from a rotation and a translation
pub fn from_rotation_translation(rotation: Mat3, translation: Vec3) -> Mat4 {
    Mat4::from_translation(translation) * Mat4::from(rotation)
}
