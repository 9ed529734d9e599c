//! Firmament
//!
//! Cube mapped sky for 3D scenes, split into focused crates re-exported here.

// Firmament sky crate
pub use firmament_sky as sky;

// Firmament GPU crate
pub use firmament_gpu as gpu;

// Firmament image crate
pub use firmament_image as image;

// Firmament log crate
pub use firmament_log as log;

// Firmament math crate
pub use firmament_math as math;

// Firmament mesh crate
pub use firmament_mesh as mesh;

// Firmament types crate
pub use firmament_types as types;

pub use log::Log;
pub use sky::SkyBox;
