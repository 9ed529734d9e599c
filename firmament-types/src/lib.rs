//! Firmament types crate provides handles and descriptions shared by the other crates.

#![warn(missing_docs)]

pub mod frame;
pub mod id;
pub mod vertex;

pub use frame::{FrameState, Passes, SceneMode};
pub use id::Id;
pub use vertex::{Position, TexUV};
