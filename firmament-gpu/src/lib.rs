//! Firmament GPU crate
//!
//! Holds the rendering context abstraction used by scene primitives, the draw command they emit
//! and a [wgpu](https://wgpu.rs) backed implementation of the context.

mod buffer;
mod command;
mod context;
mod recorder;
mod resources;
mod shader_cache;
mod texture;
mod wgpu_context;

pub use buffer::Buffer;
pub use command::{CommandLists, DrawCommand, LiveHandle, PrimitiveType, Uniform, UniformMap};
pub use context::Context;
pub use recorder::{Call, Recorder};
pub use resources::{
    AttributeLocations, BufferUsage, CubeMap, CubeMapDescriptor, CubeMapSource, CullFace,
    PixelDatatype, PixelFormat, RenderState, RenderStateDescriptor, ShaderProgram, VertexArray,
    VertexArrayDescriptor,
};
pub use shader_cache::{Release, ShaderCache};
pub use texture::{Texture, TextureView};
pub use wgpu_context::{
    map_vertex_format, texture_format, CubeMapTexture, Descriptor, Gpu, MeshBuffers,
    PipelineState, Program,
};

pub use wgpu as backend;

/// Error of the rendering context
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend rejected the creation of a resource
    Validation {
        /// Label of the resource
        label: String,
        /// Backend message
        message: String,
    },
    /// Combination of parameters the backend can not express
    Unsupported(&'static str),
    /// No suitable adapter was found
    NoAdapter,
    /// Adapter refused to give a device
    RequestDevice(String),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Validation { label, message } => {
                write!(f, "Could not create '{}': {}", label, message)
            }
            Error::Unsupported(what) => write!(f, "Not supported: {}", what),
            Error::NoAdapter => write!(f, "No suitable GPU adapters found on the system"),
            Error::RequestDevice(reason) => write!(f, "Unable to request GPU device: {}", reason),
        }
    }
}
