//! Firmament sky
//!
//! Cube mapped [`SkyBox`] drawn around the viewer, with the pieces it is made of exposed for
//! custom assemblies: face loading, lazily built geometry and the cube map owner.

mod config;
mod error;
pub mod skybox;

pub use config::Config;
pub use error::{Error, FaceError};
pub use skybox::{
    Completion, CubeFaceLoader, CubeMapResource, EmitterState, Face, Fetch, FileFetcher,
    GeometryResources, LoadState, SkyBox, SkyBoxGeometryCache, SkyBoxSpec, CUBE_MAP_UNIFORM,
    FACES_COUNT,
};
