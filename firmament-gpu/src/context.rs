use firmament_types::Id;

use crate::{
    AttributeLocations, CubeMap, CubeMapDescriptor, Error, RenderState, RenderStateDescriptor,
    ShaderProgram, VertexArray, VertexArrayDescriptor,
};

/// Rendering context scene primitives create their GPU resources with
///
/// Handles are plain ids: the context owns the resources, primitives own the duty to give them
/// back.
pub trait Context {
    /// Uploads six faces into a new cube map texture
    fn create_cube_map(&mut self, descriptor: &CubeMapDescriptor) -> Result<Id<CubeMap>, Error>;

    /// Frees the cube map
    fn destroy_cube_map(&mut self, id: Id<CubeMap>);

    /// Uploads vertices and indices of the mesh
    fn create_vertex_array_from_mesh(
        &mut self,
        descriptor: &VertexArrayDescriptor,
    ) -> Result<Id<VertexArray>, Error>;

    /// Frees the vertex array
    fn destroy_vertex_array(&mut self, id: Id<VertexArray>);

    /// Returns a program compiled from the sources, sharing one compiled earlier if any
    fn shader_program(
        &mut self,
        vertex: &str,
        fragment: &str,
        attribute_locations: &AttributeLocations,
    ) -> Result<Id<ShaderProgram>, Error>;

    /// Gives back a program obtained with [`Context::shader_program`]
    fn release_shader_program(&mut self, id: Id<ShaderProgram>);

    /// Returns render state for the descriptor, equal descriptors give the same state
    fn create_render_state(
        &mut self,
        descriptor: &RenderStateDescriptor,
    ) -> Result<Id<RenderState>, Error>;
}
