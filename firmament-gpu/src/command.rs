use std::cell::Cell;
use std::rc::Rc;

use firmament_math::{BoundingSphere, Mat4, SquareMatrix};
use firmament_types::Id;

use crate::{CubeMap, RenderState, ShaderProgram, VertexArray};

/// Shared slot of a resource id that may be replaced or cleared after it was handed out
///
/// Clones observe the same slot, so a draw command built before its texture exists resolves the
/// texture at draw time.
pub struct LiveHandle<T> {
    slot: Rc<Cell<Option<Id<T>>>>,
}

impl<T> LiveHandle<T> {
    /// Constructs an empty handle
    pub fn new() -> Self {
        Self {
            slot: Rc::new(Cell::new(None)),
        }
    }

    /// Current id, if any
    pub fn get(&self) -> Option<Id<T>> {
        self.slot.get()
    }

    /// Replaces the current id
    pub fn set(&self, id: Option<Id<T>>) {
        self.slot.set(id);
    }

    /// Clears the slot returning the previous id
    pub fn take(&self) -> Option<Id<T>> {
        self.slot.take()
    }

    pub fn is_set(&self) -> bool {
        self.get().is_some()
    }
}

impl<T> Clone for LiveHandle<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T> Default for LiveHandle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for LiveHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LiveHandle").field(&self.get()).finish()
    }
}

/// Value bound to a shader uniform
#[derive(Debug, Clone)]
pub enum Uniform {
    CubeMap(LiveHandle<CubeMap>),
    Mat4(Mat4),
}

/// Named uniforms of a draw command
#[derive(Debug, Default, Clone)]
pub struct UniformMap {
    entries: Vec<(&'static str, Uniform)>,
}

impl UniformMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the value, replacing one bound under the same name
    #[must_use]
    pub fn with(mut self, name: &'static str, value: Uniform) -> Self {
        self.entries.retain(|(n, _)| *n != name);
        self.entries.push((name, value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Uniform> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| value)
    }

    /// Resolves a cube map uniform to the id it holds right now
    pub fn cube_map(&self, name: &str) -> Option<Id<CubeMap>> {
        match self.get(name) {
            Some(Uniform::CubeMap(handle)) => handle.get(),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Uniform)> {
        self.entries.iter().map(|(n, v)| (*n, v))
    }
}

/// Primitive topology
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum PrimitiveType {
    Points,
    Lines,
    Triangles,
}

/// Recipe of a single draw call
#[derive(Debug, Clone)]
pub struct DrawCommand {
    pub primitive_type: PrimitiveType,
    /// Volume used for culling
    pub bounding_volume: BoundingSphere,
    pub vertex_array: Option<Id<VertexArray>>,
    pub shader_program: Option<Id<ShaderProgram>>,
    pub render_state: Option<Id<RenderState>>,
    /// Object to world transform
    pub model_matrix: Mat4,
    pub uniform_map: UniformMap,
}

impl Default for DrawCommand {
    fn default() -> Self {
        Self {
            primitive_type: PrimitiveType::Triangles,
            bounding_volume: BoundingSphere::default(),
            vertex_array: None,
            shader_program: None,
            render_state: None,
            model_matrix: Mat4::identity(),
            uniform_map: UniformMap::default(),
        }
    }
}

impl DrawCommand {
    /// Checks if every resource the command draws with is bound
    pub fn is_complete(&self) -> bool {
        self.vertex_array.is_some() && self.shader_program.is_some() && self.render_state.is_some()
    }
}

/// Draw commands of one primitive grouped by render pass
#[derive(Debug, Default, Clone)]
pub struct CommandLists {
    pub color: Vec<DrawCommand>,
    pub pick: Vec<DrawCommand>,
}

impl CommandLists {
    /// Empties every pass
    pub fn remove_all(&mut self) {
        self.color.clear();
        self.pick.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_empty() && self.pick.is_empty()
    }
}
