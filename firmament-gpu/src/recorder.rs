use std::collections::{HashMap, HashSet};

use firmament_log as log;
use firmament_types::Id;

use crate::{
    AttributeLocations, Context, CubeMap, CubeMapDescriptor, Error, Release, RenderState,
    RenderStateDescriptor, ShaderCache, ShaderProgram, VertexArray, VertexArrayDescriptor,
};

/// Call made to a [`Recorder`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateCubeMap {
        id: Id<CubeMap>,
        width: u32,
        height: u32,
        /// Face names in layer order
        faces: Vec<String>,
    },
    DestroyCubeMap(Id<CubeMap>),
    CreateVertexArray {
        id: Id<VertexArray>,
        vertices: usize,
        elements: usize,
    },
    DestroyVertexArray(Id<VertexArray>),
    ShaderProgram(Id<ShaderProgram>),
    ReleaseShaderProgram(Id<ShaderProgram>),
    CreateRenderState {
        id: Id<RenderState>,
        descriptor: RenderStateDescriptor,
    },
}

#[derive(Default)]
struct Failures {
    cube_maps: bool,
    vertex_arrays: bool,
    shader_programs: bool,
}

/// Context keeping resources in memory only
///
/// Every call is recorded, so it runs primitives where no adapter is available and lets their
/// resource bookkeeping be inspected.
#[derive(Default)]
pub struct Recorder {
    calls: Vec<Call>,
    cube_maps: HashSet<Id<CubeMap>>,
    vertex_arrays: HashSet<Id<VertexArray>>,
    shader_cache: ShaderCache,
    render_states: HashMap<RenderStateDescriptor, Id<RenderState>>,
    stale_releases: usize,
    failures: Failures,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls in the order they were made
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Counts calls matching the predicate
    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    pub fn live_cube_maps(&self) -> usize {
        self.cube_maps.len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.vertex_arrays.len()
    }

    pub fn live_shader_programs(&self) -> usize {
        self.shader_cache.len()
    }

    /// Number of destroy or release calls with ids that were not alive
    pub fn stale_releases(&self) -> usize {
        self.stale_releases
    }

    /// Makes cube map creation fail
    pub fn fail_cube_maps(&mut self, fail: bool) {
        self.failures.cube_maps = fail;
    }

    /// Makes vertex array creation fail
    pub fn fail_vertex_arrays(&mut self, fail: bool) {
        self.failures.vertex_arrays = fail;
    }

    /// Makes shader compilation fail
    pub fn fail_shader_programs(&mut self, fail: bool) {
        self.failures.shader_programs = fail;
    }

    fn stale(&mut self, what: &str) {
        log::warn!("{} is not alive", what);
        self.stale_releases += 1;
    }
}

fn rejected(label: &str) -> Error {
    Error::Validation {
        label: String::from(label),
        message: String::from("rejected by recorder"),
    }
}

impl Context for Recorder {
    fn create_cube_map(&mut self, descriptor: &CubeMapDescriptor) -> Result<Id<CubeMap>, Error> {
        if self.failures.cube_maps {
            return Err(rejected(descriptor.label));
        }
        if let Some(image) = descriptor.mismatched_face() {
            return Err(Error::Validation {
                label: String::from(descriptor.label),
                message: format!(
                    "face '{}' must have exactly {} bytes",
                    image.name,
                    descriptor.face_size()
                ),
            });
        }
        let layers = descriptor.source.layers();

        let id = Id::random();
        self.cube_maps.insert(id);
        self.calls.push(Call::CreateCubeMap {
            id,
            width: descriptor.width,
            height: descriptor.height,
            faces: layers.iter().map(|image| image.name.clone()).collect(),
        });
        Ok(id)
    }

    fn destroy_cube_map(&mut self, id: Id<CubeMap>) {
        self.calls.push(Call::DestroyCubeMap(id));
        if !self.cube_maps.remove(&id) {
            self.stale("cube map");
        }
    }

    fn create_vertex_array_from_mesh(
        &mut self,
        descriptor: &VertexArrayDescriptor,
    ) -> Result<Id<VertexArray>, Error> {
        if self.failures.vertex_arrays {
            return Err(rejected(descriptor.label));
        }
        let id = Id::random();
        self.vertex_arrays.insert(id);
        self.calls.push(Call::CreateVertexArray {
            id,
            vertices: descriptor.mesh.count_vertices(),
            elements: descriptor.mesh.count_elements(),
        });
        Ok(id)
    }

    fn destroy_vertex_array(&mut self, id: Id<VertexArray>) {
        self.calls.push(Call::DestroyVertexArray(id));
        if !self.vertex_arrays.remove(&id) {
            self.stale("vertex array");
        }
    }

    fn shader_program(
        &mut self,
        vertex: &str,
        fragment: &str,
        _attribute_locations: &AttributeLocations,
    ) -> Result<Id<ShaderProgram>, Error> {
        if self.failures.shader_programs {
            return Err(rejected("shader program"));
        }
        let id = match self.shader_cache.acquire(vertex, fragment) {
            Some(id) => id,
            None => {
                let id = Id::random();
                self.shader_cache.insert(vertex, fragment, id);
                id
            }
        };
        self.calls.push(Call::ShaderProgram(id));
        Ok(id)
    }

    fn release_shader_program(&mut self, id: Id<ShaderProgram>) {
        self.calls.push(Call::ReleaseShaderProgram(id));
        if self.shader_cache.release(id) == Release::Unknown {
            self.stale("shader program");
        }
    }

    fn create_render_state(
        &mut self,
        descriptor: &RenderStateDescriptor,
    ) -> Result<Id<RenderState>, Error> {
        let id = *self
            .render_states
            .entry(*descriptor)
            .or_insert_with(Id::random);
        self.calls.push(Call::CreateRenderState {
            id,
            descriptor: *descriptor,
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BufferUsage, CubeMapSource, PixelDatatype, PixelFormat};
    use firmament_image::Image;
    use firmament_mesh::BoxTessellator;

    fn faces(width: u32, height: u32) -> [Image; 6] {
        ["px", "nx", "py", "ny", "pz", "nz"].map(|name| Image::filled(name, width, height, [0; 4]))
    }

    fn descriptor<'a>(images: &'a [Image; 6], width: u32) -> CubeMapDescriptor<'a> {
        CubeMapDescriptor {
            label: "sky",
            source: CubeMapSource::from(images),
            width,
            height: width,
            pixel_format: PixelFormat::Rgba,
            pixel_datatype: PixelDatatype::UnsignedByte,
        }
    }

    #[test]
    fn tracks_live_resources() {
        let mut recorder = Recorder::new();
        let images = faces(2, 2);
        let cube_map = recorder
            .create_cube_map(&descriptor(&images, 2))
            .expect("faces are large enough");

        let mesh = BoxTessellator::cube(1.0).compute();
        let locations = AttributeLocations::from_mesh(&mesh);
        let vertex_array = recorder
            .create_vertex_array_from_mesh(&VertexArrayDescriptor {
                label: "box",
                mesh: &mesh,
                attribute_locations: &locations,
                usage: BufferUsage::StaticDraw,
            })
            .expect("vertex arrays are not failing");

        assert_eq!(recorder.live_cube_maps(), 1);
        assert_eq!(recorder.live_vertex_arrays(), 1);
        assert!(matches!(
            &recorder.calls()[0],
            Call::CreateCubeMap { faces, .. } if faces[0] == "px" && faces[5] == "nz"
        ));

        recorder.destroy_cube_map(cube_map);
        recorder.destroy_vertex_array(vertex_array);
        recorder.destroy_cube_map(cube_map);
        assert_eq!(recorder.live_cube_maps(), 0);
        assert_eq!(recorder.live_vertex_arrays(), 0);
        assert_eq!(recorder.stale_releases(), 1);
    }

    #[test]
    fn short_or_long_faces_are_rejected() {
        let mut recorder = Recorder::new();
        let images = faces(1, 1);
        assert!(recorder.create_cube_map(&descriptor(&images, 2)).is_err());

        let mut images = faces(2, 2);
        images[4] = Image::filled("pz", 4, 4, [0; 4]);
        assert!(matches!(
            recorder.create_cube_map(&descriptor(&images, 2)),
            Err(Error::Validation { message, .. }) if message.contains("'pz'")
        ));
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn shared_programs_and_render_states() {
        let mut recorder = Recorder::new();
        let locations = AttributeLocations::default();
        let a = recorder.shader_program("vs", "fs", &locations).unwrap();
        let b = recorder.shader_program("vs", "fs", &locations).unwrap();
        assert_eq!(a, b);
        recorder.release_shader_program(a);
        assert_eq!(recorder.live_shader_programs(), 1);
        recorder.release_shader_program(b);
        assert_eq!(recorder.live_shader_programs(), 0);

        let state = RenderStateDescriptor::default();
        let first = recorder.create_render_state(&state).unwrap();
        let second = recorder.create_render_state(&state).unwrap();
        assert_eq!(first, second);

        recorder.fail_shader_programs(true);
        assert!(recorder.shader_program("vs", "fs", &locations).is_err());
    }
}
