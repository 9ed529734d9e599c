use firmament_gpu::{
    AttributeLocations, BufferUsage, Context, CullFace, RenderState, RenderStateDescriptor,
    ShaderProgram, VertexArray, VertexArrayDescriptor,
};
use firmament_log as log;
use firmament_math::BoundingSphere;
use firmament_mesh::BoxTessellator;
use firmament_types::Id;

use crate::Error;

pub const VERTEX_SHADER: &str = include_str!("shaders/skybox_vs.wgsl");
pub const FRAGMENT_SHADER: &str = include_str!("shaders/skybox_fs.wgsl");

/// GPU objects the box is drawn with
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeometryResources {
    pub vertex_array: Id<VertexArray>,
    pub shader_program: Id<ShaderProgram>,
    pub render_state: Id<RenderState>,
    pub bounding_volume: BoundingSphere,
}

enum GeometryState {
    Unbuilt,
    Built(GeometryResources),
    /// Creation failed, never retried
    Failed,
    Released,
}

/// Box geometry built on first demand
pub struct SkyBoxGeometryCache {
    size: f32,
    state: GeometryState,
}

impl SkyBoxGeometryCache {
    /// Constructs cache of a box with the edge length
    pub fn new(size: f32) -> Self {
        Self {
            size,
            state: GeometryState::Unbuilt,
        }
    }

    /// Returns the resources, building them on the first call
    pub fn ensure<C: Context>(
        &mut self,
        context: &mut C,
        label: &str,
    ) -> Result<&GeometryResources, Error> {
        if let GeometryState::Unbuilt = self.state {
            match build(context, label, self.size) {
                Ok(resources) => {
                    log::info!("{} geometry is ready", label);
                    self.state = GeometryState::Built(resources);
                }
                Err(err) => {
                    log::error!("{} geometry failed: {}", label, err);
                    self.state = GeometryState::Failed;
                    return Err(Error::Gpu(err));
                }
            }
        }

        match &self.state {
            GeometryState::Built(resources) => Ok(resources),
            GeometryState::Released => Err(Error::Destroyed),
            GeometryState::Unbuilt | GeometryState::Failed => Err(Error::GeometryUnavailable),
        }
    }

    pub fn resources(&self) -> Option<&GeometryResources> {
        match &self.state {
            GeometryState::Built(resources) => Some(resources),
            _ => None,
        }
    }

    pub fn is_built(&self) -> bool {
        self.resources().is_some()
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, GeometryState::Failed)
    }

    /// Gives the resources back to the context, the cache can not be built afterwards
    pub fn release<C: Context>(&mut self, context: &mut C) {
        if let GeometryState::Built(resources) =
            std::mem::replace(&mut self.state, GeometryState::Released)
        {
            context.destroy_vertex_array(resources.vertex_array);
            context.release_shader_program(resources.shader_program);
        }
    }
}

fn build<C: Context>(
    context: &mut C,
    label: &str,
    size: f32,
) -> Result<GeometryResources, firmament_gpu::Error> {
    let tessellator = BoxTessellator::cube(size);
    let mesh = tessellator.compute();
    let bounding_volume = BoundingSphere::from_points(&tessellator.corners());
    let attribute_locations = AttributeLocations::from_mesh(&mesh);

    let vertex_array = context.create_vertex_array_from_mesh(&VertexArrayDescriptor {
        label,
        mesh: &mesh,
        attribute_locations: &attribute_locations,
        usage: BufferUsage::StaticDraw,
    })?;

    let shader_program =
        match context.shader_program(VERTEX_SHADER, FRAGMENT_SHADER, &attribute_locations) {
            Ok(program) => program,
            Err(err) => {
                context.destroy_vertex_array(vertex_array);
                return Err(err);
            }
        };

    // the viewer is inside the box, so its outer faces are culled
    let render_state = match context.create_render_state(&RenderStateDescriptor {
        depth_test: true,
        depth_mask: false,
        cull: Some(CullFace::Front),
    }) {
        Ok(state) => state,
        Err(err) => {
            context.release_shader_program(shader_program);
            context.destroy_vertex_array(vertex_array);
            return Err(err);
        }
    };

    Ok(GeometryResources {
        vertex_array,
        shader_program,
        render_state,
        bounding_volume,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use firmament_gpu::{Call, Recorder};

    #[test]
    fn builds_once() {
        let mut recorder = Recorder::new();
        let mut cache = SkyBoxGeometryCache::new(2.0);
        assert!(!cache.is_built());

        let first = *cache.ensure(&mut recorder, "sky").expect("recorder accepts");
        let second = *cache.ensure(&mut recorder, "sky").expect("built already");
        assert_eq!(first, second);
        assert_eq!(
            recorder.count(|call| matches!(call, Call::CreateVertexArray { .. })),
            1
        );
        assert_eq!(
            recorder.count(|call| matches!(call, Call::ShaderProgram(_))),
            1
        );
        assert!((first.bounding_volume.radius - 3.0_f32.sqrt()).abs() < 1e-5);
        assert!(recorder.calls().iter().any(|call| matches!(
            call,
            Call::CreateRenderState { descriptor, .. }
                if descriptor.depth_test && !descriptor.depth_mask
                    && descriptor.cull == Some(CullFace::Front)
        )));
    }

    #[test]
    fn failure_is_final() {
        let mut recorder = Recorder::new();
        recorder.fail_shader_programs(true);
        let mut cache = SkyBoxGeometryCache::new(2.0);

        assert!(matches!(
            cache.ensure(&mut recorder, "sky"),
            Err(Error::Gpu(_))
        ));
        // the vertex array created before the shader failed is given back
        assert_eq!(recorder.live_vertex_arrays(), 0);

        recorder.fail_shader_programs(false);
        assert_eq!(
            cache.ensure(&mut recorder, "sky"),
            Err(Error::GeometryUnavailable)
        );
        assert!(cache.is_failed());
        assert_eq!(
            recorder.count(|call| matches!(call, Call::CreateVertexArray { .. })),
            1
        );
    }

    #[test]
    fn release_frees_once() {
        let mut recorder = Recorder::new();
        let mut cache = SkyBoxGeometryCache::new(2.0);
        cache.ensure(&mut recorder, "sky").expect("recorder accepts");

        cache.release(&mut recorder);
        cache.release(&mut recorder);
        assert_eq!(recorder.live_vertex_arrays(), 0);
        assert_eq!(recorder.live_shader_programs(), 0);
        assert_eq!(recorder.stale_releases(), 0);
        assert_eq!(cache.ensure(&mut recorder, "sky"), Err(Error::Destroyed));
    }
}
