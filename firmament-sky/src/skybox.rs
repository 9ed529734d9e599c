//! Skybox primitive
//!
//! SkyBox is a huge cube with six images on its internal sides, drawn around the viewer. Faces
//! are fetched in the background once the skybox is first updated in 3D, the box geometry is
//! built on that same call, and from the moment every face has arrived the skybox emits one
//! draw command per frame.
//!
//! ```no_run
//! use firmament_gpu::{Descriptor, Gpu};
//! use firmament_sky::SkyBox;
//! use firmament_types::FrameState;
//!
//! let mut gpu = Gpu::new(Descriptor::default()).expect("GPU is available");
//! let mut sky = SkyBox::new([
//!     "px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png",
//! ])
//! .expect("six faces are given");
//!
//! let mut commands = Vec::new();
//! sky.update(&mut gpu, &FrameState::default(), &mut commands)
//!     .expect("skybox is alive");
//! sky.destroy(&mut gpu);
//! ```

mod cube_map;
mod geometry;
mod loader;

use firmament_gpu::{CommandLists, Context, DrawCommand, Uniform, UniformMap};
use firmament_log as log;
use firmament_math::{from_rotation_translation, TemeToPseudoFixed, TimeTransform, Vec3, Zero};
use firmament_types::{FrameState, SceneMode};

use crate::{Config, Error};

pub use cube_map::CubeMapResource;
pub use geometry::{GeometryResources, SkyBoxGeometryCache, FRAGMENT_SHADER, VERTEX_SHADER};
pub use loader::{Completion, CubeFaceLoader, Face, Fetch, FileFetcher, LoadState, FACES_COUNT};

/// Name of the cube map uniform of the skybox shader
pub const CUBE_MAP_UNIFORM: &str = "u_cubeMap";

/// Face sources in canonical order
#[derive(Debug, Clone, PartialEq)]
pub struct SkyBoxSpec {
    sources: [String; FACES_COUNT],
}

impl SkyBoxSpec {
    /// Validates that exactly six sources are given
    pub fn new<I, S>(sources: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sources = sources.into_iter().map(Into::into).collect::<Vec<String>>();
        let found = sources.len();
        let sources = sources.try_into().map_err(|_| Error::Configuration {
            expected: FACES_COUNT,
            found,
        })?;
        Ok(Self { sources })
    }

    /// Source of the face
    pub fn source(&self, face: Face) -> &str {
        &self.sources[face.index()]
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }
}

/// Rendering progress of a skybox
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum EmitterState {
    /// Geometry is not built yet
    Uninitialized,
    /// Geometry is built, waiting for faces
    GeometryReady,
    /// Draw command is emitted every 3D frame
    Rendering,
    /// Geometry could not be created
    Failed,
}

/// Cube mapped sky
pub struct SkyBox {
    spec: SkyBoxSpec,
    config: Config,
    fetcher: Box<dyn Fetch>,
    time_transform: Box<dyn TimeTransform>,
    loader: CubeFaceLoader,
    geometry: SkyBoxGeometryCache,
    cube_map: CubeMapResource,
    command: DrawCommand,
    command_lists: CommandLists,
    destroyed: bool,
}

impl SkyBox {
    /// Constructs skybox loading face files relative to the working directory
    pub fn new<I, S>(sources: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let config = Config::default();
        let fetcher = FileFetcher::new(config.root.clone());
        Self::with_config(sources, config, fetcher)
    }

    /// Constructs skybox with custom configuration and source of faces
    ///
    /// `config.root` is not read here: faces are resolved by `fetcher` alone.
    pub fn with_config<I, S>(
        sources: I,
        config: Config,
        fetcher: impl Fetch + 'static,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = SkyBoxSpec::new(sources)?;
        let cube_map = CubeMapResource::new();
        let command = DrawCommand {
            uniform_map: UniformMap::new()
                .with(CUBE_MAP_UNIFORM, Uniform::CubeMap(cube_map.binding())),
            ..Default::default()
        };

        Ok(Self {
            spec,
            geometry: SkyBoxGeometryCache::new(config.size),
            config,
            fetcher: Box::new(fetcher),
            time_transform: Box::new(TemeToPseudoFixed),
            loader: CubeFaceLoader::new(),
            cube_map,
            command,
            command_lists: CommandLists::default(),
            destroyed: false,
        })
    }

    /// Replaces the transform giving the sky orientation for a frame time
    #[must_use]
    pub fn with_time_transform(mut self, time_transform: impl TimeTransform + 'static) -> Self {
        self.time_transform = Box::new(time_transform);
        self
    }

    /// Advances the skybox by one frame
    ///
    /// Outside of 3D mode nothing but received faces is processed. In 3D mode the first call
    /// starts fetching faces and builds the geometry. Once the cube map exists, the command
    /// lists of the frame are pushed to `commands`. After the geometry failed to build, every
    /// call returns `Error::GeometryUnavailable` without touching the context.
    pub fn update<C: Context>(
        &mut self,
        context: &mut C,
        frame: &FrameState,
        commands: &mut Vec<CommandLists>,
    ) -> Result<(), Error> {
        self.check_alive()?;
        if self.geometry.is_failed() {
            return Err(Error::GeometryUnavailable);
        }

        let scene_3d = frame.mode == SceneMode::Scene3D;
        if scene_3d {
            if !self.loader.is_launched() {
                log::debug!("{} fetches faces", self.config.label);
                self.loader.launch(&self.spec, self.fetcher.as_ref());
            }

            let resources = self.geometry.ensure(context, &self.config.label)?;
            self.command.vertex_array = Some(resources.vertex_array);
            self.command.shader_program = Some(resources.shader_program);
            self.command.render_state = Some(resources.render_state);
            self.command.bounding_volume = resources.bounding_volume;
        }

        if let Some(faces) = self.loader.poll() {
            self.cube_map.build(context, &self.config.label, &faces)?;
        }

        if !scene_3d || !self.cube_map.is_ready() || !self.command.is_complete() {
            return Ok(());
        }

        let rotation = self.time_transform.rotation(frame.time);
        self.command.model_matrix = from_rotation_translation(rotation, Vec3::zero());

        self.command_lists.remove_all();
        if frame.passes.color {
            self.command_lists.color.push(self.command.clone());
        }
        commands.push(self.command_lists.clone());

        Ok(())
    }

    /// Current rendering progress
    pub fn state(&self) -> Result<EmitterState, Error> {
        self.check_alive()?;
        Ok(if self.geometry.is_failed() {
            EmitterState::Failed
        } else if !self.geometry.is_built() {
            EmitterState::Uninitialized
        } else if self.cube_map.is_ready() {
            EmitterState::Rendering
        } else {
            EmitterState::GeometryReady
        })
    }

    /// Progress of the face fetching
    pub fn load_state(&self) -> Result<&LoadState, Error> {
        self.check_alive()?;
        Ok(self.loader.state())
    }

    pub fn spec(&self) -> Result<&SkyBoxSpec, Error> {
        self.check_alive()?;
        Ok(&self.spec)
    }

    /// Draw command of the skybox, complete once the geometry is built
    pub fn command(&self) -> Result<&DrawCommand, Error> {
        self.check_alive()?;
        Ok(&self.command)
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Gives every GPU resource back to the context
    ///
    /// Repeated calls do nothing. Faces still in flight are dropped when they arrive.
    pub fn destroy<C: Context>(&mut self, context: &mut C) {
        if self.destroyed {
            log::debug!("{} is destroyed already", self.config.label);
            return;
        }

        self.geometry.release(context);
        self.cube_map.destroy(context);
        self.loader.shutdown();
        self.command = DrawCommand::default();
        self.command_lists.remove_all();
        self.destroyed = true;

        log::debug!("{} is destroyed", self.config.label);
    }

    /// Destroys the skybox consuming it
    ///
    /// Returns `None` to be assigned over the variable that held the skybox.
    pub fn dispose<C: Context>(mut self, context: &mut C) -> Option<SkyBox> {
        self.destroy(context);
        None
    }

    fn check_alive(&self) -> Result<(), Error> {
        if self.destroyed {
            Err(Error::Destroyed)
        } else {
            Ok(())
        }
    }
}

impl Drop for SkyBox {
    fn drop(&mut self) {
        if !self.destroyed && (self.geometry.is_built() || self.cube_map.is_ready()) {
            log::warn!("{} dropped without destroy, GPU resources leak", self.config.label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firmament_gpu::Recorder;

    struct Nowhere;

    impl Fetch for Nowhere {
        fn fetch(&self, _completion: Completion) {}
    }

    fn sources() -> Vec<&'static str> {
        vec!["a", "b", "c", "d", "e", "f"]
    }

    #[test]
    fn spec_keeps_order_and_rejects_wrong_count() {
        let spec = SkyBoxSpec::new(sources()).expect("six sources");
        assert_eq!(spec.source(Face::PositiveX), "a");
        assert_eq!(spec.source(Face::NegativeZ), "f");
        assert_eq!(
            SkyBoxSpec::new(vec!["a"; 5]),
            Err(Error::Configuration {
                expected: 6,
                found: 5
            })
        );
        assert!(SkyBoxSpec::new(vec!["a"; 7]).is_err());
        assert!(SkyBoxSpec::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn state_follows_geometry_and_faces() {
        let mut recorder = Recorder::new();
        let mut sky = SkyBox::with_config(sources(), Config::default(), Nowhere)
            .expect("six sources");
        assert_eq!(sky.state(), Ok(EmitterState::Uninitialized));

        let mut commands = Vec::new();
        let mut frame = FrameState::default();
        frame.mode = SceneMode::Scene2D;
        sky.update(&mut recorder, &frame, &mut commands)
            .expect("alive");
        assert_eq!(sky.state(), Ok(EmitterState::Uninitialized));
        assert!(recorder.calls().is_empty());

        frame.mode = SceneMode::Scene3D;
        sky.update(&mut recorder, &frame, &mut commands)
            .expect("alive");
        assert_eq!(sky.state(), Ok(EmitterState::GeometryReady));
        assert!(sky.command().map(DrawCommand::is_complete).unwrap_or(false));
        assert!(commands.is_empty());

        sky.destroy(&mut recorder);
        assert_eq!(sky.state(), Err(Error::Destroyed));
        assert!(sky.dispose(&mut recorder).is_none());
    }
}
