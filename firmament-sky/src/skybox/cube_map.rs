use firmament_gpu::{
    Context, CubeMap, CubeMapDescriptor, CubeMapSource, LiveHandle, PixelDatatype, PixelFormat,
};
use firmament_image::Image;
use firmament_log as log;
use firmament_types::Id;

/// Owner of the skybox cube map texture
///
/// Holds at most one live cube map. The slot is shared with draw commands, which see the
/// current texture whenever they are drawn.
#[derive(Default)]
pub struct CubeMapResource {
    handle: LiveHandle<CubeMap>,
}

impl CubeMapResource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared slot to bind into a draw command
    pub fn binding(&self) -> LiveHandle<CubeMap> {
        self.handle.clone()
    }

    pub fn get(&self) -> Option<Id<CubeMap>> {
        self.handle.get()
    }

    pub fn is_ready(&self) -> bool {
        self.handle.is_set()
    }

    /// Creates the cube map from faces in canonical order, destroying the previous one
    ///
    /// Dimensions are taken from the first face. Every other face must have exactly the same
    /// size, a face that is smaller or larger is rejected by the context and nothing is created.
    pub fn build<C: Context>(
        &mut self,
        context: &mut C,
        label: &str,
        faces: &[Image; 6],
    ) -> Result<Id<CubeMap>, firmament_gpu::Error> {
        self.destroy(context);

        let first = &faces[0];
        let id = context.create_cube_map(&CubeMapDescriptor {
            label,
            source: CubeMapSource::from(faces),
            width: first.width,
            height: first.height,
            pixel_format: PixelFormat::Rgba,
            pixel_datatype: PixelDatatype::UnsignedByte,
        })?;

        log::info!("{} cube map {}x{} is ready", label, first.width, first.height);
        self.handle.set(Some(id));
        Ok(id)
    }

    /// Destroys the current cube map, if any
    pub fn destroy<C: Context>(&mut self, context: &mut C) {
        if let Some(id) = self.handle.take() {
            context.destroy_cube_map(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firmament_gpu::{Call, Recorder};

    fn faces(width: u32) -> [Image; 6] {
        ["px", "nx", "py", "ny", "pz", "nz"].map(|name| Image::filled(name, width, width, [9; 4]))
    }

    #[test]
    fn rebuild_destroys_previous_first() {
        let mut recorder = Recorder::new();
        let mut resource = CubeMapResource::new();
        let binding = resource.binding();
        assert!(!resource.is_ready());

        let first = resource
            .build(&mut recorder, "sky", &faces(2))
            .expect("recorder accepts");
        assert_eq!(binding.get(), Some(first));

        let second = resource
            .build(&mut recorder, "sky", &faces(4))
            .expect("recorder accepts");
        assert_ne!(first, second);
        assert_eq!(binding.get(), Some(second));
        assert_eq!(recorder.live_cube_maps(), 1);
        assert!(matches!(recorder.calls()[1], Call::DestroyCubeMap(id) if id == first));
        assert!(matches!(
            recorder.calls()[2],
            Call::CreateCubeMap { width: 4, height: 4, .. }
        ));
    }

    #[test]
    fn face_of_other_size_is_rejected_not_truncated() {
        let mut recorder = Recorder::new();
        let mut resource = CubeMapResource::new();
        let mut images = faces(2);
        images[5] = Image::filled("nz", 3, 3, [9; 4]);

        assert!(resource.build(&mut recorder, "sky", &images).is_err());
        assert!(!resource.is_ready());
        assert_eq!(recorder.live_cube_maps(), 0);
    }

    #[test]
    fn failed_build_leaves_no_cube_map() {
        let mut recorder = Recorder::new();
        recorder.fail_cube_maps(true);
        let mut resource = CubeMapResource::new();
        assert!(resource.build(&mut recorder, "sky", &faces(1)).is_err());
        assert!(!resource.is_ready());

        resource.destroy(&mut recorder);
        assert_eq!(recorder.stale_releases(), 0);
    }
}
