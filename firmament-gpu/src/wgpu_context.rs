use std::any::Any;
use std::borrow::Cow;
use std::collections::HashMap;

use firmament_log as log;
use firmament_types::id::Uuid;
use firmament_types::{vertex, Id};

use crate::texture::NonZeroU32;
use crate::{
    buffer, texture, AttributeLocations, Buffer, Context, CubeMap, CubeMapDescriptor, CullFace,
    Error, PixelDatatype, PixelFormat, Release, RenderState, RenderStateDescriptor, ShaderCache,
    ShaderProgram, Texture, TextureView, VertexArray, VertexArrayDescriptor,
};

const CUBE_FACES: u32 = 6;

/// Parameters of the device initialization
pub struct Descriptor<'a> {
    pub label: &'a str,
    /// Format of the depth buffer render states are tested against
    pub depth_format: wgpu::TextureFormat,
}

impl Default for Descriptor<'_> {
    fn default() -> Self {
        Self {
            label: "firmament",
            depth_format: wgpu::TextureFormat::Depth32Float,
        }
    }
}

/// Cube map texture with its view and sampler
pub struct CubeMapTexture {
    pub texture: Texture,
    pub view: TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

/// Buffers of an uploaded mesh
pub struct MeshBuffers {
    pub vertex_buffer: Buffer,
    pub index_buffer: Option<Buffer>,
    /// Number of indices, or vertices for a non-indexed mesh
    pub count: u32,
    pub stride: wgpu::BufferAddress,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl MeshBuffers {
    /// Layout of the vertex buffer for a pipeline descriptor
    pub fn layout(&self) -> wgpu::VertexBufferLayout {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

/// Compiled shader stages
pub struct Program {
    pub vertex: wgpu::ShaderModule,
    pub fragment: wgpu::ShaderModule,
    pub attribute_locations: AttributeLocations,
}

/// Fixed function state in terms of a render pipeline
pub struct PipelineState {
    pub primitive: wgpu::PrimitiveState,
    pub depth_stencil: wgpu::DepthStencilState,
}

/// Headless wgpu rendering context
pub struct Gpu {
    label: String,
    /// WGPU Device
    device: wgpu::Device,
    /// WGPU Queue
    queue: wgpu::Queue,
    depth_format: wgpu::TextureFormat,
    /// Storage for GPU related objects: Buffers, Textures, Shaders, Pipelines, etc
    storage: HashMap<Uuid, Box<dyn Any>>,
    shader_cache: ShaderCache,
    render_states: HashMap<RenderStateDescriptor, Id<RenderState>>,
}

impl Gpu {
    /// Picks an adapter and requests a device, blocking until both are ready
    pub fn new(descriptor: Descriptor) -> Result<Self, Error> {
        let (device, queue) = futures::executor::block_on(init(descriptor.label))?;

        Ok(Self {
            label: String::from(descriptor.label),
            device,
            queue,
            depth_format: descriptor.depth_format,
            storage: HashMap::new(),
            shader_cache: ShaderCache::new(),
            render_states: HashMap::new(),
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    fn store<T: Any>(&mut self, data: T) -> Id<T> {
        let raw_id = Uuid::new_v4();
        self.storage.insert(raw_id, Box::new(data));
        Id::from(raw_id)
    }

    fn get<T: Any>(&self, id: &Id<T>) -> Option<&T> {
        self.storage
            .get(id.uuid())
            .and_then(|data| data.downcast_ref::<T>())
    }

    fn remove<T: Any>(&mut self, id: &Id<T>) -> Option<T> {
        self.storage
            .remove(id.uuid())
            .and_then(|data| data.downcast::<T>().ok())
            .map(|data| *data)
    }

    pub fn buffer<'a, 'b>(&'a self, label: &'b str) -> buffer::Builder<'a, 'b> {
        buffer::Builder {
            gpu: self,
            descriptor: wgpu::BufferDescriptor {
                label: Some(label),
                usage: wgpu::BufferUsages::empty(),
                size: 0,
                mapped_at_creation: false,
            },
        }
    }

    pub fn texture<'a, 'b>(&'a self, label: &'b str) -> texture::Builder<'a, 'b> {
        texture::Builder {
            gpu: self,
            descriptor: wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: 1,
                    height: 1,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::empty(),
            },
        }
    }

    pub fn cube_map(&self, id: Id<CubeMap>) -> Option<&CubeMapTexture> {
        self.get(&retype(id))
    }

    pub fn vertex_array(&self, id: Id<VertexArray>) -> Option<&MeshBuffers> {
        self.get(&retype(id))
    }

    pub fn program(&self, id: Id<ShaderProgram>) -> Option<&Program> {
        self.get(&retype(id))
    }

    pub fn render_state(&self, id: Id<RenderState>) -> Option<&PipelineState> {
        self.get(&retype(id))
    }

    /// Runs device calls inside a validation error scope
    fn scoped<T>(&self, label: &str, create: impl FnOnce() -> T) -> Result<T, Error> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = create();
        match futures::executor::block_on(self.device.pop_error_scope()) {
            Some(error) => Err(Error::Validation {
                label: String::from(label),
                message: error.to_string(),
            }),
            None => Ok(value),
        }
    }
}

impl Context for Gpu {
    fn create_cube_map(&mut self, descriptor: &CubeMapDescriptor) -> Result<Id<CubeMap>, Error> {
        let format = texture_format(descriptor.pixel_format, descriptor.pixel_datatype)?;
        let face_size = descriptor.face_size();
        let (width, height) = (descriptor.width, descriptor.height);
        let layers = descriptor.source.layers();

        if let Some(image) = descriptor.mismatched_face() {
            return Err(Error::Validation {
                label: String::from(descriptor.label),
                message: format!(
                    "face '{}' has {} bytes, {} expected",
                    image.name,
                    image.data.len(),
                    face_size
                ),
            });
        }

        let bytes_per_row =
            width * descriptor.pixel_format.channels() * descriptor.pixel_datatype.size();

        let cube_map = self.scoped(descriptor.label, || {
            let texture = self
                .texture(descriptor.label)
                .size(width, height)
                .layers(CUBE_FACES)
                .format(format)
                .use_as_texture_binding()
                .allow_copy_dst()
                .create();

            for (layer, image) in layers.iter().enumerate() {
                self.queue.write_texture(
                    wgpu::ImageCopyTexture {
                        texture: &texture.inner,
                        mip_level: 0,
                        origin: wgpu::Origin3d {
                            x: 0,
                            y: 0,
                            z: layer as u32,
                        },
                        aspect: wgpu::TextureAspect::All,
                    },
                    &image.data,
                    wgpu::ImageDataLayout {
                        offset: 0,
                        bytes_per_row: NonZeroU32::new(bytes_per_row),
                        rows_per_image: NonZeroU32::new(height),
                    },
                    wgpu::Extent3d {
                        width,
                        height,
                        depth_or_array_layers: 1,
                    },
                );
            }

            let view = texture
                .view(descriptor.label)
                .dimension_cube()
                .array_layer_count(CUBE_FACES)
                .create();

            let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some(descriptor.label),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::FilterMode::Nearest,
                ..Default::default()
            });

            CubeMapTexture {
                texture,
                view,
                sampler,
                width,
                height,
            }
        })?;

        log::debug!("cube map '{}' {}x{} uploaded", descriptor.label, width, height);
        Ok(retype(self.store(cube_map)))
    }

    fn destroy_cube_map(&mut self, id: Id<CubeMap>) {
        match self.remove::<CubeMapTexture>(&retype(id)) {
            Some(cube_map) => cube_map.texture.inner.destroy(),
            None => log::warn!("cube map {:?} is not alive", id),
        }
    }

    fn create_vertex_array_from_mesh(
        &mut self,
        descriptor: &VertexArrayDescriptor,
    ) -> Result<Id<VertexArray>, Error> {
        let label = descriptor.label;
        let mesh = descriptor.mesh;
        let mut stride = 0;
        let mut attributes = Vec::new();

        for (name, format) in mesh.attributes() {
            let shader_location = descriptor
                .attribute_locations
                .get(name)
                .ok_or_else(|| Error::Validation {
                    label: String::from(label),
                    message: format!("attribute '{}' has no location", name),
                })?;
            attributes.push(wgpu::VertexAttribute {
                format: map_vertex_format(format),
                offset: stride,
                shader_location,
            });
            stride += format.size() as wgpu::BufferAddress;
        }

        let vertices = mesh.interleaved();
        let buffers = self.scoped(label, || {
            let vertex_buffer = self
                .buffer(label)
                .use_as_vertex()
                .usage(descriptor.usage)
                .create_init(&vertices);
            let index_buffer = mesh.indices::<u8>().map(|indices| {
                self.buffer(label)
                    .use_as_index()
                    .usage(descriptor.usage)
                    .create_init(indices)
            });
            MeshBuffers {
                vertex_buffer,
                index_buffer,
                count: mesh.count_elements() as u32,
                stride,
                attributes,
            }
        })?;

        log::debug!(
            "vertex array '{}' uploaded: {} bytes, {} elements",
            label,
            buffers.vertex_buffer.size,
            buffers.count
        );
        Ok(retype(self.store(buffers)))
    }

    fn destroy_vertex_array(&mut self, id: Id<VertexArray>) {
        match self.remove::<MeshBuffers>(&retype(id)) {
            Some(buffers) => {
                buffers.vertex_buffer.inner.destroy();
                if let Some(index_buffer) = buffers.index_buffer {
                    index_buffer.inner.destroy();
                }
            }
            None => log::warn!("vertex array {:?} is not alive", id),
        }
    }

    fn shader_program(
        &mut self,
        vertex: &str,
        fragment: &str,
        attribute_locations: &AttributeLocations,
    ) -> Result<Id<ShaderProgram>, Error> {
        if let Some(id) = self.shader_cache.acquire(vertex, fragment) {
            return Ok(id);
        }

        let label = format!("{}::program", self.label);
        let program = self.scoped(&label, || Program {
            vertex: self
                .device
                .create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some("vertex"),
                    source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(vertex)),
                }),
            fragment: self
                .device
                .create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some("fragment"),
                    source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(fragment)),
                }),
            attribute_locations: attribute_locations.clone(),
        })?;

        let id = retype(self.store(program));
        self.shader_cache.insert(vertex, fragment, id);
        Ok(id)
    }

    fn release_shader_program(&mut self, id: Id<ShaderProgram>) {
        match self.shader_cache.release(id) {
            Release::Dropped => {
                self.remove::<Program>(&retype(id));
            }
            Release::Retained(owners) => {
                log::trace!("shader program {:?} is still used by {}", id, owners)
            }
            Release::Unknown => log::warn!("shader program {:?} is not alive", id),
        }
    }

    fn create_render_state(
        &mut self,
        descriptor: &RenderStateDescriptor,
    ) -> Result<Id<RenderState>, Error> {
        if let Some(id) = self.render_states.get(descriptor) {
            return Ok(*id);
        }

        let state = PipelineState {
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: descriptor.cull.map(|face| match face {
                    CullFace::Front => wgpu::Face::Front,
                    CullFace::Back => wgpu::Face::Back,
                }),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: wgpu::DepthStencilState {
                format: self.depth_format,
                depth_write_enabled: descriptor.depth_mask,
                depth_compare: if descriptor.depth_test {
                    wgpu::CompareFunction::LessEqual
                } else {
                    wgpu::CompareFunction::Always
                },
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            },
        };

        let id = retype(self.store(state));
        self.render_states.insert(*descriptor, id);
        Ok(id)
    }
}

fn retype<A, B>(id: Id<A>) -> Id<B> {
    Id::from(*id.uuid())
}

/// Texture format of a pixel format and datatype pair
pub fn texture_format(
    format: PixelFormat,
    datatype: PixelDatatype,
) -> Result<wgpu::TextureFormat, Error> {
    match (format, datatype) {
        (PixelFormat::Rgba, PixelDatatype::UnsignedByte) => Ok(wgpu::TextureFormat::Rgba8Unorm),
        (PixelFormat::Rgba, PixelDatatype::Float) => Ok(wgpu::TextureFormat::Rgba32Float),
        (PixelFormat::Rgb, _) => Err(Error::Unsupported("three channel textures")),
    }
}

pub fn map_vertex_format(attr_format: vertex::AttributeFormat) -> wgpu::VertexFormat {
    match attr_format {
        vertex::AttributeFormat::Float32 => wgpu::VertexFormat::Float32,
        vertex::AttributeFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
        vertex::AttributeFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
        vertex::AttributeFormat::Float32x4 => wgpu::VertexFormat::Float32x4,
    }
}

async fn init(label: &str) -> Result<(wgpu::Device, wgpu::Queue), Error> {
    let backend = wgpu::util::backend_bits_from_env().unwrap_or_else(wgpu::Backends::all);

    let instance = wgpu::Instance::new(backend);
    let adapter = wgpu::util::initialize_adapter_from_env_or_default(&instance, backend, None)
        .await
        .ok_or(Error::NoAdapter)?;

    let adapter_info = adapter.get_info();
    log::info!("Adapter: {}", adapter_info.name);
    log::info!("Backend: {:?}", adapter_info.backend);

    let limits = wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits());
    let trace_dir = std::env::var("WGPU_TRACE");
    adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some(label),
                features: wgpu::Features::empty(),
                limits,
            },
            trace_dir.ok().as_ref().map(std::path::Path::new),
        )
        .await
        .map_err(|err| Error::RequestDevice(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_bytes_map_to_normalized_texture() {
        assert_eq!(
            texture_format(PixelFormat::Rgba, PixelDatatype::UnsignedByte),
            Ok(wgpu::TextureFormat::Rgba8Unorm)
        );
        assert!(matches!(
            texture_format(PixelFormat::Rgb, PixelDatatype::UnsignedByte),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn ids_keep_value_across_types() {
        let id = Id::<CubeMap>::new(3, 4);
        let raw: Id<CubeMapTexture> = retype(id);
        assert_eq!(raw.uuid(), id.uuid());
    }
}
