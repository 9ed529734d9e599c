pub use std::num::NonZeroU32;

/// Texture Wrapper
pub struct Texture {
    pub inner: wgpu::Texture,
}

impl Texture {
    pub fn view<'a, 'b>(&'a self, label: &'b str) -> ViewBuilder<'a, 'b> {
        ViewBuilder {
            texture: self,
            descriptor: wgpu::TextureViewDescriptor {
                label: Some(label),
                ..Default::default()
            },
        }
    }
}

/// Texture builder
pub struct Builder<'a, 'b> {
    pub gpu: &'a crate::Gpu,
    pub descriptor: wgpu::TextureDescriptor<'b>,
}

impl<'a, 'b> Builder<'a, 'b> {
    #[inline(always)]
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.descriptor.size.width = width;
        self.descriptor.size.height = height;
        self
    }
    #[inline(always)]
    pub fn layers(mut self, depth_or_array_layers: u32) -> Self {
        self.descriptor.size.depth_or_array_layers = depth_or_array_layers;
        self
    }
    #[inline(always)]
    pub fn format(mut self, format: wgpu::TextureFormat) -> Self {
        self.descriptor.format = format;
        self
    }
    #[inline(always)]
    pub fn use_as_texture_binding(mut self) -> Self {
        self.descriptor.usage |= wgpu::TextureUsages::TEXTURE_BINDING;
        self
    }
    #[inline(always)]
    pub fn allow_copy_dst(mut self) -> Self {
        self.descriptor.usage |= wgpu::TextureUsages::COPY_DST;
        self
    }
    #[inline(always)]
    pub fn create(self) -> Texture {
        Texture {
            inner: self.gpu.device().create_texture(&self.descriptor),
        }
    }
}

/// Texture View Wrapper
pub struct TextureView {
    pub inner: wgpu::TextureView,
}

pub struct ViewBuilder<'a, 'b> {
    texture: &'a Texture,
    descriptor: wgpu::TextureViewDescriptor<'b>,
}

impl<'a, 'b> ViewBuilder<'a, 'b> {
    #[inline(always)]
    pub fn create(self) -> TextureView {
        TextureView {
            inner: self.texture.inner.create_view(&self.descriptor),
        }
    }
    #[inline(always)]
    pub fn dimension_cube(mut self) -> Self {
        self.descriptor.dimension = Some(wgpu::TextureViewDimension::Cube);
        self
    }
    #[inline(always)]
    pub fn array_layer_count(mut self, array_layer_count: u32) -> Self {
        self.descriptor.array_layer_count = NonZeroU32::new(array_layer_count);
        self
    }
}
