use wgpu::util::DeviceExt;

use crate::BufferUsage;

/// Buffer Wrapper
pub struct Buffer {
    pub inner: wgpu::Buffer,
    /// Size in bytes
    pub size: wgpu::BufferAddress,
}

/// Buffer Builder
pub struct Builder<'a, 'b> {
    pub gpu: &'a crate::Gpu,
    pub descriptor: wgpu::BufferDescriptor<'b>,
}

impl<'a, 'b> Builder<'a, 'b> {
    #[inline(always)]
    pub fn allow_copy_dst(mut self) -> Self {
        self.descriptor.usage |= wgpu::BufferUsages::COPY_DST;
        self
    }

    #[inline(always)]
    pub fn use_as_vertex(mut self) -> Self {
        self.descriptor.usage |= wgpu::BufferUsages::VERTEX;
        self
    }

    #[inline(always)]
    pub fn use_as_index(mut self) -> Self {
        self.descriptor.usage |= wgpu::BufferUsages::INDEX;
        self
    }

    /// Buffers that are rewritten later must accept copies
    #[inline(always)]
    pub fn usage(self, usage: BufferUsage) -> Self {
        match usage {
            BufferUsage::StaticDraw => self,
            BufferUsage::DynamicDraw | BufferUsage::StreamDraw => self.allow_copy_dst(),
        }
    }

    /// Creates the buffer filled with the contents
    #[inline(always)]
    pub fn create_init(self, contents: &[u8]) -> Buffer {
        let inner = self
            .gpu
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: self.descriptor.label,
                contents,
                usage: self.descriptor.usage,
            });
        Buffer {
            inner,
            size: contents.len() as wgpu::BufferAddress,
        }
    }
}
