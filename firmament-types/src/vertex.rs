//! Vertex attributes

/// Vertex attribute data format
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum AttributeFormat {
    /// One f32
    Float32,
    /// Two f32
    Float32x2,
    /// Three f32
    Float32x3,
    /// Four f32
    Float32x4,
}

impl AttributeFormat {
    /// Size of the attribute in bytes
    pub fn size(&self) -> usize {
        match self {
            AttributeFormat::Float32 => 4,
            AttributeFormat::Float32x2 => 8,
            AttributeFormat::Float32x3 => 12,
            AttributeFormat::Float32x4 => 16,
        }
    }
}

/// Vertex attribute abstraction
pub trait Attribute: 'static {
    /// Raw value of one vertex
    type Raw: bytemuck::Pod;
    /// Name of the attribute as it is known to shaders
    fn name() -> &'static str;
    /// Format of the attribute
    fn format() -> AttributeFormat;
}

/// Vertex position
pub struct Position;

impl Attribute for Position {
    type Raw = [f32; 3];
    fn name() -> &'static str {
        "position"
    }
    fn format() -> AttributeFormat {
        AttributeFormat::Float32x3
    }
}

/// Texture coordinates
pub struct TexUV;

impl Attribute for TexUV {
    type Raw = [f32; 2];
    fn name() -> &'static str {
        "st"
    }
    fn format() -> AttributeFormat {
        AttributeFormat::Float32x2
    }
}
