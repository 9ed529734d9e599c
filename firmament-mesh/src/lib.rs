mod tessellator;

use firmament_types::vertex;
use std::any::TypeId;
use std::collections::HashMap;

pub use tessellator::BoxTessellator;

/// 3D Mesh
pub struct Mesh {
    name: String,
    vertices: HashMap<TypeId, AttributeValues>,
    /// Attributes in the order they were set
    layout: Vec<TypeId>,
    vertices_count: usize,
    indices: Option<Vec<u32>>,
}

impl Mesh {
    /// Constructs new Mesh instance
    pub fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
            vertices: HashMap::new(),
            layout: Vec::new(),
            vertices_count: 0,
            indices: None,
        }
    }

    /// Returns name of the mesh
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets vertices attributes by Type
    pub fn set_vertices<A: vertex::Attribute>(&mut self, values: Vec<A::Raw>) {
        let vertices_count = values.len();

        if self.vertices_count != vertices_count {
            if self.vertices_count != 0 {
                panic!(
                    "Mesh '{}' has {} vertices, but attribute '{}' was given with {} values.",
                    self.name,
                    self.vertices_count,
                    A::name(),
                    vertices_count
                );
            }
            self.vertices_count = vertices_count;
        }

        let type_id = TypeId::of::<A>();
        if !self.layout.contains(&type_id) {
            self.layout.push(type_id);
        }

        self.vertices.insert(
            type_id,
            AttributeValues {
                name: A::name(),
                format: A::format(),
                bytes: bytemuck::cast_slice(values.as_slice()).to_vec(),
            },
        );
    }

    /// Returns slice of vertices attributes if exists
    pub fn vertices<A: vertex::Attribute>(&self) -> Option<&[A::Raw]> {
        self.vertices
            .get(&TypeId::of::<A>())
            .map(|values| bytemuck::cast_slice(values.bytes.as_slice()))
    }

    /// Sets mesh indices
    pub fn set_indices(&mut self, indices: Vec<u32>) {
        self.indices = Some(indices);
    }

    /// Returns type casted list of indices
    ///
    /// Use u32 to get indices themselves or u8 to get data for buffering
    pub fn indices<T: bytemuck::Pod>(&self) -> Option<&[T]> {
        self.indices.as_ref().map(|i| bytemuck::cast_slice(i.as_slice()))
    }

    /// Returns number of vertices
    pub fn count_vertices(&self) -> usize {
        self.vertices_count
    }

    /// Returns number of indices, or vertices for a non-indexed mesh
    pub fn count_elements(&self) -> usize {
        self.indices
            .as_ref()
            .map(|i| i.len())
            .unwrap_or(self.vertices_count)
    }

    /// Returns number of faces (polygons) in the mesh
    pub fn count_faces(&self) -> usize {
        self.count_elements() / 3
    }

    /// Returns name and format of every attribute in the order they were set
    pub fn attributes(&self) -> Vec<(&'static str, vertex::AttributeFormat)> {
        self.layout
            .iter()
            .filter_map(|t| self.vertices.get(t))
            .map(|values| (values.name, values.format))
            .collect()
    }

    /// Returns vector of vertex buffer data according to layout defined by attributes types
    pub fn buffer<T: VertexBufferLayout>(&self) -> Option<Vec<u8>> {
        self.buffer_from_layout(&T::layout())
    }

    /// Returns interleaved vertex buffer data of all attributes in the order they were set
    pub fn interleaved(&self) -> Vec<u8> {
        self.buffer_from_layout(&self.layout).unwrap_or_default()
    }

    /// Returns vector of vertex buffer data according to layout
    pub fn buffer_from_layout(&self, layout: &[TypeId]) -> Option<Vec<u8>> {
        let attributes = layout
            .iter()
            .map(|t| self.vertices.get(t))
            .collect::<Option<Vec<_>>>()?;

        let buffer = (0..self.vertices_count)
            .flat_map(|i| {
                attributes.iter().flat_map(move |values| {
                    let size = values.format.size();
                    let offset = i * size;
                    values.bytes[offset..offset + size].iter().copied()
                })
            })
            .collect::<Vec<u8>>();

        Some(buffer)
    }
}

struct AttributeValues {
    name: &'static str,
    format: vertex::AttributeFormat,
    bytes: Vec<u8>,
}

/// Vertex buffer layout described by a tuple of attribute types
pub trait VertexBufferLayout {
    /// Returns type ids of the attributes
    fn layout() -> Vec<TypeId>;
}

macro_rules! impl_layout {
    (($($i: ident),*)) => {
        impl<$($i,)*> VertexBufferLayout for ($($i,)*)
        where
            $($i: vertex::Attribute,)*
        {
            fn layout() -> Vec<TypeId> {
                vec![
                    $(TypeId::of::<$i>(),)*
                ]
            }
        }
    }
}

impl_layout!((A));
impl_layout!((A, B));
impl_layout!((A, B, C));

#[cfg(test)]
mod tests {
    use super::*;
    use firmament_types::{Position, TexUV};

    #[test]
    fn interleaves_attributes_in_set_order() {
        let mut mesh = Mesh::new("quad");
        mesh.set_vertices::<Position>(vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        mesh.set_vertices::<TexUV>(vec![[0.0, 1.0], [1.0, 0.0]]);

        let buffer = mesh.buffer::<(Position, TexUV)>().expect("both attributes are set");
        let floats: &[f32] = bytemuck::cast_slice(buffer.as_slice());
        assert_eq!(floats, &[1.0, 2.0, 3.0, 0.0, 1.0, 4.0, 5.0, 6.0, 1.0, 0.0]);
        assert_eq!(mesh.interleaved(), buffer);
        assert_eq!(
            mesh.attributes(),
            vec![
                ("position", vertex::AttributeFormat::Float32x3),
                ("st", vertex::AttributeFormat::Float32x2)
            ]
        );
    }

    #[test]
    fn missing_attribute_gives_no_buffer() {
        let mut mesh = Mesh::new("points");
        mesh.set_vertices::<Position>(vec![[0.0; 3]]);
        assert!(mesh.buffer::<(Position, TexUV)>().is_none());
        assert_eq!(mesh.count_elements(), 1);
    }

    #[test]
    #[should_panic]
    fn attribute_count_mismatch_panics() {
        let mut mesh = Mesh::new("broken");
        mesh.set_vertices::<Position>(vec![[0.0; 3], [1.0; 3]]);
        mesh.set_vertices::<TexUV>(vec![[0.0; 2]]);
    }
}
