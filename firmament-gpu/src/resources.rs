use firmament_image::Image;
use firmament_mesh::Mesh;

/// Cube map texture handle marker
pub struct CubeMap;

/// Vertex array handle marker
pub struct VertexArray;

/// Shader program handle marker
pub struct ShaderProgram;

/// Render state handle marker
pub struct RenderState;

/// Texel channel layout
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub enum PixelFormat {
    /// Red, green and blue
    Rgb,
    /// Red, green, blue and alpha
    Rgba,
}

/// Texel channel type
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub enum PixelDatatype {
    /// One normalized byte per channel
    UnsignedByte,
    /// One f32 per channel
    Float,
}

impl PixelFormat {
    /// Number of channels
    pub fn channels(self) -> u32 {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

impl PixelDatatype {
    /// Size of one channel in bytes
    pub fn size(self) -> u32 {
        match self {
            PixelDatatype::UnsignedByte => 1,
            PixelDatatype::Float => 4,
        }
    }
}

/// Six images of a cube map, one per axis direction
#[derive(Debug, Copy, Clone)]
pub struct CubeMapSource<'a> {
    pub positive_x: &'a Image,
    pub negative_x: &'a Image,
    pub positive_y: &'a Image,
    pub negative_y: &'a Image,
    pub positive_z: &'a Image,
    pub negative_z: &'a Image,
}

impl<'a> CubeMapSource<'a> {
    /// Returns images in the order of cube texture layers
    pub fn layers(&self) -> [&'a Image; 6] {
        [
            self.positive_x,
            self.negative_x,
            self.positive_y,
            self.negative_y,
            self.positive_z,
            self.negative_z,
        ]
    }
}

impl<'a> From<&'a [Image; 6]> for CubeMapSource<'a> {
    fn from(images: &'a [Image; 6]) -> Self {
        let [positive_x, negative_x, positive_y, negative_y, positive_z, negative_z] = images;
        Self {
            positive_x,
            negative_x,
            positive_y,
            negative_y,
            positive_z,
            negative_z,
        }
    }
}

/// Parameters of a cube map creation
pub struct CubeMapDescriptor<'a> {
    pub label: &'a str,
    pub source: CubeMapSource<'a>,
    /// Width of every face
    pub width: u32,
    /// Height of every face
    pub height: u32,
    pub pixel_format: PixelFormat,
    pub pixel_datatype: PixelDatatype,
}

impl<'a> CubeMapDescriptor<'a> {
    /// Number of bytes a single face must provide
    pub fn face_size(&self) -> usize {
        self.width as usize
            * self.height as usize
            * (self.pixel_format.channels() * self.pixel_datatype.size()) as usize
    }

    /// First face whose data is not exactly `face_size` bytes long
    pub fn mismatched_face(&self) -> Option<&'a Image> {
        let face_size = self.face_size();
        self.source
            .layers()
            .into_iter()
            .find(|image| image.data.len() != face_size)
    }
}

/// Expected update frequency of a buffer
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum BufferUsage {
    /// Written once, drawn many times
    StaticDraw,
    /// Written repeatedly, drawn many times
    DynamicDraw,
    /// Written once, drawn a few times
    StreamDraw,
}

/// Shader input location of every named vertex attribute
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct AttributeLocations {
    locations: Vec<(String, u32)>,
}

impl AttributeLocations {
    /// Assigns locations to the attributes of the mesh in their layout order
    pub fn from_mesh(mesh: &Mesh) -> Self {
        Self {
            locations: mesh
                .attributes()
                .into_iter()
                .enumerate()
                .map(|(location, (name, _))| (String::from(name), location as u32))
                .collect(),
        }
    }

    /// Binds the attribute to a location
    #[must_use]
    pub fn with(mut self, name: &str, location: u32) -> Self {
        self.locations.retain(|(n, _)| n != name);
        self.locations.push((String::from(name), location));
        self
    }

    /// Location of the attribute
    pub fn get(&self, name: &str) -> Option<u32> {
        self.locations
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, location)| *location)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.locations.iter().map(|(n, l)| (n.as_str(), *l))
    }
}

/// Parameters of a vertex array creation
pub struct VertexArrayDescriptor<'a> {
    pub label: &'a str,
    pub mesh: &'a Mesh,
    pub attribute_locations: &'a AttributeLocations,
    pub usage: BufferUsage,
}

/// Polygon side to discard
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub enum CullFace {
    Front,
    Back,
}

/// Fixed function state of a draw
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub struct RenderStateDescriptor {
    /// Test fragments against the depth buffer
    pub depth_test: bool,
    /// Write fragment depth into the depth buffer
    pub depth_mask: bool,
    /// Discarded polygon side, if any
    pub cull: Option<CullFace>,
}

impl Default for RenderStateDescriptor {
    fn default() -> Self {
        Self {
            depth_test: false,
            depth_mask: true,
            cull: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firmament_types::{Position, TexUV};

    #[test]
    fn locations_follow_mesh_layout() {
        let mut mesh = Mesh::new("quad");
        mesh.set_vertices::<Position>(vec![[0.0; 3]]);
        mesh.set_vertices::<TexUV>(vec![[0.0; 2]]);

        let locations = AttributeLocations::from_mesh(&mesh);
        assert_eq!(locations.get("position"), Some(0));
        assert_eq!(locations.get("st"), Some(1));
        assert_eq!(locations.get("normal"), None);

        let locations = locations.with("st", 4);
        assert_eq!(locations.get("st"), Some(4));
        assert_eq!(locations.iter().count(), 2);
    }

    #[test]
    fn source_layers_keep_axis_order() {
        let images = [
            Image::filled("px", 1, 1, [1, 0, 0, 255]),
            Image::filled("nx", 1, 1, [2, 0, 0, 255]),
            Image::filled("py", 1, 1, [3, 0, 0, 255]),
            Image::filled("ny", 1, 1, [4, 0, 0, 255]),
            Image::filled("pz", 1, 1, [5, 0, 0, 255]),
            Image::filled("nz", 1, 1, [6, 0, 0, 255]),
        ];
        let source = CubeMapSource::from(&images);
        let names = source
            .layers()
            .iter()
            .map(|image| image.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["px", "nx", "py", "ny", "pz", "nz"]);

        let descriptor = CubeMapDescriptor {
            label: "sky",
            source,
            width: 1,
            height: 1,
            pixel_format: PixelFormat::Rgba,
            pixel_datatype: PixelDatatype::UnsignedByte,
        };
        assert_eq!(descriptor.face_size(), 4);
        assert!(descriptor.mismatched_face().is_none());
    }

    #[test]
    fn faces_larger_or_smaller_than_the_first_mismatch() {
        let mut images = [1, 1, 1, 1, 1, 1].map(|size| Image::filled("face", size, size, [0; 4]));
        images[3] = Image::filled("ny", 2, 2, [0; 4]);
        let descriptor = CubeMapDescriptor {
            label: "sky",
            source: CubeMapSource::from(&images),
            width: 1,
            height: 1,
            pixel_format: PixelFormat::Rgba,
            pixel_datatype: PixelDatatype::UnsignedByte,
        };
        assert_eq!(descriptor.mismatched_face().map(|image| image.name.as_str()), Some("ny"));

        let descriptor = CubeMapDescriptor {
            width: 2,
            height: 2,
            ..descriptor
        };
        assert_eq!(descriptor.mismatched_face().map(|image| image.name.as_str()), Some("face"));
    }
}
