use firmament_log as log;

/// Image in RGBA8 format
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Image name
    pub name: String,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Raw image data
    pub data: Vec<u8>,
}

impl Image {
    /// Constructs a new instance of Image
    pub fn new(name: &str, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            name: String::from(name),
            width,
            height,
            data,
        }
    }

    /// Constructs an image of a single color
    pub fn filled(name: &str, width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        Self::new(name, width, height, data)
    }

    /// Decodes an encoded image of a format defined by the file extension
    pub fn decode(name: &str, extension: &str, data: &[u8]) -> Result<Self, LoadError> {
        let format = image::ImageFormat::from_extension(extension)
            .ok_or_else(|| LoadError::UnsupportedFormat(String::from(extension)))?;
        let img = image::load_from_memory_with_format(data, format)?.into_rgba8();
        let (width, height) = img.dimensions();
        log::debug!("decoded image '{}' {}x{}", name, width, height);
        Ok(Self::new(name, width, height, img.into_vec()))
    }

    /// Reads and decodes an image file
    pub fn open(path: &std::path::Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| LoadError::UnsupportedFormat(path.display().to_string()))?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let data = std::fs::read(path)?;
        Self::decode(name, extension, &data)
    }

    /// Number of bytes one row of pixels takes
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

/// Image loading error
#[derive(Debug)]
pub enum LoadError {
    /// File could not be read
    Io(std::io::Error),
    /// Data could not be decoded
    Decode(image::ImageError),
    /// Extension does not name a known image format
    UnsupportedFormat(String),
}

impl std::error::Error for LoadError {}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "Can't read file ({})", err),
            LoadError::Decode(err) => write!(f, "Can't decode image ({})", err),
            LoadError::UnsupportedFormat(what) => {
                write!(f, "Not supported image format ({:?})", what)
            }
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<image::ImageError> for LoadError {
    fn from(err: image::ImageError) -> Self {
        LoadError::Decode(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageOutputFormat::Png,
            )
            .expect("png to be encoded");
        bytes
    }

    #[test]
    fn decodes_png_into_rgba() {
        let image = Image::decode("px", "png", &png(3, 2)).expect("image to be decoded");
        assert_eq!((image.width, image.height), (3, 2));
        assert_eq!(image.data.len(), 3 * 2 * 4);
        assert_eq!(&image.data[0..4], &[10, 20, 30, 255]);
        assert_eq!(image, Image::filled("px", 3, 2, [10, 20, 30, 255]));
    }

    #[test]
    fn unknown_extension_is_reported() {
        match Image::decode("px", "txt", b"hello") {
            Err(LoadError::UnsupportedFormat(ext)) => assert_eq!(ext, "txt"),
            other => panic!("unexpected result: {:?}", other.map(|i| i.name)),
        }
    }

    #[test]
    fn corrupted_data_is_a_decode_error() {
        assert!(matches!(
            Image::decode("px", "png", b"not a png"),
            Err(LoadError::Decode(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::path::Path::new("definitely/not/here.png");
        assert!(matches!(Image::open(path), Err(LoadError::Io(_))));
    }
}
