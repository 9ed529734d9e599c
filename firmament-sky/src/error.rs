use crate::Face;

/// Skybox error
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Wrong number of face sources
    Configuration { expected: usize, found: usize },
    /// Rendering context failed to create a resource
    Gpu(firmament_gpu::Error),
    /// Geometry creation failed earlier, the skybox never renders
    GeometryUnavailable,
    /// Skybox was used after `destroy`
    Destroyed,
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Configuration { expected, found } => write!(
                f,
                "Skybox requires {} face sources, {} given",
                expected, found
            ),
            Error::Gpu(err) => write!(f, "GPU error: {}", err),
            Error::GeometryUnavailable => write!(f, "Skybox geometry could not be created"),
            Error::Destroyed => write!(f, "Skybox was used after it was destroyed"),
        }
    }
}

impl From<firmament_gpu::Error> for Error {
    fn from(err: firmament_gpu::Error) -> Self {
        Error::Gpu(err)
    }
}

/// Failure of a single face load
#[derive(Debug, Clone, PartialEq)]
pub struct FaceError {
    pub face: Face,
    /// Source identifier of the face
    pub source: String,
    pub reason: String,
}

impl FaceError {
    /// Canonical index of the failed face
    pub fn index(&self) -> usize {
        self.face.index()
    }
}

impl std::error::Error for FaceError {}

impl std::fmt::Display for FaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not load {} face #{} from '{}': {}",
            self.face.name(),
            self.index(),
            self.source,
            self.reason
        )
    }
}
