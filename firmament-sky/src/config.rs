use std::path::PathBuf;

/// Skybox configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Full edge length of the box
    pub size: f32,
    /// Base directory of relative face sources, used by `SkyBox::new` to set up its
    /// `FileFetcher`
    pub root: PathBuf,
    /// Label prefix of the GPU objects
    pub label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: 100_000_000.0,
            root: PathBuf::from("./"),
            label: String::from("firmament::sky"),
        }
    }
}
