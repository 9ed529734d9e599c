//! Asynchronous loading of the six cube faces

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use firmament_image::Image;
use firmament_log as log;

use crate::{FaceError, SkyBoxSpec};

/// Number of cube faces
pub const FACES_COUNT: usize = 6;

/// Cube face in the canonical order of cube map layers
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub enum Face {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl Face {
    /// All faces in canonical order
    pub const ALL: [Face; FACES_COUNT] = [
        Face::PositiveX,
        Face::NegativeX,
        Face::PositiveY,
        Face::NegativeY,
        Face::PositiveZ,
        Face::NegativeZ,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Face::PositiveX => "positiveX",
            Face::NegativeX => "negativeX",
            Face::PositiveY => "positiveY",
            Face::NegativeY => "negativeY",
            Face::PositiveZ => "positiveZ",
            Face::NegativeZ => "negativeZ",
        }
    }
}

enum Event {
    Loaded(Face, Image),
    Failed(FaceError),
}

/// One-shot report of a face fetch
///
/// Dropping it without resolving leaves the face unloaded forever.
pub struct Completion {
    face: Face,
    source: String,
    sender: mpsc::Sender<Event>,
}

impl Completion {
    pub fn face(&self) -> Face {
        self.face
    }

    /// Source identifier of the face
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Reports the decoded face
    pub fn resolve(self, image: Image) {
        let face = self.face;
        if self.sender.send(Event::Loaded(face, image)).is_err() {
            log::debug!("{} face arrived after the skybox was gone", face.name());
        }
    }

    /// Reports a failed face
    pub fn reject(self, reason: impl std::fmt::Display) {
        let error = FaceError {
            face: self.face,
            source: self.source,
            reason: reason.to_string(),
        };
        if self.sender.send(Event::Failed(error)).is_err() {
            log::debug!("{} face failed after the skybox was gone", self.face.name());
        }
    }
}

/// Source of face images
///
/// Implementations start the fetch and return immediately, the result is reported through the
/// completion at any later time and from any thread.
pub trait Fetch {
    fn fetch(&self, completion: Completion);
}

/// Fetcher reading image files, one thread per face
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    /// Constructs a fetcher resolving sources relative to the root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Fetch for FileFetcher {
    fn fetch(&self, completion: Completion) {
        let path = self.root.join(completion.source());
        let face = completion.face();

        let spawned = thread::Builder::new()
            .name(format!("firmament::sky::fetch[{}]", face.name()))
            .spawn(move || match Image::open(&path) {
                Ok(image) => completion.resolve(image),
                Err(err) => completion.reject(err),
            });

        if let Err(err) = spawned {
            log::error!("could not spawn a thread for {} face: {}", face.name(), err);
        }
    }
}

/// Completion tracking of the faces
#[derive(Default)]
pub struct LoadState {
    loaded: usize,
    images: [Option<Image>; FACES_COUNT],
    error: Option<FaceError>,
}

impl LoadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the result of a face fetch
    ///
    /// Returns the complete set of faces once, from the call storing the last missing one.
    pub fn record(&mut self, face: Face, result: Result<Image, FaceError>) -> Option<[Image; 6]> {
        if self.loaded == FACES_COUNT {
            log::debug!("{} face ignored, cube map faces are complete", face.name());
            return None;
        }

        let image = match result {
            Ok(image) => image,
            Err(error) => {
                log::warn!("{}", error);
                self.error = Some(error);
                return None;
            }
        };

        let slot = &mut self.images[face.index()];
        if slot.is_some() {
            log::warn!("{} face was loaded twice", face.name());
            return None;
        }

        log::debug!("{} face loaded: {}x{}", face.name(), image.width, image.height);
        *slot = Some(image);
        self.loaded += 1;

        if self.loaded < FACES_COUNT {
            return None;
        }

        self.images
            .iter_mut()
            .map(Option::take)
            .collect::<Option<Vec<_>>>()
            .and_then(|images| images.try_into().ok())
    }

    /// Number of faces loaded successfully
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn is_complete(&self) -> bool {
        self.loaded == FACES_COUNT
    }

    /// Last face failure
    pub fn error(&self) -> Option<&FaceError> {
        self.error.as_ref()
    }
}

/// Fires the six face fetches and collects their completions
#[derive(Default)]
pub struct CubeFaceLoader {
    state: LoadState,
    receiver: Option<mpsc::Receiver<Event>>,
    launched: bool,
}

impl CubeFaceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts fetching every face, only the first call has an effect
    pub fn launch(&mut self, spec: &SkyBoxSpec, fetcher: &dyn Fetch) {
        if self.launched {
            return;
        }
        self.launched = true;

        let (sender, receiver) = mpsc::channel();
        self.receiver = Some(receiver);

        for face in Face::ALL {
            fetcher.fetch(Completion {
                face,
                source: String::from(spec.source(face)),
                sender: sender.clone(),
            });
        }
    }

    pub fn is_launched(&self) -> bool {
        self.launched
    }

    /// Applies completions received so far, returning the faces once all six are loaded
    pub fn poll(&mut self) -> Option<[Image; 6]> {
        let receiver = self.receiver.as_ref()?;
        let mut ready = None;

        while let Ok(event) = receiver.try_recv() {
            let complete = match event {
                Event::Loaded(face, image) => self.state.record(face, Ok(image)),
                Event::Failed(error) => self.state.record(error.face, Err(error)),
            };
            if complete.is_some() {
                ready = complete;
            }
        }

        ready
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Stops receiving completions, late ones are dropped by their senders
    pub fn shutdown(&mut self) {
        self.receiver = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn image(name: &str) -> Image {
        Image::filled(name, 1, 1, [0, 0, 0, 255])
    }

    fn spec() -> SkyBoxSpec {
        SkyBoxSpec::new(["px", "nx", "py", "ny", "pz", "nz"]).expect("six sources")
    }

    #[derive(Default)]
    struct Deferred {
        completions: RefCell<Vec<Completion>>,
    }

    impl Fetch for Deferred {
        fn fetch(&self, completion: Completion) {
            self.completions.borrow_mut().push(completion);
        }
    }

    #[test]
    fn sixth_success_completes_faces_once() {
        let mut state = LoadState::new();
        let order = [
            Face::NegativeZ,
            Face::PositiveY,
            Face::PositiveX,
            Face::NegativeX,
            Face::PositiveZ,
        ];
        for face in order {
            assert!(state.record(face, Ok(image(face.name()))).is_none());
        }
        assert_eq!(state.loaded(), 5);

        let faces = state
            .record(Face::NegativeY, Ok(image("negativeY")))
            .expect("all faces are loaded");
        for face in Face::ALL {
            assert_eq!(faces[face.index()].name, face.name());
        }
        assert!(state.is_complete());
        assert!(state
            .record(Face::PositiveX, Ok(image("positiveX")))
            .is_none());
    }

    #[test]
    fn failure_is_recorded_without_counting() {
        let mut state = LoadState::new();
        let error = FaceError {
            face: Face::PositiveY,
            source: String::from("py.png"),
            reason: String::from("not found"),
        };
        assert!(state.record(Face::PositiveY, Err(error.clone())).is_none());
        assert_eq!(state.loaded(), 0);
        assert_eq!(state.error(), Some(&error));
        assert_eq!(error.index(), 2);

        assert!(state.record(Face::PositiveX, Ok(image("a"))).is_none());
        assert!(state.record(Face::PositiveX, Ok(image("b"))).is_none());
        assert_eq!(state.loaded(), 1);
    }

    #[test]
    fn loader_launches_once_and_collects_completions() {
        let fetcher = Deferred::default();
        let mut loader = CubeFaceLoader::new();
        assert!(loader.poll().is_none());

        loader.launch(&spec(), &fetcher);
        loader.launch(&spec(), &fetcher);
        assert!(loader.is_launched());

        let completions = fetcher.completions.take();
        assert_eq!(completions.len(), FACES_COUNT);
        assert_eq!(completions[3].source(), "ny");

        for completion in completions.into_iter().rev() {
            let name = completion.face().name();
            completion.resolve(image(name));
        }
        let faces = loader.poll().expect("every face resolved");
        assert_eq!(faces[0].name, "positiveX");
        assert!(loader.poll().is_none());
    }

    #[test]
    fn completions_after_shutdown_are_dropped() {
        let fetcher = Deferred::default();
        let mut loader = CubeFaceLoader::new();
        loader.launch(&spec(), &fetcher);
        loader.shutdown();

        for completion in fetcher.completions.take() {
            completion.reject("too late");
        }
        assert!(loader.poll().is_none());
        assert!(loader.state().error().is_none());
    }
}
