//! Per-frame state handed to renderable objects

use std::time::SystemTime;

/// Scene projection mode
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum SceneMode {
    /// Flat map
    Scene2D,
    /// 2.5D map
    ColumbusView,
    /// Full 3D perspective
    Scene3D,
    /// Transition between modes
    Morphing,
}

/// Render passes requested for the frame
#[derive(Debug, Default, Eq, PartialEq, Copy, Clone)]
pub struct Passes {
    /// Color pass
    pub color: bool,
    /// Picking pass
    pub pick: bool,
}

/// State of the frame being prepared
#[derive(Debug, Clone)]
pub struct FrameState {
    /// Active scene mode
    pub mode: SceneMode,
    /// Requested passes
    pub passes: Passes,
    /// Scene time
    pub time: SystemTime,
    /// Frame number
    pub number: u64,
}

impl FrameState {
    /// Constructs a 3D frame with the color pass requested
    pub fn new(time: SystemTime) -> Self {
        Self {
            mode: SceneMode::Scene3D,
            passes: Passes {
                color: true,
                pick: false,
            },
            time,
            number: 0,
        }
    }
}

impl Default for FrameState {
    fn default() -> Self {
        Self::new(SystemTime::now())
    }
}
