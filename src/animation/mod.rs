//! Step-indexed keyframe animation for camera attributes.

mod track;

pub use track::{Interpolate, Keyframe, KeyframeTrack, Step, STEP_MAX};
