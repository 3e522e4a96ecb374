//! Keyframed camera animation

pub mod clip;
pub mod mixer;
pub mod fly_to;

pub use clip::{CameraClip, Interpolate, Keyframe, Track};
pub use mixer::{ActionId, AnimationMixer, LoopMode};
pub use fly_to::{FlyTo, FlyToState, fly_to_clip, intro_clip};
