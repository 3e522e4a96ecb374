//! Camera fly-to sequencing

use glam::{Quat, Vec3};

use crate::core::camera::{Camera, look_at_rotation};
use crate::core::config::FlyToConfig;

use super::clip::{CameraClip, Track};
use super::mixer::{ActionId, AnimationMixer, LoopMode};

/// Clip that turns the camera towards `target`, then moves onto it
pub fn fly_to_clip(camera: &Camera, target: Vec3, config: &FlyToConfig) -> CameraClip {
    let facing = look_at_rotation(camera.position, target, camera.up);
    CameraClip::new("fly_to")
        .with_position(Track::new([
            (config.move_start, camera.position),
            (config.move_end, target),
        ]))
        .with_rotation(Track::new([
            (config.turn_start, camera.rotation),
            (config.turn_end, facing),
        ]))
}

/// Two second descent from high above the scene
pub fn intro_clip() -> CameraClip {
    CameraClip::new("intro")
        .with_position(Track::new([
            (0.0, Vec3::new(0.0, 800.0, 200.0)),
            (2.0, Vec3::new(0.0, 0.0, 200.0)),
        ]))
        .with_rotation(Track::new([
            (0.0, Quat::from_xyzw(-0.7, 0.0, 0.0, 0.7).normalize()),
            (2.0, Quat::IDENTITY),
        ]))
}

/// Where the camera sequencer is
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FlyToState {
    #[default]
    Idle,
    /// A clip is playing; `href` is opened when it ends
    Animating { action: ActionId, href: Option<String> },
}

/// One-at-a-time camera animation with a completion target.
///
/// Requests made while a clip is playing are rejected.
#[derive(Debug, Default)]
pub struct FlyTo {
    state: FlyToState,
}

impl FlyTo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FlyToState {
        &self.state
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, FlyToState::Animating { .. })
    }

    /// Play `clip` once. Returns `None` when a clip is already playing.
    pub fn start(
        &mut self,
        mixer: &mut AnimationMixer,
        clip: CameraClip,
        href: Option<String>,
    ) -> Option<ActionId> {
        if let FlyToState::Animating { href: current, .. } = &self.state {
            log::debug!(
                "FlyTo: '{}' rejected, still animating towards {:?}",
                clip.name,
                current
            );
            return None;
        }

        let action = mixer.play(clip, LoopMode::Once);
        self.state = FlyToState::Animating { action, href };
        Some(action)
    }

    /// Feed the mixer's finished actions. Returns to `Idle` when ours is
    /// among them and yields the navigation target, if any.
    pub fn on_finished(&mut self, finished: &[ActionId]) -> Option<String> {
        let FlyToState::Animating { action, .. } = &self.state else {
            return None;
        };
        if !finished.contains(action) {
            return None;
        }

        match std::mem::take(&mut self.state) {
            FlyToState::Animating { href, .. } => href,
            FlyToState::Idle => None,
        }
    }
}
