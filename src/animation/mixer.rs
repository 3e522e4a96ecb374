//! Runtime clip playback for the camera

use crate::core::camera::Camera;

use super::clip::CameraClip;

/// Handle to a playing clip
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActionId(pub u64);

/// What happens when playback reaches the end of a clip
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopMode {
    /// Stop and report the action as finished
    #[default]
    Once,
    /// Wrap around forever
    Repeat,
}

/// Playback state of one clip
#[derive(Clone, Debug)]
struct ClipAction {
    id: ActionId,
    clip: CameraClip,
    time: f32,
    speed: f32,
    loop_mode: LoopMode,
}

/// Advances camera clips and reports the ones that finished
#[derive(Default)]
pub struct AnimationMixer {
    actions: Vec<ClipAction>,
    next_id: u64,
}

impl AnimationMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start playing a clip from its beginning
    pub fn play(&mut self, clip: CameraClip, loop_mode: LoopMode) -> ActionId {
        let id = ActionId(self.next_id);
        self.next_id += 1;
        log::debug!("Mixer: playing '{}' ({:.2}s, {:?})", clip.name, clip.duration, loop_mode);
        self.actions.push(ClipAction {
            id,
            clip,
            time: 0.0,
            speed: 1.0,
            loop_mode,
        });
        id
    }

    /// Stop an action without reporting it as finished
    pub fn stop(&mut self, id: ActionId) {
        self.actions.retain(|a| a.id != id);
    }

    /// True while any action is active
    pub fn is_playing(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Current playback time of an action
    pub fn action_time(&self, id: ActionId) -> Option<f32> {
        self.actions.iter().find(|a| a.id == id).map(|a| a.time)
    }

    /// Advance every action by `delta` seconds and pose the camera.
    /// Actions are applied in start order, so later ones win.
    /// Returns the `Once` actions that reached their end this update.
    pub fn update(&mut self, delta: f32, camera: &mut Camera) -> Vec<ActionId> {
        let mut finished = Vec::new();

        for action in &mut self.actions {
            action.time += delta * action.speed;
            let duration = action.clip.duration;

            match action.loop_mode {
                LoopMode::Repeat if duration > 0.0 => {
                    action.time %= duration;
                }
                LoopMode::Repeat => {}
                LoopMode::Once => {
                    if action.time >= duration {
                        action.time = duration;
                        finished.push(action.id);
                    }
                }
            }

            action.clip.apply(action.time, camera);
        }

        self.actions.retain(|a| !finished.contains(&a.id));
        finished
    }
}
