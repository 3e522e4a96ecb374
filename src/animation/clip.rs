//! Animation clip and keyframe system

use std::cmp::Ordering;

use glam::{Quat, Vec3};

use crate::core::camera::Camera;

/// Values that can be blended between two keyframes
pub trait Interpolate: Copy {
    /// Blend from `a` to `b`; `t` in [0, 1]
    fn interpolate(a: Self, b: Self, t: f32) -> Self;
}

impl Interpolate for Vec3 {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }
}

impl Interpolate for Quat {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a.slerp(b, t)
    }
}

/// A single value keyed at a specific time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe<T> {
    pub time: f32,
    pub value: T,
}

impl<T> Keyframe<T> {
    pub fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

/// Time-sorted keyframes for one animated property
#[derive(Clone, Debug, PartialEq)]
pub struct Track<T> {
    pub keyframes: Vec<Keyframe<T>>,
}

impl<T: Interpolate> Track<T> {
    /// Create a track from `(time, value)` pairs in any order
    pub fn new(keys: impl IntoIterator<Item = (f32, T)>) -> Self {
        let mut track = Self { keyframes: Vec::new() };
        for (time, value) in keys {
            track.add_keyframe(Keyframe::new(time, value));
        }
        track
    }

    /// Add a keyframe to this track (maintains sorted order by time)
    pub fn add_keyframe(&mut self, keyframe: Keyframe<T>) {
        let pos = self
            .keyframes
            .binary_search_by(|k| k.time.partial_cmp(&keyframe.time).unwrap_or(Ordering::Less))
            .unwrap_or_else(|e| e);
        self.keyframes.insert(pos, keyframe);
    }

    /// Sample at `time`, holding the first/last value outside the keyed range
    pub fn sample(&self, time: f32) -> Option<T> {
        let first = self.keyframes.first()?;
        let last = self.keyframes.last()?;

        if time <= first.time {
            return Some(first.value);
        }
        if time >= last.time {
            return Some(last.value);
        }

        let next_index = self.keyframes.partition_point(|k| k.time <= time);
        let current = &self.keyframes[next_index - 1];
        let next = &self.keyframes[next_index];

        let duration = next.time - current.time;
        let t = if duration > 0.0 {
            (time - current.time) / duration
        } else {
            0.0
        };
        Some(T::interpolate(current.value, next.value, t))
    }

    /// Time of the last keyframe
    pub fn duration(&self) -> f32 {
        self.keyframes.last().map(|k| k.time).unwrap_or(0.0)
    }
}

/// A clip animating a camera's position and orientation
#[derive(Clone, Debug, PartialEq)]
pub struct CameraClip {
    pub name: String,
    pub duration: f32,
    pub position: Option<Track<Vec3>>,
    pub rotation: Option<Track<Quat>>,
}

impl CameraClip {
    /// Create an empty clip
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: 0.0,
            position: None,
            rotation: None,
        }
    }

    pub fn with_position(mut self, track: Track<Vec3>) -> Self {
        self.position = Some(track);
        self.calculate_duration();
        self
    }

    pub fn with_rotation(mut self, track: Track<Quat>) -> Self {
        self.rotation = Some(track);
        self.calculate_duration();
        self
    }

    /// Duration is the latest keyframe across tracks
    pub fn calculate_duration(&mut self) {
        let position = self.position.as_ref().map_or(0.0, Track::duration);
        let rotation = self.rotation.as_ref().map_or(0.0, Track::duration);
        self.duration = position.max(rotation);
    }

    /// Write the sampled pose into the camera
    pub fn apply(&self, time: f32, camera: &mut Camera) {
        let time = time.min(self.duration);
        if let Some(position) = self.position.as_ref().and_then(|t| t.sample(time)) {
            camera.position = position;
        }
        if let Some(rotation) = self.rotation.as_ref().and_then(|t| t.sample(time)) {
            camera.rotation = rotation.normalize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_keeps_time_order() {
        let track = Track::new([(1.0, Vec3::ONE), (0.0, Vec3::ZERO), (0.5, Vec3::X)]);
        let times: Vec<f32> = track.keyframes.iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.0, 0.5, 1.0]);
        assert_eq!(track.duration(), 1.0);
    }

    #[test]
    fn test_track_sample_holds_ends() {
        let track = Track::new([(0.3, Vec3::ZERO), (1.0, Vec3::new(7.0, 0.0, 0.0))]);

        assert_eq!(track.sample(0.0), Some(Vec3::ZERO));
        assert_eq!(track.sample(5.0), Some(Vec3::new(7.0, 0.0, 0.0)));
        let mid = track.sample(0.65).unwrap();
        assert!((mid.x - 3.5).abs() < 1e-4);
    }

    #[test]
    fn test_empty_track_samples_nothing() {
        let track: Track<Vec3> = Track::new([]);
        assert!(track.sample(0.5).is_none());
    }

    #[test]
    fn test_rotation_track_slerps() {
        let end = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let track = Track::new([(0.0, Quat::IDENTITY), (1.0, end)]);
        let mid = track.sample(0.5).unwrap();
        let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
        assert!(mid.angle_between(expected) < 1e-4);
    }

    #[test]
    fn test_clip_duration_spans_tracks() {
        let clip = CameraClip::new("fly")
            .with_rotation(Track::new([(0.0, Quat::IDENTITY), (0.3, Quat::IDENTITY)]))
            .with_position(Track::new([(0.3, Vec3::ZERO), (1.0, Vec3::ONE)]));
        assert_eq!(clip.duration, 1.0);
    }

    #[test]
    fn test_clip_apply_moves_camera() {
        let clip = CameraClip::new("fly")
            .with_position(Track::new([(0.0, Vec3::ZERO), (1.0, Vec3::new(0.0, 10.0, 0.0))]));
        let mut camera = Camera::default();
        clip.apply(0.5, &mut camera);
        assert!((camera.position.y - 5.0).abs() < 1e-4);

        // rotation untouched without a rotation track
        assert_eq!(camera.rotation, Quat::IDENTITY);
    }
}
