//! Keyframe animation clips
//!
//! Clips are geometry-agnostic: they animate the transform node a tooth is
//! attached to, so the same two clips serve every generated tooth.

use std::f32::consts::{PI, TAU};
use serde::{Serialize, Deserialize};
use dentforge_math::Vec3;

/// Name of the idle display rotation clip
pub const IDLE_ROTATION: &str = "idle_rotation";

/// Name of the selection highlight clip
pub const HIGHLIGHT_PULSE: &str = "highlight_pulse";

/// Seconds for one full idle revolution
pub const IDLE_ROTATION_DURATION: f32 = 8.0;

/// Seconds for one highlight pulse
pub const PULSE_DURATION: f32 = 0.6;

/// Uniform scale at the top of the pulse
pub const PULSE_PEAK_SCALE: f32 = 1.15;

/// Transform channel a track drives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Euler rotation in radians (x, y, z)
    Rotation,
    /// Per-axis scale
    Scale,
}

/// A channel value at a point in time
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Seconds from clip start
    pub time: f32,
    pub value: Vec3,
}

impl Keyframe {
    pub const fn new(time: f32, value: Vec3) -> Self {
        Self { time, value }
    }
}

/// Keyframes for one channel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationTrack {
    pub channel: Channel,
    pub keyframes: Vec<Keyframe>,
}

impl AnimationTrack {
    pub fn new(channel: Channel, keyframes: Vec<Keyframe>) -> Self {
        Self { channel, keyframes }
    }

    /// Interpolated value at `time` (already mapped into the clip range)
    fn sample(&self, time: f32) -> Option<Vec3> {
        let first = self.keyframes.first()?;
        if time <= first.time {
            return Some(first.value);
        }
        for pair in self.keyframes.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if time <= b.time {
                let t = (time - a.time) / (b.time - a.time);
                return Some(a.value.lerp(b.value, t));
            }
        }
        self.keyframes.last().map(|k| k.value)
    }
}

/// A named, fixed-duration keyframe clip
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    name: String,
    /// Clip length in seconds
    duration: f32,
    /// Whether playback wraps around at the end
    looping: bool,
    tracks: Vec<AnimationTrack>,
}

impl AnimationClip {
    /// Create an empty clip
    pub fn new(name: impl Into<String>, duration: f32, looping: bool) -> Self {
        Self {
            name: name.into(),
            duration,
            looping,
            tracks: Vec::new(),
        }
    }

    /// Add a track (builder style)
    pub fn with_track(mut self, track: AnimationTrack) -> Self {
        self.tracks.push(track);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn tracks(&self) -> &[AnimationTrack] {
        &self.tracks
    }

    /// Get the track driving a channel, if any
    pub fn track(&self, channel: Channel) -> Option<&AnimationTrack> {
        self.tracks.iter().find(|t| t.channel == channel)
    }

    /// Evaluate a channel at `time` seconds
    ///
    /// Looping clips wrap `time` into the clip; one-shot clips clamp it.
    /// Returns `None` if the clip has no keyframes for the channel.
    pub fn sample(&self, channel: Channel, time: f32) -> Option<Vec3> {
        let local = if self.looping && self.duration > 0.0 {
            time.rem_euclid(self.duration)
        } else {
            time.clamp(0.0, self.duration)
        };
        self.track(channel)?.sample(local)
    }

    /// Check structural invariants
    ///
    /// At least one track; every track non-empty, starting at 0, strictly
    /// increasing in time and ending at the clip duration.
    pub fn is_well_formed(&self) -> bool {
        self.duration > 0.0
            && !self.tracks.is_empty()
            && self.tracks.iter().all(|track| {
                let keys = &track.keyframes;
                !keys.is_empty()
                    && keys[0].time == 0.0
                    && keys[keys.len() - 1].time == self.duration
                    && keys.windows(2).all(|w| w[0].time < w[1].time)
                    && keys.iter().all(|k| k.value.is_finite())
            })
    }
}

/// The two clips every generated tooth carries
///
/// 1. [`IDLE_ROTATION`]: one full turn about Y, looping.
/// 2. [`HIGHLIGHT_PULSE`]: brief uniform scale up and back, one-shot.
pub fn standard_animations() -> Vec<AnimationClip> {
    vec![idle_rotation(), highlight_pulse()]
}

fn idle_rotation() -> AnimationClip {
    let quarter = IDLE_ROTATION_DURATION / 4.0;
    let keyframes = (0..=4)
        .map(|i| {
            let angle = i as f32 * PI / 2.0;
            Keyframe::new(i as f32 * quarter, Vec3::new(0.0, angle, 0.0))
        })
        .collect();
    AnimationClip::new(IDLE_ROTATION, IDLE_ROTATION_DURATION, true)
        .with_track(AnimationTrack::new(Channel::Rotation, keyframes))
}

fn highlight_pulse() -> AnimationClip {
    let keyframes = vec![
        Keyframe::new(0.0, Vec3::ONE),
        Keyframe::new(PULSE_DURATION / 2.0, Vec3::splat(PULSE_PEAK_SCALE)),
        Keyframe::new(PULSE_DURATION, Vec3::ONE),
    ];
    AnimationClip::new(HIGHLIGHT_PULSE, PULSE_DURATION, false)
        .with_track(AnimationTrack::new(Channel::Scale, keyframes))
}

/// True if two angles differ by a whole number of turns
pub fn congruent_angles(a: f32, b: f32) -> bool {
    let turns = (b - a) / TAU;
    (turns - turns.round()).abs() < 1e-5
}
