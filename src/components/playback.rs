//! Playback state and the frame clock that drives it.
//!
//! The clock is fed the host's render-loop timestamps (milliseconds). Frames
//! advance only when more than one frame interval has elapsed, so the visual
//! animation rate is independent of the display refresh rate. The remainder
//! of the elapsed time is carried over instead of resetting the phase, which
//! keeps the average rate exact under irregular tick timing.

use bevy_ecs::prelude::Component;
use fastrand::Rng;

use crate::components::spritesheet::AnimationClip;

/// Milliseconds between two frames at `fps`. Non-positive rates never tick.
pub fn frame_interval_ms(fps: f32) -> f64 {
    if fps.is_finite() && fps > 0.0 {
        1000.0 / fps as f64
    } else {
        f64::INFINITY
    }
}

fn clip_frames(clips: &[AnimationClip], index: usize) -> usize {
    clips.get(index).map_or(1, |c| c.frame_count as usize)
}

/// Current clip and frame of the pet.
///
/// `active_clip == None` is the idle state: nothing has been picked yet.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Playback {
    pub active_clip: Option<usize>,
    pub frame_index: usize,
    pub last_tick_ms: Option<f64>,
    /// Total frame steps taken since the last reset.
    pub frames_advanced: u64,
}

/// What a single [`Playback::tick`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockTick {
    pub frames: u64,
    /// Clips started by wrap-arounds during this tick, in order.
    pub started: Vec<usize>,
}

impl Playback {
    pub fn is_playing(&self) -> bool {
        self.active_clip.is_some()
    }

    /// Back to idle, forgetting clip, frame and timing.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Make `index` the active clip from its first frame.
    pub fn start_clip(&mut self, index: usize) {
        self.active_clip = Some(index);
        self.frame_index = 0;
    }

    /// Uniform draw over all `clip_count` clips. Returns the chosen index.
    pub fn pick_clip(&mut self, clip_count: usize, rng: &mut Rng) -> Option<usize> {
        if clip_count == 0 {
            return None;
        }
        let index = rng.usize(..clip_count);
        self.start_clip(index);
        Some(index)
    }

    /// Keep the current frame on screen and restart the phase at `now_ms`.
    pub fn hold(&mut self, now_ms: f64) {
        if self.is_playing() {
            self.last_tick_ms = Some(now_ms);
        }
    }

    /// Advance by the number of whole intervals elapsed since the last step.
    ///
    /// `frames_advanced` always counts every interval, but after a long gap
    /// (a host that stopped calling back while hidden) only one new clip is
    /// drawn instead of replaying every wrap that was missed.
    pub fn tick(
        &mut self,
        now_ms: f64,
        fps: f32,
        clips: &[AnimationClip],
        rng: &mut Rng,
    ) -> ClockTick {
        let mut result = ClockTick::default();
        let Some(mut active) = self.active_clip else {
            return result;
        };
        let last = *self.last_tick_ms.get_or_insert(now_ms);
        let elapsed = now_ms - last;
        let interval = frame_interval_ms(fps);
        if !(elapsed > interval) {
            return result;
        }

        let steps = (elapsed / interval).floor() as u64;
        self.last_tick_ms = Some(now_ms - elapsed % interval);
        self.frames_advanced += steps;
        result.frames = steps;

        // A gap longer than the rest of this clip plus one pass over every
        // clip collapses into a single wrap.
        let remaining = clip_frames(clips, active).saturating_sub(self.frame_index) as u64;
        let pass: u64 = (0..clips.len()).map(|i| clip_frames(clips, i) as u64).sum();
        if steps > remaining + pass.max(1) {
            self.frame_index = 0;
            if let Some(next) = self.pick_clip(clips.len(), rng) {
                result.started.push(next);
            }
            return result;
        }

        for _ in 0..steps {
            self.frame_index += 1;
            if self.frame_index >= clip_frames(clips, active) {
                self.frame_index = 0;
                if let Some(next) = self.pick_clip(clips.len(), rng) {
                    active = next;
                    result.started.push(next);
                }
            }
        }
        result
    }
}
