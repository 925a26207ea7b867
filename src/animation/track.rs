//! Keyframe storage for one animatable attribute.
//!
//! A [`KeyframeTrack`] is an ordered list of (step, value) samples, unique
//! per step, that always contains an anchor key at step 1. Cameras own one
//! track per animated attribute (position, target, up vector) and sample
//! them when settling their pose.

use glam::Vec3;

/// Discrete animation time unit. Keyframes are anchored at steps; step 0 is
/// not used by the editor timeline.
pub type Step = u32;

/// Largest representable step. Timeline inserts clamp here.
pub const STEP_MAX: Step = Step::MAX;

/// Linear interpolation between two attribute values.
pub trait Interpolate: Copy {
    /// Interpolate from `self` toward `other` by `t` in `[0, 1]`.
    fn interpolate(self, other: Self, t: f32) -> Self;
}

impl Interpolate for Vec3 {
    #[inline]
    fn interpolate(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }
}

/// One stored sample of an animated attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T> {
    /// Step the value is anchored at.
    pub step: Step,
    /// Stored attribute value.
    pub value: T,
}

/// Ordered, step-indexed keyframe list for one camera attribute.
///
/// Invariants: keys are strictly ordered by step, at most one key per step,
/// and the list is never empty — the key at step 1 is pinned and survives
/// every timeline edit.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack<T> {
    keys: Vec<Keyframe<T>>,
}

impl<T: Interpolate> KeyframeTrack<T> {
    /// Create a track holding a single anchor key `(1, value)`.
    pub fn new(value: T) -> Self {
        Self {
            keys: vec![Keyframe { step: 1, value }],
        }
    }

    /// Stored keys, ordered by step.
    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    /// Commit a value. With `add_key` the value is inserted at `step`
    /// (overwriting a key already there); without it the whole track
    /// collapses to the single key `(1, value)`.
    pub fn change_key(&mut self, value: T, step: Step, add_key: bool) {
        if !add_key {
            self.keys.clear();
            self.keys.push(Keyframe { step: 1, value });
            return;
        }

        match self.keys.binary_search_by(|key| key.step.cmp(&step)) {
            Ok(idx) => self.keys[idx].value = value,
            Err(idx) => self.keys.insert(idx, Keyframe { step, value }),
        }
    }

    /// Sample the track at `step`: the stored value on an exact hit, linear
    /// interpolation between the neighboring keys otherwise, clamped to the
    /// nearest key outside the keyed range.
    pub fn sample(&self, step: Step) -> T {
        let first = self.keys[0];
        if step <= first.step {
            return first.value;
        }

        let mut prev = first;
        for &key in &self.keys {
            if key.step == step {
                return key.value;
            }
            if key.step > step {
                let t = (step - prev.step) as f32 / (key.step - prev.step) as f32;
                return prev.value.interpolate(key.value, t);
            }
            prev = key;
        }
        prev.value
    }

    /// Shift keys at or after `start` later by `count` steps (timeline
    /// insertion). The anchor key at step 1 never moves; keys pushed past
    /// [`STEP_MAX`] collapse onto it and later keys in the sweep are
    /// dropped.
    pub fn insert_time(&mut self, start: Step, count: Step) {
        let mut saturated = false;
        let mut idx = 0;
        while idx < self.keys.len() {
            let step = self.keys[idx].step;
            if step < start || step == 1 {
                idx += 1;
                continue;
            }
            if saturated {
                let _ = self.keys.remove(idx);
                continue;
            }
            if step >= STEP_MAX - count {
                self.keys[idx].step = STEP_MAX;
                saturated = true;
            } else {
                self.keys[idx].step = step + count;
            }
            idx += 1;
        }
    }

    /// Shift keys at or after `start` earlier by `count` steps (timeline
    /// removal). Keys inside the removed window `[start, start + count)` are
    /// deleted; the anchor key at step 1 never moves. If a sweep would empty
    /// the track, a single key at step 1 is re-anchored from the last
    /// removed value.
    pub fn remove_time(&mut self, start: Step, count: Step) {
        let mut removed = None;
        let mut idx = 0;
        while idx < self.keys.len() {
            let step = self.keys[idx].step;
            if step < start || step == 1 {
                idx += 1;
                continue;
            }
            if step < start.saturating_add(count) {
                removed = Some(self.keys.remove(idx));
                continue;
            }
            self.keys[idx].step = step - count;
            idx += 1;
        }
        if self.keys.is_empty() {
            if let Some(key) = removed {
                self.keys.push(Keyframe { step: 1, value: key.value });
            }
        }
    }

    /// Collapse the track to the single key `(1, value)`.
    pub fn reset(&mut self, value: T) {
        self.keys.clear();
        self.keys.push(Keyframe { step: 1, value });
    }
}
