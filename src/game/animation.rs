//! Animation clips and playback
//!
//! A clip is the design-time description of an image sequence (how many
//! frames, how many ticks each frame is held). Every clip loops. Bodies own
//! an `Animation`, a playback cursor over one clip, and advance it once per
//! physics update. Images are resolved only at draw time, so the gameplay
//! core never touches textures.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

/// Image sequence definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Number of images in the sequence
    pub frames: u32,
    /// Ticks each image stays on screen
    pub frame_duration: u32,
}

impl AnimationClip {
    /// Single held image (used when a clip is missing)
    pub const STILL: AnimationClip = AnimationClip {
        frames: 1,
        frame_duration: 5,
    };

    pub const fn new(frames: u32, frame_duration: u32) -> Self {
        Self { frames, frame_duration }
    }

    /// Total ticks in one pass through the clip (never zero)
    pub fn total_ticks(&self) -> u32 {
        self.frames.max(1) * self.frame_duration.max(1)
    }
}

impl Default for AnimationClip {
    fn default() -> Self {
        Self::STILL
    }
}

/// All clips, keyed by `"<body kind>/<action>"` (e.g. `"player/run"`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationLibrary {
    clips: BTreeMap<String, AnimationClip>,
}

impl AnimationLibrary {
    /// Empty library (every lookup falls back to a still image)
    pub fn empty() -> Self {
        Self { clips: BTreeMap::new() }
    }

    pub fn insert(&mut self, key: impl Into<String>, clip: AnimationClip) {
        self.clips.insert(key.into(), clip);
    }

    pub fn get(&self, key: &str) -> Option<AnimationClip> {
        self.clips.get(key).copied()
    }

    /// Clip for a key, or a still image with a warning if it is missing
    pub fn clip_or_still(&self, key: &str) -> AnimationClip {
        self.get(key).unwrap_or_else(|| {
            log::warn!("Missing animation clip '{}', using a still image", key);
            AnimationClip::STILL
        })
    }

    /// Replace a clip's frame count with the number of images actually loaded
    pub fn set_frame_count(&mut self, key: &str, frames: u32) {
        if let Some(clip) = self.clips.get_mut(key) {
            clip.frames = frames.max(1);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.clips.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

impl Default for AnimationLibrary {
    /// Clips for the stock character art
    fn default() -> Self {
        let mut lib = Self::empty();
        lib.insert("player/idle", AnimationClip::new(22, 16));
        lib.insert("player/run", AnimationClip::new(8, 6));
        lib.insert("player/jump", AnimationClip::new(1, 5));
        lib.insert("enemy/idle", AnimationClip::new(16, 12));
        lib.insert("enemy/run", AnimationClip::new(8, 12));
        lib
    }
}

/// Playback cursor over one clip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    clip: AnimationClip,
    /// Ticks since the clip started
    tick: u32,
}

impl Animation {
    /// Start a clip from its first frame
    pub fn new(clip: AnimationClip) -> Self {
        Self { clip, tick: 0 }
    }

    /// Advance by one tick, wrapping at the end of the clip
    pub fn update(&mut self) {
        self.tick = (self.tick + 1) % self.clip.total_ticks();
    }

    /// Ticks since the clip started (wraps)
    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Index of the image to draw
    pub fn frame_index(&self) -> usize {
        (self.tick / self.clip.frame_duration.max(1)) as usize
    }
}
