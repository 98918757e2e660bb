// Copyright (c) 2024 Mike Tsao

use super::{time::SampleTime, u7};

/// A single pitched note that arrived at a point on the timeline. Chords keep
/// their notes ordered by [Note::pitch].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Note {
    /// MIDI key number, 0-127.
    pub pitch: u7,
    #[allow(missing_docs)]
    pub velocity: u7,
    /// When the note is meant to sound.
    pub timestamp: SampleTime,
}
impl Note {
    #[allow(missing_docs)]
    pub fn new_with(pitch: u8, velocity: u8, timestamp: SampleTime) -> Self {
        Self {
            pitch: u7::from(pitch),
            velocity: u7::from(velocity),
            timestamp,
        }
    }

    /// The pitch as a plain integer, handy for interval math.
    pub fn key(&self) -> u8 {
        self.pitch.as_int()
    }
}
