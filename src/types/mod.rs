// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the system.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        MidiChannel, MidiEvent, MidiMessage, Note, PitchBendRange, SampleRate, SampleTime, Seconds,
    };
}

pub use {
    midi::{u14, u4, u7, MidiChannel, MidiEvent, MidiMessage, PitchBend, PitchBendRange},
    note::Note,
    time::{SampleRate, SampleTime, Seconds},
};

mod midi;
mod note;
mod time;
