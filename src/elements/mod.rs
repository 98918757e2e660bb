// Copyright (c) 2024 Mike Tsao

//! Building blocks for the chord-glide engine: channel bookkeeping, voice
//! mapping, chords, gliding voices, and the lookahead queue.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        channels::ChannelAllocator,
        chord::{Chord, ChordSlot},
        gliding_voice::{GlideStep, GlidingVoice},
        lookahead::{BufferedNote, LookaheadBuffer, NoteAction},
        voice_mapping::{VoiceMapping, VoiceMappingStrategy},
    };
}

pub use {
    channels::ChannelAllocator,
    chord::{Chord, ChordSlot},
    gliding_voice::{GlideStep, GlidingVoice},
    lookahead::{BufferedNote, LookaheadBuffer, NoteAction},
    voice_mapping::{VoiceMapping, VoiceMappingStrategy},
};

mod channels;
mod chord;
mod gliding_voice;
mod lookahead;
mod voice_mapping;
