// Copyright (c) 2024 Mike Tsao

#![deny(missing_docs, unused_imports, unused_variables)]
#![allow(rustdoc::private_intra_doc_links)]

//! Chord Glide is the engine of a real-time MIDI effect. It listens for
//! chords and, when a new chord follows the one being held, slides each
//! voice of the old chord into a note of the new one using per-channel pitch
//! bend, in the style of MIDI Polyphonic Expression (MPE).
//!
//! * Most users want [ChordGlideCore](cores::ChordGlideCore), driven through
//!   the [ProcessesMidiBlock](traits::ProcessesMidiBlock) trait once per host
//!   block.
//! * The building blocks it's made of (channel allocation, voice mapping,
//!   gliding voices) live in [elements] and can be used on their own.

/// A collection of imports that are useful to users of this crate. `use
/// chord_glide::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        cores::{ChordGlideCore, ChordGlideCoreBuilder, ChordGlideParams, ChordGlideParamsBuilder},
        elements::prelude::*,
        traits::prelude::*,
        types::prelude::*,
        util::prelude::*,
    };
}

pub mod cores;
pub mod elements;
pub mod traits;
pub mod types;
pub mod util;
