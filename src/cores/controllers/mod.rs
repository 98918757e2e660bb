// Copyright (c) 2024 Mike Tsao

pub use chord_glide::{ChordGlideCore, ChordGlideCoreBuilder, ChordGlideEphemerals};
pub use glide_params::{
    ChordGlideError, ChordGlideParams, ChordGlideParamsBuilder, ChordGlideParamsBuilderError,
};

mod chord_glide;
mod glide_params;
