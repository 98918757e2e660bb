// Copyright (c) 2024 Mike Tsao

//! Musical devices without any host plumbing. A host-integration layer wraps
//! a core and feeds it blocks of MIDI.

pub use controllers::*;

mod controllers;
