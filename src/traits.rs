// Copyright (c) 2024 Mike Tsao

//! The traits that define how the engine meets its host.

use crate::types::{MidiEvent, SampleRate};

/// Quick import of all important traits.
pub mod prelude {
    pub use super::{Configurable, Configurables, ProcessesMidiBlock};
}

/// A convenience struct for the fields implied by [Configurable]. Note that
/// this struct is not serde-compliant, because these fields typically aren't
/// meant to be serialized.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Configurables {
    sample_rate: SampleRate,
}
impl Configurable for Configurables {
    fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    fn update_sample_rate(&mut self, sample_rate: SampleRate) {
        self.sample_rate = sample_rate
    }
}

/// Something that is [Configurable] is interested in staying in sync with
/// global configuration.
pub trait Configurable {
    /// Returns this item's sample rate.
    fn sample_rate(&self) -> SampleRate;

    /// The sample rate changed.
    #[allow(unused_variables)]
    fn update_sample_rate(&mut self, sample_rate: SampleRate) {}

    /// Sent to indicate that it's time to reset internal state without
    /// changing configuration.
    fn reset(&mut self) {}
}

/// A MIDI effect that runs once per host block: it consumes the block's
/// input events and replaces them with its own.
///
/// The host-integration layer drives implementers from its real-time
/// callback. Implementations must not block, lock, or grow without bound.
pub trait ProcessesMidiBlock: Configurable {
    /// Re-initializes all state. Must be called before the first
    /// [ProcessesMidiBlock::process_block()].
    fn prepare(&mut self, sample_rate: SampleRate, lookahead_samples: usize);

    /// Consumes `input` (events for a block of `block_size` samples, with
    /// offsets relative to the start of the block) and fills `output` with
    /// the events that replace them. `output` is cleared first.
    fn process_block(&mut self, input: &[MidiEvent], block_size: usize, output: &mut Vec<MidiEvent>);

    /// The number of samples of delay the host must compensate for.
    fn latency_samples(&self) -> usize;
}
