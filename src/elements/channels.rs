// Copyright (c) 2024 Mike Tsao

use crate::types::MidiChannel;
use bit_vec::BitVec;

/// [ChannelAllocator] hands out the member channels of an MPE lower zone
/// (channels 2-16) so that each sounding voice can be bent independently.
/// Channel 1 is the zone's master channel and is never handed out.
///
/// Allocation always returns the lowest free channel, which keeps output
/// deterministic. There is no stealing: when all 15 channels are held,
/// [ChannelAllocator::allocate()] returns None and the caller drops the voice.
#[derive(Debug)]
pub struct ChannelAllocator {
    // Indexed by wire channel minus FIRST_MEMBER.
    used: BitVec,
}
impl Default for ChannelAllocator {
    fn default() -> Self {
        Self {
            used: BitVec::from_elem(Self::CAPACITY, false),
        }
    }
}
impl ChannelAllocator {
    /// How many channels the pool holds.
    pub const CAPACITY: usize =
        (MidiChannel::LAST_MEMBER.0 - MidiChannel::FIRST_MEMBER.0) as usize + 1;

    /// Claims the lowest free member channel.
    pub fn allocate(&mut self) -> Option<MidiChannel> {
        let index = self.used.iter().position(|used| !used)?;
        self.used.set(index, true);
        Some(MidiChannel(MidiChannel::FIRST_MEMBER.0 + index as u8))
    }

    /// Claims a specific member channel. Returns false if it's already held
    /// or isn't a member channel.
    pub fn claim(&mut self, channel: MidiChannel) -> bool {
        match Self::index_of(channel) {
            Some(index) if !self.is_used(channel) => {
                self.used.set(index, true);
                true
            }
            _ => false,
        }
    }

    /// Returns a channel to the pool. Releasing a channel that isn't held,
    /// or that isn't a member channel at all, does nothing.
    pub fn release(&mut self, channel: MidiChannel) {
        if let Some(index) = Self::index_of(channel) {
            self.used.set(index, false);
        }
    }

    /// Frees every channel.
    pub fn reset(&mut self) {
        (0..Self::CAPACITY).for_each(|index| self.used.set(index, false));
    }

    /// Whether the given channel is currently held.
    pub fn is_used(&self, channel: MidiChannel) -> bool {
        Self::index_of(channel)
            .and_then(|index| self.used.get(index))
            .unwrap_or_default()
    }

    #[allow(missing_docs)]
    pub fn available_count(&self) -> usize {
        Self::CAPACITY - self.used_count()
    }

    #[allow(missing_docs)]
    pub fn used_count(&self) -> usize {
        self.used.iter().filter(|used| *used).count()
    }

    fn index_of(channel: MidiChannel) -> Option<usize> {
        if channel.0 >= MidiChannel::FIRST_MEMBER.0 && channel.0 <= MidiChannel::LAST_MEMBER.0 {
            Some((channel.0 - MidiChannel::FIRST_MEMBER.0) as usize)
        } else {
            None
        }
    }
}
