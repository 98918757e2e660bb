// Copyright (c) 2024 Mike Tsao

use derivative::Derivative;
use serde::{Deserialize, Serialize};
use synonym::Synonym;

pub use midly::{
    num::{u14, u4, u7},
    MidiMessage, PitchBend,
};

/// Newtype for MIDI channel. The value is the 0-based channel as it appears
/// on the wire; musicians and MPE documentation count channels from 1, which
/// is what [MidiChannel::number()] returns.
#[derive(Synonym, Serialize, Deserialize)]
pub struct MidiChannel(pub u8);
#[allow(missing_docs)]
impl MidiChannel {
    pub const MIN_VALUE: u8 = 0;
    pub const MAX_VALUE: u8 = 15; // inclusive

    /// The master channel of an MPE lower zone (channel 1).
    pub const MPE_MASTER: Self = Self(0);
    /// The first member channel of an MPE lower zone (channel 2).
    pub const FIRST_MEMBER: Self = Self(1);
    /// The last member channel of an MPE lower zone (channel 16).
    pub const LAST_MEMBER: Self = Self(Self::MAX_VALUE);

    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Creates a channel from its 1-based number (1..=16). Out-of-range
    /// numbers saturate to the nearest end.
    pub const fn from_number(number: u8) -> Self {
        if number == 0 {
            Self(Self::MIN_VALUE)
        } else if number > Self::MAX_VALUE + 1 {
            Self(Self::MAX_VALUE)
        } else {
            Self(number - 1)
        }
    }

    /// The 1-based channel number (1..=16).
    pub const fn number(&self) -> u8 {
        self.0 + 1
    }
}
impl From<u4> for MidiChannel {
    fn from(value: u4) -> Self {
        Self(value.as_int())
    }
}
impl From<MidiChannel> for u4 {
    fn from(value: MidiChannel) -> Self {
        u4::from(value.0)
    }
}

/// A channel message placed at a sample offset inside the current processing
/// block. This is the unit of both the input and the output of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MidiEvent {
    /// Sample offset from the start of the block.
    pub offset: usize,
    #[allow(missing_docs)]
    pub channel: MidiChannel,
    #[allow(missing_docs)]
    pub message: MidiMessage,
}
impl MidiEvent {
    #[allow(missing_docs)]
    pub fn new_with(offset: usize, channel: MidiChannel, message: MidiMessage) -> Self {
        Self {
            offset,
            channel,
            message,
        }
    }

    /// Returns Some((key, velocity)) if this is a note-on with nonzero
    /// velocity.
    pub fn as_note_on(&self) -> Option<(u7, u7)> {
        match self.message {
            MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => Some((key, vel)),
            _ => None,
        }
    }

    /// Returns Some(key) if this is a note-off, including the note-on with
    /// zero velocity that running-status senders use as a note-off.
    pub fn as_note_off(&self) -> Option<u7> {
        match self.message {
            MidiMessage::NoteOff { key, .. } => Some(key),
            MidiMessage::NoteOn { key, vel } if vel.as_int() == 0 => Some(key),
            _ => None,
        }
    }
}

/// The number of semitones a full pitch-wheel deflection represents on the
/// receiving instrument. Converts between semitone offsets and 14-bit
/// pitch-bend values centered at 8192.
#[derive(Synonym, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
#[synonym(skip(Default))]
#[serde(rename_all = "kebab-case")]
pub struct PitchBendRange(#[derivative(Default(value = "12"))] pub u8);
#[allow(missing_docs)]
impl PitchBendRange {
    pub const MIN_VALUE: u8 = 1;
    pub const MAX_VALUE: u8 = 24;

    /// The raw pitch-bend value that means "no bend."
    pub const CENTER: u16 = 8192;
    /// The largest raw pitch-bend value.
    pub const MAX_BEND: u16 = 16383;

    /// Clamps to MIN_VALUE..=MAX_VALUE.
    pub const fn new(semitones: u8) -> Self {
        if semitones < Self::MIN_VALUE {
            Self(Self::MIN_VALUE)
        } else if semitones > Self::MAX_VALUE {
            Self(Self::MAX_VALUE)
        } else {
            Self(semitones)
        }
    }

    pub fn semitones(&self) -> f64 {
        self.0 as f64
    }

    /// The size of one step of the 14-bit value, in semitones.
    pub fn resolution(&self) -> f64 {
        self.semitones() / Self::CENTER as f64
    }

    /// Converts a semitone offset to a 14-bit pitch-bend value. Offsets
    /// beyond the range saturate.
    pub fn encode(&self, semitones: f64) -> u16 {
        let normalized = (semitones / self.semitones()).clamp(-1.0, 1.0);
        let value = (normalized * Self::CENTER as f64 + Self::CENTER as f64) as i32;
        value.clamp(0, Self::MAX_BEND as i32) as u16
    }

    /// Converts a 14-bit pitch-bend value back to a semitone offset.
    pub fn decode(&self, value: u16) -> f64 {
        let value = value.min(Self::MAX_BEND);
        (value as f64 - Self::CENTER as f64) / Self::CENTER as f64 * self.semitones()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn channel_numbering() {
        assert_eq!(MidiChannel::MPE_MASTER.number(), 1);
        assert_eq!(MidiChannel::FIRST_MEMBER.number(), 2);
        assert_eq!(MidiChannel::LAST_MEMBER.number(), 16);
        assert_eq!(MidiChannel::from_number(2), MidiChannel(1));
        assert_eq!(MidiChannel::from_number(0), MidiChannel(0));
        assert_eq!(MidiChannel::from_number(99), MidiChannel(15));
        assert_eq!(MidiChannel::from(u4::from(7)), MidiChannel(7));
    }

    #[test]
    fn zero_velocity_note_on_is_note_off() {
        let e = MidiEvent::new_with(
            3,
            MidiChannel::default(),
            MidiMessage::NoteOn {
                key: u7::from(60),
                vel: u7::from(0),
            },
        );
        assert!(e.as_note_on().is_none());
        assert_eq!(e.as_note_off(), Some(u7::from(60)));
    }

    #[test]
    fn pitch_bend_encoding() {
        let range = PitchBendRange::default();
        assert_eq!(range.0, 12);
        assert_eq!(range.encode(0.0), PitchBendRange::CENTER);
        assert_eq!(range.encode(-12.0), 0);
        assert_eq!(range.encode(12.0), PitchBendRange::MAX_BEND);
        assert_eq!(range.encode(6.0), 12288);
        assert_eq!(range.encode(-6.0), 4096);
        assert_eq!(range.encode(2.0), 9557);
        assert_eq!(range.encode(100.0), PitchBendRange::MAX_BEND, "saturates");
        assert_eq!(range.encode(-100.0), 0, "saturates");
    }

    #[test]
    fn pitch_bend_round_trip_within_one_lsb() {
        for semitones in PitchBendRange::MIN_VALUE..=PitchBendRange::MAX_VALUE {
            let range = PitchBendRange::new(semitones);
            let lsb = range.resolution();
            let mut s = -range.semitones();
            while s <= range.semitones() {
                let decoded = range.decode(range.encode(s));
                assert!(
                    (decoded - s).abs() <= lsb + f64::EPSILON * 16.0,
                    "range {semitones}: {s} came back as {decoded}"
                );
                s += 0.37;
            }
        }
        let range = PitchBendRange::new(2);
        assert!(approx_eq!(f64, range.decode(PitchBendRange::CENTER), 0.0));
    }

    #[test]
    fn pitch_bend_range_clamps() {
        assert_eq!(PitchBendRange::new(0).0, 1);
        assert_eq!(PitchBendRange::new(48).0, 24);
        assert_eq!(PitchBendRange::new(7).0, 7);
    }
}
