// Copyright (c) 2024 Mike Tsao

use crate::types::{u14, u7, MidiMessage, PitchBend, PitchBendRange};

/// Provides MIDI-related utility functionality.
pub struct MidiUtils {}
impl MidiUtils {
    /// Registered Parameter Number for pitch-bend sensitivity.
    pub const RPN_PITCH_BEND_SENSITIVITY: u16 = 0;
    /// Registered Parameter Number for the MPE Configuration Message.
    pub const RPN_MPE_CONFIGURATION: u16 = 6;
    /// A middling velocity for notes that have none of their own.
    pub const DEFAULT_VELOCITY: u8 = 100;

    const CC_DATA_ENTRY_MSB: u8 = 6;
    const CC_DATA_ENTRY_LSB: u8 = 38;
    const CC_RPN_LSB: u8 = 100;
    const CC_RPN_MSB: u8 = 101;

    /// Convenience function to make a note-on [MidiMessage].
    pub fn new_note_on(note: u8, vel: u8) -> MidiMessage {
        MidiMessage::NoteOn {
            key: u7::from(note),
            vel: u7::from(vel),
        }
    }

    /// Convenience function to make a note-off [MidiMessage].
    pub fn new_note_off(note: u8, vel: u8) -> MidiMessage {
        MidiMessage::NoteOff {
            key: u7::from(note),
            vel: u7::from(vel),
        }
    }

    /// Makes a pitch-bend [MidiMessage] from a raw 14-bit value (8192 is
    /// center).
    pub fn new_pitch_bend(value: u16) -> MidiMessage {
        MidiMessage::PitchBend {
            bend: PitchBend(u14::from(value.min(PitchBendRange::MAX_BEND))),
        }
    }

    /// Makes a pitch-bend [MidiMessage] that bends by the given number of
    /// semitones on a receiver configured for `range`.
    pub fn new_pitch_bend_semitones(semitones: f64, range: PitchBendRange) -> MidiMessage {
        Self::new_pitch_bend(range.encode(semitones))
    }

    /// Returns the raw 14-bit value of a pitch-bend message.
    pub fn pitch_bend_value(message: &MidiMessage) -> Option<u16> {
        match message {
            MidiMessage::PitchBend { bend } => Some(bend.0.as_int()),
            _ => None,
        }
    }

    #[allow(missing_docs)]
    pub fn new_controller(controller: u8, value: u8) -> MidiMessage {
        MidiMessage::Controller {
            controller: u7::from(controller),
            value: u7::from(value),
        }
    }

    /// The four controller messages that set a Registered Parameter: select
    /// the RPN, then write its data-entry MSB and LSB.
    pub fn new_rpn(rpn: u16, msb: u8, lsb: u8) -> [MidiMessage; 4] {
        [
            Self::new_controller(Self::CC_RPN_MSB, ((rpn >> 7) & 0x7f) as u8),
            Self::new_controller(Self::CC_RPN_LSB, (rpn & 0x7f) as u8),
            Self::new_controller(Self::CC_DATA_ENTRY_MSB, msb),
            Self::new_controller(Self::CC_DATA_ENTRY_LSB, lsb),
        ]
    }

    /// The MPE Configuration Message that declares a lower zone with
    /// `member_count` member channels. Send it on the zone's master channel.
    pub fn new_mpe_zone_configuration(member_count: u8) -> [MidiMessage; 4] {
        Self::new_rpn(Self::RPN_MPE_CONFIGURATION, member_count.min(15), 0)
    }

    /// Tells a receiver how many semitones a full pitch-wheel deflection
    /// means on this channel.
    pub fn new_pitch_bend_sensitivity(range: PitchBendRange) -> [MidiMessage; 4] {
        Self::new_rpn(Self::RPN_PITCH_BEND_SENSITIVITY, range.0, 0)
    }
}
