// Copyright (c) 2024 Mike Tsao

use crate::types::{Note, SampleTime};

/// A set of notes that arrived together. Notes are kept sorted by pitch,
/// with at most one note per pitch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chord {
    notes: Vec<Note>,
    timestamp: SampleTime,
}
impl Chord {
    /// The fewest distinct pitches that count as a chord.
    pub const MIN_NOTES: usize = 2;

    /// Creates an empty chord at the given time.
    pub fn new_at(timestamp: SampleTime) -> Self {
        Self {
            notes: Vec::default(),
            timestamp,
        }
    }

    /// Builds a chord from simultaneous notes. Duplicate pitches collapse
    /// into the first one seen.
    pub fn new_with(notes: impl IntoIterator<Item = Note>, timestamp: SampleTime) -> Self {
        let mut r = Self::new_at(timestamp);
        notes.into_iter().for_each(|note| {
            r.add_note(note);
        });
        r
    }

    /// Adds a note, keeping pitch order. Returns false (and changes nothing)
    /// if the pitch is already present.
    pub fn add_note(&mut self, note: Note) -> bool {
        match self.notes.binary_search_by_key(&note.key(), |n| n.key()) {
            Ok(_) => false,
            Err(index) => {
                self.notes.insert(index, note);
                true
            }
        }
    }

    /// Removes the note with the given pitch. Returns false (and changes
    /// nothing) if the pitch isn't present.
    pub fn remove_note(&mut self, pitch: u8) -> bool {
        match self.index_of(pitch) {
            Some(index) => {
                self.notes.remove(index);
                true
            }
            None => false,
        }
    }

    /// The note with the given pitch, if present.
    pub fn note(&self, pitch: u8) -> Option<&Note> {
        self.index_of(pitch).map(|index| &self.notes[index])
    }

    #[allow(missing_docs)]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// The pitches in ascending order.
    pub fn pitches(&self) -> Vec<u8> {
        self.notes.iter().map(|n| n.key()).collect()
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Whether there are enough distinct pitches to count as a chord.
    pub fn is_chord(&self) -> bool {
        self.notes.len() >= Self::MIN_NOTES
    }

    /// When the chord's notes arrived.
    pub fn timestamp(&self) -> SampleTime {
        self.timestamp
    }

    fn index_of(&self, pitch: u8) -> Option<usize> {
        self.notes.binary_search_by_key(&pitch, |n| n.key()).ok()
    }
}

/// Holds a [Chord], or nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ChordSlot {
    #[allow(missing_docs)]
    #[default]
    Absent,
    #[allow(missing_docs)]
    Present(Chord),
}
impl ChordSlot {
    #[allow(missing_docs)]
    pub fn is_present(&self) -> bool {
        matches!(self, ChordSlot::Present(_))
    }

    #[allow(missing_docs)]
    pub fn chord(&self) -> Option<&Chord> {
        match self {
            ChordSlot::Absent => None,
            ChordSlot::Present(chord) => Some(chord),
        }
    }

    /// Empties the slot, returning what it held.
    pub fn take(&mut self) -> Option<Chord> {
        match core::mem::take(self) {
            ChordSlot::Absent => None,
            ChordSlot::Present(chord) => Some(chord),
        }
    }

    /// Removes a pitch from the held chord. If that empties the chord, the
    /// slot becomes [ChordSlot::Absent]. Returns whether the pitch was
    /// present.
    pub fn remove_note(&mut self, pitch: u8) -> bool {
        let (removed, now_empty) = match self {
            ChordSlot::Absent => (false, false),
            ChordSlot::Present(chord) => {
                let removed = chord.remove_note(pitch);
                (removed, chord.is_empty())
            }
        };
        if now_empty {
            *self = ChordSlot::Absent;
        }
        removed
    }
}
impl From<Chord> for ChordSlot {
    fn from(value: Chord) -> Self {
        ChordSlot::Present(value)
    }
}
