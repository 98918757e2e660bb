// Copyright (c) 2024 Mike Tsao

use crate::types::{Note, SampleTime};
use bounded_vec_deque::BoundedVecDeque;

/// Whether a buffered note starts or stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteAction {
    #[allow(missing_docs)]
    On,
    #[allow(missing_docs)]
    Off,
}

/// A note event waiting in a [LookaheadBuffer].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferedNote {
    #[allow(missing_docs)]
    pub action: NoteAction,
    /// The note; its timestamp is when it should take effect on the output
    /// timeline.
    pub note: Note,
    /// When the event reached the engine, on the input timeline.
    pub arrival: SampleTime,
}

/// A time-ordered queue of incoming note events. Each event is held from
/// the moment it arrives until the output timeline has passed it, which is
/// about one lookahead window.
///
/// Entries stay ordered by both arrival and effective time. If the
/// lookahead shrinks while events are queued, a newly arriving event is held
/// back until the previous tail rather than jumping ahead of it.
#[derive(Debug)]
pub struct LookaheadBuffer {
    queue: BoundedVecDeque<BufferedNote>,
    overflow_count: usize,
}
impl Default for LookaheadBuffer {
    fn default() -> Self {
        Self::new_with(Self::DEFAULT_MAX_LEN)
    }
}
impl LookaheadBuffer {
    /// Enough for a dense two-second window of ten-finger chords.
    pub const DEFAULT_MAX_LEN: usize = 4096;

    #[allow(missing_docs)]
    pub fn new_with(max_len: usize) -> Self {
        Self {
            queue: BoundedVecDeque::new(max_len),
            overflow_count: 0,
        }
    }

    /// Queues an event that arrived at `arrival` and should take effect at
    /// `note.timestamp`. If the queue is full, the oldest entry is dropped.
    pub fn push(&mut self, action: NoteAction, mut note: Note, arrival: SampleTime) {
        if let Some(tail) = self.queue.back() {
            note.timestamp = note.timestamp.max(tail.note.timestamp);
        }
        if let Some(dropped) = self.queue.push_back(BufferedNote {
            action,
            note,
            arrival,
        }) {
            self.overflow_count += 1;
            log::warn!(
                "lookahead buffer full; dropped {:?} of key {} due at {}",
                dropped.action,
                dropped.note.key(),
                dropped.note.timestamp
            );
        }
    }

    /// Note-ons that arrived at exactly `time`, in arrival order.
    pub fn note_ons_arriving_at(&self, time: SampleTime) -> impl Iterator<Item = &Note> + '_ {
        self.queue
            .iter()
            .skip_while(move |b| b.arrival < time)
            .take_while(move |b| b.arrival == time)
            .filter(|b| b.action == NoteAction::On)
            .map(|b| &b.note)
    }

    /// Note-offs that take effect at exactly `time`.
    pub fn note_offs_due_at(&self, time: SampleTime) -> impl Iterator<Item = &Note> + '_ {
        self.queue
            .iter()
            .skip_while(move |b| b.note.timestamp < time)
            .take_while(move |b| b.note.timestamp == time)
            .filter(|b| b.action == NoteAction::Off)
            .map(|b| &b.note)
    }

    /// Drops every entry that takes effect before `time`.
    pub fn prune_before(&mut self, time: SampleTime) {
        while self
            .queue
            .front()
            .is_some_and(|front| front.note.timestamp < time)
        {
            let _ = self.queue.pop_front();
        }
    }

    #[allow(missing_docs)]
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// How many entries have been dropped because the queue was full.
    pub fn overflow_count(&self) -> usize {
        self.overflow_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<'a>(notes: impl Iterator<Item = &'a Note>) -> Vec<u8> {
        notes.map(|n| n.key()).collect()
    }

    #[test]
    fn finds_events_by_arrival_and_due_time() {
        let mut b = LookaheadBuffer::default();
        b.push(NoteAction::On, Note::new_with(60, 100, 110), 10);
        b.push(NoteAction::On, Note::new_with(64, 100, 110), 10);
        b.push(NoteAction::Off, Note::new_with(55, 0, 112), 12);
        b.push(NoteAction::On, Note::new_with(67, 100, 112), 12);

        assert_eq!(keys(b.note_ons_arriving_at(10)), vec![60, 64]);
        assert_eq!(keys(b.note_ons_arriving_at(12)), vec![67]);
        assert!(b.note_ons_arriving_at(11).next().is_none());
        assert_eq!(keys(b.note_offs_due_at(112)), vec![55]);
        assert!(b.note_offs_due_at(110).next().is_none());
    }

    #[test]
    fn prune_drops_only_past_entries() {
        let mut b = LookaheadBuffer::default();
        b.push(NoteAction::On, Note::new_with(60, 100, 100), 0);
        b.push(NoteAction::Off, Note::new_with(60, 0, 200), 100);
        b.push(NoteAction::On, Note::new_with(62, 100, 300), 200);
        b.prune_before(200);
        assert_eq!(b.len(), 2);
        b.prune_before(301);
        assert!(b.is_empty());
    }

    #[test]
    fn shrinking_lookahead_never_reorders() {
        let mut b = LookaheadBuffer::default();
        b.push(NoteAction::On, Note::new_with(60, 100, 500), 20);
        // The lookahead dropped from 480 to 100 between these two events.
        b.push(NoteAction::Off, Note::new_with(60, 0, 130), 30);
        assert_eq!(keys(b.note_offs_due_at(500)), vec![60]);
        assert!(b.note_offs_due_at(130).next().is_none());
    }

    #[test]
    fn overflow_drops_oldest() {
        let mut b = LookaheadBuffer::new_with(2);
        b.push(NoteAction::On, Note::new_with(60, 100, 10), 0);
        b.push(NoteAction::On, Note::new_with(62, 100, 11), 1);
        b.push(NoteAction::On, Note::new_with(64, 100, 12), 2);
        assert_eq!(b.len(), 2);
        assert_eq!(b.overflow_count(), 1);
        assert!(b.note_ons_arriving_at(0).next().is_none());
        assert_eq!(keys(b.note_ons_arriving_at(2)), vec![64]);
    }
}
