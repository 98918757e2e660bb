// Copyright (c) 2024 Mike Tsao

use super::glide_params::ChordGlideParams;
use crate::{
    elements::{ChannelAllocator, Chord, ChordSlot, GlidingVoice, LookaheadBuffer, NoteAction},
    traits::{Configurable, Configurables, ProcessesMidiBlock},
    types::{u7, MidiChannel, MidiEvent, MidiMessage, Note, PitchBendRange, SampleRate, SampleTime},
    util::{MidiUtils, Rng},
};
use delegate::delegate;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Where the block being processed sits on the engine's timeline.
#[derive(Clone, Copy, Debug, Default)]
struct BlockClock {
    start: SampleTime,
    size: usize,
}
impl BlockClock {
    fn offset_of(&self, time: SampleTime) -> usize {
        let last = self.size.saturating_sub(1) as SampleTime;
        (time - self.start).clamp(0, last) as usize
    }

    fn emit(
        &self,
        output: &mut Vec<MidiEvent>,
        time: SampleTime,
        channel: MidiChannel,
        message: MidiMessage,
    ) {
        output.push(MidiEvent::new_with(self.offset_of(time), channel, message));
    }
}

/// [ChordGlideCore] is a MIDI effect that turns a stream of played chords
/// into MPE output in which each voice of one chord slides by pitch bend
/// into a note of the next.
///
/// The engine reports its glide time as latency. Every incoming event is
/// delayed by that lookahead, so when a new chord arrives, the engine knows
/// about it a full glide length before it is due and can start bending the
/// previous chord's voices so that they land exactly on time.
///
/// Each sample of a block runs through four phases in order:
///
/// 1. Note-offs due now stop the voices sounding those keys.
/// 2. Two or more distinct note-ons arriving together form a chord. With
///    nothing held, it sounds as-is; otherwise it becomes the pending chord.
/// 3. If a pending chord is due and nothing is gliding, the current voices are
///    mapped onto it and start gliding.
/// 4. Every voice advances its glide, which produces note and pitch-bend
///    events.
///
/// Lone note-ons are not chords and are ignored.
#[derive(Debug, Builder, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[builder(default)]
pub struct ChordGlideCore {
    /// The user-facing settings. Change them between blocks with
    /// [ChordGlideCore::set_params()].
    params: ChordGlideParams,

    #[serde(skip)]
    #[builder(setter(skip))]
    e: ChordGlideEphemerals,
}

/// Parts of [ChordGlideCore] that aren't serialized.
#[derive(Debug, Default)]
pub struct ChordGlideEphemerals {
    c: Configurables,
    is_prepared: bool,
    lookahead_samples: usize,
    is_latency_changed: bool,

    current_global_time: SampleTime,
    clock: BlockClock,

    current_chord: ChordSlot,
    pending_chord: ChordSlot,
    active_voices: Vec<GlidingVoice>,
    lookahead_buffer: LookaheadBuffer,
    channels: ChannelAllocator,
    rng: Rng,

    // Scratch space reused from block to block.
    retired_voices: Vec<GlidingVoice>,
    deferred_pairs: Vec<(u8, u8)>,
    input_order: Vec<(usize, usize)>,
    due_notes: Vec<Note>,

    needs_zone_configuration: bool,
    needs_bend_sensitivity: bool,

    // Notes that were still sounding when the state was reset. They're
    // silenced at the start of the next block.
    orphaned_notes: Vec<(MidiChannel, u8)>,
}
impl Configurable for ChordGlideCore {
    delegate! {
        to self.e.c {
            fn sample_rate(&self) -> SampleRate;
        }
    }

    fn update_sample_rate(&mut self, sample_rate: SampleRate) {
        self.e.c.update_sample_rate(sample_rate);
        self.update_lookahead();
    }

    fn reset(&mut self) {
        self.reset_state();
    }
}
impl ProcessesMidiBlock for ChordGlideCore {
    fn prepare(&mut self, sample_rate: SampleRate, lookahead_samples: usize) {
        self.e.c.update_sample_rate(sample_rate);
        self.reset_state();
        if lookahead_samples != self.e.lookahead_samples {
            self.e.is_latency_changed = true;
        }
        self.e.lookahead_samples = lookahead_samples;
        self.e.current_global_time = 0;
        self.e.needs_zone_configuration = true;
        self.e.needs_bend_sensitivity = true;

        self.e.active_voices.reserve(ChannelAllocator::CAPACITY);
        self.e.retired_voices.reserve(ChannelAllocator::CAPACITY);
        self.e.orphaned_notes.reserve(ChannelAllocator::CAPACITY);
        self.e.deferred_pairs.reserve(Self::SCRATCH_CAPACITY);
        self.e.input_order.reserve(Self::SCRATCH_CAPACITY);
        self.e.due_notes.reserve(Self::SCRATCH_CAPACITY);
        self.e.is_prepared = true;
        log::debug!(
            "prepared at {} Hz with {} samples of lookahead",
            sample_rate.0,
            lookahead_samples
        );
    }

    fn process_block(
        &mut self,
        input: &[MidiEvent],
        block_size: usize,
        output: &mut Vec<MidiEvent>,
    ) {
        output.clear();
        if !self.e.is_prepared {
            let sample_rate = self.e.c.sample_rate();
            log::warn!("process_block() called before prepare(); assuming {} Hz", sample_rate.0);
            self.prepare(sample_rate, self.params.lookahead_samples(sample_rate));
        }
        if block_size == 0 {
            return;
        }

        let block_start = self.e.current_global_time;
        let block_end = block_start + block_size as SampleTime;
        self.e.clock = BlockClock {
            start: block_start,
            size: block_size,
        };

        self.send_housekeeping(output);
        self.ingest(input);
        for time in block_start..block_end {
            self.release_notes(time, output);
            self.detect_chord(time);
            self.schedule_transition(time, output);
            self.advance_voices(time, output);
        }
        self.e.lookahead_buffer.prune_before(block_end);
        self.e.current_global_time = block_end;

        debug_assert!(output.windows(2).all(|w| w[0].offset <= w[1].offset));
        debug_assert_eq!(self.e.channels.used_count(), self.e.active_voices.len());
    }

    fn latency_samples(&self) -> usize {
        self.e.lookahead_samples
    }
}
#[allow(missing_docs)]
impl ChordGlideCore {
    const SCRATCH_CAPACITY: usize = 256;

    pub fn new_with(params: ChordGlideParams) -> Self {
        Self {
            params: params.clamped(),
            e: Default::default(),
        }
    }

    pub fn params(&self) -> &ChordGlideParams {
        &self.params
    }

    /// Replaces the parameters, clamping them into range. Takes effect at
    /// the next block. A new glide time changes the lookahead, and therefore
    /// the reported latency; a new pitch-bend range is announced to the
    /// receiver.
    pub fn set_params(&mut self, params: ChordGlideParams) {
        let params = params.clamped();
        if params.pitch_bend_range() != self.params.pitch_bend_range() {
            self.e.needs_bend_sensitivity = true;
        }
        self.params = params;
        self.update_lookahead();
    }

    /// Returns the new latency if it changed since the last call.
    pub fn take_latency_change(&mut self) -> Option<usize> {
        if core::mem::take(&mut self.e.is_latency_changed) {
            Some(self.e.lookahead_samples)
        } else {
            None
        }
    }

    /// Makes the random mapping strategy reproducible.
    pub fn seed_rng(&mut self, seed: u128) {
        self.e.rng = Rng::new_with_seed(seed);
    }

    pub fn lookahead_samples(&self) -> usize {
        self.e.lookahead_samples
    }

    /// The start of the next block on the engine's timeline.
    pub fn current_global_time(&self) -> SampleTime {
        self.e.current_global_time
    }

    pub fn current_chord(&self) -> &ChordSlot {
        &self.e.current_chord
    }

    pub fn pending_chord(&self) -> &ChordSlot {
        &self.e.pending_chord
    }

    pub fn active_voices(&self) -> &[GlidingVoice] {
        &self.e.active_voices
    }

    pub fn channel_allocator(&self) -> &ChannelAllocator {
        &self.e.channels
    }

    /// True while any voice hasn't landed yet.
    pub fn is_gliding(&self) -> bool {
        self.e.active_voices.iter().any(|v| v.is_gliding())
    }

    fn update_lookahead(&mut self) {
        let lookahead_samples = self.params.lookahead_samples(self.e.c.sample_rate());
        if lookahead_samples != self.e.lookahead_samples {
            log::debug!(
                "lookahead changed from {} to {} samples",
                self.e.lookahead_samples,
                lookahead_samples
            );
            self.e.lookahead_samples = lookahead_samples;
            self.e.is_latency_changed = true;
        }
    }

    fn reset_state(&mut self) {
        let still_sounding = self
            .e
            .active_voices
            .iter()
            .filter(|v| v.has_sounded())
            .map(|v| (v.channel(), v.current_pitch()));
        self.e.orphaned_notes.extend(still_sounding);
        self.e.active_voices.clear();
        self.e.retired_voices.clear();
        self.e.channels.reset();
        self.e.current_chord = ChordSlot::Absent;
        self.e.pending_chord = ChordSlot::Absent;
        self.e.lookahead_buffer.clear();
    }

    // Everything here goes out at the very start of the block.
    fn send_housekeeping(&mut self, output: &mut Vec<MidiEvent>) {
        let clock = self.e.clock;
        for (channel, key) in self.e.orphaned_notes.drain(..) {
            clock.emit(output, clock.start, channel, MidiUtils::new_note_off(key, 0));
        }
        if core::mem::take(&mut self.e.needs_zone_configuration) {
            log::debug!("sending MPE zone configuration");
            for message in MidiUtils::new_mpe_zone_configuration(ChannelAllocator::CAPACITY as u8) {
                clock.emit(output, clock.start, MidiChannel::MPE_MASTER, message);
            }
        }
        if core::mem::take(&mut self.e.needs_bend_sensitivity) {
            let range = self.params.pitch_bend_range();
            log::debug!("sending pitch-bend sensitivity of {} semitones", range.0);
            for channel in (MidiChannel::FIRST_MEMBER.0..=MidiChannel::LAST_MEMBER.0).map(MidiChannel) {
                for message in MidiUtils::new_pitch_bend_sensitivity(range) {
                    clock.emit(output, clock.start, channel, message);
                }
            }
        }
    }

    /// Queues the block's note events in time order. Anything that isn't a
    /// note-on or note-off is dropped.
    fn ingest(&mut self, input: &[MidiEvent]) {
        let clock = self.e.clock;
        let last_offset = clock.size.saturating_sub(1);
        let lookahead = self.e.lookahead_samples as SampleTime;

        let mut order = core::mem::take(&mut self.e.input_order);
        order.clear();
        order.extend(
            input
                .iter()
                .enumerate()
                .filter(|(_, event)| event.as_note_on().is_some() || event.as_note_off().is_some())
                .map(|(index, event)| (event.offset.min(last_offset), index)),
        );
        if order.len() < input.len() {
            log::trace!("dropped {} non-note events", input.len() - order.len());
        }
        order.sort_unstable();

        for &(offset, index) in order.iter() {
            let event = &input[index];
            let arrival = clock.start + offset as SampleTime;
            let timestamp = arrival + lookahead;
            if let Some((pitch, velocity)) = event.as_note_on() {
                self.e.lookahead_buffer.push(
                    NoteAction::On,
                    Note {
                        pitch,
                        velocity,
                        timestamp,
                    },
                    arrival,
                );
            } else if let Some(pitch) = event.as_note_off() {
                self.e.lookahead_buffer.push(
                    NoteAction::Off,
                    Note {
                        pitch,
                        velocity: u7::from(0),
                        timestamp,
                    },
                    arrival,
                );
            }
        }
        self.e.input_order = order;
    }

    fn release_notes(&mut self, time: SampleTime, output: &mut Vec<MidiEvent>) {
        let mut due_notes = core::mem::take(&mut self.e.due_notes);
        due_notes.clear();
        due_notes.extend(self.e.lookahead_buffer.note_offs_due_at(time).copied());
        for note in due_notes.iter() {
            self.handle_note_off(note, time, output);
        }
        self.e.due_notes = due_notes;
    }

    fn handle_note_off(&mut self, off: &Note, time: SampleTime, output: &mut Vec<MidiEvent>) {
        let key = off.key();
        // A voice landing by the time of the off releases its old pitch
        // itself.
        self.stop_voices(time, output, |v| {
            v.has_sounded()
                && v.current_pitch() == key
                && !(v.is_gliding() && v.landing_time() <= off.timestamp)
        });

        // A note-off can only end a chord note that started before it. One
        // that doesn't is left over from an earlier press of the same key.
        let is_released = |slot: &ChordSlot| {
            slot.chord()
                .and_then(|chord| chord.note(key))
                .is_some_and(|note| note.timestamp < off.timestamp)
        };
        if is_released(&self.e.current_chord) {
            self.e.current_chord.remove_note(key);
            if !self.e.current_chord.is_present() {
                log::debug!("chord released at {time}");
                if self.e.pending_chord.take().is_some() {
                    log::debug!("abandoned pending chord");
                }
                self.stop_voices(time, output, |_| true);
            }
        } else if is_released(&self.e.pending_chord) {
            self.e.pending_chord.remove_note(key);
        }
    }

    fn stop_voices(
        &mut self,
        time: SampleTime,
        output: &mut Vec<MidiEvent>,
        mut should_stop: impl FnMut(&GlidingVoice) -> bool,
    ) {
        let clock = self.e.clock;
        let channels = &mut self.e.channels;
        self.e.active_voices.retain(|voice| {
            if !should_stop(voice) {
                return true;
            }
            if voice.has_sounded() {
                clock.emit(
                    output,
                    time,
                    voice.channel(),
                    MidiUtils::new_note_off(voice.current_pitch(), 0),
                );
            }
            channels.release(voice.channel());
            false
        });
    }

    fn detect_chord(&mut self, time: SampleTime) {
        let first = {
            let mut arriving = self.e.lookahead_buffer.note_ons_arriving_at(time);
            let Some(first) = arriving.next().copied() else {
                return;
            };
            if arriving.next().is_none() {
                log::trace!("ignoring lone note {} at {time}", first.key());
                return;
            }
            first
        };
        let chord = Chord::new_with(
            self.e.lookahead_buffer.note_ons_arriving_at(time).copied(),
            first.timestamp,
        );
        if !chord.is_chord() {
            return;
        }

        if self.e.current_chord.is_present() {
            if self.e.pending_chord.is_present() {
                log::debug!("chord {:?} replaces the pending chord", chord.pitches());
            }
            self.e.pending_chord = chord.into();
        } else {
            self.start_holding(chord);
        }
    }

    fn start_holding(&mut self, chord: Chord) {
        log::debug!("holding {:?} from {}", chord.pitches(), chord.timestamp());
        for note in chord.notes() {
            match self.e.channels.allocate() {
                Some(channel) => self.e.active_voices.push(GlidingVoice::new_held(
                    channel,
                    note.key(),
                    note.velocity,
                    chord.timestamp(),
                )),
                None => log::debug!("no free channel for key {}", note.key()),
            }
        }
        self.e.current_chord = chord.into();
    }

    fn schedule_transition(&mut self, time: SampleTime, output: &mut Vec<MidiEvent>) {
        let (Some(current), Some(pending)) =
            (self.e.current_chord.chord(), self.e.pending_chord.chord())
        else {
            return;
        };

        // A glide can't begin before the chord it leaves has started.
        let due = (pending.timestamp() - self.e.lookahead_samples as SampleTime)
            .max(current.timestamp());
        if time >= due && !self.is_gliding() {
            self.start_transition(time, output);
        }
    }

    /// Moves from the current chord to the pending one, gliding every voice
    /// so that it lands at the pending chord's timestamp.
    fn start_transition(&mut self, time: SampleTime, output: &mut Vec<MidiEvent>) {
        let Some(pending) = self.e.pending_chord.take() else {
            return;
        };
        let source = self
            .e
            .current_chord
            .chord()
            .map(|c| c.pitches())
            .unwrap_or_default();
        let mapping = self
            .params
            .strategy()
            .map(&source, &pending.pitches(), &mut self.e.rng);
        if mapping.is_empty() {
            log::debug!("nothing to map; dropping chord {:?}", pending.pitches());
            return;
        }
        let duration = pending.timestamp() - time;
        log::debug!(
            "gliding {:?} -> {:?} from {time} to {}",
            source,
            pending.pitches(),
            pending.timestamp()
        );

        core::mem::swap(&mut self.e.active_voices, &mut self.e.retired_voices);
        for voice in self.e.retired_voices.iter() {
            self.e.channels.release(voice.channel());
        }

        // A voice already sounding a source key keeps its channel and simply
        // starts bending. Any other pair needs a fresh voice.
        let mut continued: u32 = 0;
        self.e.deferred_pairs.clear();
        for (from, to) in mapping.pairs() {
            let velocity = Self::velocity_of(&pending, to);
            let heir = self
                .e
                .retired_voices
                .iter()
                .enumerate()
                .find(|(i, v)| {
                    continued & (1 << i) == 0 && v.has_sounded() && v.current_pitch() == from
                })
                .map(|(i, v)| (i, v.channel()));
            match heir {
                Some((i, channel)) if self.e.channels.claim(channel) => {
                    continued |= 1 << i;
                    self.e.active_voices.push(GlidingVoice::new_gliding(
                        channel, from, to, velocity, time, duration, true,
                    ));
                }
                _ => self.e.deferred_pairs.push((from, to)),
            }
        }
        for &(from, to) in self.e.deferred_pairs.iter() {
            match self.e.channels.allocate() {
                Some(channel) => self.e.active_voices.push(GlidingVoice::new_gliding(
                    channel,
                    from,
                    to,
                    Self::velocity_of(&pending, to),
                    time,
                    duration,
                    false,
                )),
                None => log::debug!("no free channel for {from} -> {to}"),
            }
        }

        let clock = self.e.clock;
        for (i, voice) in self.e.retired_voices.iter().enumerate() {
            if continued & (1 << i) == 0 && voice.has_sounded() {
                clock.emit(
                    output,
                    time,
                    voice.channel(),
                    MidiUtils::new_note_off(voice.current_pitch(), 0),
                );
            }
        }
        self.e.retired_voices.clear();
        self.e.current_chord = pending.into();
    }

    fn velocity_of(chord: &Chord, key: u8) -> u7 {
        chord
            .note(key)
            .map(|note| note.velocity)
            .unwrap_or(u7::from(MidiUtils::DEFAULT_VELOCITY))
    }

    fn advance_voices(&mut self, time: SampleTime, output: &mut Vec<MidiEvent>) {
        let clock = self.e.clock;
        let range = self.params.pitch_bend_range();
        for voice in self.e.active_voices.iter_mut() {
            let step = voice.update_glide(time);
            if step.is_empty() {
                continue;
            }
            let channel = voice.channel();
            let velocity = voice.velocity().as_int();
            if let Some(key) = step.onset {
                clock.emit(output, time, channel, MidiUtils::new_pitch_bend(PitchBendRange::CENTER));
                clock.emit(output, time, channel, MidiUtils::new_note_on(key, velocity));
            }
            if let Some(semitones) = step.bend {
                clock.emit(
                    output,
                    time,
                    channel,
                    MidiUtils::new_pitch_bend_semitones(semitones, range),
                );
            }
            if let Some((from, to)) = step.landing {
                if from != to {
                    clock.emit(output, time, channel, MidiUtils::new_note_off(from, 0));
                    clock.emit(output, time, channel, MidiUtils::new_pitch_bend(PitchBendRange::CENTER));
                    clock.emit(output, time, channel, MidiUtils::new_note_on(to, velocity));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{elements::VoiceMappingStrategy, traits::tests::test_trait_configurable};

    fn on(offset: usize, key: u8) -> MidiEvent {
        MidiEvent::new_with(offset, MidiChannel::MPE_MASTER, MidiUtils::new_note_on(key, 100))
    }

    fn off(offset: usize, key: u8) -> MidiEvent {
        MidiEvent::new_with(offset, MidiChannel::MPE_MASTER, MidiUtils::new_note_off(key, 0))
    }

    fn prepared(lookahead: usize) -> ChordGlideCore {
        let mut core = ChordGlideCore::default();
        core.seed_rng(12345);
        core.prepare(SampleRate::new(48000), lookahead);
        core
    }

    fn assert_channels_match_voices(core: &ChordGlideCore) {
        assert_eq!(
            core.channel_allocator().used_count(),
            core.active_voices().len()
        );
        for v in core.active_voices() {
            assert!(core.channel_allocator().is_used(v.channel()));
        }
    }

    #[test]
    fn configurable() {
        test_trait_configurable(ChordGlideCore::default());
    }

    #[test]
    fn builder_sets_params() {
        let mut params = ChordGlideParams::default();
        params.set_strategy(VoiceMappingStrategy::Random);
        let core = ChordGlideCoreBuilder::default()
            .params(params)
            .build()
            .unwrap();
        assert_eq!(core.params().strategy(), VoiceMappingStrategy::Random);
    }

    #[test]
    fn lone_notes_are_ignored() {
        let mut core = prepared(0);
        let mut output = Vec::default();
        core.process_block(&[on(3, 60)], 64, &mut output);
        assert!(!core.current_chord().is_present());
        assert!(core.active_voices().is_empty());

        core.process_block(&[on(3, 60), on(3, 60)], 64, &mut output);
        assert!(
            !core.current_chord().is_present(),
            "a doubled key is still one note"
        );
    }

    #[test]
    fn chord_starts_holding() {
        let mut core = prepared(100);
        let mut output = Vec::default();
        core.process_block(&[on(10, 67), on(10, 60), on(10, 64)], 64, &mut output);
        let chord = core.current_chord().chord().unwrap();
        assert_eq!(chord.pitches(), vec![60, 64, 67]);
        assert_eq!(chord.timestamp(), 110);
        assert_eq!(core.active_voices().len(), 3);
        assert!(core.active_voices().iter().all(|v| !v.has_sounded()));
        assert_channels_match_voices(&core);
        assert_eq!(core.current_global_time(), 64);
    }

    #[test]
    fn later_chord_replaces_pending_one() {
        let mut core = prepared(480);
        let mut output = Vec::default();
        core.process_block(&[on(0, 60), on(0, 64), on(0, 67)], 128, &mut output);
        core.process_block(
            &[on(0, 62), on(0, 65), on(100, 59), on(100, 63)],
            128,
            &mut output,
        );
        // The current chord doesn't start until 480, so nothing can glide yet.
        let pending = core.pending_chord().chord().unwrap();
        assert_eq!(pending.pitches(), vec![59, 63]);
        assert_eq!(pending.timestamp(), 228 + 480);
        assert!(!core.is_gliding());

        core.process_block(&[], 128, &mut output);
        core.process_block(&[], 128, &mut output);
        assert!(!core.pending_chord().is_present());
        assert_eq!(core.current_chord().chord().unwrap().pitches(), vec![59, 63]);
        assert!(core.is_gliding());
        assert_channels_match_voices(&core);
    }

    #[test]
    fn releasing_whole_chord_returns_to_idle() {
        let mut core = prepared(0);
        let mut output = Vec::default();
        core.process_block(&[on(0, 60), on(0, 64), on(0, 67)], 64, &mut output);
        core.process_block(&[off(5, 64)], 64, &mut output);
        assert_eq!(core.current_chord().chord().unwrap().pitches(), vec![60, 67]);
        assert_eq!(core.active_voices().len(), 2);
        assert_eq!(
            output
                .iter()
                .filter(|e| e.as_note_off().is_some())
                .map(|e| (e.offset, e.channel.number()))
                .collect::<Vec<_>>(),
            vec![(5, 3)]
        );
        assert_channels_match_voices(&core);

        core.process_block(&[off(1, 60), off(2, 67)], 64, &mut output);
        assert!(!core.current_chord().is_present());
        assert!(core.active_voices().is_empty());
        assert_eq!(core.channel_allocator().used_count(), 0);
    }

    #[test]
    fn stale_note_off_keeps_restruck_chord_note() {
        let mut core = prepared(100);
        let mut output = Vec::default();
        core.process_block(&[on(0, 60), on(0, 64)], 64, &mut output);
        // Key 64 goes up and comes back down as part of a new chord before
        // any of this is due.
        core.process_block(&[off(10, 64), on(10, 64), on(10, 69)], 64, &mut output);
        for _ in 0..4 {
            core.process_block(&[], 64, &mut output);
        }
        let chord = core.current_chord().chord().unwrap();
        assert_eq!(chord.pitches(), vec![64, 69]);
        assert_channels_match_voices(&core);
    }

    #[test]
    fn reset_silences_sounding_voices() {
        let mut core = prepared(0);
        let mut output = Vec::default();
        core.process_block(&[on(0, 60), on(0, 64)], 64, &mut output);
        core.reset();
        assert!(core.active_voices().is_empty());
        assert!(!core.current_chord().is_present());

        core.process_block(&[], 64, &mut output);
        let offs: Vec<_> = output
            .iter()
            .filter_map(|e| e.as_note_off().map(|key| (e.offset, e.channel.number(), key.as_int())))
            .collect();
        assert_eq!(offs, vec![(0, 2, 60), (0, 3, 64)]);

        core.process_block(&[], 64, &mut output);
        assert!(output.is_empty(), "the flush happens once");
    }

    #[test]
    fn param_changes() {
        let mut core = ChordGlideCore::new_with(ChordGlideParams::default());
        core.update_sample_rate(SampleRate::new(48000));
        assert_eq!(core.take_latency_change(), Some(9600));
        assert_eq!(core.take_latency_change(), None);

        let mut params = *core.params();
        params.set_glide_time_ms(100.0);
        params.set_strategy(VoiceMappingStrategy::Random);
        core.set_params(params);
        assert_eq!(core.latency_samples(), 4800);
        assert_eq!(core.take_latency_change(), Some(4800));

        core.set_params(params);
        assert_eq!(core.take_latency_change(), None, "same params, same latency");
        assert_eq!(core.params().strategy(), VoiceMappingStrategy::Random);
    }

    #[test]
    fn works_without_prepare() {
        let mut core = ChordGlideCore::default();
        let mut output = Vec::default();
        core.process_block(&[on(0, 60), on(0, 64)], 32, &mut output);
        assert_eq!(core.lookahead_samples(), 8820);
        assert_eq!(core.active_voices().len(), 2);
    }

    #[test]
    fn empty_block_changes_nothing() {
        let mut core = prepared(0);
        let mut output = vec![on(0, 1)];
        core.process_block(&[on(0, 60), on(0, 64)], 0, &mut output);
        assert!(output.is_empty());
        assert_eq!(core.current_global_time(), 0);
        assert!(!core.current_chord().is_present());
    }
}
