// Copyright (c) 2024 Mike Tsao

use crate::types::{u7, MidiChannel, SampleTime};

/// What a [GlidingVoice] wants sent for one sample. Fields are listed in the
/// order their messages should go out.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlideStep {
    /// The voice starts sounding at this pitch: center the channel's bend,
    /// then send a note-on.
    pub onset: Option<u8>,
    /// A pitch-bend update, in semitones relative to the sounding note.
    pub bend: Option<f64>,
    /// The glide finished. Carries (old pitch, new pitch); when they differ,
    /// the old note must be released, the bend centered, and the new note
    /// struck.
    pub landing: Option<(u8, u8)>,
}
impl GlideStep {
    /// True if there's nothing to send.
    pub fn is_empty(&self) -> bool {
        self.onset.is_none() && self.bend.is_none() && self.landing.is_none()
    }
}

/// One sounding note on its own MPE member channel, optionally gliding by
/// pitch bend from `start_pitch` toward `target_pitch`.
///
/// The bend is a straight line: after `elapsed` samples of a glide lasting
/// `duration` samples, the bend is `(target - start) * elapsed / duration`
/// semitones. At the end of the glide the voice swaps its note for the
/// target note and centers the bend, so the receiver's bend range only has
/// to cover the widest single glide.
#[derive(Clone, Debug, PartialEq)]
pub struct GlidingVoice {
    channel: MidiChannel,
    start_pitch: u8,
    current_pitch: u8,
    target_pitch: u8,
    velocity: u7,
    current_pitch_bend_semitones: f64,
    glide_start_time: SampleTime,
    glide_duration_samples: SampleTime,
    is_gliding: bool,
    has_sounded: bool,
}
impl GlidingVoice {
    /// Pitch-bend updates go out once per this many samples of glide, plus
    /// once on the final sample.
    pub const BEND_INTERVAL_SAMPLES: SampleTime = 8;

    /// A voice that sounds `pitch` at `start_time` with no glide.
    pub fn new_held(
        channel: MidiChannel,
        pitch: u8,
        velocity: u7,
        start_time: SampleTime,
    ) -> Self {
        Self {
            channel,
            start_pitch: pitch,
            current_pitch: pitch,
            target_pitch: pitch,
            velocity,
            current_pitch_bend_semitones: 0.0,
            glide_start_time: start_time,
            glide_duration_samples: 0,
            is_gliding: false,
            has_sounded: false,
        }
    }

    /// A voice that glides from `start_pitch` to `target_pitch` over
    /// `duration` samples beginning at `start_time`. If `is_sounding`, the
    /// receiver is already playing `start_pitch` on `channel` with a
    /// centered bend, so no onset is needed.
    pub fn new_gliding(
        channel: MidiChannel,
        start_pitch: u8,
        target_pitch: u8,
        velocity: u7,
        start_time: SampleTime,
        duration: SampleTime,
        is_sounding: bool,
    ) -> Self {
        Self {
            channel,
            start_pitch,
            current_pitch: start_pitch,
            target_pitch,
            velocity,
            current_pitch_bend_semitones: 0.0,
            glide_start_time: start_time,
            glide_duration_samples: duration,
            is_gliding: true,
            has_sounded: is_sounding,
        }
    }

    /// Fraction of the glide completed at `time`, in 0.0..=1.0. Glides of
    /// zero or negative length are complete as soon as they start.
    pub fn progress_at(&self, time: SampleTime) -> f64 {
        let elapsed = time - self.glide_start_time;
        if elapsed < 0 {
            0.0
        } else if self.glide_duration_samples <= 0 {
            1.0
        } else {
            (elapsed as f64 / self.glide_duration_samples as f64).min(1.0)
        }
    }

    /// The bend, in semitones, that the glide calls for at `time`. Does not
    /// change the voice.
    pub fn bend_at(&self, time: SampleTime) -> f64 {
        (self.target_pitch as f64 - self.start_pitch as f64) * self.progress_at(time)
    }

    /// Advances the voice to `time`, which should move forward one sample
    /// per call. Returns what needs to be sent for this sample.
    pub fn update_glide(&mut self, time: SampleTime) -> GlideStep {
        let mut step = GlideStep::default();
        if time < self.glide_start_time {
            return step;
        }
        if !self.has_sounded {
            self.has_sounded = true;
            if self.is_gliding && self.glide_duration_samples <= 0 {
                // Nothing to glide over, so strike the target directly.
                self.snap_to_target();
            }
            step.onset = Some(self.current_pitch);
        }
        if !self.is_gliding {
            return step;
        }

        let elapsed = time - self.glide_start_time;
        let is_bending = self.start_pitch != self.target_pitch;
        self.current_pitch_bend_semitones = self.bend_at(time);
        if elapsed >= self.glide_duration_samples {
            if is_bending {
                step.bend = Some(self.current_pitch_bend_semitones);
            }
            step.landing = Some((self.start_pitch, self.target_pitch));
            self.snap_to_target();
        } else if is_bending && step.onset.is_none() && elapsed % Self::BEND_INTERVAL_SAMPLES == 0 {
            step.bend = Some(self.current_pitch_bend_semitones);
        }
        step
    }

    fn snap_to_target(&mut self) {
        self.start_pitch = self.target_pitch;
        self.current_pitch = self.target_pitch;
        self.current_pitch_bend_semitones = 0.0;
        self.is_gliding = false;
    }

    #[allow(missing_docs)]
    pub fn channel(&self) -> MidiChannel {
        self.channel
    }

    /// The pitch the glide began from.
    pub fn start_pitch(&self) -> u8 {
        self.start_pitch
    }

    /// The note the receiver is sounding (the start pitch until the glide
    /// lands).
    pub fn current_pitch(&self) -> u8 {
        self.current_pitch
    }

    #[allow(missing_docs)]
    pub fn target_pitch(&self) -> u8 {
        self.target_pitch
    }

    #[allow(missing_docs)]
    pub fn velocity(&self) -> u7 {
        self.velocity
    }

    #[allow(missing_docs)]
    pub fn current_pitch_bend_semitones(&self) -> f64 {
        self.current_pitch_bend_semitones
    }

    #[allow(missing_docs)]
    pub fn glide_start_time(&self) -> SampleTime {
        self.glide_start_time
    }

    #[allow(missing_docs)]
    pub fn glide_duration_samples(&self) -> SampleTime {
        self.glide_duration_samples
    }

    /// The time at which the glide completes.
    pub fn landing_time(&self) -> SampleTime {
        self.glide_start_time + self.glide_duration_samples.max(0)
    }

    #[allow(missing_docs)]
    pub fn is_gliding(&self) -> bool {
        self.is_gliding
    }

    /// Whether the voice's note-on has gone out.
    pub fn has_sounded(&self) -> bool {
        self.has_sounded
    }
}
