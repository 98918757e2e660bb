// Copyright (c) 2024 Mike Tsao

use crate::{
    elements::VoiceMappingStrategy,
    types::{PitchBendRange, SampleRate, Seconds},
};
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Things that can be wrong with a [ChordGlideParams].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ChordGlideError {
    /// A parameter was outside the range the engine supports.
    #[error("{name} must be between {min} and {max}, but was {value}")]
    ParameterOutOfRange {
        #[allow(missing_docs)]
        name: &'static str,
        #[allow(missing_docs)]
        value: f64,
        #[allow(missing_docs)]
        min: f64,
        #[allow(missing_docs)]
        max: f64,
    },
}

/// The user-facing settings of the chord-glide engine. The host reads these
/// from its own parameter system and hands them over between blocks.
#[derive(Clone, Copy, Builder, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case")]
#[builder(default)]
pub struct ChordGlideParams {
    /// How long each glide lasts, in milliseconds. This is also the latency
    /// the engine adds.
    #[derivative(Default(value = "ChordGlideParams::GLIDE_TIME_MS_DEFAULT"))]
    glide_time_ms: f64,

    /// The receiver's pitch-bend range. The engine also sends it to the
    /// receiver at startup.
    pitch_bend_range: PitchBendRange,

    /// How voices of one chord are assigned to notes of the next.
    strategy: VoiceMappingStrategy,
}
#[allow(missing_docs)]
impl ChordGlideParams {
    pub const GLIDE_TIME_MS_MIN: f64 = 10.0;
    pub const GLIDE_TIME_MS_MAX: f64 = 2000.0;
    pub const GLIDE_TIME_MS_DEFAULT: f64 = 200.0;

    pub fn glide_time_ms(&self) -> f64 {
        self.glide_time_ms
    }

    /// Clamps to the supported range.
    pub fn set_glide_time_ms(&mut self, glide_time_ms: f64) {
        self.glide_time_ms = Self::clamp_glide_time(glide_time_ms);
    }

    pub fn pitch_bend_range(&self) -> PitchBendRange {
        self.pitch_bend_range
    }

    /// Clamps to the supported range.
    pub fn set_pitch_bend_range(&mut self, pitch_bend_range: PitchBendRange) {
        self.pitch_bend_range = PitchBendRange::new(pitch_bend_range.0);
    }

    pub fn strategy(&self) -> VoiceMappingStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: VoiceMappingStrategy) {
        self.strategy = strategy;
    }

    /// The glide length in samples, which is also the lookahead.
    pub fn lookahead_samples(&self, sample_rate: SampleRate) -> usize {
        sample_rate * Seconds::from_millis(Self::clamp_glide_time(self.glide_time_ms))
    }

    /// Reports the first out-of-range field. Deserialized params are not
    /// checked until this is called.
    pub fn validate(&self) -> Result<(), ChordGlideError> {
        if !(Self::GLIDE_TIME_MS_MIN..=Self::GLIDE_TIME_MS_MAX).contains(&self.glide_time_ms) {
            return Err(ChordGlideError::ParameterOutOfRange {
                name: "glide-time-ms",
                value: self.glide_time_ms,
                min: Self::GLIDE_TIME_MS_MIN,
                max: Self::GLIDE_TIME_MS_MAX,
            });
        }
        if !(PitchBendRange::MIN_VALUE..=PitchBendRange::MAX_VALUE).contains(&self.pitch_bend_range.0)
        {
            return Err(ChordGlideError::ParameterOutOfRange {
                name: "pitch-bend-range",
                value: self.pitch_bend_range.0 as f64,
                min: PitchBendRange::MIN_VALUE as f64,
                max: PitchBendRange::MAX_VALUE as f64,
            });
        }
        Ok(())
    }

    /// A copy with every field forced into range.
    pub fn clamped(&self) -> Self {
        Self {
            glide_time_ms: Self::clamp_glide_time(self.glide_time_ms),
            pitch_bend_range: PitchBendRange::new(self.pitch_bend_range.0),
            strategy: self.strategy,
        }
    }

    fn clamp_glide_time(glide_time_ms: f64) -> f64 {
        if glide_time_ms.is_nan() {
            Self::GLIDE_TIME_MS_DEFAULT
        } else {
            glide_time_ms.clamp(Self::GLIDE_TIME_MS_MIN, Self::GLIDE_TIME_MS_MAX)
        }
    }
}
