// Copyright (c) 2024 Mike Tsao

//! Handles digital-audio and wall-clock time.

use core::ops::Mul;
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use synonym::Synonym;

/// A position on the engine's global timeline, in samples since the last
/// `prepare()`. Signed so that "N samples before X" never underflows.
pub type SampleTime = i64;

/// Represents the [seconds](https://en.wikipedia.org/wiki/Second) unit of time.
#[derive(Synonym, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Seconds(pub f64);
impl Seconds {
    /// Zero seconds.
    pub const fn zero() -> Seconds {
        Seconds(0.0)
    }

    /// Converts milliseconds to seconds.
    pub fn from_millis(millis: f64) -> Seconds {
        Seconds(millis / 1000.0)
    }
}

/// Samples per second. Always a positive integer; cannot be zero.
#[derive(Synonym, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
#[synonym(skip(Default))]
#[serde(rename_all = "kebab-case")]
pub struct SampleRate(#[derivative(Default(value = "44100"))] pub usize);
#[allow(missing_docs)]
impl SampleRate {
    pub const DEFAULT_SAMPLE_RATE: usize = 44100;
    pub const DEFAULT: SampleRate = SampleRate::new(Self::DEFAULT_SAMPLE_RATE);

    pub const fn new(value: usize) -> Self {
        if value != 0 {
            Self(value)
        } else {
            Self(Self::DEFAULT_SAMPLE_RATE)
        }
    }
}
impl From<f64> for SampleRate {
    fn from(value: f64) -> Self {
        Self::new(value as usize)
    }
}
impl From<SampleRate> for f64 {
    fn from(value: SampleRate) -> Self {
        value.0 as f64
    }
}
/// (sample rate x seconds) = a whole number of samples, truncated toward zero.
/// Negative durations count as zero.
impl Mul<Seconds> for SampleRate {
    type Output = usize;

    fn mul(self, rhs: Seconds) -> Self::Output {
        (self.0 as f64 * rhs.0.max(0.0)) as usize
    }
}
