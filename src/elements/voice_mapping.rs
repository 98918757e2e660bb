// Copyright (c) 2024 Mike Tsao

use crate::util::Rng;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter, FromRepr, IntoStaticStr};

/// How the notes of one chord are assigned to the notes of the next.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumCount,
    EnumIter,
    Eq,
    FromRepr,
    IntoStaticStr,
    PartialEq,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum VoiceMappingStrategy {
    /// Each note glides to the closest note of the next chord.
    #[default]
    #[strum(serialize = "Nearest Note")]
    NearestDistance,
    /// Each note glides to a randomly chosen note of the next chord.
    #[strum(serialize = "Random")]
    Random,
}
impl VoiceMappingStrategy {
    /// Maps each `source` pitch to one or more `target` pitches.
    ///
    /// Every source appears as a key, in input order. Every target appears in
    /// some key's list, so a growing chord fans out rather than dropping
    /// notes. If either side is empty, the mapping is empty.
    pub fn map(&self, source: &[u8], target: &[u8], rng: &mut Rng) -> VoiceMapping {
        if source.is_empty() || target.is_empty() {
            return VoiceMapping::default();
        }
        match self {
            VoiceMappingStrategy::NearestDistance => Self::map_nearest(source, target),
            VoiceMappingStrategy::Random => Self::map_random(source, target, rng),
        }
    }

    // Greedy, not globally optimal. Two sources may claim the same nearest
    // target in the first pass; the second pass only places targets nobody
    // claimed.
    fn map_nearest(source: &[u8], target: &[u8]) -> VoiceMapping {
        let mut entries: Vec<(u8, Vec<u8>)> = source.iter().map(|s| (*s, Vec::new())).collect();
        let mut claimed = vec![false; target.len()];

        for (s, targets) in entries.iter_mut() {
            let index = Self::nearest_index(*s, target);
            targets.push(target[index]);
            claimed[index] = true;
        }
        for (t, _) in target.iter().zip(claimed).filter(|(_, claimed)| !claimed) {
            let index = Self::nearest_index(*t, source);
            entries[index].1.push(*t);
        }
        VoiceMapping(entries)
    }

    fn map_random(source: &[u8], target: &[u8], rng: &mut Rng) -> VoiceMapping {
        let mut remaining = target.to_vec();
        let mut entries: Vec<(u8, Vec<u8>)> = source
            .iter()
            .map(|s| {
                let mut targets = Vec::new();
                if !remaining.is_empty() {
                    targets.push(remaining.remove(rng.rand_index(remaining.len())));
                }
                (*s, targets)
            })
            .collect();
        while let Some(t) = remaining.pop() {
            let index = rng.rand_index(entries.len());
            entries[index].1.push(t);
        }
        VoiceMapping(entries)
    }

    // Ties go to the first candidate in input order.
    fn nearest_index(pitch: u8, candidates: &[u8]) -> usize {
        let mut best = 0;
        let mut best_distance = pitch.abs_diff(candidates[0]);
        for (i, candidate) in candidates.iter().enumerate().skip(1) {
            let distance = pitch.abs_diff(*candidate);
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }
        best
    }
}

/// The result of a [VoiceMappingStrategy]: for each source pitch, the target
/// pitches its voice(s) should glide to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoiceMapping(pub Vec<(u8, Vec<u8>)>);
impl VoiceMapping {
    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every (source, target) pair, one per voice that the transition needs.
    pub fn pairs(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.0
            .iter()
            .flat_map(|(s, targets)| targets.iter().map(move |t| (*s, *t)))
    }

    /// All targets across all entries, in entry order.
    pub fn targets(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().flat_map(|(_, targets)| targets.iter().copied())
    }

    /// The targets assigned to the given source, if it's a key.
    pub fn targets_for(&self, source: u8) -> Option<&[u8]> {
        self.0
            .iter()
            .find(|(s, _)| *s == source)
            .map(|(_, targets)| targets.as_slice())
    }
}
