use super::bpm::{BpmTransitions, Difficulty};
use super::harmonic::{HarmonicMixing, KeyTransition};
use crate::models::Track;
use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;

const SMOOTH_BPM_POINTS: f64 = 0.4;
const MODERATE_BPM_POINTS: f64 = 0.2;
const ENERGY_DIRECTION_POINTS: f64 = 0.3;
const TARGET_ENERGY_POINTS: f64 = 0.2;
const TARGET_BPM_POINTS: f64 = 0.1;
const SAME_GENRE_POINTS: f64 = 0.1;

const TARGET_ENERGY_TOLERANCE: f64 = 0.15;
const TARGET_BPM_TOLERANCE: f64 = 3.0;

/// Which way the energy should move on the next track
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum EnergyDirection {
    #[default]
    Maintain,
    Boost,
    Drop,
}

/// Why a candidate earned points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonTag {
    SmoothBpm,
    ModerateBpm,
    MatchedEnergy,
    EnergyBoost,
    EnergyDrop,
    TargetEnergy,
    TargetBpm,
    SameGenre,
}

impl ReasonTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ReasonTag::SmoothBpm => "smooth_bpm",
            ReasonTag::ModerateBpm => "moderate_bpm",
            ReasonTag::MatchedEnergy => "matched_energy",
            ReasonTag::EnergyBoost => "energy_boost",
            ReasonTag::EnergyDrop => "energy_drop",
            ReasonTag::TargetEnergy => "target_energy",
            ReasonTag::TargetBpm => "target_bpm",
            ReasonTag::SameGenre => "same_genre",
        }
    }
}

impl fmt::Display for ReasonTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional goals for the next track
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SuggestionRequest {
    pub target_energy: Option<f64>,
    pub target_bpm: Option<f64>,
    pub energy_direction: EnergyDirection,
}

/// Coarse label for how safe a suggested transition is overall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionGrade {
    Smooth,
    Moderate,
    Risky,
}

/// A ranked candidate for the next track
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion<'a> {
    pub track: &'a Track,
    pub index: usize, // position in the candidate slice
    pub score: f64,
    pub reasons: Vec<ReasonTag>,
    pub key_transition: KeyTransition,
}

/// Owned form of a suggestion for handing to the API layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityResult {
    pub track_id: String,
    pub score: f64,
    pub reason_tags: Vec<ReasonTag>,
    pub transition_type: KeyTransition,
}

impl Suggestion<'_> {
    pub fn reason_summary(&self) -> String {
        self.reasons
            .iter()
            .map(|reason| reason.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn grade(&self) -> SuggestionGrade {
        if self.score > 0.7 {
            SuggestionGrade::Smooth
        } else if self.score > 0.4 {
            SuggestionGrade::Moderate
        } else {
            SuggestionGrade::Risky
        }
    }

    pub fn to_result(&self) -> CompatibilityResult {
        CompatibilityResult {
            track_id: self.track.id.clone(),
            score: self.score,
            reason_tags: self.reasons.clone(),
            transition_type: self.key_transition,
        }
    }
}

/// Next-track compatibility scoring
pub struct FlowScoring;

impl FlowScoring {
    /// Rank candidates as the track to play after `current`.
    /// Scores are additive and are not clamped to 1.0; ties keep candidate order.
    pub fn suggest_next<'a>(
        current: &Track,
        candidates: &'a [Track],
        request: &SuggestionRequest,
    ) -> Vec<Suggestion<'a>> {
        let mut suggestions: Vec<Suggestion<'a>> = candidates
            .iter()
            .enumerate()
            .filter(|(_, candidate)| candidate.id != current.id)
            .map(|(index, candidate)| {
                let (score, reasons) = Self::score_candidate(current, candidate, request);
                Suggestion {
                    track: candidate,
                    index,
                    score,
                    reasons,
                    key_transition: HarmonicMixing::transition_between(current, candidate),
                }
            })
            .collect();

        // sort_by is stable
        suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
        suggestions
    }

    /// Score a single candidate against the current track
    pub fn score_candidate(
        current: &Track,
        candidate: &Track,
        request: &SuggestionRequest,
    ) -> (f64, Vec<ReasonTag>) {
        let mut score = 0.0;
        let mut reasons = Vec::new();

        // 1. BPM compatibility with the current track
        if let (Some(current_bpm), Some(candidate_bpm)) = (current.bpm, candidate.bpm) {
            let difficulty = BpmTransitions::difficulty(current_bpm, candidate_bpm);
            if BpmTransitions::is_recommended(current_bpm, candidate_bpm) {
                score += SMOOTH_BPM_POINTS;
                reasons.push(ReasonTag::SmoothBpm);
            } else if difficulty == Difficulty::Medium {
                score += MODERATE_BPM_POINTS;
                reasons.push(ReasonTag::ModerateBpm);
            }
        }

        // 2. Energy movement in the requested direction
        if let (Some(current_energy), Some(candidate_energy)) = (current.energy, candidate.energy) {
            if let Some(tag) = Self::energy_direction_tag(
                candidate_energy - current_energy,
                request.energy_direction,
            ) {
                score += ENERGY_DIRECTION_POINTS;
                reasons.push(tag);
            }
        }

        // 3. Closeness to target energy
        if let (Some(target), Some(energy)) = (request.target_energy, candidate.energy) {
            if (energy - target).abs() < TARGET_ENERGY_TOLERANCE {
                score += TARGET_ENERGY_POINTS;
                reasons.push(ReasonTag::TargetEnergy);
            }
        }

        // 4. Closeness to target BPM
        if let (Some(target), Some(bpm)) = (request.target_bpm, candidate.bpm) {
            if (bpm - target).abs() < TARGET_BPM_TOLERANCE {
                score += TARGET_BPM_POINTS;
                reasons.push(ReasonTag::TargetBpm);
            }
        }

        // 5. Genre consistency
        if let (Some(current_genre), Some(candidate_genre)) = (&current.genre, &candidate.genre) {
            if current_genre == candidate_genre {
                score += SAME_GENRE_POINTS;
                reasons.push(ReasonTag::SameGenre);
            }
        }

        trace!("{} -> {}: {score:.2} {reasons:?}", current.id, candidate.id);
        (score, reasons)
    }

    fn energy_direction_tag(energy_diff: f64, direction: EnergyDirection) -> Option<ReasonTag> {
        match direction {
            EnergyDirection::Maintain if energy_diff.abs() < 0.1 => Some(ReasonTag::MatchedEnergy),
            EnergyDirection::Boost if (0.1..=0.3).contains(&energy_diff) => {
                Some(ReasonTag::EnergyBoost)
            }
            EnergyDirection::Drop if (-0.3..=-0.1).contains(&energy_diff) => {
                Some(ReasonTag::EnergyDrop)
            }
            _ => None,
        }
    }
}
