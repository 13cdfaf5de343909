use serde::{Deserialize, Serialize};

/// BPM distance covered by each suggested intermediate step
const INTERMEDIATE_STEP_BPM: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BpmTransitionType {
    Smooth,
    Moderate,
    Aggressive,
    Extreme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    VeryHard,
}

/// Result of classifying the tempo change between two tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BpmTransition {
    pub transition_type: BpmTransitionType,
    pub difficulty: Difficulty,
    pub bpm_difference: f64, // to - from
    pub intermediate_bpms: Vec<f64>,
    pub recommended: bool,
}

/// Tempo transition rules between songs
pub struct BpmTransitions;

impl BpmTransitions {
    /// Classify the jump from `from_bpm` to `to_bpm`
    pub fn classify(from_bpm: f64, to_bpm: f64) -> BpmTransition {
        let bpm_difference = to_bpm - from_bpm;
        let (transition_type, difficulty) = Self::band(bpm_difference.abs());

        BpmTransition {
            transition_type,
            difficulty,
            bpm_difference,
            intermediate_bpms: Self::intermediate_steps(from_bpm, bpm_difference),
            recommended: Self::is_recommended(from_bpm, to_bpm),
        }
    }

    /// Difficulty band alone, without building stepping stones
    pub fn difficulty(from_bpm: f64, to_bpm: f64) -> Difficulty {
        Self::band((to_bpm - from_bpm).abs()).1
    }

    pub fn is_recommended(from_bpm: f64, to_bpm: f64) -> bool {
        (to_bpm - from_bpm).abs() < 5.0
    }

    fn band(abs_diff: f64) -> (BpmTransitionType, Difficulty) {
        if abs_diff < 2.0 {
            (BpmTransitionType::Smooth, Difficulty::Easy)
        } else if abs_diff < 5.0 {
            (BpmTransitionType::Moderate, Difficulty::Medium)
        } else if abs_diff < 10.0 {
            (BpmTransitionType::Aggressive, Difficulty::Hard)
        } else {
            // NaN lands here too
            (BpmTransitionType::Extreme, Difficulty::VeryHard)
        }
    }

    /// Stepping stones of 3 BPM toward the target for jumps larger than 5 BPM
    fn intermediate_steps(from_bpm: f64, bpm_difference: f64) -> Vec<f64> {
        let abs_diff = bpm_difference.abs();
        if !abs_diff.is_finite() || abs_diff <= 5.0 {
            return Vec::new();
        }

        let steps = (abs_diff / INTERMEDIATE_STEP_BPM).floor() as usize;
        let direction = if bpm_difference > 0.0 { 1.0 } else { -1.0 };
        (1..=steps)
            .map(|i| from_bpm + direction * INTERMEDIATE_STEP_BPM * i as f64)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identical_bpm_is_smooth() {
        let transition = BpmTransitions::classify(128.0, 128.0);
        assert_eq!(
            transition,
            BpmTransition {
                transition_type: BpmTransitionType::Smooth,
                difficulty: Difficulty::Easy,
                bpm_difference: 0.0,
                intermediate_bpms: vec![],
                recommended: true,
            }
        );
    }

    #[test]
    fn test_large_jump_gets_intermediate_steps() {
        let transition = BpmTransitions::classify(120.0, 140.0);
        assert_relative_eq!(transition.bpm_difference, 20.0);
        assert_eq!(transition.transition_type, BpmTransitionType::Extreme);
        assert_eq!(transition.difficulty, Difficulty::VeryHard);
        assert!(!transition.recommended);
        assert_eq!(
            transition.intermediate_bpms,
            vec![123.0, 126.0, 129.0, 132.0, 135.0, 138.0]
        );

        let mut previous = 120.0;
        for bpm in &transition.intermediate_bpms {
            assert_relative_eq!(*bpm - previous, 3.0);
            assert!(*bpm < 140.0);
            previous = *bpm;
        }
    }

    #[test]
    fn test_downward_jump_steps_down() {
        let transition = BpmTransitions::classify(130.0, 122.0);
        assert_relative_eq!(transition.bpm_difference, -8.0);
        assert_eq!(transition.transition_type, BpmTransitionType::Aggressive);
        assert_eq!(transition.difficulty, Difficulty::Hard);
        assert_eq!(transition.intermediate_bpms, vec![127.0, 124.0]);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(BpmTransitions::classify(120.0, 121.9).difficulty, Difficulty::Easy);
        assert_eq!(BpmTransitions::classify(120.0, 122.0).difficulty, Difficulty::Medium);
        assert_eq!(BpmTransitions::classify(120.0, 125.0).difficulty, Difficulty::Hard);
        assert_eq!(BpmTransitions::classify(120.0, 130.0).difficulty, Difficulty::VeryHard);

        // Exactly 5 BPM is not recommended but also gets no stepping stones
        let five = BpmTransitions::classify(120.0, 125.0);
        assert!(!five.recommended);
        assert!(five.intermediate_bpms.is_empty());

        let four = BpmTransitions::classify(124.0, 120.0);
        assert!(four.recommended);
        assert_eq!(four.transition_type, BpmTransitionType::Moderate);
    }

    #[test]
    fn test_non_finite_bpm_has_no_steps() {
        let transition = BpmTransitions::classify(120.0, f64::INFINITY);
        assert_eq!(transition.difficulty, Difficulty::VeryHard);
        assert!(!transition.recommended);
        assert!(transition.intermediate_bpms.is_empty());

        let transition = BpmTransitions::classify(f64::NEG_INFINITY, 120.0);
        assert!(transition.intermediate_bpms.is_empty());

        let transition = BpmTransitions::classify(120.0, f64::NAN);
        assert_eq!(transition.transition_type, BpmTransitionType::Extreme);
        assert!(!transition.recommended);
        assert!(transition.intermediate_bpms.is_empty());
    }

    #[test]
    fn test_band_helpers_match_classify() {
        for (from, to) in [(128.0, 128.0), (120.0, 123.5), (120.0, 127.0), (120.0, 160.0)] {
            let full = BpmTransitions::classify(from, to);
            assert_eq!(BpmTransitions::difficulty(from, to), full.difficulty);
            assert_eq!(BpmTransitions::is_recommended(from, to), full.recommended);
        }
        assert_eq!(BpmTransitions::difficulty(120.0, f64::INFINITY), Difficulty::VeryHard);
    }

    #[test]
    fn test_serializes_snake_case() {
        let json = serde_json::to_value(BpmTransitions::classify(100.0, 120.0)).unwrap();
        assert_eq!(json["transition_type"], "extreme");
        assert_eq!(json["difficulty"], "very_hard");
    }
}
