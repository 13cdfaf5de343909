use crate::error::KeyParseError;
use crate::models::Track;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Camelot number of each major key, indexed by pitch class (C = 0).
const MAJOR_WHEEL_NUMBERS: [u8; 12] = [8, 3, 10, 5, 12, 7, 2, 9, 4, 11, 6, 1];

/// Offset of the adjacent ("energy") neighbours on the wheel
const ADJACENT_STEP: i32 = 1;
/// Offset of the perfect-fifth neighbours on the wheel
const FIFTH_STEP: i32 = 4;

/// Camelot mode letter: A is minor, B is major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Minor,
    Major,
}

impl Mode {
    pub fn letter(self) -> char {
        match self {
            Mode::Minor => 'A',
            Mode::Major => 'B',
        }
    }

    pub fn opposite(self) -> Mode {
        match self {
            Mode::Minor => Mode::Major,
            Mode::Major => Mode::Minor,
        }
    }

    fn from_letter(letter: char) -> Result<Mode, KeyParseError> {
        match letter {
            'A' => Ok(Mode::Minor),
            'B' => Ok(Mode::Major),
            other => Err(KeyParseError::InvalidMode(other)),
        }
    }
}

/// A validated position on the Camelot wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CamelotKey {
    number: u8,
    mode: Mode,
}

impl CamelotKey {
    pub fn new(number: u8, mode: Mode) -> Result<Self, KeyParseError> {
        if !(1..=12).contains(&number) {
            return Err(KeyParseError::NumberOutOfRange(number as u32));
        }
        Ok(CamelotKey { number, mode })
    }

    pub fn number(self) -> u8 {
        self.number
    }

    pub fn mode(self) -> Mode {
        self.mode
    }

    /// Same wheel number, opposite mode (relative major/minor)
    pub fn relative(self) -> CamelotKey {
        CamelotKey {
            number: self.number,
            mode: self.mode.opposite(),
        }
    }

    /// Move around the wheel by `offset` positions, wrapping 12 -> 1 and 1 -> 12
    pub fn step(self, offset: i32) -> CamelotKey {
        let number = (self.number as i32 - 1 + offset).rem_euclid(12) as u8 + 1;
        CamelotKey {
            number,
            mode: self.mode,
        }
    }

    /// Convert standard notation ("Am", "F#", "Bb minor", "C major") to a Camelot key
    pub fn from_standard(raw: &str) -> Result<CamelotKey, KeyParseError> {
        let normalized = raw.trim().replace('\u{266F}', "#").replace('\u{266D}', "b");
        if normalized.is_empty() {
            return Err(KeyParseError::Empty);
        }
        let lower = normalized.to_ascii_lowercase();

        let (root, mode) = ["minor", "min", "m"]
            .iter()
            .find(|suffix| lower.ends_with(**suffix) && lower.len() > suffix.len())
            .map(|suffix| (&normalized[..normalized.len() - suffix.len()], Mode::Minor))
            .or_else(|| {
                ["major", "maj"]
                    .iter()
                    .find(|suffix| lower.ends_with(**suffix) && lower.len() > suffix.len())
                    .map(|suffix| (&normalized[..normalized.len() - suffix.len()], Mode::Major))
            })
            .unwrap_or((normalized.as_str(), Mode::Major));

        let pitch_class =
            pitch_class(root.trim()).ok_or_else(|| KeyParseError::Unrecognized(raw.to_string()))?;

        let number = match mode {
            Mode::Major => MAJOR_WHEEL_NUMBERS[pitch_class],
            // A minor key shares its wheel number with the major key a minor third above
            Mode::Minor => MAJOR_WHEEL_NUMBERS[(pitch_class + 3) % 12],
        };
        Ok(CamelotKey { number, mode })
    }
}

fn pitch_class(root: &str) -> Option<usize> {
    let mut chars = root.chars();
    let base: i32 = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let accidental = match chars.next() {
        None => 0,
        Some('#') => 1,
        Some('b') | Some('B') => -1,
        Some(_) => return None,
    };
    if chars.next().is_some() {
        return None;
    }
    Some((base + accidental).rem_euclid(12) as usize)
}

impl FromStr for CamelotKey {
    type Err = KeyParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim().to_ascii_uppercase();
        let letter = trimmed.chars().last().ok_or(KeyParseError::Empty)?;
        let digits = &trimmed[..trimmed.len() - letter.len_utf8()];

        // Plain wheel numbers only: no sign, no zero padding
        let canonical = !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && (digits == "0" || !digits.starts_with('0'));
        if !canonical {
            return Err(KeyParseError::InvalidNumber(digits.to_string()));
        }
        let number: u32 = digits
            .parse()
            .map_err(|_| KeyParseError::InvalidNumber(digits.to_string()))?;
        if !(1..=12).contains(&number) {
            return Err(KeyParseError::NumberOutOfRange(number));
        }
        let mode = Mode::from_letter(letter)?;

        Ok(CamelotKey {
            number: number as u8,
            mode,
        })
    }
}

impl fmt::Display for CamelotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.mode.letter())
    }
}

impl TryFrom<String> for CamelotKey {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CamelotKey> for String {
    fn from(key: CamelotKey) -> Self {
        key.to_string()
    }
}

/// Relationship between two keys for mixing purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyTransition {
    Perfect,
    Smooth,
    Risky,
    Clash,
    Unknown,
}

impl KeyTransition {
    pub fn score(self) -> f64 {
        match self {
            KeyTransition::Perfect => 1.0,
            KeyTransition::Smooth => 0.8,
            KeyTransition::Risky => 0.5,
            KeyTransition::Clash => 0.2,
            KeyTransition::Unknown => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KeyTransition::Perfect => "perfect",
            KeyTransition::Smooth => "smooth",
            KeyTransition::Risky => "risky",
            KeyTransition::Clash => "clash",
            KeyTransition::Unknown => "unknown",
        }
    }
}

impl fmt::Display for KeyTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keys reachable from a starting key, grouped by how safe the mix is
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompatibleKeys {
    pub perfect: Vec<CamelotKey>,
    pub safe: Vec<CamelotKey>,
    pub risky: Vec<CamelotKey>,
}

impl CompatibleKeys {
    pub fn for_key(key: CamelotKey) -> Self {
        let down = key.step(-ADJACENT_STEP);
        let up = key.step(ADJACENT_STEP);
        let fifth_down = key.step(-FIFTH_STEP);
        let fifth_up = key.step(FIFTH_STEP);

        CompatibleKeys {
            perfect: vec![key, key.relative()],
            safe: vec![down, up, down.relative(), up.relative()],
            risky: vec![fifth_down, fifth_down.relative(), fifth_up, fifth_up.relative()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.perfect.is_empty() && self.safe.is_empty() && self.risky.is_empty()
    }

    /// Where `to` falls relative to the key these lists were built from
    pub fn classify(&self, to: CamelotKey) -> KeyTransition {
        if self.perfect.contains(&to) {
            KeyTransition::Perfect
        } else if self.safe.contains(&to) {
            KeyTransition::Smooth
        } else if self.risky.contains(&to) {
            KeyTransition::Risky
        } else {
            KeyTransition::Clash
        }
    }
}

/// Payload describing where a key can go next
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarmonicReport {
    pub key: CamelotKey,
    pub compatible_keys: Vec<CamelotKey>,
    pub safe_transitions: Vec<CamelotKey>,
    pub modal_interchange: Vec<CamelotKey>,
}

/// Camelot wheel harmonic mixing rules
pub struct HarmonicMixing;

impl HarmonicMixing {
    /// Perfect, safe and risky keys for a Camelot key; all empty if the key does not parse
    pub fn compatible_keys(key: &str) -> CompatibleKeys {
        match key.parse::<CamelotKey>() {
            Ok(parsed) => CompatibleKeys::for_key(parsed),
            Err(e) => {
                debug!("No compatible keys for '{key}': {e}");
                CompatibleKeys::default()
            }
        }
    }

    /// Transition type between two key strings; unparsable or empty keys are `Unknown`
    pub fn transition_type(from_key: &str, to_key: &str) -> KeyTransition {
        match (from_key.parse::<CamelotKey>(), to_key.parse::<CamelotKey>()) {
            (Ok(from), Ok(to)) => Self::transition_between_keys(from, to),
            _ => KeyTransition::Unknown,
        }
    }

    pub fn transition_between_keys(from: CamelotKey, to: CamelotKey) -> KeyTransition {
        CompatibleKeys::for_key(from).classify(to)
    }

    /// Key transition between two tracks, `Unknown` when either lacks a usable key
    pub fn transition_between(from: &Track, to: &Track) -> KeyTransition {
        match (from.camelot_key(), to.camelot_key()) {
            (Some(from), Some(to)) => Self::transition_between_keys(from, to),
            _ => KeyTransition::Unknown,
        }
    }

    pub fn compatibility_score(from_key: &str, to_key: &str) -> f64 {
        Self::transition_type(from_key, to_key).score()
    }

    /// Parallel mode plus the neighbouring positions in both modes
    pub fn modal_interchange_suggestions(key: &str) -> Vec<CamelotKey> {
        let Ok(key) = key.parse::<CamelotKey>() else {
            return Vec::new();
        };
        let subdominant = key.step(-ADJACENT_STEP);
        let dominant = key.step(ADJACENT_STEP);

        vec![
            key.relative(),
            subdominant,
            dominant,
            subdominant.relative(),
            dominant.relative(),
        ]
    }

    /// Accept Camelot ("8A") or standard ("Am", "C major") notation
    pub fn to_camelot(raw: &str) -> Result<CamelotKey, KeyParseError> {
        raw.parse::<CamelotKey>()
            .or_else(|_| CamelotKey::from_standard(raw))
    }

    pub fn harmonic_report(key: &str) -> Option<HarmonicReport> {
        let parsed = key.parse::<CamelotKey>().ok()?;
        let compat = CompatibleKeys::for_key(parsed);

        let mut compatible_keys = compat.perfect.clone();
        compatible_keys.extend(compat.safe.iter().copied());

        Some(HarmonicReport {
            key: parsed,
            compatible_keys,
            safe_transitions: compat.safe,
            modal_interchange: Self::modal_interchange_suggestions(key),
        })
    }

    /// Candidates whose key mixes with the reference track.
    /// Perfect matches come first, then safe, then risky.
    pub fn compatible_tracks<'a>(
        reference: &Track,
        candidates: &'a [Track],
    ) -> Vec<(&'a Track, KeyTransition)> {
        let Some(reference_key) = reference.camelot_key() else {
            return Vec::new();
        };
        let compat = CompatibleKeys::for_key(reference_key);

        let groups = [
            (&compat.perfect, KeyTransition::Perfect),
            (&compat.safe, KeyTransition::Smooth),
            (&compat.risky, KeyTransition::Risky),
        ];

        let mut matches = Vec::new();
        for (keys, transition) in groups {
            for key in keys {
                for candidate in candidates {
                    if candidate.id != reference.id && candidate.camelot_key() == Some(*key) {
                        matches.push((candidate, transition));
                    }
                }
            }
        }
        matches
    }
}
