use crate::mixing::harmonic::CamelotKey;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A track as supplied by the library/persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub bpm: Option<f64>,
    #[serde(default)]
    pub key: Option<String>, // Camelot notation, e.g. "8A"
    #[serde(default)]
    pub energy: Option<f64>, // 0.0 - 1.0
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>, // seconds
}

impl Track {
    /// Parsed Camelot key, if the track has a usable one
    pub fn camelot_key(&self) -> Option<CamelotKey> {
        self.key.as_deref().and_then(|key| key.parse().ok())
    }

    /// Short display line used by the CLI
    pub fn describe(&self) -> String {
        let bpm = self
            .bpm
            .map(|bpm| format!("{bpm:.1}bpm"))
            .unwrap_or_else(|| "?bpm".to_string());
        let key = self.key.as_deref().unwrap_or("?");
        let energy = self
            .energy
            .map(|energy| format!("E{energy:.2}"))
            .unwrap_or_else(|| "E?".to_string());
        format!("\"{}\" by {} [{bpm} | {key} | {energy}]", self.title, self.artist)
    }
}

impl Default for Track {
    fn default() -> Self {
        Track {
            id: String::new(),
            title: "Unknown".to_string(),
            artist: "Unknown".to_string(),
            bpm: None,
            key: None,
            energy: None,
            genre: None,
            duration: None,
        }
    }
}

/// Load a JSON array of tracks from disk
pub fn load_tracks_from_file(path: &Path) -> Result<Vec<Track>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tracks file '{}'", path.display()))?;
    parse_tracks(&content).with_context(|| format!("invalid tracks file '{}'", path.display()))
}

/// Parse a JSON array of tracks
pub fn parse_tracks(json: &str) -> Result<Vec<Track>> {
    let tracks: Vec<Track> = serde_json::from_str(json)?;
    Ok(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tracks_with_missing_optionals() {
        let json = r#"[
            {"id": "a", "title": "First", "artist": "X",
             "bpm": 124.0, "key": "8A", "energy": 0.0, "duration": 300},
            {"id": "b", "title": "Second", "artist": "Y"}
        ]"#;

        let tracks = parse_tracks(json).unwrap();
        assert_eq!(tracks.len(), 2);
        // Zero energy is a real value, not a missing one
        assert_eq!(tracks[0].energy, Some(0.0));
        assert_eq!(tracks[0].duration, Some(300));
        assert_eq!(tracks[1].bpm, None);
        assert_eq!(tracks[1].key, None);
        assert_eq!(tracks[1].genre, None);
    }

    #[test]
    fn test_parse_tracks_rejects_missing_id() {
        let json = r#"[{"title": "No Id", "artist": "X"}]"#;
        assert!(parse_tracks(json).is_err());
    }

    #[test]
    fn test_camelot_key_accessor() {
        let mut track = Track {
            key: Some("11b".to_string()),
            ..Track::default()
        };
        assert_eq!(track.camelot_key().map(|k| k.to_string()), Some("11B".to_string()));

        track.key = Some("13A".to_string());
        assert!(track.camelot_key().is_none());

        track.key = None;
        assert!(track.camelot_key().is_none());
    }
}
