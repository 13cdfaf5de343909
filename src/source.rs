use crate::models::{Track, load_tracks_from_file};
use anyhow::{Result, anyhow};
use std::path::PathBuf;

/// Supplies the track list the engine works on
#[cfg_attr(test, mockall::automock)]
pub trait TrackSource {
    fn load_tracks(&self) -> Result<Vec<Track>>;
}

/// Tracks stored as a JSON array on disk
pub struct JsonTrackFile {
    path: PathBuf,
}

impl JsonTrackFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TrackSource for JsonTrackFile {
    fn load_tracks(&self) -> Result<Vec<Track>> {
        load_tracks_from_file(&self.path)
    }
}

/// Split the library into the track with `current_id` and every other track
pub fn current_and_candidates(
    source: &dyn TrackSource,
    current_id: &str,
) -> Result<(Track, Vec<Track>)> {
    let tracks = source.load_tracks()?;
    let position = tracks
        .iter()
        .position(|track| track.id == current_id)
        .ok_or_else(|| anyhow!("Track '{current_id}' not found"))?;

    let mut candidates = tracks;
    let current = candidates.remove(position);
    candidates.retain(|track| track.id != current.id);
    Ok((current, candidates))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("Title {id}"),
            ..Track::default()
        }
    }

    #[test]
    fn test_current_is_split_from_candidates() {
        let mut source = MockTrackSource::new();
        source
            .expect_load_tracks()
            .times(1)
            .returning(|| Ok(vec![track("a"), track("b"), track("c")]));

        let (current, candidates) = current_and_candidates(&source, "b").unwrap();
        assert_eq!(current.id, "b");
        let ids: Vec<&str> = candidates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_unknown_track_is_an_error() {
        let mut source = MockTrackSource::new();
        source
            .expect_load_tracks()
            .returning(|| Ok(vec![track("a")]));

        let err = current_and_candidates(&source, "zzz").unwrap_err();
        assert!(err.to_string().contains("zzz"));
    }

    #[test]
    fn test_source_errors_propagate() {
        let mut source = MockTrackSource::new();
        source
            .expect_load_tracks()
            .returning(|| Err(anyhow!("library offline")));

        assert!(current_and_candidates(&source, "a").is_err());
    }

    #[test]
    fn test_json_file_source() {
        let path = std::env::temp_dir().join(format!("mixflow-source-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{"id": "x", "title": "X", "artist": "A",
                 "bpm": 126.0, "key": "5A", "energy": 0.6, "duration": 240}]"#,
        )
        .unwrap();

        let tracks = JsonTrackFile::new(&path).load_tracks().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].key.as_deref(), Some("5A"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let source = JsonTrackFile::new("/nonexistent/mixflow/tracks.json");
        let err = source.load_tracks().unwrap_err();
        assert!(format!("{err:#}").contains("failed to read tracks file"));
    }
}
