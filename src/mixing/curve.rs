use crate::models::Track;
use serde::Serialize;

/// Energy fall between consecutive points that counts as a drop
pub const DEFAULT_DROP_THRESHOLD: f64 = 0.2;

/// One track's place on a set's energy curve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyCurvePoint {
    pub position: usize, // index in the ordered track list
    pub track_id: String,
    pub time_offset_seconds: u64,
    pub energy: f64,
    pub bpm: Option<f64>,
}

/// Energy curve of a set together with its drop points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveReport {
    pub curve: Vec<EnergyCurvePoint>,
    pub drops: Vec<usize>,
    pub total_duration: u64, // seconds, every track with a known duration
}

/// Energy curve construction and inspection
pub struct EnergyCurve;

impl EnergyCurve {
    /// Build the curve for tracks in play order. Tracks lacking a duration or an
    /// energy value get no point and do not advance the clock.
    pub fn build_curve(ordered_tracks: &[Track]) -> Vec<EnergyCurvePoint> {
        let mut curve = Vec::new();
        let mut elapsed: u64 = 0;

        for (position, track) in ordered_tracks.iter().enumerate() {
            let (Some(duration), Some(energy)) = (track.duration, track.energy) else {
                continue;
            };
            curve.push(EnergyCurvePoint {
                position,
                track_id: track.id.clone(),
                time_offset_seconds: elapsed,
                energy,
                bpm: track.bpm,
            });
            elapsed += u64::from(duration);
        }

        curve
    }

    /// Indices into `curve` where energy falls by more than `threshold` from the previous point
    pub fn detect_energy_drops(curve: &[EnergyCurvePoint], threshold: f64) -> Vec<usize> {
        curve
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[1].energy - pair[0].energy < -threshold)
            .map(|(i, _)| i + 1)
            .collect()
    }

    pub fn analyze(ordered_tracks: &[Track], threshold: f64) -> CurveReport {
        let curve = Self::build_curve(ordered_tracks);
        let drops = Self::detect_energy_drops(&curve, threshold);
        let total_duration = ordered_tracks
            .iter()
            .filter_map(|track| track.duration)
            .map(u64::from)
            .sum();

        CurveReport {
            curve,
            drops,
            total_duration,
        }
    }
}
