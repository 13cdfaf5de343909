use super::scoring::{FlowScoring, SuggestionRequest};
use crate::models::Track;
use log::debug;

/// Set ordering utilities
pub struct SetOrdering;

impl SetOrdering {
    /// Greedily reorder a set for smooth flow.
    ///
    /// Opens with the highest-energy track (missing energy counts as 0), then keeps
    /// appending the best-scoring next track with the energy held steady. When no
    /// candidate can be ranked, the first remaining track is placed so the loop
    /// always terminates. The output is a permutation of the input.
    pub fn optimize_order(tracks: &[Track]) -> Vec<Track> {
        if tracks.is_empty() {
            return Vec::new();
        }

        let mut remaining = tracks.to_vec();
        // sort_by is stable, so equal energies keep their input order
        remaining.sort_by(|a, b| b.energy.unwrap_or(0.0).total_cmp(&a.energy.unwrap_or(0.0)));

        let mut ordered = Vec::with_capacity(remaining.len());
        ordered.push(remaining.remove(0));

        let request = SuggestionRequest::default();
        while !remaining.is_empty() {
            let current = &ordered[ordered.len() - 1];
            let best = FlowScoring::suggest_next(current, &remaining, &request)
                .first()
                .map(|top| (top.index, top.score));

            let next_index = match best {
                Some((index, score)) => {
                    debug!(
                        "Placing {} after {} (score {score:.2})",
                        remaining[index].id, current.id
                    );
                    index
                }
                None => {
                    debug!(
                        "No ranked candidate after {}; falling back to {}",
                        current.id, remaining[0].id
                    );
                    0
                }
            };
            ordered.push(remaining.remove(next_index));
        }

        ordered
    }
}
