//! Nearest-branch ranking.
//!
//! [`find_nearest`] is a pure function over any slice of [`Located`] values.
//! Invalid input never errors; it degrades to `None`.

use crate::geo::{haversine_km, Coordinate};
use serde::{Deserialize, Serialize};

/// Anything that may sit at a point on the map.
pub trait Located {
    /// `None` when the record has no usable coordinate; such records are skipped.
    fn coordinate(&self) -> Option<Coordinate>;
}

/// The winning candidate plus its distance from the query.
///
/// Serializes as the candidate's own fields with an added `distance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult<T> {
    #[serde(flatten)]
    pub candidate: T,
    #[serde(rename = "distance")]
    pub distance_km: u32,
}

/// Returns the candidate closest to `query`, or `None`.
///
/// Comparison is on the unrounded haversine distance; the first candidate wins
/// a tie. When `max_radius_km` is set, anything farther than it is ignored.
pub fn find_nearest<T>(
    query: Option<Coordinate>,
    candidates: &[T],
    max_radius_km: Option<f64>,
) -> Option<RankedResult<T>>
where
    T: Located + Clone,
{
    let query = query?;

    let mut best: Option<(&T, f64)> = None;
    for candidate in candidates {
        let Some(point) = candidate.coordinate() else {
            continue;
        };
        let distance = haversine_km(query, point);
        if max_radius_km.is_some_and(|radius| distance > radius) {
            continue;
        }
        if best.map_or(true, |(_, min)| distance < min) {
            best = Some((candidate, distance));
        }
    }

    best.map(|(candidate, distance)| RankedResult {
        candidate: candidate.clone(),
        distance_km: distance.round() as u32,
    })
}
