// ABOUTME: Coverage evaluation over the five fixed areas
// ABOUTME: Clamps reported values, folds them into prior coverage, and derives the active area and UI gates

use serde::Serialize;
use specloom_core::{AreaId, CoverageMap};

/// An area at or above this value no longer drives questioning.
pub const AREA_READY_THRESHOLD: f64 = 70.0;

/// The review action unlocks at this average.
pub const REVIEW_THRESHOLD: f64 = 60.0;

/// Derived view of the coverage map for one turn.
///
/// `active_area` and the gating booleans are UI heuristics; the
/// collaborator's `done` flag stays authoritative for termination and is
/// carried beside this report, never inside it.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub per_area: CoverageMap,
    pub average: f64,
    pub active_area: Option<AreaId>,
    pub review_enabled: bool,
    pub all_areas_ready: bool,
}

/// Fold a collaborator-reported coverage map into the prior one.
///
/// Reported values are clamped to [0, 100]. Areas missing from the report
/// keep their prior value, so a partial report never erases progress.
pub fn fold_coverage(prior: &CoverageMap, reported: &CoverageMap) -> CoverageMap {
    let mut folded = CoverageMap::new();
    for area in AreaId::ALL {
        let value = match reported.get(&area) {
            Some(value) => value.clamp(0.0, 100.0),
            None => prior.get(&area).copied().unwrap_or(0.0),
        };
        folded.insert(area, value);
    }
    folded
}

/// Evaluate a coverage map into the derived report.
///
/// The active area is the lowest-coverage area still below the ready
/// threshold; ties break by the fixed area ordering. With every area ready
/// there is no active area and the session is eligible for review.
pub fn evaluate(coverage: &CoverageMap) -> CoverageReport {
    let mut per_area = CoverageMap::new();
    let mut sum = 0.0;
    let mut active: Option<(AreaId, f64)> = None;

    for area in AreaId::ALL {
        let value = coverage.get(&area).copied().unwrap_or(0.0).clamp(0.0, 100.0);
        per_area.insert(area, value);
        sum += value;

        if value < AREA_READY_THRESHOLD {
            // Strict comparison keeps the first area on ties.
            if active.map(|(_, best)| value < best).unwrap_or(true) {
                active = Some((area, value));
            }
        }
    }

    let average = sum / AreaId::ALL.len() as f64;

    CoverageReport {
        per_area,
        average,
        active_area: active.map(|(area, _)| area),
        review_enabled: average >= REVIEW_THRESHOLD,
        all_areas_ready: active.is_none(),
    }
}
