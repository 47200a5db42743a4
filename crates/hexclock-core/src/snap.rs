use serde::Serialize;

/// Snap window in hours (about 18 minutes).
pub const DEFAULT_MAGNETIC_STRENGTH: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapDecision {
    pub should_snap: bool,
    pub snap_hour: f64,
    /// Shortest distance in hours, measured across noon/midnight as well.
    pub distance: f64,
}

/// Decides whether a dragged face hour settles onto `optimal_hour`.
///
/// Both hours are on the 12-hour face.
pub fn resolve_snap(current_hour: f64, optimal_hour: f64, magnetic_strength: f64) -> SnapDecision {
    let direct = (current_hour - optimal_hour).abs();
    let across_forward = (current_hour - (optimal_hour + 12.0)).abs();
    let across_back = ((current_hour + 12.0) - optimal_hour).abs();
    let distance = direct.min(across_forward).min(across_back);

    SnapDecision {
        should_snap: distance <= magnetic_strength,
        snap_hour: optimal_hour,
        distance,
    }
}
