//! Drag lifecycle for scheduled blocks: `idle -> dragging -> (committed | cancelled) -> idle`.
//!
//! While dragging, the pointer is projected onto a circular track inside the
//! face and converted to a clock time. Nothing is written back to the block;
//! a commit only proposes the new start time to the caller.

use crate::block::{BlockId, MINUTES_PER_DAY, TimeBlock, TimeInterval};
use crate::geometry::{
    ClockAngle, ClockFace, ClockTime, Point, angle_for_position, hour_for_angle,
    hour_minute_for_angle, project_onto_circle,
};
use crate::snap::{DEFAULT_MAGNETIC_STRENGTH, resolve_snap};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Minimum pointer travel before a release counts as a drag.
    pub threshold: f64,
    /// Radius of the drag track as a fraction of the face radius.
    pub track_ratio: f64,
    /// Snap window in hours.
    pub magnetic_strength: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            threshold: 5.0,
            track_ratio: 0.85,
            magnetic_strength: DEFAULT_MAGNETIC_STRENGTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragState {
    Idle,
    Dragging,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub block_id: BlockId,
    /// Schedule of the block when the drag started.
    pub origin: TimeInterval,
    /// 24-hour optimal hour of the block's category, `None` when snapping is off.
    pub optimal_hour: Option<u32>,
    pub start_position: Point,
    pub current_position: Point,
    /// Pointer constrained to the drag track.
    pub ghost_position: Option<Point>,
    pub ghost_angle: Option<ClockAngle>,
    pub ghost_time: Option<ClockTime>,
    pub snap_hour: Option<u32>,
    /// Pointer is currently further than the threshold from where it started.
    pub is_active: bool,
}

impl DragSession {
    fn new(block: &TimeBlock, at: Point, optimal_hour: Option<u32>) -> Self {
        Self {
            block_id: block.id.clone(),
            origin: block.interval,
            optimal_hour,
            start_position: at,
            current_position: at,
            ghost_position: None,
            ghost_angle: None,
            ghost_time: None,
            snap_hour: None,
            is_active: false,
        }
    }

    pub fn displacement(&self) -> f64 {
        self.start_position.distance_to(self.current_position)
    }

    /// Start time the session would commit right now, on a 24-hour clock.
    /// Snapped or not, the face reading stays in the half of the day
    /// nearest the block's original start.
    pub fn proposed_time(&self) -> Option<(u32, u32)> {
        let time = match self.snap_hour {
            Some(hour) => ClockTime {
                hour: match hour % 12 {
                    0 => 12,
                    h => h,
                },
                minute: 0,
            },
            None => self.ghost_time?,
        };
        Some(resolve_day_hour(time, self.origin.start()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragUpdate {
    /// The ghost moved into the snap window on this tick.
    pub snap_engaged: bool,
    pub snap_released: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragCommit {
    pub block_id: BlockId,
    pub hour: u32,
    pub minute: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    Committed(DragCommit),
    /// Released without moving past the threshold.
    Tap(BlockId),
    /// No session, or no clock position could be resolved.
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct DragMachine {
    config: DragConfig,
    session: Option<DragSession>,
}

impl DragMachine {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DragConfig) {
        self.config = config;
    }

    pub fn state(&self) -> DragState {
        match self.session {
            Some(_) => DragState::Dragging,
            None => DragState::Idle,
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Opens a session for `block`. Rejected while another drag is in progress.
    pub fn start(&mut self, block: &TimeBlock, at: Point, optimal_hour: Option<u32>) -> bool {
        if let Some(active) = &self.session {
            log::warn!(
                "Ignoring drag of '{}' while '{}' is still being dragged",
                block.id,
                active.block_id
            );
            return false;
        }
        log::debug!("Drag start on '{}' at ({:.1}, {:.1})", block.id, at.x, at.y);
        self.session = Some(DragSession::new(block, at, optimal_hour));
        true
    }

    /// Moves the session's pointer. A no-op without an active session.
    pub fn update(&mut self, at: Point, face: &ClockFace) -> Option<DragUpdate> {
        let config = self.config;
        let session = self.session.as_mut()?;

        session.current_position = at;
        session.is_active = session.displacement() > config.threshold;

        if face.is_degenerate() {
            return Some(DragUpdate::default());
        }

        let track_radius = face.radius * config.track_ratio;
        let Some(ghost) = project_onto_circle(at, face.center, track_radius) else {
            // pointer on the exact center, keep the previous ghost
            return Some(DragUpdate::default());
        };

        let angle = angle_for_position(ghost, face.center);
        session.ghost_position = Some(ghost);
        session.ghost_angle = Some(angle);
        session.ghost_time = Some(hour_minute_for_angle(angle));

        let was_snapped = session.snap_hour.is_some();
        session.snap_hour = session.optimal_hour.and_then(|optimal| {
            resolve_snap(
                hour_for_angle(angle),
                (optimal % 12) as f64,
                config.magnetic_strength,
            )
            .should_snap
            .then_some(optimal)
        });

        let snapped = session.snap_hour.is_some();
        if let Some(hour) = session.snap_hour
            && !was_snapped
        {
            log::debug!("Drag of '{}' snapped to {:02}:00", session.block_id, hour);
        }

        Some(DragUpdate {
            snap_engaged: snapped && !was_snapped,
            snap_released: was_snapped && !snapped,
        })
    }

    /// Ends the session at `at`. Commits only when the pointer travelled past
    /// the threshold and a clock position was resolved.
    pub fn finish(&mut self, at: Point, face: &ClockFace) -> DragOutcome {
        if self.session.is_none() {
            return DragOutcome::Ignored;
        }
        self.update(at, face);

        let Some(session) = self.session.take() else {
            return DragOutcome::Ignored;
        };

        if session.displacement() <= self.config.threshold {
            log::debug!("Drag of '{}' released as a tap", session.block_id);
            return DragOutcome::Tap(session.block_id);
        }

        match session.proposed_time() {
            Some((hour, minute)) => {
                log::debug!(
                    "Drag of '{}' committed at {:02}:{:02}",
                    session.block_id,
                    hour,
                    minute
                );
                DragOutcome::Committed(DragCommit {
                    block_id: session.block_id,
                    hour,
                    minute,
                })
            }
            None => {
                log::debug!(
                    "Drag of '{}' released without a clock position",
                    session.block_id
                );
                DragOutcome::Ignored
            }
        }
    }

    /// Discards the session without committing.
    pub fn cancel(&mut self) -> Option<DragSession> {
        let session = self.session.take();
        if let Some(s) = &session {
            log::debug!("Drag of '{}' cancelled", s.block_id);
        }
        session
    }
}

/// Picks the AM or PM reading of a face time that lies closest, around the
/// day, to `origin_minutes`. Ties keep the origin's half of the day.
pub fn resolve_day_hour(time: ClockTime, origin_minutes: u32) -> (u32, u32) {
    let am = time.face_hour() * 60 + time.minute;
    let pm = am + MINUTES_PER_DAY / 2;
    let origin = origin_minutes % MINUTES_PER_DAY;

    let distance = |t: u32| {
        let d = t.abs_diff(origin);
        d.min(MINUTES_PER_DAY - d)
    };

    let chosen = match distance(am).cmp(&distance(pm)) {
        std::cmp::Ordering::Less => am,
        std::cmp::Ordering::Greater => pm,
        std::cmp::Ordering::Equal if origin >= MINUTES_PER_DAY / 2 => pm,
        std::cmp::Ordering::Equal => am,
    };
    (chosen / 60, chosen % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Category;
    use crate::geometry::position_for_time;

    fn face() -> ClockFace {
        ClockFace::new(Point::new(200.0, 200.0), 100.0)
    }

    fn track(hour: u32, minute: u32) -> Point {
        let f = face();
        position_for_time(hour, minute, f.center, f.radius * 0.85)
    }

    fn block() -> TimeBlock {
        TimeBlock::new("read", Category::Growth, TimeInterval::new(9, 0, 60))
    }

    #[test]
    fn test_drag_commits_on_displacement() {
        let mut machine = DragMachine::default();
        assert!(machine.start(&block(), track(9, 0), None));
        assert_eq!(machine.state(), DragState::Dragging);

        machine.update(track(12, 0), &face());
        machine.update(track(14, 0), &face());
        let outcome = machine.finish(track(14, 0), &face());

        assert_eq!(
            outcome,
            DragOutcome::Committed(DragCommit {
                block_id: BlockId::new("read"),
                hour: 14,
                minute: 0,
            })
        );
        assert_eq!(machine.state(), DragState::Idle);
    }

    #[test]
    fn test_release_in_place_is_a_tap() {
        let mut machine = DragMachine::default();
        machine.start(&block(), track(9, 0), None);
        let outcome = machine.finish(track(9, 0), &face());
        assert_eq!(outcome, DragOutcome::Tap(BlockId::new("read")));
    }

    #[test]
    fn test_small_jitter_is_a_tap() {
        let mut machine = DragMachine::default();
        let start = track(9, 0);
        machine.start(&block(), start, None);
        machine.update(Point::new(start.x + 2.0, start.y + 2.0), &face());
        let outcome = machine.finish(Point::new(start.x + 3.0, start.y), &face());
        assert_eq!(outcome, DragOutcome::Tap(BlockId::new("read")));
    }

    #[test]
    fn test_ghost_is_constrained_to_track() {
        let f = face();
        let mut machine = DragMachine::default();
        machine.start(&block(), track(9, 0), None);
        machine.update(Point::new(f.center.x + 400.0, f.center.y), &f);

        let session = machine.session().unwrap();
        let ghost = session.ghost_position.unwrap();
        assert!((ghost.distance_to(f.center) - 85.0).abs() < 1e-9);
        assert_eq!(session.ghost_time, Some(ClockTime { hour: 3, minute: 0 }));
        assert!(session.is_active);
    }

    #[test]
    fn test_center_pointer_keeps_previous_ghost() {
        let f = face();
        let mut machine = DragMachine::default();
        machine.start(&block(), track(9, 0), None);
        machine.update(track(10, 0), &f);
        let before = machine.session().unwrap().ghost_position;

        machine.update(f.center, &f);
        let session = machine.session().unwrap();
        assert_eq!(session.ghost_position, before);
        assert_eq!(session.current_position, f.center);
    }

    #[test]
    fn test_snaps_to_optimal_hour() {
        let f = face();
        let mut machine = DragMachine::default();
        // 7:00 optimal on the face, dragged to 7:10
        machine.start(&block(), track(9, 0), Some(7));
        let update = machine.update(track(7, 10), &f).unwrap();
        assert!(update.snap_engaged);
        assert_eq!(machine.session().unwrap().snap_hour, Some(7));

        let outcome = machine.finish(track(7, 10), &f);
        assert_eq!(
            outcome,
            DragOutcome::Committed(DragCommit {
                block_id: BlockId::new("read"),
                hour: 7,
                minute: 0,
            })
        );
    }

    #[test]
    fn test_snapped_commit_keeps_half_of_day() {
        let f = face();
        let evening = TimeBlock::new("read", Category::Growth, TimeInterval::new(21, 0, 60));
        let mut machine = DragMachine::default();
        machine.start(&evening, track(10, 0), Some(9));
        machine.update(track(9, 5), &f);
        assert_eq!(machine.session().unwrap().snap_hour, Some(9));

        let outcome = machine.finish(track(9, 5), &f);
        assert_eq!(
            outcome,
            DragOutcome::Committed(DragCommit {
                block_id: BlockId::new("read"),
                hour: 21,
                minute: 0,
            })
        );
    }

    #[test]
    fn test_snap_releases_when_leaving_window() {
        let f = face();
        let mut machine = DragMachine::default();
        machine.start(&block(), track(9, 0), Some(19));
        assert!(machine.update(track(7, 0), &f).unwrap().snap_engaged);
        let update = machine.update(track(8, 0), &f).unwrap();
        assert!(update.snap_released);
        assert_eq!(machine.session().unwrap().snap_hour, None);
    }

    #[test]
    fn test_second_drag_is_rejected() {
        let mut machine = DragMachine::default();
        assert!(machine.start(&block(), track(9, 0), None));
        let other = TimeBlock::new("walk", Category::Movement, TimeInterval::new(7, 0, 30));
        assert!(!machine.start(&other, track(7, 0), None));
        assert_eq!(machine.session().unwrap().block_id.as_str(), "read");
    }

    #[test]
    fn test_events_without_session_are_no_ops() {
        let mut machine = DragMachine::default();
        assert_eq!(machine.update(track(3, 0), &face()), None);
        assert_eq!(machine.finish(track(3, 0), &face()), DragOutcome::Ignored);
        assert_eq!(machine.cancel(), None);
    }

    #[test]
    fn test_cancel_discards_session() {
        let mut machine = DragMachine::default();
        machine.start(&block(), track(9, 0), None);
        machine.update(track(3, 0), &face());
        assert!(machine.cancel().is_some());
        assert_eq!(machine.state(), DragState::Idle);
        assert_eq!(machine.finish(track(3, 0), &face()), DragOutcome::Ignored);
    }

    #[test]
    fn test_degenerate_face_never_commits() {
        let flat = ClockFace::new(Point::new(0.0, 0.0), 0.0);
        let mut machine = DragMachine::default();
        machine.start(&block(), Point::new(0.0, 0.0), None);
        let outcome = machine.finish(Point::new(50.0, 50.0), &flat);
        assert_eq!(outcome, DragOutcome::Ignored);
    }

    #[test]
    fn test_resolve_day_hour() {
        let two = ClockTime { hour: 2, minute: 0 };
        assert_eq!(resolve_day_hour(two, 9 * 60), (14, 0));
        assert_eq!(resolve_day_hour(two, 60), (2, 0));

        let midnight = ClockTime { hour: 12, minute: 15 };
        assert_eq!(resolve_day_hour(midnight, 23 * 60), (0, 15));
        assert_eq!(resolve_day_hour(midnight, 11 * 60), (12, 15));

        // 3:00 from 9:00 is six hours either way
        let three = ClockTime { hour: 3, minute: 0 };
        assert_eq!(resolve_day_hour(three, 9 * 60), (3, 0));
        assert_eq!(resolve_day_hour(three, 21 * 60), (15, 0));
    }
}
