//! Geometry and interaction engine for a radial wellness clock.
//!
//! Six categories sit on fixed hours of a 12-hour face. Scheduled blocks are
//! drawn as arcs and can be dragged around the face; the engine converts
//! pointer positions to clock times, snaps near a category's optimal hour,
//! reports overlapping blocks and classifies swipe, pinch and rotate
//! gestures. It never mutates the blocks it is given: every change is a
//! proposal delivered through [`ClockHost`].

#[macro_use]
mod macros;

pub mod block;
pub mod conflict;
pub mod drag;
pub mod engine;
pub mod geometry;
pub mod gesture;
pub mod haptics;
pub mod hexagon;
pub mod mapper;
pub mod snap;

pub use block::{BlockId, BlockStatus, Category, IntervalError, TimeBlock, TimeInterval};
pub use conflict::{Conflict, detect_all, detect_conflicts};
pub use drag::{DragCommit, DragConfig, DragMachine, DragOutcome, DragSession, DragState};
pub use engine::{BlockLayout, ClockEngine, ClockHost, EngineConfig, InteractionConfig};
pub use geometry::{
    ClockAngle, ClockFace, ClockPosition, ClockTime, Point, angle_for_position,
    hour_minute_for_angle, position_for_time,
};
pub use gesture::{GestureClassifier, GestureConfig, GestureEvent, TouchPoint};
pub use haptics::{Haptics, Intensity, NoHaptics};
pub use hexagon::{CategoryValue, ChartMode, HexagonVertex, hexagon_vertices};
pub use mapper::{BlockArc, OptimalHours, OptimalTime, arc_for_interval, optimal_time_for_category};
pub use snap::{SnapDecision, resolve_snap};
