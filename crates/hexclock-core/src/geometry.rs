//! Clock-face geometry.
//!
//! Angles are in degrees with 0 at 12 o'clock increasing clockwise. Screen
//! coordinates have y pointing down, so 12 o'clock sits at -90 degrees in the
//! usual "0 is right" convention.

use derive_more::{Display, Into};
use serde::{Deserialize, Serialize};

pub const DEGREES_PER_HOUR: f64 = 30.0;
pub const DEGREES_PER_MINUTE: f64 = 0.5;
pub const MINUTES_PER_FACE: f64 = 720.0;
pub const SNAP_MINUTES: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Normalized clock angle in `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Display, Into, Serialize)]
#[serde(transparent)]
pub struct ClockAngle(f64);

impl ClockAngle {
    pub fn new(degrees: f64) -> Self {
        if !degrees.is_finite() {
            return Self(0.0);
        }
        let normalized = degrees.rem_euclid(360.0);
        // rem_euclid rounds tiny negatives up to exactly 360
        if normalized >= 360.0 {
            Self(0.0)
        } else {
            Self(normalized)
        }
    }

    pub fn degrees(self) -> f64 {
        self.0
    }

    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }

    /// Screen-space angle in radians where 0 points right.
    pub fn screen_radians(self) -> f64 {
        (self.0 - 90.0).to_radians()
    }

    pub fn from_time(hour: u32, minute: u32) -> Self {
        Self::new((hour % 12) as f64 * DEGREES_PER_HOUR + minute as f64 * DEGREES_PER_MINUTE)
    }
}

impl<'de> Deserialize<'de> for ClockAngle {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Self::new)
    }
}

/// Hour and minute as displayed on the face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClockTime {
    /// 1..=12, midnight and noon display as 12.
    pub hour: u32,
    /// One of 0, 15, 30, 45.
    pub minute: u32,
}

impl ClockTime {
    /// Hour on the face as 0..12 with 12 o'clock mapped to 0.
    pub fn face_hour(&self) -> u32 {
        self.hour % 12
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClockFace {
    pub center: Point,
    pub radius: f64,
}

impl ClockFace {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.radius.is_finite() && self.radius > 0.0)
    }

    pub fn with_radius(&self, radius: f64) -> Self {
        Self::new(self.center, radius)
    }

    pub fn point_at(&self, angle: ClockAngle) -> Point {
        point_on_circle(angle, self.center, self.radius)
    }
}

/// A position on the face, always derived from `(hour, minute, face)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClockPosition {
    pub hour: u32,
    pub minute: u32,
    pub angle: ClockAngle,
    pub x: f64,
    pub y: f64,
}

impl ClockPosition {
    pub fn new(hour: u32, minute: u32, face: &ClockFace) -> Self {
        let angle = ClockAngle::from_time(hour, minute);
        let time = hour_minute_for_angle(angle);
        let point = face.point_at(angle);
        Self {
            hour: time.hour,
            minute: time.minute,
            angle,
            x: point.x,
            y: point.y,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

pub fn position_for_time(hour: u32, minute: u32, center: Point, radius: f64) -> Point {
    point_on_circle(ClockAngle::from_time(hour, minute), center, radius)
}

fn point_on_circle(angle: ClockAngle, center: Point, radius: f64) -> Point {
    let theta = angle.screen_radians();
    Point::new(
        center.x + radius * theta.cos(),
        center.y + radius * theta.sin(),
    )
}

/// Clock angle of `point` seen from `center`. The center itself maps to 0.
pub fn angle_for_position(point: Point, center: Point) -> ClockAngle {
    let (dx, dy) = (point.x - center.x, point.y - center.y);
    if dx == 0.0 && dy == 0.0 {
        return ClockAngle::default();
    }
    ClockAngle::new(dy.atan2(dx).to_degrees() + 90.0)
}

/// Rounds to the nearest quarter hour on the total minute count, so a
/// carry never yields minute 60.
pub fn hour_minute_for_angle(angle: ClockAngle) -> ClockTime {
    let total = angle.degrees() / 360.0 * MINUTES_PER_FACE;
    let rounded = ((total / SNAP_MINUTES).round() * SNAP_MINUTES) as u32 % MINUTES_PER_FACE as u32;
    let hour = rounded / 60;
    ClockTime {
        hour: if hour == 0 { 12 } else { hour },
        minute: rounded % 60,
    }
}

/// Fractional face hour in `[0, 12)`.
pub fn hour_for_angle(angle: ClockAngle) -> f64 {
    angle.degrees() / DEGREES_PER_HOUR
}

/// Shortest distance between two clock angles, in `[0, 180]`.
pub fn angle_difference(a: ClockAngle, b: ClockAngle) -> f64 {
    ((a.degrees() - b.degrees() + 180.0).rem_euclid(360.0) - 180.0).abs()
}

/// Signed shortest rotation from `from` to `to` in `(-180, 180]`, positive clockwise.
pub fn signed_angle_delta(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(360.0);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

/// Projects `point` onto the circle of `radius` around `center`.
/// Returns `None` when the point is the center itself.
pub fn project_onto_circle(point: Point, center: Point, radius: f64) -> Option<Point> {
    let (dx, dy) = (point.x - center.x, point.y - center.y);
    let distance = dx.hypot(dy);
    if distance == 0.0 || !distance.is_finite() {
        return None;
    }
    Some(Point::new(
        center.x + dx / distance * radius,
        center.y + dy / distance * radius,
    ))
}
