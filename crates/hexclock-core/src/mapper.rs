use crate::block::{Category, TimeInterval};
use crate::geometry::{ClockAngle, ClockFace, DEGREES_PER_MINUTE, Point};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

const ANGLE_SLACK: f64 = 1e-9;

/// Angular span a time block occupies on the face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockArc {
    pub position: Point,
    pub arc_start: ClockAngle,
    pub arc_end: ClockAngle,
    /// Always positive and at most a full turn, even when `arc_end` wrapped.
    pub arc_width: f64,
}

impl BlockArc {
    pub fn large_arc(&self) -> bool {
        self.arc_width > 180.0
    }

    /// Inclusive of both ends, with a little slack for trigonometric round-off.
    pub fn contains(&self, angle: ClockAngle) -> bool {
        let offset = (angle.degrees() - self.arc_start.degrees()).rem_euclid(360.0);
        offset <= self.arc_width + ANGLE_SLACK || offset >= 360.0 - ANGLE_SLACK
    }
}

pub fn arc_for_interval(interval: &TimeInterval, face: &ClockFace) -> BlockArc {
    let arc_start = ClockAngle::from_time(interval.start_hour, interval.start_minute);
    let arc_width = (interval.duration_minutes as f64 * DEGREES_PER_MINUTE).min(360.0);
    BlockArc {
        position: face.point_at(arc_start),
        arc_start,
        arc_end: ClockAngle::new(arc_start.degrees() + arc_width),
        arc_width,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl fmt::Display for HourWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00-{:02}:00", self.start_hour, self.end_hour)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptimalTime {
    /// 24-hour clock.
    pub hour: u32,
    pub time_range: HourWindow,
}

impl OptimalTime {
    const fn new(hour: u32, start_hour: u32, end_hour: u32) -> Self {
        Self {
            hour,
            time_range: HourWindow {
                start_hour,
                end_hour,
            },
        }
    }
}

pub fn optimal_time_for_category(category: Category) -> OptimalTime {
    match category {
        Category::Sleep => OptimalTime::new(22, 21, 23),
        Category::Movement => OptimalTime::new(7, 6, 8),
        Category::Nutrition => OptimalTime::new(12, 12, 13),
        Category::Mindfulness => OptimalTime::new(18, 17, 19),
        Category::Connection => OptimalTime::new(20, 19, 21),
        Category::Growth => OptimalTime::new(9, 9, 11),
    }
}

/// Per-category optimal hour overrides on top of the static table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptimalHours(HashMap<Category, u32>);

impl OptimalHours {
    pub fn new(overrides: HashMap<Category, u32>) -> Self {
        Self(overrides)
    }

    pub fn set(&mut self, category: Category, hour: u32) {
        self.0.insert(category, hour % 24);
    }

    /// 24-hour optimal hour for `category`.
    pub fn hour_for(&self, category: Category) -> u32 {
        self.0
            .get(&category)
            .map(|h| h % 24)
            .unwrap_or_else(|| optimal_time_for_category(category).hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn face() -> ClockFace {
        ClockFace::new(Point::new(0.0, 0.0), 100.0)
    }

    #[test]
    fn test_arc_from_start_and_duration() {
        let arc = arc_for_interval(&TimeInterval::new(9, 0, 60), &face());
        assert!((arc.arc_start.degrees() - 270.0).abs() < EPS);
        assert!((arc.arc_end.degrees() - 300.0).abs() < EPS);
        assert!((arc.arc_width - 30.0).abs() < EPS);
        assert!(!arc.large_arc());
        assert!((arc.position.x + 100.0).abs() < EPS);
    }

    #[test]
    fn test_arc_wraps_past_twelve() {
        let arc = arc_for_interval(&TimeInterval::new(23, 0, 120), &face());
        assert!((arc.arc_start.degrees() - 330.0).abs() < EPS);
        assert!((arc.arc_end.degrees() - 30.0).abs() < EPS);
        assert!((arc.arc_width - 60.0).abs() < EPS);
        assert!(arc.contains(ClockAngle::new(0.0)));
        assert!(arc.contains(ClockAngle::new(15.0)));
        assert!(!arc.contains(ClockAngle::new(90.0)));
    }

    #[test]
    fn test_large_arc_flag() {
        let arc = arc_for_interval(&TimeInterval::new(6, 0, 400), &face());
        assert!((arc.arc_width - 200.0).abs() < EPS);
        assert!(arc.large_arc());

        let full = arc_for_interval(&TimeInterval::new(0, 0, 1000), &face());
        assert_eq!(full.arc_width, 360.0);
    }

    #[test]
    fn test_optimal_table_and_overrides() {
        let mut hours = OptimalHours::default();
        assert_eq!(hours.hour_for(Category::Movement), 7);
        assert_eq!(
            optimal_time_for_category(Category::Movement)
                .time_range
                .to_string(),
            "06:00-08:00"
        );

        hours.set(Category::Movement, 30);
        assert_eq!(hours.hour_for(Category::Movement), 6);
        assert_eq!(hours.hour_for(Category::Sleep), 22);
    }

    #[test]
    fn test_optimal_hours_from_json() {
        let hours: OptimalHours = serde_json::from_str(r#"{ "exercise": 17, "sleep": 23 }"#).unwrap();
        assert_eq!(hours.hour_for(Category::Movement), 17);
        assert_eq!(hours.hour_for(Category::Sleep), 23);
        assert_eq!(hours.hour_for(Category::Growth), 9);
    }
}
