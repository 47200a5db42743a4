use crate::block::Category;
use crate::geometry::{ClockAngle, ClockFace, Point};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    /// Values are completion percentages.
    #[default]
    Completion,
    /// Values are minutes spent, scaled against the busiest category.
    Distribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryValue {
    pub category: Category,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HexagonVertex {
    pub category: Category,
    pub hour: u32,
    /// Corner of the full hexagon on the face circle.
    pub axis: Point,
    /// Data point along the axis.
    pub point: Point,
    pub ratio: f64,
}

/// One vertex per category in clockwise order starting at 12 o'clock.
pub fn hexagon_vertices(values: &[CategoryValue], mode: ChartMode, face: &ClockFace) -> Vec<HexagonVertex> {
    let radius = if face.is_degenerate() { 0.0 } else { face.radius };
    let max_minutes = values
        .iter()
        .map(|v| v.value)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);

    let mut categories: Vec<Category> = Category::all().collect();
    categories.sort_by_key(|c| c.clock_hour() % 12);

    categories
        .into_iter()
        .map(|category| {
            let raw = values
                .iter()
                .find(|v| v.category == category)
                .map(|v| v.value)
                .filter(|v| v.is_finite())
                .unwrap_or(0.0);
            let ratio = match mode {
                ChartMode::Completion => raw.clamp(0.0, 100.0) / 100.0,
                ChartMode::Distribution if max_minutes > 0.0 => (raw / max_minutes).clamp(0.0, 1.0),
                ChartMode::Distribution => 0.0,
            };

            let hour = category.clock_hour();
            let angle = ClockAngle::from_time(hour, 0);
            let outer = ClockFace::new(face.center, radius);
            HexagonVertex {
                category,
                hour,
                axis: outer.point_at(angle),
                point: outer.with_radius(radius * ratio).point_at(angle),
                ratio,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn face() -> ClockFace {
        ClockFace::new(Point::new(0.0, 0.0), 100.0)
    }

    fn value(category: Category, value: f64) -> CategoryValue {
        CategoryValue { category, value }
    }

    #[test]
    fn test_vertices_run_clockwise_from_twelve() {
        let vertices = hexagon_vertices(&[], ChartMode::Completion, &face());
        let hours: Vec<u32> = vertices.iter().map(|v| v.hour).collect();
        assert_eq!(hours, vec![12, 2, 4, 6, 8, 10]);
        assert_eq!(vertices[0].category, Category::Sleep);
        assert!((vertices[0].axis.y + 100.0).abs() < EPS);
        assert!(vertices.iter().all(|v| v.ratio == 0.0));
    }

    #[test]
    fn test_completion_percentages() {
        let values = [value(Category::Sleep, 50.0), value(Category::Growth, 140.0)];
        let vertices = hexagon_vertices(&values, ChartMode::Completion, &face());
        let sleep = vertices.iter().find(|v| v.category == Category::Sleep).unwrap();
        assert!((sleep.ratio - 0.5).abs() < EPS);
        assert!((sleep.point.y + 50.0).abs() < EPS);
        let growth = vertices.iter().find(|v| v.category == Category::Growth).unwrap();
        assert_eq!(growth.ratio, 1.0);
    }

    #[test]
    fn test_distribution_scales_to_largest() {
        let values = [
            value(Category::Movement, 30.0),
            value(Category::Nutrition, 120.0),
        ];
        let vertices = hexagon_vertices(&values, ChartMode::Distribution, &face());
        let movement = vertices.iter().find(|v| v.category == Category::Movement).unwrap();
        assert!((movement.ratio - 0.25).abs() < EPS);
        let nutrition = vertices.iter().find(|v| v.category == Category::Nutrition).unwrap();
        assert_eq!(nutrition.ratio, 1.0);
    }

    #[test]
    fn test_all_zero_distribution() {
        let values = [value(Category::Movement, 0.0)];
        let vertices = hexagon_vertices(&values, ChartMode::Distribution, &face());
        assert!(vertices.iter().all(|v| v.ratio == 0.0));
    }

    #[test]
    fn test_degenerate_face_collapses_to_center() {
        let flat = ClockFace::new(Point::new(10.0, 10.0), -5.0);
        let vertices = hexagon_vertices(&[value(Category::Sleep, 80.0)], ChartMode::Completion, &flat);
        assert!(vertices.iter().all(|v| v.axis == flat.center && v.point == flat.center));
    }
}
