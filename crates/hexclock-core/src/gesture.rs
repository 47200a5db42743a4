use crate::geometry::{Point, signed_angle_delta};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// One-finger travel before a swipe is recognized.
    pub swipe_distance: f64,
    /// Minimum `|scale - 1|` for a pinch.
    pub pinch_threshold: f64,
    /// Minimum two-finger rotation in degrees.
    pub rotate_threshold: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_distance: 50.0,
            pinch_threshold: 0.1,
            rotate_threshold: 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoomKind {
    ZoomIn,
    ZoomOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RotateDirection {
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "kind", rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GestureEvent {
    Swipe {
        direction: SwipeDirection,
        distance: f64,
    },
    Pinch {
        scale: f64,
        #[serde(rename = "type")]
        zoom: ZoomKind,
    },
    Rotate {
        /// Signed, positive is clockwise on screen.
        degrees: f64,
        direction: RotateDirection,
    },
}

impl GestureEvent {
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Recognized {
    swipe: bool,
    pinch: bool,
    rotate: bool,
}

/// Classifies one- and two-finger touch movement.
///
/// Each gesture kind fires at most once between `begin` and `end`, at the
/// tick its threshold is crossed. A change in the set of fingers starts over
/// from the new positions.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    config: GestureConfig,
    initial: Vec<TouchPoint>,
    recognized: Recognized,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            initial: Vec::new(),
            recognized: Recognized::default(),
        }
    }

    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    pub fn is_tracking(&self) -> bool {
        !self.initial.is_empty()
    }

    pub fn begin(&mut self, touches: &[TouchPoint]) {
        self.initial = touches.to_vec();
        self.recognized = Recognized::default();
    }

    pub fn update(&mut self, touches: &[TouchPoint]) -> Vec<GestureEvent> {
        let Some(current) = self.match_touches(touches) else {
            self.begin(touches);
            return Vec::new();
        };

        let start: Vec<Point> = self.initial.iter().map(TouchPoint::position).collect();
        let now: Vec<Point> = current.iter().map(TouchPoint::position).collect();

        let events = match (start.as_slice(), now.as_slice()) {
            (&[from], &[to]) => self.classify_swipe(from, to),
            (&[a0, b0], &[a1, b1]) => self
                .classify_pinch(a0, b0, a1, b1)
                .into_iter()
                .chain(self.classify_rotate(a0, b0, a1, b1))
                .collect(),
            _ => Vec::new(),
        };

        for event in &events {
            log::debug!("Gesture recognized: {:?}", event);
        }
        events
    }

    /// Resets tracking whether or not anything was recognized.
    pub fn end(&mut self) {
        self.initial.clear();
        self.recognized = Recognized::default();
    }

    /// `touches` reordered to line up with the initial set, `None` when the
    /// fingers changed.
    fn match_touches(&self, touches: &[TouchPoint]) -> Option<Vec<TouchPoint>> {
        if self.initial.is_empty() || touches.len() != self.initial.len() {
            return None;
        }
        self.initial
            .iter()
            .map(|start| touches.iter().find(|t| t.id == start.id).copied())
            .collect()
    }

    fn classify_swipe(&mut self, start: Point, now: Point) -> Vec<GestureEvent> {
        if self.recognized.swipe {
            return Vec::new();
        }
        let (dx, dy) = (now.x - start.x, now.y - start.y);
        let distance = dx.hypot(dy);
        if distance <= self.config.swipe_distance {
            return Vec::new();
        }
        self.recognized.swipe = true;
        vec![GestureEvent::Swipe {
            direction: swipe_direction(dx, dy),
            distance,
        }]
    }

    fn classify_pinch(&mut self, a0: Point, b0: Point, a1: Point, b1: Point) -> Option<GestureEvent> {
        if self.recognized.pinch {
            return None;
        }
        let initial = a0.distance_to(b0);
        if initial == 0.0 {
            return None;
        }
        let scale = a1.distance_to(b1) / initial;
        if (scale - 1.0).abs() <= self.config.pinch_threshold {
            return None;
        }
        self.recognized.pinch = true;
        Some(GestureEvent::Pinch {
            scale,
            zoom: if scale > 1.0 {
                ZoomKind::ZoomIn
            } else {
                ZoomKind::ZoomOut
            },
        })
    }

    fn classify_rotate(&mut self, a0: Point, b0: Point, a1: Point, b1: Point) -> Option<GestureEvent> {
        if self.recognized.rotate || a0 == b0 || a1 == b1 {
            return None;
        }
        let before = (b0.y - a0.y).atan2(b0.x - a0.x).to_degrees();
        let after = (b1.y - a1.y).atan2(b1.x - a1.x).to_degrees();
        let degrees = signed_angle_delta(before, after);
        if degrees.abs() <= self.config.rotate_threshold {
            return None;
        }
        self.recognized.rotate = true;
        Some(GestureEvent::Rotate {
            degrees,
            direction: if degrees > 0.0 {
                RotateDirection::Clockwise
            } else {
                RotateDirection::CounterClockwise
            },
        })
    }
}

/// Quadrant of the displacement; y grows downwards.
fn swipe_direction(dx: f64, dy: f64) -> SwipeDirection {
    let angle = dy.atan2(dx).to_degrees();
    match angle {
        a if (-45.0..=45.0).contains(&a) => SwipeDirection::Right,
        a if a > 45.0 && a < 135.0 => SwipeDirection::Down,
        a if a < -45.0 && a > -135.0 => SwipeDirection::Up,
        _ => SwipeDirection::Left,
    }
}
