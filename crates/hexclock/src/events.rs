use hexclock_core::{CategoryValue, ChartMode, TimeBlock, TouchPoint};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    PointerCancel,
    TouchStart { touches: Vec<TouchPoint> },
    TouchMove { touches: Vec<TouchPoint> },
    /// `touches` are the fingers that were lifted.
    TouchEnd { touches: Vec<TouchPoint> },
    TouchCancel,
    Resize { width: f64, height: f64 },
    Blocks { blocks: Vec<TimeBlock> },
    Chart {
        #[serde(default)]
        mode: ChartMode,
        values: Vec<CategoryValue>,
    },
    ConfigReload,
}

/// Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> serde_json::Result<Option<AppEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}
