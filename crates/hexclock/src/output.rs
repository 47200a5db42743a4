use crate::layout::FaceLayout;
use hexclock_core::{
    BlockId, BlockLayout, ClockHost, Conflict, GestureEvent, Haptics, HexagonVertex, Intensity,
};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Output<'a> {
    #[serde(rename_all = "camelCase")]
    TimeBlockDrag {
        block_id: &'a BlockId,
        hour: u32,
        minute: u32,
    },
    Gesture {
        gesture: &'a GestureEvent,
    },
    Conflicts {
        conflicts: &'a [Conflict],
    },
    #[serde(rename_all = "camelCase")]
    Tap {
        block_id: &'a BlockId,
    },
    Layout {
        face: &'a FaceLayout,
        blocks: &'a [BlockLayout],
        #[serde(skip_serializing_if = "is_empty")]
        hexagon: &'a [HexagonVertex],
    },
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}

/// Writes every engine callback as one JSON line.
pub struct JsonHost<W: Write> {
    out: W,
}

impl<W: Write> JsonHost<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn emit(&mut self, output: &Output<'_>) {
        let result = serde_json::to_writer(&mut self.out, output)
            .map_err(std::io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"))
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            log::error!("Failed to write output: {}", e);
        }
    }
}

impl<W: Write> ClockHost for JsonHost<W> {
    fn on_time_block_drag(&mut self, block_id: &BlockId, hour: u32, minute: u32) {
        self.emit(&Output::TimeBlockDrag {
            block_id,
            hour,
            minute,
        });
    }

    fn on_gesture_detected(&mut self, gesture: &GestureEvent) {
        self.emit(&Output::Gesture { gesture });
    }

    fn on_conflict_detected(&mut self, conflicts: &[Conflict]) {
        self.emit(&Output::Conflicts { conflicts });
    }

    fn on_block_tap(&mut self, block_id: &BlockId) {
        self.emit(&Output::Tap { block_id });
    }
}

/// Stand-in for a vibration motor on desktop hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogHaptics;

impl Haptics for LogHaptics {
    fn pulse(&self, intensity: Intensity) {
        log::debug!("Haptic pulse: {} ({}ms)", intensity, intensity.duration_ms());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexclock_core::gesture::ZoomKind;
    use serde_json::{Value, json};

    fn lines(host: JsonHost<Vec<u8>>) -> Vec<Value> {
        String::from_utf8(host.into_inner())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_drag_line() {
        let mut host = JsonHost::new(Vec::new());
        host.on_time_block_drag(&BlockId::new("read"), 14, 0);
        assert_eq!(
            lines(host),
            vec![json!({ "event": "time_block_drag", "blockId": "read", "hour": 14, "minute": 0 })]
        );
    }

    #[test]
    fn test_gesture_and_tap_lines() {
        let mut host = JsonHost::new(Vec::new());
        host.on_gesture_detected(&GestureEvent::Pinch {
            scale: 1.4,
            zoom: ZoomKind::ZoomIn,
        });
        host.on_block_tap(&BlockId::new("walk"));

        let out = lines(host);
        assert_eq!(
            out[0],
            json!({ "event": "gesture", "gesture": { "kind": "pinch", "scale": 1.4, "type": "zoom-in" } })
        );
        assert_eq!(out[1], json!({ "event": "tap", "blockId": "walk" }));
    }

    #[test]
    fn test_conflict_line() {
        let mut host = JsonHost::new(Vec::new());
        host.on_conflict_detected(&[Conflict {
            block_id: BlockId::new("a"),
            conflicting_block_id: BlockId::new("b"),
            overlap_minutes: 30,
        }]);
        assert_eq!(
            lines(host),
            vec![json!({
                "event": "conflicts",
                "conflicts": [{ "blockId": "a", "conflictingBlockId": "b", "overlapMinutes": 30 }]
            })]
        );
    }
}
