use crate::block::{BlockId, BlockStatus, Category, TimeBlock};
use crate::conflict::{Conflict, detect_all};
use crate::drag::{DragConfig, DragMachine, DragOutcome, DragSession, DragState};
use crate::geometry::{ClockFace, Point, angle_for_position};
use crate::gesture::{GestureClassifier, GestureConfig, GestureEvent, TouchPoint};
use crate::haptics::{Haptics, Intensity, NoHaptics};
use crate::mapper::{BlockArc, OptimalHours, OptimalTime, arc_for_interval, optimal_time_for_category};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Half-width of the ring band that accepts presses, relative to the face radius.
const HIT_BAND_RATIO: f64 = 0.15;
/// Keeps the band edges, which coincide with the face circle, inclusive.
const HIT_SLACK: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub drag_enabled: bool,
    pub magnetic_snapping: bool,
    pub haptic_feedback: bool,
    /// Classify multi-touch gestures; touch otherwise only drives drags.
    pub touch_optimized: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_enabled: true,
            magnetic_snapping: true,
            haptic_feedback: true,
            touch_optimized: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub interaction: InteractionConfig,
    pub drag: DragConfig,
    pub gesture: GestureConfig,
    pub optimal_hours: OptimalHours,
}

/// Callbacks into the hosting UI.
pub trait ClockHost {
    /// A drag was committed; the host decides whether to reschedule the block.
    fn on_time_block_drag(&mut self, block_id: &BlockId, hour: u32, minute: u32);

    fn on_gesture_detected(&mut self, _gesture: &GestureEvent) {}

    /// The conflict set of the current blocks changed.
    fn on_conflict_detected(&mut self, _conflicts: &[Conflict]) {}

    /// A block was pressed and released without dragging.
    fn on_block_tap(&mut self, _block_id: &BlockId) {}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockLayout {
    pub id: BlockId,
    pub category: Category,
    pub status: BlockStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    /// `None` for blocks whose interval is invalid.
    pub arc: Option<BlockArc>,
}

pub struct ClockEngine<H: ClockHost> {
    config: EngineConfig,
    face: ClockFace,
    blocks: Vec<TimeBlock>,
    drag: DragMachine,
    gestures: GestureClassifier,
    haptics: Box<dyn Haptics>,
    host: H,
    reported_conflicts: Vec<Conflict>,
    /// Touch identifier driving the current drag, if it came from touch input.
    drag_touch: Option<u64>,
}

impl<H: ClockHost> ClockEngine<H> {
    pub fn new(config: EngineConfig, host: H) -> Self {
        Self {
            drag: DragMachine::new(config.drag),
            gestures: GestureClassifier::new(config.gesture),
            config,
            face: ClockFace::default(),
            blocks: Vec::new(),
            haptics: Box::new(NoHaptics),
            host,
            reported_conflicts: Vec::new(),
            drag_touch: None,
        }
    }

    pub fn with_haptics(mut self, haptics: Box<dyn Haptics>) -> Self {
        self.haptics = haptics;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Swaps the configuration. Any drag or gesture in flight is dropped.
    pub fn set_config(&mut self, config: EngineConfig) {
        self.cancel_interaction();
        self.drag.set_config(config.drag);
        self.gestures.set_config(config.gesture);
        self.config = config;
    }

    pub fn face(&self) -> &ClockFace {
        &self.face
    }

    pub fn set_face(&mut self, face: ClockFace) {
        self.face = face;
    }

    pub fn blocks(&self) -> &[TimeBlock] {
        &self.blocks
    }

    /// Replaces the block list and re-derives conflicts from scratch.
    pub fn set_blocks(&mut self, blocks: Vec<TimeBlock>) {
        self.blocks = blocks;

        if let Some(session) = self.drag.session()
            && !self.blocks.iter().any(|b| b.id == session.block_id)
        {
            log::debug!("Dragged block '{}' disappeared", session.block_id);
            self.drag.cancel();
            self.drag_touch = None;
        }

        self.refresh_conflicts();
    }

    pub fn conflicts(&self) -> Vec<Conflict> {
        detect_all(&self.blocks)
    }

    fn refresh_conflicts(&mut self) {
        let conflicts = self.conflicts();
        if !same_conflicts(&conflicts, &self.reported_conflicts) {
            self.host.on_conflict_detected(&conflicts);
            self.reported_conflicts = conflicts;
        }
    }

    pub fn layout(&self) -> Vec<BlockLayout> {
        self.blocks
            .iter()
            .map(|block| BlockLayout {
                id: block.id.clone(),
                category: block.category,
                status: block.effective_status(),
                progress: block.effective_progress(),
                arc: block
                    .interval
                    .is_valid()
                    .then(|| arc_for_interval(&block.interval, &self.face)),
            })
            .collect()
    }

    pub fn optimal_time(&self, category: Category) -> OptimalTime {
        OptimalTime {
            hour: self.config.optimal_hours.hour_for(category),
            ..optimal_time_for_category(category)
        }
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.session()
    }

    /// Draggable block under `point`; later blocks sit on top.
    pub fn hit_test(&self, point: Point) -> Option<&TimeBlock> {
        if self.face.is_degenerate() {
            return None;
        }
        let track = self.face.radius * self.config.drag.track_ratio;
        let band = self.face.radius * HIT_BAND_RATIO;
        if (point.distance_to(self.face.center) - track).abs() > band + HIT_SLACK {
            return None;
        }

        let angle = angle_for_position(point, self.face.center);
        self.blocks
            .iter()
            .rev()
            .filter(|block| block.is_draggable())
            .find(|block| arc_for_interval(&block.interval, &self.face).contains(angle))
    }

    pub fn pointer_down(&mut self, point: Point) -> bool {
        if !self.config.interaction.drag_enabled || self.drag.is_dragging() {
            return false;
        }
        let Some(block) = self.hit_test(point).cloned() else {
            return false;
        };

        let optimal = self
            .config
            .interaction
            .magnetic_snapping
            .then(|| self.config.optimal_hours.hour_for(block.category));

        let started = self.drag.start(&block, point, optimal);
        if started {
            self.pulse(Intensity::Light);
        }
        started
    }

    pub fn pointer_move(&mut self, point: Point) {
        if let Some(update) = self.drag.update(point, &self.face)
            && update.snap_engaged
        {
            self.pulse(Intensity::Medium);
        }
    }

    pub fn pointer_up(&mut self, point: Point) {
        self.drag_touch = None;
        match self.drag.finish(point, &self.face) {
            DragOutcome::Committed(commit) => {
                self.host
                    .on_time_block_drag(&commit.block_id, commit.hour, commit.minute);
            }
            DragOutcome::Tap(block_id) => self.host.on_block_tap(&block_id),
            DragOutcome::Ignored => {}
        }
    }

    /// Pointer left the surface or the window lost focus.
    pub fn pointer_cancel(&mut self) {
        self.drag_touch = None;
        self.drag.cancel();
    }

    /// `touches` is every finger currently on the surface.
    pub fn touch_start(&mut self, touches: &[TouchPoint]) {
        if self.drag_touch.is_some() {
            return;
        }
        if let [touch] = touches
            && !self.gestures.is_tracking()
            && self.pointer_down(touch.position())
        {
            self.drag_touch = Some(touch.id);
            return;
        }
        if self.config.interaction.touch_optimized {
            self.gestures.begin(touches);
        }
    }

    pub fn touch_move(&mut self, touches: &[TouchPoint]) {
        if let Some(id) = self.drag_touch {
            if let Some(touch) = touches.iter().find(|t| t.id == id) {
                self.pointer_move(touch.position());
            }
            return;
        }
        if !self.config.interaction.touch_optimized {
            return;
        }
        for gesture in self.gestures.update(touches) {
            self.host.on_gesture_detected(&gesture);
        }
    }

    /// `ended` holds the fingers that were lifted.
    pub fn touch_end(&mut self, ended: &[TouchPoint]) {
        if let Some(id) = self.drag_touch
            && let Some(touch) = ended.iter().find(|t| t.id == id)
        {
            self.pointer_up(touch.position());
        }
        self.gestures.end();
    }

    pub fn touch_cancel(&mut self) {
        self.cancel_interaction();
    }

    fn cancel_interaction(&mut self) {
        self.pointer_cancel();
        self.gestures.end();
    }

    fn pulse(&self, intensity: Intensity) {
        if self.config.interaction.haptic_feedback {
            self.haptics.pulse(intensity);
        }
    }
}

/// Order-independent comparison; `detect_all` follows block order.
fn same_conflicts(a: &[Conflict], b: &[Conflict]) -> bool {
    a.len() == b.len() && a.iter().collect::<HashSet<_>>() == b.iter().collect::<HashSet<_>>()
}
