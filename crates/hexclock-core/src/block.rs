use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

pub const MINUTES_PER_DAY: u32 = 1440;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct BlockId(String);

crate::impl_string_newtype!(BlockId);

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[strum(to_string = "sleep", serialize = "rest")]
    Sleep,
    #[strum(to_string = "movement", serialize = "exercise", serialize = "move")]
    Movement,
    #[strum(to_string = "nutrition", serialize = "food")]
    Nutrition,
    #[strum(to_string = "mindfulness", serialize = "mind", serialize = "meditation")]
    Mindfulness,
    #[strum(to_string = "connection", serialize = "social")]
    Connection,
    #[strum(to_string = "growth", serialize = "learning")]
    Growth,
}

impl Category {
    /// Fixed hexagon corner on the face, one every two hours starting at 12.
    pub fn clock_hour(&self) -> u32 {
        match self {
            Self::Sleep => 12,
            Self::Movement => 2,
            Self::Nutrition => 4,
            Self::Mindfulness => 6,
            Self::Connection => 8,
            Self::Growth => 10,
        }
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, StrumDisplay)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BlockStatus {
    #[default]
    Empty,
    Planned,
    Active,
    Completed,
    Overflowing,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    #[error("start hour {0} is outside 0..=23")]
    Hour(u32),
    #[error("start minute {0} is outside 0..=59")]
    Minute(u32),
    #[error("duration must be positive")]
    EmptyDuration,
    #[error("duration of {0} minutes exceeds one day")]
    Overlong(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    pub start_hour: u32,
    pub start_minute: u32,
    pub duration_minutes: u32,
}

impl TimeInterval {
    pub fn new(start_hour: u32, start_minute: u32, duration_minutes: u32) -> Self {
        Self {
            start_hour,
            start_minute,
            duration_minutes,
        }
    }

    pub fn validate(&self) -> Result<(), IntervalError> {
        if self.start_hour > 23 {
            return Err(IntervalError::Hour(self.start_hour));
        }
        if self.start_minute > 59 {
            return Err(IntervalError::Minute(self.start_minute));
        }
        match self.duration_minutes {
            0 => Err(IntervalError::EmptyDuration),
            d if d > MINUTES_PER_DAY => Err(IntervalError::Overlong(d)),
            _ => Ok(()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Minutes since midnight.
    pub fn start(&self) -> u32 {
        self.start_hour
            .saturating_mul(60)
            .saturating_add(self.start_minute)
    }

    /// Exclusive end in minutes since midnight; may exceed one day.
    pub fn end(&self) -> u32 {
        self.start().saturating_add(self.duration_minutes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub id: BlockId,
    pub category: Category,
    pub interval: TimeInterval,
    #[serde(default)]
    pub status: BlockStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
}

impl TimeBlock {
    pub fn new(id: impl Into<String>, category: Category, interval: TimeInterval) -> Self {
        Self {
            id: BlockId::new(id),
            category,
            interval,
            status: BlockStatus::Planned,
            progress: None,
        }
    }

    pub fn with_status(mut self, status: BlockStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Status used for display and interaction; invalid blocks fall back to `Empty`.
    pub fn effective_status(&self) -> BlockStatus {
        if self.interval.is_valid() {
            self.status
        } else {
            BlockStatus::Empty
        }
    }

    /// Progress clamped to `[0, 1]`, only reported for active blocks.
    pub fn effective_progress(&self) -> Option<f64> {
        match self.effective_status() {
            BlockStatus::Active => self.progress.map(|p| p.clamp(0.0, 1.0)),
            _ => None,
        }
    }

    pub fn is_draggable(&self) -> bool {
        matches!(
            self.effective_status(),
            BlockStatus::Planned | BlockStatus::Active | BlockStatus::Overflowing
        )
    }
}
