use serde::{Deserialize, Serialize};
use strum::Display as StrumDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, StrumDisplay)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Intensity {
    Light,
    Medium,
    Heavy,
}

impl Intensity {
    /// Vibration length for platforms that only take a duration.
    pub fn duration_ms(&self) -> u32 {
        match self {
            Self::Light => 10,
            Self::Medium => 20,
            Self::Heavy => 40,
        }
    }
}

/// Vibration capability of the host platform.
pub trait Haptics {
    fn pulse(&self, intensity: Intensity);
}

/// For platforms without a vibration motor, and for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn pulse(&self, _intensity: Intensity) {}
}
