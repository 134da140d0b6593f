use serde::{Deserialize, Serialize};

/// Named pacing presets, in milliseconds per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedPreset {
    Slow,
    Moderate,
    Fast,
}

impl SpeedPreset {
    pub const ALL: [SpeedPreset; 3] = [Self::Slow, Self::Moderate, Self::Fast];

    pub fn millis(self) -> u64 {
        match self {
            Self::Slow => 1000,
            Self::Moderate => 500,
            Self::Fast => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Moderate => "Moderate",
            Self::Fast => "Fast",
        }
    }
}

pub const DEFAULT_SPEED_MS: u64 = 2000;
pub const MAX_SPEED_MS: u64 = 3000;

/// Front-end settings remembered between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub size_input: String,
    pub speed_ms: u64,
    pub theme: String,
    pub show_threats: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            size_input: "8".to_owned(),
            speed_ms: DEFAULT_SPEED_MS,
            theme: String::new(),
            show_threats: false,
        }
    }
}

impl Settings {
    /// Parses the size field. `None` for anything but a positive integer.
    pub fn board_size(&self) -> Option<usize> {
        self.size_input
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|&n| n > 0)
    }

    /// Speed to hand the solver; a zero delay is bumped to the fastest preset.
    pub fn effective_speed(&self) -> u64 {
        self.speed_ms.clamp(SpeedPreset::Fast.millis(), MAX_SPEED_MS)
    }
}
