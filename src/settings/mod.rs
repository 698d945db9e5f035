//! Slider settings store: defaults, JSON loading and live patches.

use std::num::NonZeroU32;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SliderError};
use crate::gap::{Direction, GapInput};

fn default_per_view() -> NonZeroU32 {
    NonZeroU32::MIN
}

fn default_apply_throttle_ms() -> u64 {
    30
}

fn non_zero_per_view(per_view: u32) -> Result<NonZeroU32> {
    NonZeroU32::new(per_view)
        .ok_or_else(|| SliderError::InvalidSettings("perView must be at least 1".into()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Settings {
    /// Spacing between slides in pixels; numbers or numeric strings.
    #[serde(default)]
    pub gap: GapInput,
    /// Slides visible at once. Zero is rejected when loading.
    #[serde(default = "default_per_view")]
    pub per_view: NonZeroU32,
    #[serde(default)]
    pub direction: Direction,
    /// Quiet period before a pending gap apply runs.
    #[serde(default = "default_apply_throttle_ms")]
    pub apply_throttle_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gap: GapInput::default(),
            per_view: default_per_view(),
            direction: Direction::default(),
            apply_throttle_ms: default_apply_throttle_ms(),
        }
    }
}

impl Settings {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(raw)?;
        Ok(settings)
    }

    pub fn with_gap(mut self, gap: impl Into<GapInput>) -> Self {
        self.gap = gap.into();
        self
    }

    pub fn with_per_view(mut self, per_view: u32) -> Result<Self> {
        self.per_view = non_zero_per_view(per_view)?;
        Ok(self)
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_apply_throttle(mut self, wait: Duration) -> Self {
        self.apply_throttle_ms = wait.as_millis() as u64;
        self
    }

    pub fn apply_throttle(&self) -> Duration {
        Duration::from_millis(self.apply_throttle_ms)
    }

    pub fn merge(&mut self, patch: SettingsPatch) {
        if let Some(gap) = patch.gap {
            self.gap = gap;
        }
        if let Some(per_view) = patch.per_view {
            self.per_view = per_view;
        }
        if let Some(direction) = patch.direction {
            self.direction = direction;
        }
        if let Some(ms) = patch.apply_throttle_ms {
            self.apply_throttle_ms = ms;
        }
    }
}

/// Partial settings handed to a live update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<GapInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_view: Option<NonZeroU32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_throttle_ms: Option<u64>,
}

impl SettingsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(SliderError::from)
    }

    pub fn gap(mut self, gap: impl Into<GapInput>) -> Self {
        self.gap = Some(gap.into());
        self
    }

    pub fn per_view(mut self, per_view: u32) -> Result<Self> {
        self.per_view = Some(non_zero_per_view(per_view)?);
        Ok(self)
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
