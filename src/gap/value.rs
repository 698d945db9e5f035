use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw gap setting as a host hands it over: either a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GapInput {
    Number(f64),
    Text(String),
}

impl Default for GapInput {
    fn default() -> Self {
        GapInput::Number(10.0)
    }
}

impl From<u32> for GapInput {
    fn from(value: u32) -> Self {
        GapInput::Number(value as f64)
    }
}

impl From<i64> for GapInput {
    fn from(value: i64) -> Self {
        GapInput::Number(value as f64)
    }
}

impl From<f64> for GapInput {
    fn from(value: f64) -> Self {
        GapInput::Number(value)
    }
}

impl From<&str> for GapInput {
    fn from(value: &str) -> Self {
        GapInput::Text(value.to_string())
    }
}

impl From<String> for GapInput {
    fn from(value: String) -> Self {
        GapInput::Text(value)
    }
}

impl fmt::Display for GapInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GapInput::Number(n) => write!(f, "{n}"),
            GapInput::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/// Integer coercion used for pixel settings.
///
/// Numbers truncate toward zero; strings take the leading integer prefix after
/// optional whitespace and sign, so `"40px"` reads as 40. A `0x` prefix reads
/// the digits as hex. Anything without a usable integer collapses to 0, as do
/// negatives. Oversized values saturate.
pub fn to_int(input: &GapInput) -> u32 {
    match input {
        GapInput::Number(n) => number_to_int(*n),
        GapInput::Text(s) => text_to_int(s),
    }
}

fn number_to_int(n: f64) -> u32 {
    if !n.is_finite() || n <= 0.0 {
        return 0;
    }
    // `as` saturates at u32::MAX and truncates the fraction.
    n.trunc() as u32
}

fn text_to_int(s: &str) -> u32 {
    let trimmed = s.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let (radix, rest) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let mut value: u32 = 0;
    let mut seen = false;
    for digit in rest.chars().map_while(|c| c.to_digit(radix)) {
        seen = true;
        value = value.saturating_mul(radix).saturating_add(digit);
    }

    if !seen || negative { 0 } else { value }
}

/// Reactive storage for the gap size in CSS pixels.
///
/// Every write goes through [`to_int`], so reads always see a non-negative
/// integer. Writes emit nothing; consumers re-read when they need the value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GapValue {
    px: u32,
}

impl GapValue {
    pub fn new(raw: impl Into<GapInput>) -> Self {
        let mut value = Self::default();
        value.set(raw);
        value
    }

    pub fn get(&self) -> u32 {
        self.px
    }

    pub fn set(&mut self, raw: impl Into<GapInput>) {
        self.px = to_int(&raw.into());
    }

    /// Half of the gap, the amount each side of a shared edge receives.
    pub fn half(&self) -> f64 {
        f64::from(self.px) / 2.0
    }
}
