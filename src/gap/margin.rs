use std::fmt;

use serde::{Deserialize, Serialize};

/// Reading direction of the slide track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical margin property written on a slide element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MarginProperty {
    MarginLeft,
    MarginRight,
}

impl MarginProperty {
    pub fn css_name(self) -> &'static str {
        match self {
            MarginProperty::MarginLeft => "margin-left",
            MarginProperty::MarginRight => "margin-right",
        }
    }

    pub fn mirrored(self) -> Self {
        match self {
            MarginProperty::MarginLeft => MarginProperty::MarginRight,
            MarginProperty::MarginRight => MarginProperty::MarginLeft,
        }
    }
}

/// Leading and trailing edge properties for one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarginPair {
    pub leading: MarginProperty,
    pub trailing: MarginProperty,
}

const LTR_MARGINS: MarginPair = MarginPair {
    leading: MarginProperty::MarginLeft,
    trailing: MarginProperty::MarginRight,
};

const RTL_MARGINS: MarginPair = MarginPair {
    leading: MarginProperty::MarginRight,
    trailing: MarginProperty::MarginLeft,
};

/// Leading edge faces the previous slide, trailing faces the next one.
pub fn margins_for(direction: Direction) -> MarginPair {
    match direction {
        Direction::Ltr => LTR_MARGINS,
        Direction::Rtl => RTL_MARGINS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ltr_leads_with_left() {
        let pair = margins_for(Direction::Ltr);
        assert_eq!(pair.leading.css_name(), "margin-left");
        assert_eq!(pair.trailing.css_name(), "margin-right");
    }

    #[test]
    fn rtl_mirrors_ltr() {
        let ltr = margins_for(Direction::Ltr);
        let rtl = margins_for(Direction::Rtl);
        assert_eq!(rtl.leading, ltr.leading.mirrored());
        assert_eq!(rtl.trailing, ltr.trailing.mirrored());
    }

    #[test]
    fn direction_parses_lowercase() {
        let dir: Direction = serde_json::from_str("\"rtl\"").unwrap();
        assert_eq!(dir, Direction::Rtl);
        assert_eq!(dir.to_string(), "rtl");
    }
}
