//! Log kind enum as the single source of truth for kind strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::ValidationError;

/// The six categories of caregiver log.
///
/// Declaration order doubles as the tie-break order when two feed items
/// share a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Meal,
    Sleep,
    Behavior,
    Hydration,
    Location,
    Activity,
}

impl Kind {
    /// Every kind, in tie-break order.
    pub const ALL: [Self; 6] = [
        Self::Meal,
        Self::Sleep,
        Self::Behavior,
        Self::Hydration,
        Self::Location,
        Self::Activity,
    ];

    /// Stable lowercase slug used in feed identifiers and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meal => "meal",
            Self::Sleep => "sleep",
            Self::Behavior => "behavior",
            Self::Hydration => "hydration",
            Self::Location => "location",
            Self::Activity => "activity",
        }
    }

    /// URL path segment of this kind's resource on the server.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Meal => "meals",
            Self::Sleep => "sleep",
            Self::Behavior => "behavior",
            Self::Hydration => "hydration",
            Self::Location => "location",
            Self::Activity => "activities",
        }
    }

    /// Icon and color used to render items of this kind.
    #[must_use]
    pub const fn visual(self) -> Visual {
        let (icon, color) = match self {
            Self::Meal => ("fork.knife", Color::Orange),
            Self::Sleep => ("bed.double.fill", Color::Blue),
            Self::Behavior => ("brain.head.profile", Color::Purple),
            Self::Hydration => ("drop.fill", Color::Cyan),
            Self::Location => ("location.fill", Color::Red),
            Self::Activity => ("figure.walk", Color::Green),
        };
        Visual { icon, color }
    }
}

/// Presentation hints for a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Visual {
    /// Symbolic icon name.
    pub icon: &'static str,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Orange,
    Blue,
    Purple,
    Cyan,
    Red,
    Green,
}

impl Color {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Orange => "orange",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Cyan => "cyan",
            Self::Red => "red",
            Self::Green => "green",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Kind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "meal" | "meals" => Ok(Self::Meal),
            "sleep" => Ok(Self::Sleep),
            "behavior" | "behaviour" => Ok(Self::Behavior),
            "hydration" => Ok(Self::Hydration),
            "location" => Ok(Self::Location),
            "activity" | "activities" => Ok(Self::Activity),
            _ => Err(ValidationError::UnknownKind {
                value: s.to_string(),
            }),
        }
    }
}

impl Serialize for Kind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Kind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
