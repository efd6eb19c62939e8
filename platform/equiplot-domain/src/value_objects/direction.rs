use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a recorded trade. Labels are matched case-sensitively; anything
/// that is not one of the known labels is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    Long,
    Short,
    Close,
    Other(String),
}

impl Direction {
    pub fn label(&self) -> &str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
            Direction::Close => "CLOSE",
            Direction::Other(label) => label.as_str(),
        }
    }
}

impl From<String> for Direction {
    fn from(value: String) -> Self {
        match value.as_str() {
            "LONG" => Direction::Long,
            "SHORT" => Direction::Short,
            "CLOSE" => Direction::Close,
            _ => Direction::Other(value),
        }
    }
}

impl From<Direction> for String {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
