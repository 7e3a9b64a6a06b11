use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Playing position of a squad member or catalog player.
///
/// Serialized in its singular lowercase form. Parsing is lenient and accepts
/// the plural squad-group keys and the short codes used by data feeds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    /// Every position in squad order.
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    /// Key of the squad group holding this position (`"defenders"`, ...).
    pub fn group_key(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "goalkeepers",
            Position::Defender => "defenders",
            Position::Midfielder => "midfielders",
            Position::Forward => "forwards",
        }
    }

    pub fn short_code(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GKP",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }

    /// Map an FPL `element_type` (1–4) to a position.
    pub fn from_element_type(element_type: u8) -> Option<Self> {
        match element_type {
            1 => Some(Position::Goalkeeper),
            2 => Some(Position::Defender),
            3 => Some(Position::Midfielder),
            4 => Some(Position::Forward),
            _ => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Goalkeeper => write!(f, "goalkeeper"),
            Position::Defender => write!(f, "defender"),
            Position::Midfielder => write!(f, "midfielder"),
            Position::Forward => write!(f, "forward"),
        }
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "goalkeeper" | "goalkeepers" | "keeper" | "gk" | "gkp" => Ok(Position::Goalkeeper),
            "defender" | "defenders" | "def" => Ok(Position::Defender),
            "midfielder" | "midfielders" | "mid" => Ok(Position::Midfielder),
            "forward" | "forwards" | "attacker" | "fwd" => Ok(Position::Forward),
            _ => Err(format!("Unknown position: {s}")),
        }
    }
}

impl TryFrom<String> for Position {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
