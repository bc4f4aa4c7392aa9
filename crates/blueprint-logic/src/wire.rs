//! Wire colors and circuit terminal sides.

use blueprint_core::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// Wire color. Buildings can sit on one red and one green network per side.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum WireColor {
    #[default]
    Red,
    Green,
}

impl WireColor {
    /// Parse a color token. Anything other than `"green"` is red.
    pub fn from_token(token: &str) -> Self {
        if token == "green" {
            WireColor::Green
        } else {
            WireColor::Red
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WireColor::Red => "red",
            WireColor::Green => "green",
        }
    }
}

impl From<&str> for WireColor {
    fn from(token: &str) -> Self {
        WireColor::from_token(token)
    }
}

impl fmt::Display for WireColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// A circuit terminal. Dual-terminal combinators read on `One` (input) and
/// write on `Two` (output); everything else only has `One`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Side {
    #[default]
    One,
    Two,
}

impl Side {
    pub fn number(self) -> u8 {
        match self {
            Side::One => 1,
            Side::Two => 2,
        }
    }

    pub fn from_number(n: u8) -> Option<Side> {
        match n {
            1 => Some(Side::One),
            2 => Some(Side::Two),
            _ => None,
        }
    }

    /// The key used for this side in the external connection map.
    pub fn key(self) -> &'static str {
        match self {
            Side::One => "1",
            Side::Two => "2",
        }
    }
}

/// A side as a caller may name it: by number, symbolically, or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SideSpec {
    #[default]
    Unspecified,
    Number(i64),
    In,
    Out,
}

impl SideSpec {
    /// Parse a textual side: `"in"`, `"out"`, `"1"`, `"2"`, or empty.
    pub fn parse(token: &str) -> Result<SideSpec, ValidationError> {
        match token.trim() {
            "" => Ok(SideSpec::Unspecified),
            "in" => Ok(SideSpec::In),
            "out" => Ok(SideSpec::Out),
            other => other
                .parse::<i64>()
                .map(SideSpec::Number)
                .map_err(|_| ValidationError::InvalidSide(other.to_string())),
        }
    }

    /// Resolve to a concrete terminal on an entity.
    ///
    /// `"out"` only reaches side 2 on dual-terminal entities; elsewhere it
    /// folds onto side 1.
    pub fn resolve(&self, dual_terminal: bool) -> Result<Side, ValidationError> {
        match self {
            SideSpec::Unspecified | SideSpec::In => Ok(Side::One),
            SideSpec::Out if dual_terminal => Ok(Side::Two),
            SideSpec::Out => Ok(Side::One),
            SideSpec::Number(1) => Ok(Side::One),
            SideSpec::Number(2) => Ok(Side::Two),
            SideSpec::Number(n) => Err(ValidationError::InvalidSide(n.to_string())),
        }
    }
}

impl From<Side> for SideSpec {
    fn from(side: Side) -> Self {
        SideSpec::Number(i64::from(side.number()))
    }
}

impl From<u8> for SideSpec {
    fn from(n: u8) -> Self {
        SideSpec::Number(i64::from(n))
    }
}

impl From<Option<Side>> for SideSpec {
    fn from(side: Option<Side>) -> Self {
        side.map(SideSpec::from).unwrap_or_default()
    }
}
