//! Player records and positions.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A fielded position.
///
/// Variants are ordered as they appear in a presented lineup.
///
/// # Examples
///
/// ```
/// use rosterforge_core::Position;
///
/// let pos: Position = " 1b ".parse().unwrap();
/// assert_eq!(pos, Position::FirstBase);
/// assert_eq!(pos.to_string(), "1B");
/// assert!(pos.is_hitter());
/// assert!(!Position::Pitcher.is_hitter());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Position {
    #[cfg_attr(feature = "serde", serde(rename = "P"))]
    Pitcher,
    #[cfg_attr(feature = "serde", serde(rename = "C"))]
    Catcher,
    #[cfg_attr(feature = "serde", serde(rename = "1B"))]
    FirstBase,
    #[cfg_attr(feature = "serde", serde(rename = "2B"))]
    SecondBase,
    #[cfg_attr(feature = "serde", serde(rename = "3B"))]
    ThirdBase,
    #[cfg_attr(feature = "serde", serde(rename = "SS"))]
    Shortstop,
    #[cfg_attr(feature = "serde", serde(rename = "OF"))]
    Outfield,
}

impl Position {
    /// Every position, in presentation order.
    pub const ALL: [Position; 7] = [
        Position::Pitcher,
        Position::Catcher,
        Position::FirstBase,
        Position::SecondBase,
        Position::ThirdBase,
        Position::Shortstop,
        Position::Outfield,
    ];

    /// Returns the short code used in player tables ("P", "1B", ...).
    pub const fn code(self) -> &'static str {
        match self {
            Position::Pitcher => "P",
            Position::Catcher => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::Shortstop => "SS",
            Position::Outfield => "OF",
        }
    }

    /// Every position except pitcher bats.
    #[inline]
    pub const fn is_hitter(self) -> bool {
        !matches!(self, Position::Pitcher)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a position code is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown position code '{0}'")]
pub struct ParsePositionError(pub String);

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Position::ALL
            .into_iter()
            .find(|pos| pos.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| ParsePositionError(s.to_string()))
    }
}

/// A candidate player.
///
/// Players are immutable once created. The team code is stored upper-cased.
///
/// # Examples
///
/// ```
/// use rosterforge_core::{Player, Position};
///
/// let player = Player::new("Mookie Betts", Position::Outfield, "lad", 5800.0, 10.456);
/// assert_eq!(player.team(), "LAD");
/// assert_eq!(player.rounded_points(), 10.46);
/// assert!(player.is_hitter());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    name: String,
    position: Position,
    team: String,
    salary: f64,
    projected_points: f64,
}

impl Player {
    pub fn new(
        name: impl Into<String>,
        position: Position,
        team: impl AsRef<str>,
        salary: f64,
        projected_points: f64,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            team: team.as_ref().trim().to_uppercase(),
            salary,
            projected_points,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub fn team(&self) -> &str {
        &self.team
    }

    #[inline]
    pub fn salary(&self) -> f64 {
        self.salary
    }

    #[inline]
    pub fn projected_points(&self) -> f64 {
        self.projected_points
    }

    #[inline]
    pub fn is_hitter(&self) -> bool {
        self.position.is_hitter()
    }

    /// Projected points rounded to two decimals, for presentation.
    pub fn rounded_points(&self) -> f64 {
        crate::lineup::round_points(self.projected_points)
    }
}
