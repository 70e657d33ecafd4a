use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::ParseError;

/// Position of a team in the bracket: region, round and slot index.
///
/// Equality and hashing only look at `(region, round, index)`. The name is
/// metadata describing whichever team occupies the slot in a particular run,
/// so coordinates can be used as map keys regardless of who holds them.
#[derive(Clone, Debug, Default)]
pub struct TeamCoordinate {
    pub region: u32,
    pub round: u32,
    pub index: u32,
    pub name: Option<String>,
}

impl TeamCoordinate {
    pub fn new(region: u32, round: u32, index: u32) -> Self {
        TeamCoordinate {
            region,
            round,
            index,
            name: None,
        }
    }

    /// Copy of this coordinate carrying the given team name
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        TeamCoordinate {
            name: Some(name.into()),
            ..self.clone()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn key(&self) -> (u32, u32, u32) {
        (self.region, self.round, self.index)
    }
}

impl PartialEq for TeamCoordinate {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TeamCoordinate {}

impl Hash for TeamCoordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for TeamCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{}]", self.region, self.round, self.index)
    }
}

impl FromStr for TeamCoordinate {
    type Err = ParseError;

    /// Parse `R,Rd,I`, optionally wrapped in square brackets.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .unwrap_or(trimmed);

        let malformed = |reason: String| ParseError::Coordinate {
            text: text.to_string(),
            reason,
        };

        let tokens: Vec<&str> = inner.split(',').map(str::trim).collect();
        if tokens.len() != 3 {
            return Err(malformed(format!("expected 3 components, found {}", tokens.len())));
        }

        let mut components = [0u32; 3];
        for (slot, token) in components.iter_mut().zip(&tokens) {
            *slot = token
                .parse()
                .map_err(|_| malformed(format!("'{}' is not a non-negative integer", token)))?;
        }

        Ok(TeamCoordinate::new(components[0], components[1], components[2]))
    }
}

/// Whether `text` has the surface syntax `[R,Rd,I]`.
pub fn looks_like_coordinate(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.starts_with('[') && trimmed.ends_with(']') && trimmed.parse::<TeamCoordinate>().is_ok()
}

/// One scheduled matchup.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GameCoordinate {
    pub home: TeamCoordinate,
    pub away: TeamCoordinate,
}

impl GameCoordinate {
    pub fn new(home: TeamCoordinate, away: TeamCoordinate) -> Self {
        GameCoordinate { home, away }
    }
}

impl fmt::Display for GameCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}vs{}", self.home, self.away)
    }
}
