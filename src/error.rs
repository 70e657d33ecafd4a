use std::path::PathBuf;

use thiserror::Error;

use crate::coordinate::TeamCoordinate;

pub type BracketResult<T> = Result<T, BracketError>;

/// Malformed coordinate text or template line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed team coordinate '{text}': {reason}")]
    Coordinate { text: String, reason: String },

    #[error("malformed tournament template line '{line}': expected 2 coordinates, found {found}")]
    TokenCount { line: String, found: usize },

    #[error("malformed tournament template line '{line}': {source}")]
    Line {
        line: String,
        #[source]
        source: Box<ParseError>,
    },
}

/// Failure reported by a [`Predictor`](crate::predictor::Predictor).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("prediction failed: {0}")]
    Failed(String),

    #[error("predictor returned a malformed probability vector {0:?}")]
    MalformedOutput(Vec<f64>),

    #[error("feature vector has {actual} values, predictor expects {expected}")]
    FeatureCount { expected: usize, actual: usize },
}

/// No season statistics exist for a team in a given year.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no season data for '{team}' in {year}")]
pub struct NotFoundError {
    pub year: u32,
    pub team: String,
}

#[derive(Error, Debug)]
pub enum BracketError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("template line {line_number}: {source}")]
    Template {
        line_number: usize,
        #[source]
        source: ParseError,
    },

    #[error("no team occupies {coordinate}")]
    MissingOccupant { coordinate: TeamCoordinate },

    #[error("{coordinate} is already occupied by '{existing}', cannot place '{incoming}'")]
    DuplicateCoordinate {
        coordinate: TeamCoordinate,
        existing: String,
        incoming: String,
    },

    #[error("cannot advance out of round {round}: bracket depth exceeded")]
    BracketDepthExceeded { round: u32 },

    #[error("{home} and {away} are in different regions before the merge rounds")]
    RegionMismatch {
        home: TeamCoordinate,
        away: TeamCoordinate,
    },

    #[error("last merge round {last_merge_round} is before the region merge round {merge_round}")]
    InvalidTopology { last_merge_round: u32, merge_round: u32 },

    #[error("{count} teams share the final round {round}, bracket is incomplete")]
    AmbiguousChampion { round: u32, count: usize },

    #[error("bracket has no occupants")]
    EmptyBracket,

    #[error("simulator is {actual}, expected {expected}")]
    InvalidPhase {
        expected: &'static str,
        actual: &'static str,
    },

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl BracketError {
    /// True for failures caused by the bracket definition itself (template,
    /// seeds or topology) rather than by the collaborators.
    pub fn is_topology_error(&self) -> bool {
        matches!(
            self,
            BracketError::MissingOccupant { .. }
                | BracketError::DuplicateCoordinate { .. }
                | BracketError::BracketDepthExceeded { .. }
                | BracketError::RegionMismatch { .. }
                | BracketError::InvalidTopology { .. }
                | BracketError::AmbiguousChampion { .. }
        )
    }
}
