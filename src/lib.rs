//! Bracket Core - single-elimination tournament simulation.
//!
//! Teams sit on `(region, round, index)` coordinates. Games listed in a
//! bracket template are resolved in order by querying a [`Predictor`] with
//! both team orderings, and each winner is advanced to its next-round
//! coordinate until one champion remains. Python bindings are available with
//! the `python` feature.

pub mod advance;
pub mod batch;
pub mod config;
pub mod constants;
pub mod coordinate;
pub mod error;
pub mod evaluator;
pub mod predictor;
pub mod simulator;
pub mod stats;
pub mod template;
pub mod visualize;

#[cfg(feature = "python")]
mod python;

pub use advance::{next_coordinate, Topology};
pub use batch::{run_simulations, SimulationSummary};
pub use config::{BracketConfig, PredictorConfig, SeedEntry};
pub use constants::{round_name, REGION_MERGE_ROUND};
pub use coordinate::{looks_like_coordinate, GameCoordinate, TeamCoordinate};
pub use error::{BracketError, BracketResult, NotFoundError, ParseError, PredictionError};
pub use evaluator::{evaluate, Decision, MatchupOutcome, Side};
pub use predictor::{matchup_features, EfficiencyPredictor, Predictor};
pub use simulator::{BracketState, GameResult, SimulationPhase, TournamentResult, TournamentSimulator};
pub use stats::{InMemoryStatsProvider, SeasonStats, StatsProvider};
pub use template::{load_template, parse_line, parse_template};
pub use visualize::render;
