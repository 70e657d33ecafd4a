use log::{debug, warn};
use rand::Rng;

use crate::constants::{LEFT_WINS, RIGHT_WINS};
use crate::coordinate::{GameCoordinate, TeamCoordinate};
use crate::error::{BracketResult, PredictionError};
use crate::predictor::{matchup_features, Predictor};
use crate::stats::SeasonStats;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Home,
    Away,
}

/// Which rule of the winner policy decided a matchup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Both orderings pick home
    SymmetricHome,
    /// Both orderings pick away
    SymmetricAway,
    /// Orderings disagree, home pick has the larger margin
    HomeMoreCertain,
    /// Orderings disagree, away pick has the larger margin
    AwayMoreCertain,
    /// Neither margin dominates
    CoinFlip,
}

impl Decision {
    pub fn winner(self) -> Option<Side> {
        match self {
            Decision::SymmetricHome | Decision::HomeMoreCertain => Some(Side::Home),
            Decision::SymmetricAway | Decision::AwayMoreCertain => Some(Side::Away),
            Decision::CoinFlip => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchupOutcome {
    /// Coordinate of the winning side, carrying the winner's name
    pub winner: TeamCoordinate,
    pub winner_side: Side,
    pub decision: Decision,
    /// `P(home) - P(away)` with home listed first
    pub certainty_home: f64,
    /// `P(away) - P(home)` with away listed first
    pub certainty_away: f64,
    pub tie_broken: bool,
}

/// Pull the (left wins, right wins) pair out of a probability vector.
fn left_right(probabilities: Vec<f64>) -> Result<(f64, f64), PredictionError> {
    match (probabilities.get(LEFT_WINS), probabilities.get(RIGHT_WINS)) {
        (Some(&left), Some(&right)) if left.is_finite() && right.is_finite() => Ok((left, right)),
        _ => Err(PredictionError::MalformedOutput(probabilities)),
    }
}

/// Apply the winner policy to the two query results.
///
/// `a` is the (home, away) ordering and `b` the (away, home) ordering, both as
/// (left wins, right wins). Returns `None` when only a coin flip can decide.
pub fn decide(a: (f64, f64), b: (f64, f64)) -> (Option<Decision>, f64, f64) {
    let (home_a, away_a) = a;
    let (away_b, home_b) = b;

    let certainty_home = home_a - away_a;
    let certainty_away = away_b - home_b;

    let decision = if home_a > away_a && home_b > away_b {
        Some(Decision::SymmetricHome)
    } else if away_a > home_a && away_b > home_b {
        Some(Decision::SymmetricAway)
    } else if certainty_home > certainty_away {
        Some(Decision::HomeMoreCertain)
    } else if certainty_away > certainty_home {
        Some(Decision::AwayMoreCertain)
    } else {
        None
    };

    (decision, certainty_home, certainty_away)
}

/// Decide a matchup by querying `predictor` with both team orderings.
///
/// Querying twice cancels a predictor's tendency to favor whichever team is
/// listed first. Exact ties are settled with a fair coin drawn from `rng`.
pub fn evaluate<P, R>(
    game: &GameCoordinate,
    home: &SeasonStats,
    away: &SeasonStats,
    predictor: &P,
    rng: &mut R,
) -> BracketResult<MatchupOutcome>
where
    P: Predictor + ?Sized,
    R: Rng + ?Sized,
{
    let home_first = left_right(predictor.predict(&matchup_features(home, away))?)?;
    let away_first = left_right(predictor.predict(&matchup_features(away, home))?)?;

    let (decision, certainty_home, certainty_away) = decide(home_first, away_first);

    let decision = decision.unwrap_or(Decision::CoinFlip);
    let winner_side = match decision.winner() {
        Some(side) => side,
        None => {
            let side = if rng.gen_bool(0.5) { Side::Home } else { Side::Away };
            let (coordinate, stats) = match side {
                Side::Home => (&game.home, home),
                Side::Away => (&game.away, away),
            };
            warn!(
                "{:?} team wins coin toss: {} {}",
                side, stats.team_name, coordinate
            );
            side
        }
    };

    let winner = match winner_side {
        Side::Home => game.home.with_name(&home.team_name),
        Side::Away => game.away.with_name(&away.team_name),
    };

    debug!(
        "Home: {}, Away: {}, Winner: {}, {:?}, h0: {:.8}, a0: {:.8}, a1: {:.8}, h1: {:.8}",
        home.team_name,
        away.team_name,
        winner.name().unwrap_or_default(),
        decision,
        home_first.0,
        home_first.1,
        away_first.0,
        away_first.1
    );

    Ok(MatchupOutcome {
        winner,
        winner_side,
        decision,
        certainty_home,
        certainty_away,
        tie_broken: decision == Decision::CoinFlip,
    })
}
