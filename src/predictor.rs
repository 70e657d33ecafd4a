use statrs::distribution::{ContinuousCDF, Normal};

use crate::constants::{AVG_SCORING, AVG_TEMPO, LEFT_WINS, RIGHT_WINS, SCORING_STDDEV};
use crate::error::PredictionError;
use crate::stats::SeasonStats;

/// Matchup model queried by the evaluator.
///
/// The input is the left team's features followed by the right team's. The
/// output is a probability vector whose first element is "left side wins" and
/// whose second is "right side wins"; further classes are ignored.
pub trait Predictor {
    fn predict(&self, features: &[f64]) -> Result<Vec<f64>, PredictionError>;
}

impl<F> Predictor for F
where
    F: Fn(&[f64]) -> Result<Vec<f64>, PredictionError>,
{
    fn predict(&self, features: &[f64]) -> Result<Vec<f64>, PredictionError> {
        self(features)
    }
}

/// Concatenate two teams' features, `left` first.
pub fn matchup_features(left: &SeasonStats, right: &SeasonStats) -> Vec<f64> {
    let mut features = Vec::with_capacity(left.features.len() + right.features.len());
    features.extend_from_slice(&left.features);
    features.extend_from_slice(&right.features);
    features
}

/// Reference predictor using efficiency ratings and a normal approximation of
/// the scoring margin.
///
/// Each team contributes `width` features; `offense`, `defense` and `tempo`
/// locate the relative offensive efficiency (0.05 = 5% above average), relative
/// defensive efficiency and possessions per game within a team's block.
#[derive(Clone, Debug, PartialEq)]
pub struct EfficiencyPredictor {
    pub width: usize,
    pub offense: usize,
    pub defense: usize,
    pub tempo: usize,
}

impl Default for EfficiencyPredictor {
    fn default() -> Self {
        EfficiencyPredictor {
            width: 3,
            offense: 0,
            defense: 1,
            tempo: 2,
        }
    }
}

impl EfficiencyPredictor {
    /// Probability that the first team beats the second. Both slices must
    /// hold at least `width` features; `predict` checks this.
    fn win_prob(&self, team1: &[f64], team2: &[f64]) -> f64 {
        // Expected possessions per team
        let tempo = (team1[self.tempo] * team2[self.tempo]) / AVG_TEMPO;

        // Points per possession as a fraction of the national average
        let team1_scoring = 1.0 + team1[self.offense] + team2[self.defense];
        let team2_scoring = 1.0 + team2[self.offense] + team1[self.defense];

        let ppp_scale = AVG_SCORING / 100.0;
        let point_diff = (team1_scoring - team2_scoring) * ppp_scale * tempo;

        let stddev = ((team1_scoring + team2_scoring) / 2.0) * (tempo / AVG_TEMPO) * SCORING_STDDEV;

        match Normal::new(0.0, 1.0) {
            Ok(normal) => normal.cdf(point_diff / stddev),
            Err(_) => 0.5,
        }
    }
}

impl Predictor for EfficiencyPredictor {
    fn predict(&self, features: &[f64]) -> Result<Vec<f64>, PredictionError> {
        if features.len() != 2 * self.width {
            return Err(PredictionError::FeatureCount {
                expected: 2 * self.width,
                actual: features.len(),
            });
        }
        let highest = self.offense.max(self.defense).max(self.tempo);
        if highest >= self.width {
            return Err(PredictionError::Failed(format!(
                "feature slot {} outside a team block of width {}",
                highest, self.width
            )));
        }

        let (left, right) = features.split_at(self.width);
        let p = self.win_prob(left, right);
        if !p.is_finite() {
            return Err(PredictionError::MalformedOutput(vec![p, 1.0 - p]));
        }

        let mut probabilities = vec![0.0; 2];
        probabilities[LEFT_WINS] = p;
        probabilities[RIGHT_WINS] = 1.0 - p;
        Ok(probabilities)
    }
}
