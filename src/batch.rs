use std::collections::HashMap;

use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::error::BracketResult;
use crate::predictor::Predictor;
use crate::simulator::{TournamentResult, TournamentSimulator};

/// Aggregate of many independent runs of the same seeded bracket.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationSummary {
    pub runs: usize,
    /// Team name to number of titles
    pub champion_counts: HashMap<String, usize>,
    /// Team name to how often it reached each round (index = round)
    pub furthest_round: HashMap<String, Vec<usize>>,
    /// Games decided by coin flip across all runs
    pub tie_breaks: usize,
}

impl SimulationSummary {
    fn record(&mut self, result: &TournamentResult) {
        self.runs += 1;
        self.tie_breaks += result.tie_breaks();
        *self
            .champion_counts
            .entry(result.champion_name().to_string())
            .or_insert(0) += 1;

        let mut furthest: HashMap<&str, u32> = HashMap::new();
        for (coordinate, stats) in result.state.iter() {
            let round = furthest.entry(stats.team_name.as_str()).or_insert(coordinate.round);
            *round = (*round).max(coordinate.round);
        }
        for (team, round) in furthest {
            let counts = self.furthest_round.entry(team.to_string()).or_default();
            let round = round as usize;
            if counts.len() <= round {
                counts.resize(round + 1, 0);
            }
            counts[round] += 1;
        }
    }

    /// Share of runs won by `team`.
    pub fn champion_probability(&self, team: &str) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        self.champion_counts.get(team).copied().unwrap_or(0) as f64 / self.runs as f64
    }

    /// Teams ordered by titles, most first; ties by name.
    pub fn ranked_champions(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<_> = self
            .champion_counts
            .iter()
            .map(|(team, &count)| (team.as_str(), count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

/// Run a seeded bracket `n_simulations` times in parallel.
///
/// Per-run generators are drawn from one master `ChaCha8Rng`, so the summary
/// only depends on `seed`, not on thread scheduling. The first failing run
/// aborts the batch.
pub fn run_simulations<P>(
    simulator: &TournamentSimulator,
    predictor: &P,
    n_simulations: usize,
    seed: Option<u64>,
) -> BracketResult<SimulationSummary>
where
    P: Predictor + Sync + ?Sized,
{
    info!(
        "Running {} simulations of {} games, merging regions through round {}",
        n_simulations,
        simulator.games().len(),
        simulator.topology().last_merge_round
    );

    let mut rng = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };
    let run_seeds: Vec<u64> = (0..n_simulations).map(|_| rng.gen::<u64>()).collect();

    let results = run_seeds
        .into_par_iter()
        .map(|run_seed| {
            let mut run = simulator.clone();
            let mut run_rng = ChaCha8Rng::seed_from_u64(run_seed);
            run.run(predictor, &mut run_rng)
        })
        .collect::<BracketResult<Vec<_>>>()?;

    let mut summary = SimulationSummary::default();
    for result in &results {
        summary.record(result);
    }

    info!(
        "Completed {} simulations, {} coin flips",
        summary.runs, summary.tie_breaks
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advance::Topology;
    use crate::coordinate::TeamCoordinate;
    use crate::error::{BracketError, PredictionError};
    use crate::stats::SeasonStats;
    use crate::template::parse_template;

    fn four_team_simulator() -> TournamentSimulator {
        let games = parse_template(["[0,1,0]vs[0,1,1]", "[0,1,2]vs[0,1,3]", "[0,2,0]vs[0,2,1]"]).unwrap();
        let mut simulator = TournamentSimulator::new(games, Topology::default());
        for index in 0..4 {
            simulator
                .seed_with_stats(
                    TeamCoordinate::new(0, 1, index),
                    SeasonStats::new(2018, format!("Team{}", index), vec![index as f64]),
                )
                .unwrap();
        }
        simulator
    }

    fn coin_flips(_: &[f64]) -> Result<Vec<f64>, PredictionError> {
        Ok(vec![0.5, 0.5])
    }

    fn lower_index_wins(features: &[f64]) -> Result<Vec<f64>, PredictionError> {
        if features[0] < features[1] {
            Ok(vec![0.9, 0.1])
        } else {
            Ok(vec![0.1, 0.9])
        }
    }

    #[test]
    fn test_deterministic_predictor_always_same_champion() {
        let simulator = four_team_simulator();
        let summary = run_simulations(&simulator, &lower_index_wins, 50, Some(1)).unwrap();

        assert_eq!(summary.runs, 50);
        assert_eq!(summary.tie_breaks, 0);
        assert_eq!(summary.champion_counts.len(), 1);
        assert!((summary.champion_probability("Team0") - 1.0).abs() < 1e-12);
        assert_eq!(summary.furthest_round["Team0"], vec![0, 0, 0, 50]);
        assert_eq!(summary.furthest_round["Team3"], vec![0, 50]);
    }

    #[test]
    fn test_same_seed_same_summary() {
        let simulator = four_team_simulator();
        let a = run_simulations(&simulator, &coin_flips, 200, Some(42)).unwrap();
        let b = run_simulations(&simulator, &coin_flips, 200, Some(42)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.tie_breaks, 600);
    }

    #[test]
    fn test_coin_flip_bracket_spreads_titles() {
        let simulator = four_team_simulator();
        let summary = run_simulations(&simulator, &coin_flips, 4000, Some(7)).unwrap();

        let total: usize = summary.champion_counts.values().sum();
        assert_eq!(total, 4000);
        for index in 0..4 {
            let p = summary.champion_probability(&format!("Team{}", index));
            assert!((p - 0.25).abs() < 0.04, "Team{} won {:.3} of titles", index, p);
        }
        assert_eq!(summary.ranked_champions().len(), 4);
    }

    #[test]
    fn test_failure_aborts_batch() {
        let simulator = TournamentSimulator::new(Vec::new(), Topology::default());
        let err = run_simulations(&simulator, &coin_flips, 3, Some(1)).unwrap_err();
        assert!(matches!(err, BracketError::InvalidPhase { .. }));
    }
}
