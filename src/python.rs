use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

use crate::advance::Topology;
use crate::config::SeedEntry;
use crate::constants::REGION_MERGE_ROUND;
use crate::error::{BracketError, PredictionError};
use crate::predictor::Predictor;
use crate::simulator::TournamentSimulator;
use crate::stats::{InMemoryStatsProvider, SeasonStats};
use crate::template::parse_template;

/// A Python callable `list[float] -> list[float]` used as the predictor.
struct PyPredictor {
    callable: PyObject,
}

impl Predictor for PyPredictor {
    fn predict(&self, features: &[f64]) -> Result<Vec<f64>, PredictionError> {
        Python::with_gil(|py| {
            self.callable
                .call1(py, (features.to_vec(),))
                .and_then(|output| output.extract::<Vec<f64>>(py))
        })
        .map_err(|e| PredictionError::Failed(e.to_string()))
    }
}

fn to_py_err(e: BracketError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Simulate one bracket.
///
/// `seeds` are `(region, round, index, team)` tuples and `stats` maps team
/// names to feature vectors. Returns the champion's name and a map from
/// `"[R,Rd,I]"` to the team that held each coordinate.
#[pyfunction]
#[pyo3(signature = (template, seeds, stats, predictor, year = 0, last_merge_round = REGION_MERGE_ROUND, seed = None))]
#[allow(clippy::too_many_arguments)]
fn simulate_bracket(
    template: &str,
    seeds: Vec<(u32, u32, u32, String)>,
    stats: HashMap<String, Vec<f64>>,
    predictor: PyObject,
    year: u32,
    last_merge_round: u32,
    seed: Option<u64>,
) -> PyResult<(String, HashMap<String, String>)> {
    let games = parse_template(template.lines()).map_err(to_py_err)?;

    let mut provider = InMemoryStatsProvider::new();
    for (name, features) in stats {
        provider.insert(SeasonStats::new(year, name, features));
    }
    let seeds: Vec<SeedEntry> = seeds
        .into_iter()
        .map(|(region, round, index, team)| SeedEntry::new(region, round, index, team))
        .collect();

    let topology = Topology::new(last_merge_round).map_err(to_py_err)?;
    let mut simulator = TournamentSimulator::new(games, topology);
    simulator.seed(year, &seeds, &provider).map_err(to_py_err)?;

    let mut rng = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };
    let result = simulator
        .run(&PyPredictor { callable: predictor }, &mut rng)
        .map_err(to_py_err)?;

    let bracket = result
        .state
        .iter()
        .map(|(coordinate, stats)| (coordinate.to_string(), stats.team_name.clone()))
        .collect();
    Ok((result.champion_name().to_string(), bracket))
}

/// Python module definition
#[pymodule]
fn bracket_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(simulate_bracket, m)?)?;
    m.add("REGION_MERGE_ROUND", REGION_MERGE_ROUND)?;
    Ok(())
}
