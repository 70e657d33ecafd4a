use std::path::PathBuf;

use bracket_core::{
    load_template, render, run_simulations, BracketConfig, BracketError, InMemoryStatsProvider,
    SeasonStats, TeamCoordinate, Topology, TournamentSimulator,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn data_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(file)
}

fn load_config() -> BracketConfig {
    BracketConfig::from_path(data_path("bracket-2018.toml")).unwrap()
}

/// Ratings that strictly decrease down the seed list, so the first seeded
/// team beats everyone.
fn ranked_stats(config: &BracketConfig) -> InMemoryStatsProvider {
    let mut provider = InMemoryStatsProvider::new();
    let n = config.seeds.len() as f64;
    for (i, seed) in config.seeds.iter().enumerate() {
        let strength = (n - i as f64) / n;
        provider.insert(SeasonStats::new(
            config.year,
            seed.team.clone(),
            vec![0.1 * strength, -0.05 * strength, 62.0 + (i % 8) as f64],
        ));
    }
    provider
}

fn seeded_simulator(config: &BracketConfig, topology: Topology) -> TournamentSimulator {
    let template = config.template.clone().unwrap();
    let games = load_template(template).unwrap();
    let mut simulator = TournamentSimulator::new(games, topology);
    simulator
        .seed(config.year, &config.seeds, &ranked_stats(config))
        .unwrap();
    simulator
}

#[test]
fn test_config_describes_68_teams() {
    let config = load_config();
    assert_eq!(config.year, 2018);
    assert_eq!(config.seeds.len(), 68);
    assert_eq!(config.topology(), Topology::new(6).unwrap());

    let template = config.template.clone().unwrap();
    assert!(template.is_absolute() || template.starts_with(env!("CARGO_MANIFEST_DIR")));
    assert_eq!(load_template(template).unwrap().len(), 67);
}

#[test]
fn test_full_bracket_produces_single_champion() {
    let config = load_config();
    let mut simulator = seeded_simulator(&config, config.topology());
    let mut rng = ChaCha8Rng::seed_from_u64(2018);

    let result = simulator
        .run(&config.efficiency_predictor(), &mut rng)
        .unwrap();

    assert_eq!(result.games.len(), 67);
    assert_eq!(result.state.len(), 68 + 67);
    assert_eq!(result.champion, TeamCoordinate::new(0, 7, 0));
    assert_eq!(result.champion_name(), "NC Central");
    assert_eq!(result.tie_breaks(), 0);

    let per_round: Vec<usize> = result.rounds().values().map(|games| games.len()).collect();
    assert_eq!(per_round, vec![4, 32, 16, 8, 4, 2, 1]);

    // First Four winners land on the away slot of round 1
    assert!(result.state.contains(&TeamCoordinate::new(2, 1, 9)));
    assert!(result.state.contains(&TeamCoordinate::new(1, 1, 1)));
}

#[test]
fn test_default_topology_stops_after_final_four() {
    let config = load_config();
    let mut simulator = seeded_simulator(&config, Topology::default());
    let mut rng = ChaCha8Rng::seed_from_u64(2018);

    let err = simulator
        .run(&config.efficiency_predictor(), &mut rng)
        .unwrap_err();
    assert!(matches!(err, BracketError::BracketDepthExceeded { round: 6 }));
}

#[test]
fn test_batch_and_display() {
    let config = load_config();
    let simulator = seeded_simulator(&config, config.topology());
    let predictor = config.efficiency_predictor();

    let summary = run_simulations(&simulator, &predictor, 16, Some(3)).unwrap();
    assert_eq!(summary.runs, 16);
    assert_eq!(summary.champion_counts.get("NC Central"), Some(&16));
    assert_eq!(summary.furthest_round["NC Central"][7], 16);

    let mut single = simulator.clone();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let result = single.run(&predictor, &mut rng).unwrap();

    let display = "Final Four: [0,5,0] / [1,5,0] / [2,5,0] / [3,5,0]\nChampion: [0,7,0]";
    let rendered = render(display, &result.state).unwrap();
    assert!(rendered.ends_with("Champion: NC Central"));
    assert!(!rendered.contains('['));
}
