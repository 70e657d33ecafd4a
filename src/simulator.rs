use std::collections::{BTreeMap, HashMap};
use std::fmt;

use log::{debug, error, info};
use rand::Rng;

use crate::advance::Topology;
use crate::config::SeedEntry;
use crate::constants::round_name;
use crate::coordinate::{GameCoordinate, TeamCoordinate};
use crate::error::{BracketError, BracketResult};
use crate::evaluator::{evaluate, MatchupOutcome, Side};
use crate::predictor::Predictor;
use crate::stats::{SeasonStats, StatsProvider};

/// Which team occupies each coordinate reached so far.
///
/// Entries are only ever added; every slot in the bracket is filled exactly
/// once per run.
#[derive(Clone, Debug, Default)]
pub struct BracketState {
    occupants: HashMap<TeamCoordinate, SeasonStats>,
}

impl BracketState {
    pub fn new() -> Self {
        BracketState {
            occupants: HashMap::new(),
        }
    }

    /// Place a team on a coordinate. The key takes the team's name when it
    /// has none.
    pub fn insert(&mut self, coordinate: TeamCoordinate, stats: SeasonStats) -> BracketResult<()> {
        if let Some(existing) = self.occupants.get(&coordinate) {
            return Err(BracketError::DuplicateCoordinate {
                coordinate,
                existing: existing.team_name.clone(),
                incoming: stats.team_name,
            });
        }
        let coordinate = match coordinate.name {
            Some(_) => coordinate,
            None => coordinate.with_name(&stats.team_name),
        };
        self.occupants.insert(coordinate, stats);
        Ok(())
    }

    pub fn occupant(&self, coordinate: &TeamCoordinate) -> BracketResult<&SeasonStats> {
        self.occupants
            .get(coordinate)
            .ok_or_else(|| BracketError::MissingOccupant {
                coordinate: coordinate.clone(),
            })
    }

    /// The stored (named) key and stats for a coordinate.
    pub fn get(&self, coordinate: &TeamCoordinate) -> Option<(&TeamCoordinate, &SeasonStats)> {
        self.occupants.get_key_value(coordinate)
    }

    pub fn team_name(&self, coordinate: &TeamCoordinate) -> Option<&str> {
        self.occupants.get(coordinate).map(|stats| stats.team_name.as_str())
    }

    pub fn contains(&self, coordinate: &TeamCoordinate) -> bool {
        self.occupants.contains_key(coordinate)
    }

    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TeamCoordinate, &SeasonStats)> {
        self.occupants.iter()
    }

    pub fn max_round(&self) -> Option<u32> {
        self.occupants.keys().map(|c| c.round).max()
    }

    /// The single occupant of the deepest round reached.
    pub fn champion(&self) -> BracketResult<(&TeamCoordinate, &SeasonStats)> {
        let round = self.max_round().ok_or(BracketError::EmptyBracket)?;
        let mut finalists = self.occupants.iter().filter(|(c, _)| c.round == round);

        match (finalists.next(), finalists.count()) {
            (Some(champion), 0) => Ok(champion),
            (_, others) => Err(BracketError::AmbiguousChampion {
                round,
                count: others + 1,
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationPhase {
    Created,
    Seeded,
    InProgress,
    Completed,
    Failed,
}

impl SimulationPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            SimulationPhase::Created => "created",
            SimulationPhase::Seeded => "seeded",
            SimulationPhase::InProgress => "in progress",
            SimulationPhase::Completed => "completed",
            SimulationPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for SimulationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One processed game.
#[derive(Clone, Debug, PartialEq)]
pub struct GameResult {
    /// The game with both sides named
    pub game: GameCoordinate,
    pub outcome: MatchupOutcome,
    /// Where the winner was placed
    pub advanced_to: TeamCoordinate,
}

impl GameResult {
    pub fn round(&self) -> u32 {
        self.game.home.round
    }

    pub fn winner_name(&self) -> &str {
        self.advanced_to.name().unwrap_or_default()
    }

    pub fn loser_name(&self) -> &str {
        let loser = match self.outcome.winner_side {
            Side::Home => &self.game.away,
            Side::Away => &self.game.home,
        };
        loser.name().unwrap_or_default()
    }
}

#[derive(Clone, Debug)]
pub struct TournamentResult {
    pub champion: TeamCoordinate,
    pub state: BracketState,
    pub games: Vec<GameResult>,
}

impl TournamentResult {
    pub fn champion_name(&self) -> &str {
        self.champion.name().unwrap_or_default()
    }

    /// Game records grouped by the round they were played in.
    pub fn rounds(&self) -> BTreeMap<u32, Vec<&GameResult>> {
        let mut rounds: BTreeMap<u32, Vec<&GameResult>> = BTreeMap::new();
        for game in &self.games {
            rounds.entry(game.round()).or_default().push(game);
        }
        rounds
    }

    pub fn tie_breaks(&self) -> usize {
        self.games.iter().filter(|g| g.outcome.tie_broken).count()
    }
}

/// Plays a bracket: seeds the starting coordinates, then resolves every game
/// in template order and advances each winner.
///
/// Phases: `Created` → `Seeded` → `InProgress` → `Completed` or `Failed`.
#[derive(Clone, Debug)]
pub struct TournamentSimulator {
    games: Vec<GameCoordinate>,
    topology: Topology,
    state: BracketState,
    phase: SimulationPhase,
}

impl TournamentSimulator {
    pub fn new(games: Vec<GameCoordinate>, topology: Topology) -> Self {
        TournamentSimulator {
            games,
            topology,
            state: BracketState::new(),
            phase: SimulationPhase::Created,
        }
    }

    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    pub fn state(&self) -> &BracketState {
        &self.state
    }

    pub fn games(&self) -> &[GameCoordinate] {
        &self.games
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    fn expect_phase(&self, allowed: &[SimulationPhase], expected: &'static str) -> BracketResult<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(BracketError::InvalidPhase {
                expected,
                actual: self.phase.as_str(),
            })
        }
    }

    /// Place a team whose stats are already at hand.
    ///
    /// A rejected placement leaves the simulator `Failed`.
    pub fn seed_with_stats(&mut self, coordinate: TeamCoordinate, stats: SeasonStats) -> BracketResult<()> {
        self.expect_phase(&[SimulationPhase::Created, SimulationPhase::Seeded], "created or seeded")?;
        if let Err(e) = self.state.insert(coordinate, stats) {
            self.phase = SimulationPhase::Failed;
            return Err(e);
        }
        self.phase = SimulationPhase::Seeded;
        Ok(())
    }

    /// Fetch each seeded team's stats for `year` and place it.
    ///
    /// A team without stats leaves the simulator `Failed`, so a partially
    /// seeded bracket is never run.
    pub fn seed<S>(&mut self, year: u32, seeds: &[SeedEntry], provider: &S) -> BracketResult<()>
    where
        S: StatsProvider + ?Sized,
    {
        for entry in seeds {
            let stats = match provider.fetch(year, &entry.team) {
                Ok(stats) => stats,
                Err(e) => {
                    error!("Cannot seed {}: {}", entry.coordinate(), e);
                    self.phase = SimulationPhase::Failed;
                    return Err(e.into());
                }
            };
            self.seed_with_stats(entry.coordinate(), stats)?;
        }
        info!("Seeded {} teams for {} ({} games)", seeds.len(), year, self.games.len());
        Ok(())
    }

    /// Play every game and return the champion with the full bracket.
    pub fn run<P, R>(&mut self, predictor: &P, rng: &mut R) -> BracketResult<TournamentResult>
    where
        P: Predictor + ?Sized,
        R: Rng + ?Sized,
    {
        self.expect_phase(&[SimulationPhase::Seeded], "seeded")?;
        self.phase = SimulationPhase::InProgress;

        match self.play(predictor, rng) {
            Ok(result) => {
                self.phase = SimulationPhase::Completed;
                Ok(result)
            }
            Err(e) => {
                error!("Tournament simulation failed: {}", e);
                self.phase = SimulationPhase::Failed;
                Err(e)
            }
        }
    }

    fn play<P, R>(&mut self, predictor: &P, rng: &mut R) -> BracketResult<TournamentResult>
    where
        P: Predictor + ?Sized,
        R: Rng + ?Sized,
    {
        let mut records = Vec::with_capacity(self.games.len());

        for game in &self.games {
            let home = self.state.occupant(&game.home)?.clone();
            let away = self.state.occupant(&game.away)?.clone();

            let outcome = evaluate(game, &home, &away, predictor, rng)?;
            let next = self.topology.next_coordinate(&game.home, &game.away)?;

            let named_game = GameCoordinate::new(
                game.home.with_name(&home.team_name),
                game.away.with_name(&away.team_name),
            );
            let winner = match outcome.winner_side {
                Side::Home => home,
                Side::Away => away,
            };
            let advanced_to = next.with_name(&winner.team_name);

            debug!(
                "{}: {} advances to {}",
                round_name(game.home.round),
                winner.team_name,
                advanced_to
            );
            self.state.insert(advanced_to.clone(), winner)?;

            records.push(GameResult {
                game: named_game,
                outcome,
                advanced_to,
            });
        }

        let champion = self.state.champion()?.0.clone();
        info!(
            "Champion: {} {}",
            champion.name().unwrap_or_default(),
            champion
        );

        Ok(TournamentResult {
            champion,
            state: self.state.clone(),
            games: records,
        })
    }
}
