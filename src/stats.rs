use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{BracketError, BracketResult, NotFoundError};

/// One team's regular-season statistics as a fixed-order feature vector.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SeasonStats {
    pub year: u32,
    #[serde(rename = "name")]
    pub team_name: String,
    pub features: Vec<f64>,
}

impl SeasonStats {
    pub fn new(year: u32, team_name: impl Into<String>, features: Vec<f64>) -> Self {
        SeasonStats {
            year,
            team_name: team_name.into(),
            features,
        }
    }
}

/// Source of season statistics keyed by `(year, team name)`.
pub trait StatsProvider {
    fn fetch(&self, year: u32, team: &str) -> Result<SeasonStats, NotFoundError>;
}

/// Stats held in memory, filled programmatically or from a TOML table:
///
/// ```toml
/// [[team]]
/// year = 2018
/// name = "Virginia"
/// features = [0.12, -0.10, 60.0]
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryStatsProvider {
    stats: HashMap<(u32, String), SeasonStats>,
}

#[derive(Deserialize)]
struct StatsFile {
    #[serde(default, rename = "team")]
    teams: Vec<SeasonStats>,
}

impl InMemoryStatsProvider {
    pub fn new() -> Self {
        InMemoryStatsProvider {
            stats: HashMap::new(),
        }
    }

    /// Add or replace the stats for `(stats.year, stats.team_name)`.
    pub fn insert(&mut self, stats: SeasonStats) {
        self.stats.insert((stats.year, stats.team_name.clone()), stats);
    }

    pub fn from_toml_str(text: &str) -> BracketResult<Self> {
        let file: StatsFile = toml::from_str(text)?;
        let mut provider = InMemoryStatsProvider::new();
        for stats in file.teams {
            provider.insert(stats);
        }
        Ok(provider)
    }

    pub fn from_path(path: impl AsRef<Path>) -> BracketResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| BracketError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

impl StatsProvider for InMemoryStatsProvider {
    fn fetch(&self, year: u32, team: &str) -> Result<SeasonStats, NotFoundError> {
        self.stats
            .get(&(year, team.to_string()))
            .cloned()
            .ok_or_else(|| NotFoundError {
                year,
                team: team.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_by_year_and_name() {
        let mut provider = InMemoryStatsProvider::new();
        provider.insert(SeasonStats::new(2018, "Virginia", vec![0.1, -0.1, 60.0]));
        provider.insert(SeasonStats::new(2019, "Virginia", vec![0.2, -0.2, 59.0]));

        let stats = provider.fetch(2019, "Virginia").unwrap();
        assert_eq!(stats.features, vec![0.2, -0.2, 59.0]);
        assert_eq!(provider.len(), 2);
    }

    #[test]
    fn test_fetch_missing() {
        let provider = InMemoryStatsProvider::new();
        let err = provider.fetch(2018, "UMBC").unwrap_err();
        assert_eq!(err.year, 2018);
        assert_eq!(err.team, "UMBC");
    }

    #[test]
    fn test_from_toml_str() {
        let text = r#"
            [[team]]
            year = 2018
            name = "Virginia"
            features = [0.12, -0.10, 60.0]

            [[team]]
            year = 2018
            name = "UMBC"
            features = [-0.03, 0.04, 66.0]
        "#;
        let provider = InMemoryStatsProvider::from_toml_str(text).unwrap();
        assert_eq!(provider.len(), 2);
        assert_eq!(provider.fetch(2018, "UMBC").unwrap().team_name, "UMBC");
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let err = InMemoryStatsProvider::from_toml_str("[[team]]\nyear = \"x\"").unwrap_err();
        assert!(matches!(err, BracketError::Config(_)));
    }
}
