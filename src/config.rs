//! Declarative bracket definitions.
//!
//! A tournament year is described entirely by data: the template holding the
//! game order, the seed tuples placing teams on their starting coordinates and
//! the topology. One generic simulator interprets any of them.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::advance::Topology;
use crate::constants::REGION_MERGE_ROUND;
use crate::coordinate::TeamCoordinate;
use crate::error::{BracketError, BracketResult};
use crate::predictor::EfficiencyPredictor;

/// A team placed on its starting coordinate.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SeedEntry {
    pub region: u32,
    pub round: u32,
    pub index: u32,
    pub team: String,
}

impl SeedEntry {
    pub fn new(region: u32, round: u32, index: u32, team: impl Into<String>) -> Self {
        SeedEntry {
            region,
            round,
            index,
            team: team.into(),
        }
    }

    pub fn coordinate(&self) -> TeamCoordinate {
        TeamCoordinate::new(self.region, self.round, self.index).with_name(&self.team)
    }
}

/// Feature layout for the built-in [`EfficiencyPredictor`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PredictorConfig {
    pub width: usize,
    pub offense: usize,
    pub defense: usize,
    pub tempo: usize,
}

impl From<&PredictorConfig> for EfficiencyPredictor {
    fn from(config: &PredictorConfig) -> Self {
        EfficiencyPredictor {
            width: config.width,
            offense: config.offense,
            defense: config.defense,
            tempo: config.tempo,
        }
    }
}

fn default_last_merge_round() -> u32 {
    REGION_MERGE_ROUND
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BracketConfig {
    /// Season whose statistics are used for every team
    pub year: u32,

    /// Template file; relative paths resolve against the config file
    #[serde(default)]
    pub template: Option<PathBuf>,

    #[serde(default = "default_last_merge_round")]
    pub last_merge_round: u32,

    #[serde(default)]
    pub predictor: Option<PredictorConfig>,

    #[serde(default, rename = "seed")]
    pub seeds: Vec<SeedEntry>,
}

impl BracketConfig {
    /// Parse a config, rejecting a `last_merge_round` before the region merge.
    pub fn from_toml_str(text: &str) -> BracketResult<Self> {
        let config: BracketConfig = toml::from_str(text)?;
        Topology::new(config.last_merge_round)?;
        Ok(config)
    }

    /// Load a config file, resolving a relative template path against the
    /// file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> BracketResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| BracketError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;

        if let (Some(template), Some(dir)) = (&config.template, path.parent()) {
            if template.is_relative() {
                config.template = Some(dir.join(template));
            }
        }
        Ok(config)
    }

    pub fn topology(&self) -> Topology {
        Topology {
            last_merge_round: self.last_merge_round,
        }
    }

    pub fn efficiency_predictor(&self) -> EfficiencyPredictor {
        self.predictor
            .as_ref()
            .map(EfficiencyPredictor::from)
            .unwrap_or_default()
    }
}
