/// Preliminary ("First Four") round; winners keep the away slot index
pub const PLAY_IN_ROUND: u32 = 0;

/// First regular round (round of 64 in a 68 team bracket)
pub const FIRST_ROUND: u32 = 1;

/// Last round in which a winner stays inside its region
pub const LAST_REGIONAL_ROUND: u32 = 4;

/// Round at which regions merge pairwise (Final Four)
pub const REGION_MERGE_ROUND: u32 = 5;

/// Probability-vector slot holding "left side wins"
pub const LEFT_WINS: usize = 0;

/// Probability-vector slot holding "right side wins"
pub const RIGHT_WINS: usize = 1;

/// National average scoring (points per 100 possessions)
pub const AVG_SCORING: f64 = 104.6;

/// National average tempo (possessions per game)
pub const AVG_TEMPO: f64 = 67.7;

/// Standard deviation of scoring margin
pub const SCORING_STDDEV: f64 = 11.0;

/// Human readable name of a round in a 68 team bracket
pub fn round_name(round: u32) -> &'static str {
    match round {
        0 => "First Four",
        1 => "Round of 64",
        2 => "Round of 32",
        3 => "Sweet 16",
        4 => "Elite 8",
        5 => "Final Four",
        6 => "Championship",
        _ => "Champion",
    }
}
