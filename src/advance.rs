use crate::constants::{FIRST_ROUND, LAST_REGIONAL_ROUND, PLAY_IN_ROUND, REGION_MERGE_ROUND};
use crate::coordinate::TeamCoordinate;
use crate::error::{BracketError, BracketResult};

/// Shape of the elimination tree above the regional rounds.
///
/// Rounds `REGION_MERGE_ROUND..=last_merge_round` pair regions up, halving
/// both the region and the slot index. The default stops merging after the
/// Final Four; a 68 team bracket whose championship game is played in round 6
/// uses `last_merge_round = 6`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Topology {
    pub last_merge_round: u32,
}

impl Default for Topology {
    fn default() -> Self {
        Topology {
            last_merge_round: REGION_MERGE_ROUND,
        }
    }
}

impl Topology {
    /// Fails when `last_merge_round` is before [`REGION_MERGE_ROUND`].
    pub fn new(last_merge_round: u32) -> BracketResult<Self> {
        if last_merge_round < REGION_MERGE_ROUND {
            return Err(BracketError::InvalidTopology {
                last_merge_round,
                merge_round: REGION_MERGE_ROUND,
            });
        }
        Ok(Topology { last_merge_round })
    }

    /// Coordinate the winner of `home` vs `away` occupies in the next round.
    ///
    /// Only the round arithmetic is done here; the caller attaches the winner.
    /// Teams from different regions may only meet in the merge rounds.
    pub fn next_coordinate(
        &self,
        home: &TeamCoordinate,
        away: &TeamCoordinate,
    ) -> BracketResult<TeamCoordinate> {
        let (region, index) = match home.round {
            round if round <= LAST_REGIONAL_ROUND && home.region != away.region => {
                return Err(BracketError::RegionMismatch {
                    home: home.clone(),
                    away: away.clone(),
                })
            }
            PLAY_IN_ROUND => (home.region, away.index),
            FIRST_ROUND..=LAST_REGIONAL_ROUND => (home.region, home.index / 2),
            round if (REGION_MERGE_ROUND..=self.last_merge_round).contains(&round) => {
                (home.region / 2, home.index / 2)
            }
            round => return Err(BracketError::BracketDepthExceeded { round }),
        };
        Ok(TeamCoordinate::new(region, home.round + 1, index))
    }
}

/// [`Topology::next_coordinate`] with the default topology.
pub fn next_coordinate(home: &TeamCoordinate, away: &TeamCoordinate) -> BracketResult<TeamCoordinate> {
    Topology::default().next_coordinate(home, away)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn coord(region: u32, round: u32, index: u32) -> TeamCoordinate {
        TeamCoordinate::new(region, round, index)
    }

    fn key(c: &TeamCoordinate) -> (u32, u32, u32) {
        (c.region, c.round, c.index)
    }

    #[test]
    fn test_play_in_uses_away_index() {
        let next = next_coordinate(&coord(0, 0, 5), &coord(0, 0, 9)).unwrap();
        assert_eq!(key(&next), (0, 1, 9));
    }

    #[test]
    fn test_regional_rounds_halve_index() {
        let next = next_coordinate(&coord(2, 3, 5), &coord(2, 3, 4)).unwrap();
        assert_eq!(key(&next), (2, 4, 2));

        for round in 1..=4 {
            let next = next_coordinate(&coord(3, round, 7), &coord(3, round, 6)).unwrap();
            assert_eq!(key(&next), (3, round + 1, 3));
        }
    }

    #[test]
    fn test_merge_round_halves_region() {
        let next = next_coordinate(&coord(3, 5, 4), &coord(2, 5, 4)).unwrap();
        assert_eq!(key(&next), (1, 6, 2));
    }

    #[test]
    fn test_depth_exceeded() {
        let err = next_coordinate(&coord(0, 6, 0), &coord(1, 6, 0)).unwrap_err();
        assert!(matches!(err, BracketError::BracketDepthExceeded { round: 6 }));
    }

    #[test]
    fn test_extended_topology_merges_championship() {
        let topology = Topology::new(6).unwrap();
        let next = topology.next_coordinate(&coord(0, 6, 0), &coord(1, 6, 0)).unwrap();
        assert_eq!(key(&next), (0, 7, 0));

        let err = topology.next_coordinate(&coord(0, 7, 0), &coord(1, 7, 0)).unwrap_err();
        assert!(matches!(err, BracketError::BracketDepthExceeded { round: 7 }));
    }

    #[test]
    fn test_cross_region_game_before_merge() {
        for round in 0..=4 {
            let err = next_coordinate(&coord(0, round, 0), &coord(1, round, 1)).unwrap_err();
            assert!(matches!(err, BracketError::RegionMismatch { .. }));
            assert!(err.is_topology_error());
        }
    }

    #[test]
    fn test_topology_rejects_early_merge() {
        let err = Topology::new(2).unwrap_err();
        assert!(matches!(
            err,
            BracketError::InvalidTopology { last_merge_round: 2, merge_round: 5 }
        ));
        assert_eq!(Topology::new(5).unwrap(), Topology::default());
    }

    #[test]
    fn test_next_coordinate_has_no_name() {
        let home = coord(0, 1, 0).with_name("Virginia");
        let away = coord(0, 1, 1).with_name("UMBC");
        assert!(next_coordinate(&home, &away).unwrap().name.is_none());
    }

    proptest! {
        #[test]
        fn prop_next_coordinate_is_deterministic(
            region in 0u32..8,
            round in 0u32..6,
            home_index in 0u32..64,
            away_index in 0u32..64,
        ) {
            let home = coord(region, round, home_index);
            let away = coord(region, round, away_index);
            let first = next_coordinate(&home, &away).unwrap();
            let second = next_coordinate(&home, &away).unwrap();
            prop_assert_eq!(key(&first), key(&second));
            prop_assert_eq!(first.round, round + 1);
        }
    }
}
