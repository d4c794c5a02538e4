//! World buff eligibility rule.
//!
//! Attendance counts as prepared when a player brings at least three
//! distinct world buffs, or the minimum-effort pair of Rallying Cry of the
//! Dragonslayer plus Dire Maul Tribute. Unknown buff data never qualifies.

use crate::buffs::{WorldBuff, WorldBuffSet};
use crate::constants::MIN_DISTINCT_WORLD_BUFFS;

/// The pair that qualifies on its own
pub const BASELINE_PAIR: [WorldBuff; 2] = [
    WorldBuff::RallyingCryOfTheDragonslayer,
    WorldBuff::DireMaulTribute,
];

/// Apply the eligibility rule to a buff set; `None` means "could not be determined"
pub fn world_buffs_acceptable(world_buffs: Option<&WorldBuffSet>) -> bool {
    let Some(buffs) = world_buffs else {
        return false;
    };

    if buffs.len() >= MIN_DISTINCT_WORLD_BUFFS {
        return true;
    }

    BASELINE_PAIR.iter().all(|buff| buffs.contains(buff))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(buffs: &[WorldBuff]) -> WorldBuffSet {
        buffs.iter().copied().collect()
    }

    #[test]
    fn test_unknown_buffs_fail_closed() {
        assert!(!world_buffs_acceptable(None));
    }

    #[test]
    fn test_empty_set_is_not_acceptable() {
        assert!(!world_buffs_acceptable(Some(&WorldBuffSet::new())));
    }

    #[test]
    fn test_baseline_pair_is_acceptable() {
        let buffs = set(&BASELINE_PAIR);
        assert!(world_buffs_acceptable(Some(&buffs)));
    }

    #[test]
    fn test_half_of_pair_is_not_acceptable() {
        for buff in BASELINE_PAIR {
            assert!(!world_buffs_acceptable(Some(&set(&[buff]))));
            assert!(!world_buffs_acceptable(Some(&set(&[
                buff,
                WorldBuff::SongflowerSerenade
            ]))));
        }
    }

    #[test]
    fn test_two_buffs_without_pair_are_not_acceptable() {
        let buffs = set(&[WorldBuff::SpiritOfZandalar, WorldBuff::WarchiefsBlessing]);
        assert!(!world_buffs_acceptable(Some(&buffs)));
    }

    #[test]
    fn test_three_buffs_without_pair_are_acceptable() {
        let buffs = set(&[
            WorldBuff::SpiritOfZandalar,
            WorldBuff::SongflowerSerenade,
            WorldBuff::WarchiefsBlessing,
        ]);
        assert!(world_buffs_acceptable(Some(&buffs)));
    }

    #[test]
    fn test_rule_over_every_subset() {
        // Exhaustive over all 2^6 subsets of known buffs
        for mask in 0u32..(1 << WorldBuff::ALL.len()) {
            let buffs: WorldBuffSet = WorldBuff::ALL
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, b)| *b)
                .collect();
            let has_pair = BASELINE_PAIR.iter().all(|b| buffs.contains(b));
            let expected = buffs.len() >= 3 || has_pair;
            assert_eq!(
                world_buffs_acceptable(Some(&buffs)),
                expected,
                "subset {:?}",
                buffs
            );
        }
    }
}
