//! Pairwise overlap detection on a 24-hour circle.
//!
//! Intervals are half-open `[start, end)` in minutes since midnight. Each
//! comparison also tries the other interval shifted a day back and forward,
//! which catches overlaps across midnight from either side.

use crate::block::{BlockId, MINUTES_PER_DAY, TimeBlock, TimeInterval};
use serde::Serialize;

const DAY: i64 = MINUTES_PER_DAY as i64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub block_id: BlockId,
    pub conflicting_block_id: BlockId,
    pub overlap_minutes: u32,
}

/// Minutes shared by `a` and `b`, zero for adjacent or disjoint intervals.
pub fn overlap_minutes(a: &TimeInterval, b: &TimeInterval) -> u32 {
    let (a_start, a_end) = (a.start() as i64, a.end() as i64);
    [-DAY, 0, DAY]
        .into_iter()
        .map(|shift| {
            let (b_start, b_end) = (b.start() as i64 + shift, b.end() as i64 + shift);
            if a_start < b_end && b_start < a_end {
                a_end.min(b_end) - a_start.max(b_start)
            } else {
                0
            }
        })
        .sum::<i64>()
        .min(DAY) as u32
}

/// Conflicts of `target` against `others`. Invalid intervals and entries
/// sharing the target's id are skipped.
pub fn detect_conflicts<'a>(
    target_id: &BlockId,
    target: &TimeInterval,
    others: impl IntoIterator<Item = (&'a BlockId, &'a TimeInterval)>,
) -> Vec<Conflict> {
    if !target.is_valid() {
        return Vec::new();
    }

    others
        .into_iter()
        .filter(|(id, interval)| *id != target_id && interval.is_valid())
        .filter_map(|(id, interval)| {
            let overlap = overlap_minutes(target, interval);
            (overlap > 0).then(|| Conflict {
                block_id: target_id.clone(),
                conflicting_block_id: id.clone(),
                overlap_minutes: overlap,
            })
        })
        .collect()
}

/// Every conflict among `blocks`, reported once from each side.
pub fn detect_all(blocks: &[TimeBlock]) -> Vec<Conflict> {
    blocks
        .iter()
        .filter(|block| {
            if let Err(e) = block.interval.validate() {
                log::warn!("Skipping block '{}' in conflict detection: {}", block.id, e);
                return false;
            }
            true
        })
        .flat_map(|block| {
            detect_conflicts(
                &block.id,
                &block.interval,
                blocks.iter().map(|other| (&other.id, &other.interval)),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Category;
    use proptest::prelude::*;

    fn block(id: &str, hour: u32, minute: u32, duration: u32) -> TimeBlock {
        TimeBlock::new(id, Category::Growth, TimeInterval::new(hour, minute, duration))
    }

    #[test]
    fn test_partial_overlap() {
        let blocks = vec![block("a", 9, 0, 60), block("b", 9, 30, 30)];
        let conflicts = detect_all(&blocks);
        assert_eq!(
            conflicts,
            vec![
                Conflict {
                    block_id: BlockId::new("a"),
                    conflicting_block_id: BlockId::new("b"),
                    overlap_minutes: 30,
                },
                Conflict {
                    block_id: BlockId::new("b"),
                    conflicting_block_id: BlockId::new("a"),
                    overlap_minutes: 30,
                },
            ]
        );
    }

    #[test]
    fn test_adjacent_blocks_do_not_conflict() {
        let blocks = vec![block("a", 9, 0, 30), block("b", 9, 30, 30)];
        assert!(detect_all(&blocks).is_empty());
    }

    #[test]
    fn test_overlap_across_midnight() {
        let late = TimeInterval::new(23, 0, 120);
        let early = TimeInterval::new(0, 30, 60);
        assert_eq!(overlap_minutes(&late, &early), 30);
        assert_eq!(overlap_minutes(&early, &late), 30);
    }

    #[test]
    fn test_block_never_conflicts_with_itself() {
        let a = block("a", 9, 0, 60);
        let conflicts = detect_conflicts(&a.id, &a.interval, [(&a.id, &a.interval)]);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_invalid_blocks_are_excluded() {
        let blocks = vec![
            block("a", 9, 0, 60),
            block("zero", 9, 0, 0),
            block("bad-hour", 30, 0, 60),
        ];
        assert!(detect_all(&blocks).is_empty());
    }

    #[test]
    fn test_contained_interval() {
        let outer = TimeInterval::new(8, 0, 240);
        let inner = TimeInterval::new(9, 15, 20);
        assert_eq!(overlap_minutes(&outer, &inner), 20);
    }

    fn interval() -> impl Strategy<Value = TimeInterval> {
        (0u32..24, 0u32..60, 1u32..=1440).prop_map(|(h, m, d)| TimeInterval::new(h, m, d))
    }

    proptest! {
        #[test]
        fn prop_conflicts_are_symmetric(a in interval(), b in interval()) {
            let blocks = vec![
                TimeBlock::new("a", Category::Sleep, a),
                TimeBlock::new("b", Category::Sleep, b),
            ];
            let conflicts = detect_all(&blocks);
            let ab = conflicts.iter().find(|c| c.block_id.as_str() == "a");
            let ba = conflicts.iter().find(|c| c.block_id.as_str() == "b");
            match (ab, ba) {
                (Some(ab), Some(ba)) => {
                    prop_assert_eq!(ab.overlap_minutes, ba.overlap_minutes);
                    prop_assert_eq!(ab.conflicting_block_id.as_str(), "b");
                    prop_assert_eq!(ba.conflicting_block_id.as_str(), "a");
                }
                (None, None) => {}
                _ => prop_assert!(false, "asymmetric conflicts: {:?}", conflicts),
            }
        }

        #[test]
        fn prop_overlap_never_exceeds_shorter_interval(a in interval(), b in interval()) {
            let overlap = overlap_minutes(&a, &b);
            prop_assert!(overlap <= a.duration_minutes.min(b.duration_minutes));
        }
    }
}
