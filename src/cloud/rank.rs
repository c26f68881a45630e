//! Rank Assigner: 1-based popularity rank per label.
//!
//! Two explicit passes:
//!   1. stable-sort the distinct labels by count, descending
//!      (equal counts keep input order)
//!   2. freeze a label → rank map, consulted read-only afterwards
//!
//! O(n log n) per batch. Never run per frame.

use std::collections::{HashMap, HashSet};

use super::frequency::fold;

/// Immutable label → rank map for one batch.
#[derive(Debug, Clone, Default)]
pub struct RankTable {
    ranks: HashMap<String, u32>,
}

impl RankTable {
    /// Rank `(label, count)` pairs given in input order.
    ///
    /// Labels repeated case-insensitively collapse onto their first
    /// occurrence, so the ranks over distinct labels are exactly `1..=d`.
    pub fn assign<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut seen = HashSet::new();
        let mut distinct: Vec<(String, u32)> = Vec::new();
        for (label, count) in entries {
            let key = fold(label);
            if seen.insert(key.clone()) {
                distinct.push((key, count));
            }
        }

        // slice::sort_by is stable: ties stay in first-appearance order
        distinct.sort_by(|a, b| b.1.cmp(&a.1));

        let ranks = distinct
            .into_iter()
            .enumerate()
            .map(|(i, (key, _))| (key, i as u32 + 1))
            .collect();

        Self { ranks }
    }

    /// Rank of `label` (case-insensitive), if it was part of the batch.
    pub fn rank_of(&self, label: &str) -> Option<u32> {
        self.ranks.get(&fold(label)).copied()
    }

    /// Number of distinct labels ranked.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}
