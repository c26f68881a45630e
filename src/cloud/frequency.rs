//! Frequency Resolver: label → occurrence count.

use std::collections::HashMap;

/// Count assumed for labels missing from the table. Never zero, so the
/// size/color mapping always has a well-defined input.
pub const DEFAULT_COUNT: u32 = 1;

/// Case-insensitive frequency lookup table.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: HashMap<String, u32>,
}

impl FrequencyTable {
    /// Build from `(label, count)` entries. Keys are folded to lowercase;
    /// when two entries fold to the same key the later one wins.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: AsRef<str>,
    {
        let mut counts = HashMap::new();
        for (label, count) in entries {
            let key = fold(label.as_ref());
            if let Some(prev) = counts.insert(key, count) {
                log::debug!(
                    "Frequency key '{}' repeated (case-insensitive), {} replaced by {}",
                    label.as_ref(),
                    prev,
                    count
                );
            }
        }
        Self { counts }
    }

    /// Occurrence count for `label`, or `DEFAULT_COUNT` when absent.
    pub fn resolve(&self, label: &str) -> u32 {
        self.counts.get(&fold(label)).copied().unwrap_or(DEFAULT_COUNT)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Case folding used for every label comparison in the crate.
#[inline]
pub fn fold(label: &str) -> String {
    label.to_lowercase()
}
