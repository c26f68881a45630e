//! Interest batch → ranked `LabelItem`s.
//!
//! Pipeline (runs once per batch, never per frame):
//!   `InterestBatch` → `FrequencyTable` → `RankTable` + `IconPool` → `CloudData`
//!
//! `CloudCache` memoizes the result on the identity of the batch handle,
//! so a host can call it every frame and only pay for a rebuild when a new
//! batch arrives.

pub mod frequency;
pub mod icon;
pub mod rank;

use std::collections::BTreeMap;
use std::env;
use std::path::Path;
use std::rc::Rc;

use serde::Deserialize;

use crate::error::CloudError;
use frequency::FrequencyTable;
use icon::IconPool;
use rank::RankTable;

/// Environment variable naming an optional JSON data file.
pub const DATA_ENV: &str = "INTEREST_CLOUD_DATA";

/// Sample batch shipped with the crate.
const BUNDLED_BATCH: &str = include_str!("../../assets/interests.json");

// ── Input contract ──

/// One input record. Only the label matters; order is significant.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct InterestRecord {
    pub label: String,
}

/// Raw input for one cloud: ordered records, a frequency table and an
/// ordered icon pool.
#[derive(Debug, Clone, Deserialize)]
pub struct InterestBatch {
    pub items: Vec<InterestRecord>,
    #[serde(default)]
    pub frequencies: BTreeMap<String, u32>,
    pub icons: Vec<String>,
}

impl InterestBatch {
    pub fn new<L: Into<String>>(
        labels: impl IntoIterator<Item = L>,
        frequencies: impl IntoIterator<Item = (L, u32)>,
        icons: impl IntoIterator<Item = L>,
    ) -> Self {
        Self {
            items: labels
                .into_iter()
                .map(|l| InterestRecord { label: l.into() })
                .collect(),
            frequencies: frequencies.into_iter().map(|(l, c)| (l.into(), c)).collect(),
            icons: icons.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, CloudError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, CloudError> {
        let text = std::fs::read_to_string(path).map_err(|source| CloudError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// The sample batch compiled into the crate.
    pub fn bundled() -> Result<Self, CloudError> {
        Self::from_json_str(BUNDLED_BATCH)
    }

    /// Load from the file named by `INTEREST_CLOUD_DATA`, or the bundled sample.
    pub fn load() -> Result<Self, CloudError> {
        match env::var(DATA_ENV) {
            Ok(path) => {
                log::info!("Loading interests from {path}");
                Self::from_path(Path::new(&path))
            }
            Err(_) => {
                log::info!("{DATA_ENV} not set, using bundled sample");
                Self::bundled()
            }
        }
    }
}

// ── Derived items ──

/// A ranked, icon-tagged item. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelItem {
    pub label: String,
    pub count: u32,
    /// 1 = most popular
    pub rank: u32,
    pub icon: String,
}

/// Everything derived from one batch, in input order.
#[derive(Debug, Clone)]
pub struct CloudData {
    items: Vec<LabelItem>,
    /// Item indices by descending count, ties in rank order
    list_order: Vec<usize>,
    count_range: Option<(u32, u32)>,
}

impl CloudData {
    /// Resolve counts, ranks and icons for a batch.
    pub fn build(batch: &InterestBatch) -> Result<Self, CloudError> {
        let pool = IconPool::new(batch.icons.clone())?;
        let table = FrequencyTable::from_entries(
            batch.frequencies.iter().map(|(label, &count)| (label, count)),
        );

        let counts: Vec<u32> = batch
            .items
            .iter()
            .map(|r| table.resolve(&r.label))
            .collect();

        let ranks = RankTable::assign(
            batch
                .items
                .iter()
                .zip(&counts)
                .map(|(r, &c)| (r.label.as_str(), c)),
        );

        let fallback_rank = ranks.len() as u32;
        let items: Vec<LabelItem> = batch
            .items
            .iter()
            .zip(counts)
            .enumerate()
            .map(|(i, (record, count))| LabelItem {
                label: record.label.clone(),
                count,
                // every batch label went through RankTable::assign above
                rank: ranks.rank_of(&record.label).unwrap_or(fallback_rank),
                icon: pool.icon_for(i).to_string(),
            })
            .collect();

        let mut list_order: Vec<usize> = (0..items.len()).collect();
        list_order.sort_by_key(|&i| items[i].rank);

        let count_range = items
            .iter()
            .map(|it| it.count)
            .fold(None, |acc: Option<(u32, u32)>, c| match acc {
                None => Some((c, c)),
                Some((lo, hi)) => Some((lo.min(c), hi.max(c))),
            });

        log::debug!(
            "Built cloud: {} items, {} distinct, {} frequency entries, {} icons, counts {:?}",
            items.len(),
            ranks.len(),
            table.len(),
            pool.len(),
            count_range
        );

        Ok(Self {
            items,
            list_order,
            count_range,
        })
    }

    pub fn items(&self) -> &[LabelItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&LabelItem> {
        self.items.get(index)
    }

    /// Indices into `items()` in flat-list order.
    pub fn list_order(&self) -> &[usize] {
        &self.list_order
    }

    /// `(min_count, max_count)` over all items, `None` when empty.
    pub fn count_range(&self) -> Option<(u32, u32)> {
        self.count_range
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ── Memoization ──

/// Rebuilds `CloudData` only when handed a different batch handle.
#[derive(Debug, Default)]
pub struct CloudCache {
    source: Option<Rc<InterestBatch>>,
    data: Option<Rc<CloudData>>,
    builds: usize,
}

impl CloudCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached data for `batch`. Identity is the `Rc` allocation, not the
    /// contents: an equal but freshly allocated batch triggers a rebuild.
    pub fn resolve(&mut self, batch: &Rc<InterestBatch>) -> Result<Rc<CloudData>, CloudError> {
        if let (Some(src), Some(data)) = (&self.source, &self.data) {
            if Rc::ptr_eq(src, batch) {
                return Ok(Rc::clone(data));
            }
        }
        let data = Rc::new(CloudData::build(batch)?);
        self.source = Some(Rc::clone(batch));
        self.data = Some(Rc::clone(&data));
        self.builds += 1;
        Ok(data)
    }

    /// Whether the last resolved batch is `batch`.
    pub fn is_current(&self, batch: &Rc<InterestBatch>) -> bool {
        self.source.as_ref().is_some_and(|src| Rc::ptr_eq(src, batch))
    }

    /// Number of rebuilds performed so far.
    pub fn builds(&self) -> usize {
        self.builds
    }
}
