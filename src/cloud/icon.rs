//! Icon Assigner: cycles a fixed pool of asset references by input position.

use crate::error::CloudError;

/// Non-empty, ordered pool of external icon references.
#[derive(Debug, Clone)]
pub struct IconPool {
    refs: Vec<String>,
}

impl IconPool {
    /// Fails fast on an empty pool: there is no sensible icon to wrap to.
    pub fn new(refs: Vec<String>) -> Result<Self, CloudError> {
        if refs.is_empty() {
            return Err(CloudError::EmptyIconPool);
        }
        Ok(Self { refs })
    }

    /// Icon for the item at `index` in input order. Purely positional:
    /// rank and count play no part.
    pub fn icon_for(&self, index: usize) -> &str {
        &self.refs[index % self.refs.len()]
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}
