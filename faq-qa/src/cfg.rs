//! Answering knobs.

use crate::error::QaError;

pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_LIST_LIMIT: usize = 10_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QaConfig {
    /// top-K used when a request does not carry one.
    pub default_top_k: usize,
    /// Cap on records returned by listing.
    pub list_limit: usize,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            default_top_k: DEFAULT_TOP_K,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl QaConfig {
    pub fn validate(&self) -> Result<(), QaError> {
        if self.default_top_k == 0 {
            return Err(QaError::InvalidTopK);
        }
        if self.list_limit == 0 {
            return Err(QaError::Build("list_limit must be > 0".into()));
        }
        Ok(())
    }
}
