//! Stock identifier type.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Exchange-qualified stock code, e.g. `000001.SZ`.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into, Serialize, Deserialize,
)]
pub struct StockCode(pub String);

impl StockCode {
    /// Create a new stock code.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exchange suffix (`SZ`, `SH`, ...), if the code carries one.
    #[must_use]
    pub fn exchange(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(_, ex)| ex)
    }
}

impl From<&str> for StockCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
