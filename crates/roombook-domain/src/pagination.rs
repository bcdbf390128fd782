//! Limit/offset pagination for list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination window for audit-log and other list reads.
///
/// - `limit`: 1–500, default 100
/// - `offset`: ≥ 0, default 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    100
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl PageQuery {
    /// Clamp `limit` to the valid range 1–500.
    ///
    /// Call after deserializing from query params to enforce bounds.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, 500),
            offset: self.offset,
        }
    }
}
