//! Response envelope shared by every REST endpoint.

use serde::{Deserialize, Serialize};

/// `{ "success": true, "count": 3, "data": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    /// Total number of records for list endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: T,
}

impl<T> ApiEnvelope<Vec<T>> {
    /// Record count, falling back to the length of `data` when the API
    /// omitted `count`.
    #[must_use]
    pub fn total(&self) -> usize {
        self.count.unwrap_or(self.data.len())
    }
}
