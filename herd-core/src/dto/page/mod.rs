//! Listing page DTOs

use serde::{Deserialize, Serialize};

/// One entry of a listing page; only the id is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageItem {
    pub id: i64,
}

/// Response envelope of `GET /v1/listing?page={n}`
///
/// An empty `items` sequence marks the end of the data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub items: Vec<PageItem>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub has_more: Option<bool>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Record ids in page order
    pub fn ids(&self) -> Vec<i64> {
        self.items.iter().map(|item| item.id).collect()
    }
}
