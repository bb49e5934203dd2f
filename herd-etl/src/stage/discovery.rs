//! Id discovery
//!
//! Paginates the listing endpoint from page 1 until the source answers with
//! an empty page (or not at all), accumulating ids in page order.

use tracing::info;

use crate::repository::RecordRepository;

/// Collects every record id exposed by the listing endpoint
pub async fn discover_all_ids(repository: &dyn RecordRepository) -> Vec<i64> {
    let mut ids = Vec::new();
    let mut page = 1;

    loop {
        info!("Fetching listing page {}", page);

        let listing = match repository.fetch_page(page).await {
            Some(listing) if !listing.is_empty() => listing,
            _ => break,
        };

        let page_ids = listing.ids();
        info!("Found {} records on page {}", page_ids.len(), page);
        ids.extend(page_ids);
        page += 1;
    }

    info!("Total records found: {}", ids.len());
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRepository;

    #[tokio::test]
    async fn test_discovery_stops_on_empty_page() {
        let repository = FakeRepository::new().with_pages(vec![vec![1, 2], vec![]]);

        let ids = discover_all_ids(&repository).await;

        assert_eq!(ids, vec![1, 2]);
        assert_eq!(repository.page_requests(), 2);
    }

    #[tokio::test]
    async fn test_discovery_keeps_page_order() {
        let repository = FakeRepository::new().with_pages(vec![vec![5, 3], vec![9], vec![1]]);

        let ids = discover_all_ids(&repository).await;

        assert_eq!(ids, vec![5, 3, 9, 1]);
        assert_eq!(repository.page_requests(), 4);
    }

    #[tokio::test]
    async fn test_discovery_stops_when_page_unavailable() {
        // No pages configured: the fake answers None like an exhausted fetch
        let repository = FakeRepository::new();

        assert!(discover_all_ids(&repository).await.is_empty());
        assert_eq!(repository.page_requests(), 1);
    }
}
