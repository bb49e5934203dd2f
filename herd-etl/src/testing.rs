//! In-memory repository for stage and orchestrator tests

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use herd_core::domain::record::Record;
use herd_core::dto::page::{Page, PageItem};
use serde_json::json;

use crate::repository::RecordRepository;

/// A raw record as the source API would serve it
pub fn sample_record(id: i64) -> Record {
    match json!({
        "id": id,
        "name": format!("Dog {}", id),
        "type": "dog",
        "friends": "A,B",
        "born_at": "2022-01-01",
    }) {
        serde_json::Value::Object(record) => record,
        _ => unreachable!(),
    }
}

#[derive(Default)]
pub struct FakeRepository {
    pages: Vec<Vec<i64>>,
    records: HashMap<i64, Record>,
    panicking_ids: HashSet<i64>,
    fetch_delay: Option<Duration>,
    reject_posts: bool,
    panic_on_post: bool,

    page_requests: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    posted: Mutex<Vec<usize>>,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listing pages served from page 1; requests past the end answer `None`
    pub fn with_pages(mut self, pages: Vec<Vec<i64>>) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_records(mut self, ids: &[i64]) -> Self {
        self.records
            .extend(ids.iter().map(|&id| (id, sample_record(id))));
        self
    }

    pub fn panic_on_record(mut self, id: i64) -> Self {
        self.panicking_ids.insert(id);
        self
    }

    pub fn with_fetch_delay_ms(mut self, millis: u64) -> Self {
        self.fetch_delay = Some(Duration::from_millis(millis));
        self
    }

    pub fn reject_posts(mut self) -> Self {
        self.reject_posts = true;
        self
    }

    pub fn panic_on_post(mut self) -> Self {
        self.panic_on_post = true;
        self
    }

    pub fn page_requests(&self) -> usize {
        self.page_requests.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Sizes of the batches posted so far, in post order
    pub fn posted_batches(&self) -> Vec<usize> {
        self.posted.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordRepository for FakeRepository {
    async fn fetch_page(&self, page: u32) -> Option<Page> {
        self.page_requests.fetch_add(1, Ordering::SeqCst);
        let ids = self.pages.get((page as usize).checked_sub(1)?)?;
        Some(Page {
            items: ids.iter().map(|&id| PageItem { id }).collect(),
            page: Some(page),
            ..Page::default()
        })
    }

    async fn fetch_record(&self, id: i64) -> Option<Record> {
        if self.panicking_ids.contains(&id) {
            panic!("fetch of record {} blew up", id);
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.records.get(&id).cloned()
    }

    async fn post_batch(&self, records: &[Record]) -> bool {
        if self.panic_on_post {
            panic!("sink blew up");
        }
        self.posted.lock().unwrap().push(records.len());
        !self.reject_posts
    }
}
