// Shared test helpers: a dispatcher that records every notification and a
// store wrapper that can be told to fail.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::BoxStream;

use url_frontier::{
    AddUrlInfo, Dispatcher, FrontierEvent, MemoryUrlStore, RecordUpdate, Status, StoreError,
    UrlRecord, UrlResult, UrlStore, Visit,
};

/// Dispatcher that keeps every notification in order.
#[allow(dead_code)] // Used by other test files
#[derive(Default)]
pub struct RecordingDispatcher {
    registered: Mutex<Vec<String>>,
    events: Mutex<Vec<(String, FrontierEvent)>>,
}

#[allow(dead_code)] // Used by other test files
impl RecordingDispatcher {
    pub fn registered(&self) -> Vec<String> {
        self.registered.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<(String, FrontierEvent)> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(n, _)| n == name)
            .count()
    }
}

impl Dispatcher for RecordingDispatcher {
    fn register(&self, name: &str) {
        let mut registered = self.registered.lock().unwrap();
        if !registered.iter().any(|n| n == name) {
            registered.push(name.to_string());
        }
    }

    fn notify(&self, name: &str, event: &FrontierEvent) {
        self.events
            .lock()
            .unwrap()
            .push((name.to_string(), event.clone()));
    }
}

/// In-memory store whose mutating calls fail while `failing` is set.
#[allow(dead_code)] // Used by other test files
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryUrlStore,
    failing: AtomicBool,
}

#[allow(dead_code)] // Used by other test files
impl FailingStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Sql(sqlx::Error::PoolClosed))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UrlStore for FailingStore {
    async fn count(&self) -> Result<usize, StoreError> {
        self.inner.count().await
    }

    async fn get_one(&self, url: &str) -> Result<Option<UrlRecord>, StoreError> {
        self.inner.get_one(url).await
    }

    fn get_all(&self) -> BoxStream<'_, Result<UrlRecord, StoreError>> {
        self.inner.get_all()
    }

    async fn add_many(&self, urls: Vec<AddUrlInfo>) -> Result<Vec<String>, StoreError> {
        self.check()?;
        self.inner.add_many(urls).await
    }

    async fn check_out(
        &self,
        filter_status: Status,
        filter_level: Option<u32>,
    ) -> Result<UrlRecord, StoreError> {
        self.check()?;
        self.inner.check_out(filter_status, filter_level).await
    }

    async fn check_in(
        &self,
        url: &str,
        new_status: Status,
        increment_try_count: bool,
        url_result: Option<UrlResult>,
    ) -> Result<(), StoreError> {
        self.check()?;
        self.inner
            .check_in(url, new_status, increment_try_count, url_result)
            .await
    }

    async fn update_one(&self, url: &str, update: RecordUpdate) -> Result<(), StoreError> {
        self.check()?;
        self.inner.update_one(url, update).await
    }

    async fn release(&self) -> Result<(), StoreError> {
        self.check()?;
        self.inner.release().await
    }

    async fn remove_many(&self, urls: &[String]) -> Result<(), StoreError> {
        self.check()?;
        self.inner.remove_many(urls).await
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.inner.close().await
    }

    async fn add_visits(&self, visits: Vec<Visit>) -> Result<(), StoreError> {
        self.check()?;
        self.inner.add_visits(visits).await
    }

    async fn get_revisit_id(
        &self,
        url: &str,
        payload_digest: &str,
    ) -> Result<Option<String>, StoreError> {
        self.inner.get_revisit_id(url, payload_digest).await
    }

    async fn get_hostnames(&self) -> Result<Vec<String>, StoreError> {
        self.inner.get_hostnames().await
    }
}
