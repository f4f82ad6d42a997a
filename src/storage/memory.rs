//! In-memory URL store.
//!
//! Keeps records in insertion order behind a single async mutex, so check-out
//! selection and the status change happen under one lock.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::Mutex;

use crate::error_handling::StoreError;
use crate::models::{AddUrlInfo, RecordUpdate, Status, UrlRecord, UrlResult, Visit};
use crate::storage::UrlStore;
use crate::url_info::UrlInfo;

#[derive(Default)]
struct Table {
    /// Insertion sequence -> record
    records: BTreeMap<u64, UrlRecord>,
    /// URL -> insertion sequence
    index: HashMap<String, u64>,
    /// (url, payload digest) -> WARC record ID
    visits: HashMap<(String, String), String>,
    next_seq: u64,
    closed: bool,
}

impl Table {
    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }

    fn record_mut(&mut self, url: &str) -> Result<&mut UrlRecord, StoreError> {
        let seq = self
            .index
            .get(url)
            .copied()
            .ok_or_else(|| StoreError::NotFound(url.to_string()))?;
        self.records
            .get_mut(&seq)
            .ok_or_else(|| StoreError::NotFound(url.to_string()))
    }
}

/// URL store backed by process memory.
#[derive(Default)]
pub struct MemoryUrlStore {
    table: Mutex<Table>,
}

impl MemoryUrlStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UrlStore for MemoryUrlStore {
    async fn count(&self) -> Result<usize, StoreError> {
        let table = self.table.lock().await;
        table.ensure_open()?;
        Ok(table.records.len())
    }

    async fn get_one(&self, url: &str) -> Result<Option<UrlRecord>, StoreError> {
        let table = self.table.lock().await;
        table.ensure_open()?;
        Ok(table
            .index
            .get(url)
            .and_then(|seq| table.records.get(seq))
            .cloned())
    }

    fn get_all(&self) -> BoxStream<'_, Result<UrlRecord, StoreError>> {
        stream::once(async move {
            let table = self.table.lock().await;
            match table.ensure_open() {
                Ok(()) => table.records.values().cloned().map(Ok).collect::<Vec<_>>(),
                Err(e) => vec![Err(e)],
            }
        })
        .flat_map(stream::iter)
        .boxed()
    }

    async fn add_many(&self, urls: Vec<AddUrlInfo>) -> Result<Vec<String>, StoreError> {
        let mut table = self.table.lock().await;
        table.ensure_open()?;

        let mut added = Vec::new();
        for info in urls {
            if table.index.contains_key(&info.url) {
                continue;
            }
            let seq = table.next_seq;
            table.next_seq += 1;
            table.index.insert(info.url.clone(), seq);
            table.records.insert(seq, UrlRecord::new_queued(&info));
            added.push(info.url);
        }
        Ok(added)
    }

    async fn check_out(
        &self,
        filter_status: Status,
        filter_level: Option<u32>,
    ) -> Result<UrlRecord, StoreError> {
        let mut table = self.table.lock().await;
        table.ensure_open()?;

        let record = table
            .records
            .values_mut()
            .find(|r| r.status == filter_status && filter_level.map_or(true, |max| r.level < max))
            .ok_or(StoreError::QueueEmpty)?;
        record.status = Status::InProgress;
        Ok(record.clone())
    }

    async fn check_in(
        &self,
        url: &str,
        new_status: Status,
        increment_try_count: bool,
        url_result: Option<UrlResult>,
    ) -> Result<(), StoreError> {
        let mut table = self.table.lock().await;
        table.ensure_open()?;

        let record = table.record_mut(url)?;
        record.status = new_status;
        if increment_try_count {
            record.try_count += 1;
        }
        if let Some(result) = url_result {
            if result.status_code.is_some() {
                record.status_code = result.status_code;
            }
            if result.filename.is_some() {
                record.filename = result.filename;
            }
        }
        Ok(())
    }

    async fn update_one(&self, url: &str, update: RecordUpdate) -> Result<(), StoreError> {
        let mut table = self.table.lock().await;
        table.ensure_open()?;
        table.record_mut(url)?.apply(&update);
        Ok(())
    }

    async fn release(&self) -> Result<(), StoreError> {
        let mut table = self.table.lock().await;
        table.ensure_open()?;
        for record in table.records.values_mut() {
            if record.status == Status::InProgress {
                record.status = Status::Queued;
            }
        }
        Ok(())
    }

    async fn remove_many(&self, urls: &[String]) -> Result<(), StoreError> {
        let mut table = self.table.lock().await;
        table.ensure_open()?;
        for url in urls {
            if let Some(seq) = table.index.remove(url) {
                table.records.remove(&seq);
            }
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.table.lock().await.closed = true;
        Ok(())
    }

    async fn add_visits(&self, visits: Vec<Visit>) -> Result<(), StoreError> {
        let mut table = self.table.lock().await;
        table.ensure_open()?;
        for visit in visits {
            table
                .visits
                .insert((visit.url, visit.payload_digest), visit.warc_id);
        }
        Ok(())
    }

    async fn get_revisit_id(
        &self,
        url: &str,
        payload_digest: &str,
    ) -> Result<Option<String>, StoreError> {
        let table = self.table.lock().await;
        table.ensure_open()?;
        Ok(table
            .visits
            .get(&(url.to_string(), payload_digest.to_string()))
            .cloned())
    }

    async fn get_hostnames(&self) -> Result<Vec<String>, StoreError> {
        let table = self.table.lock().await;
        table.ensure_open()?;
        let hostnames: BTreeSet<String> = table
            .records
            .values()
            .filter_map(|r| UrlInfo::parse(&r.url).ok())
            .map(|info| info.host)
            .collect();
        Ok(hostnames.into_iter().collect())
    }
}
