//! Queue-state tracking wrapper around a [`UrlStore`].
//!
//! [`Frontier`] forwards every call to its store. The lease operations
//! (`add_many`, `check_out`, `check_in`) additionally keep a session-scoped
//! count of queued URLs and publish `queued` / `dequeued` events.
//!
//! The counter is a running delta, never reconciled against the store. It
//! only stays meaningful if every access to the store goes through the
//! wrapper.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use futures::stream::BoxStream;
use log::debug;
use tokio::sync::Mutex;

use crate::config::{DEQUEUED_URL, QUEUED_URL};
use crate::error_handling::{HookError, StoreError};
use crate::hook::{Dispatcher, EventDispatcher, FrontierEvent, Hook, HookTable};
use crate::models::{AddUrlInfo, RecordUpdate, Status, UrlRecord, UrlResult, Visit};
use crate::storage::UrlStore;
use crate::url_info::parse_url_or_log;

/// URL store wrapper that counts queued URLs and emits queue events.
///
/// Store errors pass through unchanged; the counter and events are only
/// touched after the store reports success.
pub struct Frontier<S, D = EventDispatcher> {
    store: S,
    dispatcher: Arc<D>,
    hooks: HookTable,
    queue_count: AtomicI64,
    /// Held across "store call, counter update, notify".
    op_lock: Mutex<()>,
}

impl<S: UrlStore> Frontier<S, EventDispatcher> {
    /// Wraps `store` with a fresh [`EventDispatcher`].
    pub fn new(store: S) -> Self {
        Self::with_dispatcher(store, Arc::new(EventDispatcher::new()))
    }
}

impl<S: UrlStore, D: Dispatcher> Frontier<S, D> {
    /// Wraps `store`, publishing events through `dispatcher`.
    ///
    /// Registers both queue event names with the dispatcher.
    pub fn with_dispatcher(store: S, dispatcher: Arc<D>) -> Self {
        dispatcher.register(QUEUED_URL);
        dispatcher.register(DEQUEUED_URL);
        Self {
            store,
            dispatcher,
            hooks: HookTable::with_events(&[QUEUED_URL, DEQUEUED_URL]),
            queue_count: AtomicI64::new(0),
            op_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn dispatcher(&self) -> &Arc<D> {
        &self.dispatcher
    }

    /// URLs queued during this session, net of check-outs.
    pub fn queue_count(&self) -> i64 {
        self.queue_count.load(Ordering::SeqCst)
    }

    /// Attaches the override hook for `event`. It runs before the
    /// dispatcher's listeners.
    pub fn set_hook(&self, event: &str, hook: Arc<dyn Hook>) -> Result<(), HookError> {
        self.hooks.attach(event, hook)
    }

    pub fn clear_hook(&self, event: &str) -> Option<Arc<dyn Hook>> {
        self.hooks.detach(event)
    }

    pub async fn count(&self) -> Result<usize, StoreError> {
        self.store.count().await
    }

    pub async fn get_one(&self, url: &str) -> Result<Option<UrlRecord>, StoreError> {
        self.store.get_one(url).await
    }

    pub fn get_all(&self) -> BoxStream<'_, Result<UrlRecord, StoreError>> {
        self.store.get_all()
    }

    /// Adds URLs to the store and returns those actually inserted.
    ///
    /// Each inserted URL that parses bumps the counter and fires `queued`.
    /// Inserted URLs that fail to parse are still returned, but are neither
    /// counted nor announced.
    pub async fn add_many<I, U>(&self, urls: I) -> Result<Vec<String>, StoreError>
    where
        I: IntoIterator<Item = U>,
        U: Into<AddUrlInfo>,
    {
        let urls: Vec<AddUrlInfo> = urls.into_iter().map(Into::into).collect();

        let _guard = self.op_lock.lock().await;
        let added = self.store.add_many(urls).await?;
        for url in &added {
            if let Some(url_info) = parse_url_or_log(url) {
                self.adjust_count(1);
                self.notify(FrontierEvent::Queued { url_info });
            }
        }
        Ok(added)
    }

    /// Leases one record matching `filter_status` (and a level below
    /// `filter_level`, if given).
    ///
    /// Fails with [`StoreError::QueueEmpty`] when nothing is eligible.
    pub async fn check_out(
        &self,
        filter_status: Status,
        filter_level: Option<u32>,
    ) -> Result<UrlRecord, StoreError> {
        let _guard = self.op_lock.lock().await;
        let record = self.store.check_out(filter_status, filter_level).await?;
        self.adjust_count(-1);
        if let Some(url_info) = record.url_info() {
            self.notify(FrontierEvent::Dequeued {
                url_info,
                record: record.clone(),
            });
        }
        Ok(record)
    }

    /// Reports the outcome of a leased record.
    ///
    /// Checking in with [`Status::Error`] puts the URL back on the queue: the
    /// counter goes up and `queued` fires (if the URL parses).
    pub async fn check_in(
        &self,
        url: &str,
        new_status: Status,
        increment_try_count: bool,
        url_result: Option<UrlResult>,
    ) -> Result<(), StoreError> {
        let _guard = self.op_lock.lock().await;
        self.store
            .check_in(url, new_status, increment_try_count, url_result)
            .await?;

        if new_status == Status::Error {
            self.adjust_count(1);
            if let Some(url_info) = parse_url_or_log(url) {
                self.notify(FrontierEvent::Queued { url_info });
            }
        }
        Ok(())
    }

    pub async fn update_one(&self, url: &str, update: RecordUpdate) -> Result<(), StoreError> {
        self.store.update_one(url, update).await
    }

    pub async fn release(&self) -> Result<(), StoreError> {
        self.store.release().await
    }

    pub async fn remove_many(&self, urls: &[String]) -> Result<(), StoreError> {
        self.store.remove_many(urls).await
    }

    pub async fn close(&self) -> Result<(), StoreError> {
        self.store.close().await
    }

    pub async fn add_visits(&self, visits: Vec<Visit>) -> Result<(), StoreError> {
        self.store.add_visits(visits).await
    }

    pub async fn get_revisit_id(
        &self,
        url: &str,
        payload_digest: &str,
    ) -> Result<Option<String>, StoreError> {
        self.store.get_revisit_id(url, payload_digest).await
    }

    pub async fn get_hostnames(&self) -> Result<Vec<String>, StoreError> {
        self.store.get_hostnames().await
    }

    fn adjust_count(&self, delta: i64) {
        let now = self.queue_count.fetch_add(delta, Ordering::SeqCst) + delta;
        debug!("Queue count {delta:+} -> {now}");
    }

    fn notify(&self, event: FrontierEvent) {
        let name = event.name();
        if self.hooks.call(&event) {
            debug!("Override hook ran for {name}");
        }
        self.dispatcher.notify(name, &event);
    }
}
