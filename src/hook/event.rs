//! Queue event payloads.

use serde::Serialize;

use crate::config::{DEQUEUED_URL, QUEUED_URL};
use crate::models::UrlRecord;
use crate::url_info::UrlInfo;

/// Payload of a frontier queue event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FrontierEvent {
    /// A URL became eligible for work (newly added, or re-queued after an error).
    Queued {
        /// Parsed URL
        url_info: UrlInfo,
    },
    /// A URL was leased to a worker.
    Dequeued {
        /// Parsed URL
        url_info: UrlInfo,
        /// The record as returned by the store's check-out
        record: UrlRecord,
    },
}

impl FrontierEvent {
    /// Name under which this event is dispatched.
    pub fn name(&self) -> &'static str {
        match self {
            FrontierEvent::Queued { .. } => QUEUED_URL,
            FrontierEvent::Dequeued { .. } => DEQUEUED_URL,
        }
    }

    pub fn url_info(&self) -> &UrlInfo {
        match self {
            FrontierEvent::Queued { url_info } | FrontierEvent::Dequeued { url_info, .. } => {
                url_info
            }
        }
    }

    /// The leased record, for `Dequeued` events.
    pub fn record(&self) -> Option<&UrlRecord> {
        match self {
            FrontierEvent::Queued { .. } => None,
            FrontierEvent::Dequeued { record, .. } => Some(record),
        }
    }
}
