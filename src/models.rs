//! Frontier record types.
//!
//! These are the values exchanged with a [`crate::storage::UrlStore`]. Records
//! are owned by the store; callers only ever see copies.

use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::url_info::{parse_url_or_log, UrlInfo};

/// Crawl status of a URL record.
///
/// `Error` is the only status that puts a checked-in URL back on the queue.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Status {
    /// Waiting to be checked out
    Queued,
    /// Leased to a worker
    InProgress,
    /// Fetched successfully
    Done,
    /// Fetch failed; eligible again
    Error,
    /// Deliberately not fetched
    Skipped,
}

impl Status {
    /// Database / wire representation.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// A URL record as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlRecord {
    pub url: String,
    pub status: Status,
    pub try_count: u32,
    /// Crawl depth (0 for seed URLs)
    pub level: u32,
    pub top_url: Option<String>,
    pub parent_url: Option<String>,
    pub root_url: Option<String>,
    pub status_code: Option<u16>,
    pub inline: Option<u32>,
    pub link_type: Option<String>,
    pub post_data: Option<String>,
    pub filename: Option<String>,
}

impl UrlRecord {
    /// A fresh queued record built from an insertion request.
    pub fn new_queued(info: &AddUrlInfo) -> Self {
        UrlRecord {
            url: info.url.clone(),
            status: Status::Queued,
            try_count: 0,
            level: info.level,
            top_url: info.top_url.clone(),
            parent_url: info.parent_url.clone(),
            root_url: info.root_url.clone(),
            status_code: None,
            inline: info.inline,
            link_type: info.link_type.clone(),
            post_data: info.post_data.clone(),
            filename: None,
        }
    }

    /// Parses the record's URL, logging a warning on failure.
    pub fn url_info(&self) -> Option<UrlInfo> {
        parse_url_or_log(&self.url)
    }

    /// Applies a partial update in place.
    pub fn apply(&mut self, update: &RecordUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(try_count) = update.try_count {
            self.try_count = try_count;
        }
        if let Some(level) = update.level {
            self.level = level;
        }
        if let Some(status_code) = update.status_code {
            self.status_code = Some(status_code);
        }
        if let Some(ref filename) = update.filename {
            self.filename = Some(filename.clone());
        }
        if let Some(ref link_type) = update.link_type {
            self.link_type = Some(link_type.clone());
        }
    }
}

/// Outcome metadata written to a record on check-in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UrlResult {
    pub status_code: Option<u16>,
    pub filename: Option<String>,
}

/// A URL to insert together with its discovery properties.
///
/// Plain strings convert into an `AddUrlInfo` at level 0 with no metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddUrlInfo {
    pub url: String,
    pub level: u32,
    pub top_url: Option<String>,
    pub parent_url: Option<String>,
    pub root_url: Option<String>,
    pub inline: Option<u32>,
    pub link_type: Option<String>,
    pub post_data: Option<String>,
}

impl From<String> for AddUrlInfo {
    fn from(url: String) -> Self {
        AddUrlInfo {
            url,
            ..Default::default()
        }
    }
}

impl From<&str> for AddUrlInfo {
    fn from(url: &str) -> Self {
        AddUrlInfo::from(url.to_string())
    }
}

impl From<&String> for AddUrlInfo {
    fn from(url: &String) -> Self {
        AddUrlInfo::from(url.clone())
    }
}

/// Partial update for [`crate::storage::UrlStore::update_one`].
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordUpdate {
    pub status: Option<Status>,
    pub try_count: Option<u32>,
    pub level: Option<u32>,
    pub status_code: Option<u16>,
    pub filename: Option<String>,
    pub link_type: Option<String>,
}

/// A WARC visit, used to find earlier captures of identical payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visit {
    pub url: String,
    pub warc_id: String,
    pub payload_digest: String,
}
