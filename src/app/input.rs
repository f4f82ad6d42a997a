//! Seed URL input.

use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::config::MAX_URL_LENGTH;
use crate::url_info::with_default_scheme;

/// Extracts the URL from one input line.
///
/// Blank lines and `#` comments yield `None`, as do lines longer than
/// [`MAX_URL_LENGTH`] once the default scheme is added (with a warning).
pub fn seed_line(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let completed_len = with_default_scheme(trimmed).len();
    if completed_len > MAX_URL_LENGTH {
        let preview: String = trimmed.chars().take(50).collect();
        warn!(
            "Skipping URL exceeding maximum length ({} > {}): {}...",
            completed_len, MAX_URL_LENGTH, preview
        );
        return None;
    }
    Some(trimmed)
}

/// Reads seed URLs from `file`, or from stdin when `file` is `-`.
///
/// URLs are returned as written; parsing happens when the frontier queues
/// them.
pub async fn read_seed_urls(file: &Path) -> Result<Vec<String>> {
    if file.as_os_str() == "-" {
        info!("Reading URLs from stdin");
        read_lines(BufReader::new(tokio::io::stdin())).await
    } else {
        let handle = tokio::fs::File::open(file)
            .await
            .with_context(|| format!("Failed to open input file {}", file.display()))?;
        read_lines(BufReader::new(handle)).await
    }
}

async fn read_lines<R: AsyncBufRead + Unpin>(reader: R) -> Result<Vec<String>> {
    let mut lines = reader.lines();
    let mut urls = Vec::new();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Failed to read line from input: {e}");
                continue;
            }
            Err(e) => return Err(e).context("Failed to read input"),
        };
        if let Some(url) = seed_line(&line) {
            urls.push(url.to_string());
        }
    }
    Ok(urls)
}
