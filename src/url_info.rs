//! URL parsing for frontier events.

use std::borrow::Cow;

use log::warn;
use serde::Serialize;
use url::Url;

use crate::config::MAX_URL_LENGTH;
use crate::error_handling::UrlParseError;

/// Scheme assumed when the input carries none.
const DEFAULT_SCHEME: &str = "http";

/// Parsed, canonical form of a URL.
///
/// Two `UrlInfo`s are equal when every component is equal, including the raw
/// input they were parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UrlInfo {
    /// Input as given (trimmed)
    pub raw: String,
    /// Normalized serialization
    pub url: String,
    pub scheme: String,
    pub host: String,
    /// Explicit port, or the scheme's default
    pub port: Option<u16>,
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl UrlInfo {
    /// Parses a raw URL string.
    ///
    /// Inputs without a leading `scheme://` get the `http://` prefix, and the
    /// length limit applies to the prefixed form. Only http, https and ftp
    /// URLs with a host are accepted.
    pub fn parse(raw: &str) -> Result<UrlInfo, UrlParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UrlParseError::Empty);
        }

        let completed = with_default_scheme(trimmed);
        if completed.len() > MAX_URL_LENGTH {
            return Err(UrlParseError::TooLong {
                len: completed.len(),
                max: MAX_URL_LENGTH,
            });
        }

        let parsed = Url::parse(&completed).map_err(|source| UrlParseError::Invalid {
            url: completed.to_string(),
            source,
        })?;

        match parsed.scheme() {
            "http" | "https" | "ftp" => {}
            other => return Err(UrlParseError::UnsupportedScheme(other.to_string())),
        }

        let host = match parsed.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(UrlParseError::MissingHost(completed.into_owned())),
        };

        Ok(UrlInfo {
            raw: trimmed.to_string(),
            url: parsed.as_str().to_string(),
            scheme: parsed.scheme().to_string(),
            host,
            port: parsed.port_or_known_default(),
            path: parsed.path().to_string(),
            query: parsed.query().map(str::to_string),
            fragment: parsed.fragment().map(str::to_string),
        })
    }
}

/// Prefixes `http://` unless the input starts with a `scheme://`.
///
/// Only the text before the first `://` is considered, and only if it is a
/// well-formed scheme, so a `://` inside a path or query does not count.
pub fn with_default_scheme(trimmed: &str) -> Cow<'_, str> {
    let has_scheme = trimmed.split_once("://").is_some_and(|(scheme, _)| {
        let mut chars = scheme.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    });
    if has_scheme {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("{DEFAULT_SCHEME}://{trimmed}"))
    }
}

/// Parses a URL, logging a warning and returning `None` on failure.
pub fn parse_url_or_log(raw: &str) -> Option<UrlInfo> {
    match UrlInfo::parse(raw) {
        Ok(info) => Some(info),
        Err(e) => {
            let preview: String = raw.chars().take(80).collect();
            warn!("Unable to parse URL {preview:?}: {e}");
            None
        }
    }
}
