//! Tests for command-line parsing.

use clap::Parser;
use std::path::PathBuf;
use url_frontier::{Config, LogFormat, LogLevel, Opt};

#[test]
fn test_defaults() {
    let opt = Opt::try_parse_from(["url_frontier", "urls.txt"]).unwrap();
    assert_eq!(opt.file, PathBuf::from("urls.txt"));
    assert!(matches!(opt.log_level, LogLevel::Info));
    assert!(matches!(opt.log_format, LogFormat::Plain));
    assert!(opt.db_path.is_none());
    assert_eq!(opt.level, 0);
    assert!(!opt.log_events);
}

#[test]
fn test_all_flags() {
    let opt = Opt::try_parse_from([
        "url_frontier",
        "-",
        "--log-level",
        "debug",
        "--log-format",
        "json",
        "--db-path",
        "/tmp/crawl.db",
        "--level",
        "3",
        "--log-events",
    ])
    .unwrap();

    let config = Config::from(opt);
    assert_eq!(config.file, PathBuf::from("-"));
    assert!(matches!(config.log_level, LogLevel::Debug));
    assert!(matches!(config.log_format, LogFormat::Json));
    assert_eq!(config.db_path, PathBuf::from("/tmp/crawl.db"));
    assert_eq!(config.level, 3);
    assert!(config.log_events);
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(Opt::try_parse_from(["url_frontier"]).is_err());
}

#[test]
fn test_invalid_values_rejected() {
    assert!(Opt::try_parse_from(["url_frontier", "urls.txt", "--log-level", "loud"]).is_err());
    assert!(Opt::try_parse_from(["url_frontier", "urls.txt", "--level", "-1"]).is_err());
}
