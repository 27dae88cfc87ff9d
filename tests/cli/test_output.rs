//! Output helper tests

use docvec::cli::output::{format_bytes, format_duration, format_relative_time, is_human};
use docvec::cli::OutputFormat;

#[test]
fn test_format_bytes_boundaries() {
    assert_eq!(format_bytes(0), "0 B");
    assert_eq!(format_bytes(1023), "1023 B");
    assert_eq!(format_bytes(10 * 1024 * 1024), "10.0 MB");
}

#[test]
fn test_format_duration_ranges() {
    assert_eq!(format_duration(0.25), "250ms");
    assert_eq!(format_duration(2.5), "2.50s");
    assert_eq!(format_duration(125.0), "2m 5.0s");
}

#[test]
fn test_format_relative_time() {
    let now = chrono::Utc::now();
    assert_eq!(format_relative_time(&now), "just now");
    assert_eq!(
        format_relative_time(&(now - chrono::Duration::hours(3))),
        "3h ago"
    );
    assert_eq!(
        format_relative_time(&(now + chrono::Duration::hours(1))),
        "in the future"
    );
}

#[test]
fn test_is_human() {
    assert!(is_human(OutputFormat::Human));
    assert!(!is_human(OutputFormat::Json));
}
