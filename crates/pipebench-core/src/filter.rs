//! Filter instrumentation.
//!
//! The filter file is treated as an opaque text blob with one structural
//! assumption: its first `{` opens the block the engine evaluates per event.
//! Injecting the capture statement right after that brace stamps every event
//! with a `processed_at` wall-clock time before any user filter logic runs,
//! which is what makes latency measurable without engine-native metrics.

use std::fs;
use std::path::Path;

use crate::error::{BenchError, Result};

/// Field name the capture statement writes into each event.
pub const PROCESSED_AT_FIELD: &str = "processed_at";

/// Statement inserted after the first opening brace of the filter.
pub const CAPTURE_STATEMENT: &str = r#"ruby { code => "event.set('processed_at', Time.now());"} "#;

/// Rewrite raw filter text for instrumentation: strip line feeds and
/// carriage returns, and insert [`CAPTURE_STATEMENT`] immediately after the
/// first `{`. The scan is char-wise, so multi-byte sequences in comments or
/// string literals pass through untouched.
///
/// Text without any opening brace is returned delimiter-stripped but
/// otherwise unmodified. That is a documented edge case, not an error.
pub fn instrument(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + CAPTURE_STATEMENT.len());
    let mut injected = false;

    for c in raw.chars() {
        if c == '\n' || c == '\r' {
            continue;
        }
        out.push(c);
        if c == '{' && !injected {
            injected = true;
            out.push_str(CAPTURE_STATEMENT);
        }
    }

    out
}

/// Read a filter file and return its instrumented form.
pub fn instrument_file(path: &Path) -> Result<String> {
    let raw =
        fs::read_to_string(path).map_err(|e| BenchError::io("reading filter file", path, e))?;
    Ok(instrument(&raw))
}
