//! Run metrics and the result record.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};

use crate::error::{BenchError, Result};

/// Metrics derived from a run's timestamps and file sizes. Pure and
/// deterministic: identical inputs always produce identical values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Completion time minus first-processed time.
    pub duration: Duration,
    /// `(output_size - input_size) / input_size * 100`.
    pub percent_change: f64,
}

impl Metrics {
    /// Compute run metrics. A zero-size input file makes the percent change
    /// undefined and is reported as [`BenchError::EmptyInput`] rather than
    /// producing a NaN.
    pub fn compute(
        first_processed_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        input_size: u64,
        output_size: u64,
    ) -> Result<Self> {
        if input_size == 0 {
            return Err(BenchError::EmptyInput);
        }
        Ok(Self {
            duration: completed_at - first_processed_at,
            percent_change: (output_size as f64 - input_size as f64) / input_size as f64 * 100.0,
        })
    }
}

/// The outcome of one successful benchmark run. Constructed exactly once,
/// at the end of the run; never partially populated.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Filter file the run measured.
    pub filter_file: PathBuf,
    /// `processed_at` of the first output record.
    pub first_processed_at: DateTime<Utc>,
    /// Wall-clock time at which the engine was observed to have stopped.
    pub completed_at: DateTime<Utc>,
    /// Processing latency between the two timestamps.
    pub duration: Duration,
    /// Size of the source file in bytes.
    pub input_size: u64,
    /// Size of the engine's output file in bytes.
    pub output_size: u64,
    /// Percent size change from input to output.
    pub percent_change: f64,
}

impl RunResult {
    /// Human-readable result block for terminal display.
    pub fn render(&self) -> String {
        format!(
            "Filter File: {}\nProcessing Started: {}\nProcessing Ended: {}\nDuration: {:.4}\nInput File Size: {}\nOutput File Size: {}\nFile Size Change Percentage: {:.2}",
            self.filter_file.display(),
            self.first_processed_at.to_rfc3339(),
            self.completed_at.to_rfc3339(),
            duration_secs(self.duration),
            self.input_size,
            self.output_size,
            self.percent_change,
        )
    }
}

fn duration_secs(d: Duration) -> f64 {
    d.num_microseconds()
        .map_or(d.num_milliseconds() as f64 / 1e3, |us| us as f64 / 1e6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn duration_and_percent_change_for_a_two_second_run() {
        // 100-byte input, 120-byte output, record processed 2s before the end.
        let m = Metrics::compute(at(0), at(2), 100, 120).unwrap();
        assert_eq!(m.duration, Duration::seconds(2));
        assert_eq!(m.percent_change, 20.0);
    }

    #[test]
    fn shrinking_output_yields_negative_change() {
        let m = Metrics::compute(at(0), at(1), 200, 50).unwrap();
        assert_eq!(m.percent_change, -75.0);
    }

    #[test]
    fn compute_is_bit_for_bit_reproducible() {
        let a = Metrics::compute(at(0), at(3), 333, 777).unwrap();
        let b = Metrics::compute(at(0), at(3), 333, 777).unwrap();
        assert_eq!(a.duration, b.duration);
        assert_eq!(a.percent_change.to_bits(), b.percent_change.to_bits());
    }

    #[test]
    fn zero_size_input_is_an_explicit_error() {
        let err = Metrics::compute(at(0), at(1), 0, 10).unwrap_err();
        assert!(matches!(err, BenchError::EmptyInput));
    }

    #[test]
    fn render_includes_every_field() {
        let r = RunResult {
            filter_file: PathBuf::from("./filter.conf"),
            first_processed_at: at(0),
            completed_at: at(2),
            duration: Duration::seconds(2),
            input_size: 100,
            output_size: 120,
            percent_change: 20.0,
        };
        let s = r.render();
        assert!(s.contains("Filter File: ./filter.conf"));
        assert!(s.contains("Duration: 2.0000"));
        assert!(s.contains("Input File Size: 100"));
        assert!(s.contains("Output File Size: 120"));
        assert!(s.contains("File Size Change Percentage: 20.00"));
    }
}
