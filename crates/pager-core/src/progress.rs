//! Reading position records handed to whatever storage the reader uses.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReadingProgress {
    /// Zero-based page index.
    pub position: usize,
    pub total_pages: usize,
    /// Unix time in milliseconds.
    #[ts(type = "number")]
    pub timestamp: u64,
}

impl ReadingProgress {
    pub fn now(position: usize, total_pages: usize) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        Self {
            position,
            total_pages,
            timestamp,
        }
    }

    /// Share of the book read when the current page is finished, 0..=100.
    pub fn percent(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        let done = self.position.min(self.total_pages - 1) + 1;
        done as f64 * 100.0 / self.total_pages as f64
    }

    /// Position mapped into a page sequence of `total_pages` pages. The
    /// sequence may have changed length since the record was written.
    pub fn clamped_position(&self, total_pages: usize) -> usize {
        self.position.min(total_pages.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_counts_the_current_page_as_read() {
        let progress = ReadingProgress::now(0, 4);
        assert!((progress.percent() - 25.0).abs() < f64::EPSILON);
        let progress = ReadingProgress::now(3, 4);
        assert!((progress.percent() - 100.0).abs() < f64::EPSILON);
        assert_eq!(ReadingProgress::now(0, 0).percent(), 0.0);
    }

    #[test]
    fn position_is_clamped_into_shorter_sequences() {
        let progress = ReadingProgress::now(40, 50);
        assert_eq!(progress.clamped_position(12), 11);
        assert_eq!(progress.clamped_position(80), 40);
        assert_eq!(progress.clamped_position(0), 0);
    }

    #[test]
    fn timestamp_is_taken_from_the_clock() {
        let progress = ReadingProgress::now(1, 2);
        assert!(progress.timestamp > 0);
    }
}
