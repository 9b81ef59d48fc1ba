//! Per-session detection counters

use std::fmt;

/// Counts of what the gate did with each transcript
///
/// Only counters are kept; individual transcripts and events are not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectionStats {
    /// Transcripts checked
    pub checks: u64,
    /// Transcripts with a qualifying window
    pub matches: u64,
    /// Qualifying windows swallowed by the cooldown
    pub suppressed: u64,
    /// Detection events emitted
    pub detections: u64,
    /// Configuration updates refused
    pub rejected_configs: u64,
}

impl DetectionStats {
    pub fn summary(&self) -> String {
        if self.checks == 0 {
            return "No transcripts checked yet.".to_string();
        }
        format!(
            "Checked {} transcripts: {} matched, {} fired, {} suppressed ({:.1}% hit rate)",
            self.checks,
            self.matches,
            self.detections,
            self.suppressed,
            self.matches as f64 * 100.0 / self.checks as f64
        )
    }
}

impl fmt::Display for DetectionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
