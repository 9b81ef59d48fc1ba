//! Messages crossing the engine boundary
//!
//! Serialized as JSON objects tagged by `type`, one per line in `serve` mode.

use serde::{Deserialize, Serialize};

use crate::wake::DetectionEvent;

/// Messages sent to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Inbound {
    /// Replace the wake phrase, and the threshold if given
    Configure {
        phrase: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_distance: Option<i64>,
    },
    /// Transcript chunk from speech-to-text
    ///
    /// Without `now_ms` the worker continues from the last supplied
    /// timestamp on its monotonic clock.
    Check {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        now_ms: Option<u64>,
    },
    /// Stop the worker after draining earlier messages
    Shutdown,
}

/// Messages emitted by the engine
///
/// Nothing is sent for a non-match or a suppressed match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Outbound {
    Detection {
        detected: bool,
        phrase: String,
        distance: usize,
        timestamp_ms: u64,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        remainder: String,
    },
    /// Configuration update refused; previous configuration still active
    Rejected { reason: String },
}

impl From<DetectionEvent> for Outbound {
    fn from(event: DetectionEvent) -> Self {
        Outbound::Detection {
            detected: true,
            phrase: event.matched_phrase,
            distance: event.distance,
            timestamp_ms: event.timestamp_ms,
            remainder: event.remainder,
        }
    }
}
