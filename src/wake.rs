//! Wake word gate - turns scanner hits into debounced detection events
//!
//! One engine per listening session. It owns the active phrase, the distance
//! threshold and the time of the last detection; nothing else survives
//! between transcripts. Time is passed in by the caller so behaviour is
//! deterministic.

use crate::error::ConfigError;
use crate::scanner::{self, ScanOptions, WakeWordConfig};
use crate::stats::DetectionStats;

pub const DEFAULT_PHRASE: &str = "hey venue";
pub const DEFAULT_MAX_DISTANCE: usize = 2;
pub const DEFAULT_DEBOUNCE_MS: u64 = 1200;

/// Construction parameters for [`WakeWordEngine`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub phrase: String,
    pub max_distance: usize,
    pub debounce_ms: u64,
    pub strip_punctuation: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            phrase: DEFAULT_PHRASE.to_string(),
            max_distance: DEFAULT_MAX_DISTANCE,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            strip_punctuation: false,
        }
    }
}

/// A wake phrase heard outside the cooldown window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionEvent {
    /// Transcript window that matched, lower-cased
    pub matched_phrase: String,
    pub distance: usize,
    pub timestamp_ms: u64,
    /// Transcript text following the wake phrase
    pub remainder: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Next qualifying match fires
    Idle,
    /// Within the debounce window of the last detection
    CoolingDown,
}

/// Fuzzy wake phrase detector with a debounce gate
pub struct WakeWordEngine {
    config: WakeWordConfig,
    options: ScanOptions,
    debounce_ms: u64,
    last_detection_ms: Option<u64>,
    stats: DetectionStats,
}

impl Default for WakeWordEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl WakeWordEngine {
    /// Engine listening for "hey venue" with the default threshold
    pub fn new() -> Self {
        Self {
            config: WakeWordConfig::default(),
            options: ScanOptions::default(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            last_detection_ms: None,
            stats: DetectionStats::default(),
        }
    }

    pub fn with_settings(settings: &EngineSettings) -> Result<Self, ConfigError> {
        let options = ScanOptions {
            strip_punctuation: settings.strip_punctuation,
        };
        let config = WakeWordConfig::with_options(&settings.phrase, settings.max_distance, &options)
            .ok_or(ConfigError::EmptyPhrase)?;
        tracing::debug!(
            phrase = config.phrase(),
            max_distance = config.max_distance(),
            debounce_ms = settings.debounce_ms,
            "wake word engine initialized"
        );
        Ok(Self {
            config,
            options,
            debounce_ms: settings.debounce_ms,
            last_detection_ms: None,
            stats: DetectionStats::default(),
        })
    }

    /// Replace the active phrase, and the threshold if one is given
    ///
    /// On error the previous configuration stays active. The debounce clock
    /// is not reset.
    pub fn configure(&mut self, phrase: &str, max_distance: Option<i64>) -> Result<(), ConfigError> {
        let result = self.try_configure(phrase, max_distance);
        if let Err(ref e) = result {
            self.stats.rejected_configs += 1;
            tracing::warn!(phrase, error = %e, "configuration rejected");
        }
        result
    }

    fn try_configure(&mut self, phrase: &str, max_distance: Option<i64>) -> Result<(), ConfigError> {
        let max_distance = match max_distance {
            Some(d) => usize::try_from(d).map_err(|_| ConfigError::NegativeThreshold(d))?,
            None => self.config.max_distance(),
        };
        let config = WakeWordConfig::with_options(phrase, max_distance, &self.options)
            .ok_or(ConfigError::EmptyPhrase)?;
        tracing::info!(
            phrase = config.phrase(),
            max_distance = config.max_distance(),
            "wake word configured"
        );
        self.config = config;
        Ok(())
    }

    /// Check a transcript chunk heard at `now_ms`
    ///
    /// Returns an event only for a qualifying window outside the cooldown.
    pub fn check(&mut self, transcript: &str, now_ms: u64) -> Option<DetectionEvent> {
        self.stats.checks += 1;
        let hit = scanner::scan(transcript, &self.config, &self.options)?;
        self.stats.matches += 1;

        if self.state(now_ms) == GateState::CoolingDown {
            self.stats.suppressed += 1;
            tracing::debug!(
                window = %hit.window,
                now_ms,
                last_ms = ?self.last_detection_ms,
                "match suppressed by cooldown"
            );
            return None;
        }

        self.last_detection_ms = Some(now_ms);
        self.stats.detections += 1;
        let event = DetectionEvent {
            remainder: scanner::remainder(transcript, hit.end_word),
            matched_phrase: hit.window,
            distance: hit.distance,
            timestamp_ms: now_ms,
        };
        tracing::info!(
            phrase = %event.matched_phrase,
            distance = event.distance,
            timestamp_ms = now_ms,
            "wake word detected"
        );
        Some(event)
    }

    /// Gate state as seen at `now_ms`
    ///
    /// A clock reading earlier than the last detection counts as no time
    /// elapsed.
    pub fn state(&self, now_ms: u64) -> GateState {
        match self.last_detection_ms {
            Some(last) if now_ms.saturating_sub(last) <= self.debounce_ms => GateState::CoolingDown,
            _ => GateState::Idle,
        }
    }

    pub fn config(&self) -> &WakeWordConfig {
        &self.config
    }

    pub fn debounce_ms(&self) -> u64 {
        self.debounce_ms
    }

    pub fn stats(&self) -> DetectionStats {
        self.stats
    }
}
