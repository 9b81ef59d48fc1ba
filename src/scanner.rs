//! Sliding word window over a transcript
//!
//! The window is exactly as wide as the wake phrase and moves one word at a
//! time from the start of the transcript. Scanning stops at the first window
//! within the distance threshold, so an early, slightly noisy hit wins over a
//! later exact one.

use crate::fuzzy::{clean_for_matching, levenshtein};
use crate::wake::{DEFAULT_MAX_DISTANCE, DEFAULT_PHRASE};

/// Active phrase and threshold used for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakeWordConfig {
    words: Vec<String>,
    phrase: String,
    max_distance: usize,
}

impl WakeWordConfig {
    /// Build a config from a raw phrase
    ///
    /// Returns `None` if the phrase has no words.
    pub fn new(phrase: &str, max_distance: usize) -> Option<Self> {
        Self::with_options(phrase, max_distance, &ScanOptions::default())
    }

    /// Build a config whose phrase is normalised the same way `options`
    /// normalises transcripts
    ///
    /// Returns `None` if no word survives normalisation.
    pub fn with_options(phrase: &str, max_distance: usize, options: &ScanOptions) -> Option<Self> {
        let words: Vec<String> = phrase
            .split_whitespace()
            .map(|w| normalize_word(w, options))
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return None;
        }
        Some(Self {
            phrase: words.join(" "),
            words,
            max_distance,
        })
    }

    /// Lower-cased phrase with single spaces between words
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn max_distance(&self) -> usize {
        self.max_distance
    }
}

impl Default for WakeWordConfig {
    fn default() -> Self {
        let words: Vec<String> = DEFAULT_PHRASE.split_whitespace().map(String::from).collect();
        Self {
            phrase: words.join(" "),
            words,
            max_distance: DEFAULT_MAX_DISTANCE,
        }
    }
}

/// Transcript normalisation applied before windowing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Drop punctuation and digits so "venue," still lines up with "venue"
    pub strip_punctuation: bool,
}

/// First window that matched the phrase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowMatch {
    /// Window words joined by single spaces
    pub window: String,
    pub distance: usize,
    /// Index of the first transcript word after the window
    pub end_word: usize,
}

/// Lower-case one word, dropping punctuation and digits if asked to
fn normalize_word(word: &str, options: &ScanOptions) -> String {
    if options.strip_punctuation {
        clean_for_matching(word)
    } else {
        word.to_lowercase()
    }
}

/// Find the first window of `transcript` within the configured distance
pub fn scan(
    transcript: &str,
    config: &WakeWordConfig,
    options: &ScanOptions,
) -> Option<WindowMatch> {
    // Keep each word's position in the raw transcript so `end_word` stays
    // valid when stripping empties a token entirely
    let words: Vec<(usize, String)> = transcript
        .split_whitespace()
        .enumerate()
        .map(|(i, w)| (i, normalize_word(w, options)))
        .filter(|(_, w)| !w.is_empty())
        .collect();
    let width = config.words.len();
    if words.len() < width {
        return None;
    }

    for start in 0..=words.len() - width {
        let slice = &words[start..start + width];
        let window = slice
            .iter()
            .map(|(_, w)| w.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let distance = levenshtein(&window, &config.phrase);
        if distance <= config.max_distance {
            tracing::debug!(window = %window, distance, start, "candidate window matched");
            return Some(WindowMatch {
                window,
                distance,
                end_word: slice[width - 1].0 + 1,
            });
        }
    }

    None
}

/// Transcript words after the matched window, original casing kept
///
/// Leading punctuation left over from the wake phrase ("hey venue, play")
/// is trimmed.
pub fn remainder(transcript: &str, end_word: usize) -> String {
    let rest = transcript
        .split_whitespace()
        .skip(end_word)
        .collect::<Vec<_>>()
        .join(" ");
    rest.trim_start_matches([',', '!', '.', '?', ' ']).to_string()
}
