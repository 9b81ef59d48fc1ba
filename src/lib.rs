//! Fuzzy wake phrase detection over speech-to-text transcripts
//!
//! [`wake::WakeWordEngine`] slides a phrase-wide word window across each
//! transcript chunk, scores it by edit distance and emits at most one
//! detection per debounce window. [`worker`] hosts an engine behind channels.

pub mod config;
pub mod error;
pub mod fuzzy;
pub mod message;
pub mod scanner;
pub mod stats;
pub mod wake;
pub mod worker;

pub use error::ConfigError;
pub use message::{Inbound, Outbound};
pub use wake::{DetectionEvent, EngineSettings, GateState, WakeWordEngine};
