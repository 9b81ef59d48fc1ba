//! Wake word engine integration tests
//!
//! Drives the public engine and worker APIs with scripted transcripts and
//! explicit timestamps.

use venue_wake::fuzzy::levenshtein;
use venue_wake::worker;
use venue_wake::{ConfigError, EngineSettings, Inbound, Outbound, WakeWordEngine};

const SAMPLES: &[&str] = &[
    "",
    "a",
    "hey",
    "hey venue",
    "hey venu",
    "hay menu",
    "okay computer",
    "kitten",
    "sitting",
    "ümlaut straße",
];

#[test]
fn test_distance_laws() {
    for a in SAMPLES {
        assert_eq!(levenshtein(a, a), 0, "{a:?}");
        assert_eq!(levenshtein(a, ""), a.chars().count(), "{a:?}");
        assert_eq!(levenshtein("", a), a.chars().count(), "{a:?}");
        for b in SAMPLES {
            assert_eq!(levenshtein(a, b), levenshtein(b, a), "{a:?} vs {b:?}");
        }
    }
}

#[test]
fn test_debounce_scenario() {
    let mut engine = WakeWordEngine::new();

    let first = engine.check("hey venue please", 0).expect("first match fires");
    assert_eq!(first.matched_phrase, "hey venue");
    assert_eq!(first.distance, 0);

    assert!(engine.check("hey venue again", 500).is_none());

    let second = engine.check("hey venue again", 1300).expect("cooldown elapsed");
    assert_eq!(second.timestamp_ms, 1300);
    assert!(second.timestamp_ms - first.timestamp_ms > 1200);
}

#[test]
fn test_fuzzy_scenario() {
    let mut engine = WakeWordEngine::new();
    engine.configure("hey venue", Some(1)).unwrap();

    let event = engine.check("hey venu now", 0).unwrap();
    assert_eq!(event.matched_phrase, "hey venu");
    assert_eq!(event.distance, 1);
    assert_eq!(event.remainder, "now");
}

#[test]
fn test_short_transcript_scenario() {
    let mut engine = WakeWordEngine::new();
    assert!(engine.check("hey", 0).is_none());
    assert!(engine.check("", 0).is_none());
}

#[test]
fn test_empty_phrase_scenario() {
    let mut engine = WakeWordEngine::new();
    assert_eq!(engine.configure("", None), Err(ConfigError::EmptyPhrase));
    assert!(engine.check("hey venue", 0).is_some());
}

#[test]
fn test_events_respect_threshold_and_debounce() {
    let transcripts = [
        "hey venue",
        "hay venue",
        "hey menu",
        "they venue now",
        "hello there",
        "hey",
        "a hey venue b",
        "hay vinyl",
    ];
    for max_distance in 0..=3 {
        let mut engine = WakeWordEngine::with_settings(&EngineSettings {
            max_distance,
            ..EngineSettings::default()
        })
        .unwrap();
        let mut last: Option<u64> = None;
        for step in 0..64u64 {
            let now = step * 250;
            let text = transcripts[(step as usize * 7) % transcripts.len()];
            if let Some(event) = engine.check(text, now) {
                assert!(event.distance <= max_distance, "{event:?}");
                if let Some(prev) = last {
                    assert!(event.timestamp_ms - prev > 1200, "{prev} -> {}", event.timestamp_ms);
                }
                last = Some(event.timestamp_ms);
            }
        }
        assert!(last.is_some(), "max_distance {max_distance} never fired");
    }
}

#[test]
fn test_reconfigure_takes_effect_immediately() {
    let mut engine = WakeWordEngine::new();
    engine.configure("ok computer", None).unwrap();
    assert!(engine.check("hey venue", 0).is_none());
    assert!(engine.check("ok computer", 0).is_some());

    engine.configure("hey venue", None).unwrap();
    assert!(engine.check("ok computer", 10_000).is_none());
    assert!(engine.check("hey venue", 10_000).is_some());
}

#[test]
fn test_custom_debounce() {
    let mut engine = WakeWordEngine::with_settings(&EngineSettings {
        debounce_ms: 0,
        ..EngineSettings::default()
    })
    .unwrap();
    assert!(engine.check("hey venue", 5).is_some());
    assert!(engine.check("hey venue", 5).is_none());
    assert!(engine.check("hey venue", 6).is_some());
}

#[test]
fn test_worker_round_trip_over_json() {
    let worker = worker::spawn(WakeWordEngine::new());
    let script = [
        r#"{"type":"check","text":"hey venue please","now_ms":0}"#,
        r#"{"type":"check","text":"hey venue again","now_ms":500}"#,
        r#"{"type":"configure","phrase":"","max_distance":1}"#,
        r#"{"type":"configure","phrase":"hey venue","max_distance":-2}"#,
        r#"{"type":"check","text":"hey venue again","now_ms":1300}"#,
        r#"{"type":"shutdown"}"#,
    ];
    for line in script {
        let msg: Inbound = serde_json::from_str(line).unwrap();
        worker.tx.send(msg).unwrap();
    }

    let replies: Vec<serde_json::Value> = worker
        .rx
        .iter()
        .map(|reply: Outbound| serde_json::to_value(reply).unwrap())
        .collect();
    assert_eq!(replies.len(), 4);
    assert_eq!(replies[0]["type"], "detection");
    assert_eq!(replies[0]["detected"], true);
    assert_eq!(replies[0]["phrase"], "hey venue");
    assert_eq!(replies[0]["distance"], 0);
    assert_eq!(replies[0]["remainder"], "please");
    assert_eq!(replies[1]["type"], "rejected");
    assert_eq!(replies[2]["reason"], "max distance must be non-negative, got -2");
    assert_eq!(replies[3]["timestamp_ms"], 1300);

    let stats = worker.join();
    assert_eq!(stats.detections, 2);
    assert_eq!(stats.rejected_configs, 2);
}
