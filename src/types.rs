use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Label that always escalates, regardless of score.
pub const THREAT_LABEL: &str = "threat";
/// Score above which any label escalates.
pub const SCORE_THRESHOLD: f64 = 0.4;

/// A detection record produced by the monitoring backend.
///
/// Fields default individually so a partially-populated record from the
/// backend still parses (a missing score reads as 0.0).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub top_label: String,
    #[serde(default)]
    pub top_score: f64,
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub clip_path: String,
}

impl Event {
    /// Escalation policy: threat label, or any label above the score
    /// threshold. Fixed constants, not user-configurable.
    pub fn is_significant(&self) -> bool {
        self.top_label == THREAT_LABEL || self.top_score > SCORE_THRESHOLD
    }

    /// One result-log line per received event: timestamp, label, score to
    /// three decimals, transcript.
    pub fn feed_line(&self) -> String {
        format!(
            "[{}] {} ({:.3})\n{}\n",
            self.timestamp, self.top_label, self.top_score, self.transcript
        )
    }
}

/// Outcome of an alert submission. The backend also reports per-channel
/// errors; they are diagnostic only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertResult {
    pub sms_sent: bool,
    pub email_sent: bool,
    #[serde(default)]
    pub sms_err: Option<String>,
    #[serde(default)]
    pub email_err: Option<String>,
}

/// Response to a poll cycle: zero or more queued events, plus a "latest
/// summary" object the current controller does not act on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PollResponse {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub latest: Value,
}

/// Result of uploading a clip for immediate analysis. `trigger` set means
/// the analyzed event should open a confirmation prompt, exactly as a
/// polled significant event would.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub event: Event,
    #[serde(default)]
    pub trigger: bool,
}

/// Literal status text returned by session start/stop.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionStatus {
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(label: &str, score: f64) -> Event {
        Event {
            timestamp: "2025-01-01 12:00:00".into(),
            top_label: label.into(),
            top_score: score,
            transcript: "help".into(),
            clip_path: "clips/c1.wav".into(),
        }
    }

    #[test]
    fn threat_label_is_significant_at_any_score() {
        assert!(event("threat", 0.0).is_significant());
    }

    #[test]
    fn high_score_is_significant_for_any_label() {
        assert!(event("calm", 0.41).is_significant());
    }

    #[test]
    fn threshold_is_exclusive() {
        assert!(!event("calm", 0.4).is_significant());
        assert!(!event("calm", 0.1).is_significant());
    }

    #[test]
    fn feed_line_renders_score_to_three_decimals() {
        let line = event("threat", 0.9).feed_line();
        assert_eq!(line, "[2025-01-01 12:00:00] threat (0.900)\nhelp\n");
    }

    #[test]
    fn poll_response_tolerates_latest_only_payload() {
        let parsed: PollResponse =
            serde_json::from_str(r#"{"latest": {"top_label": "calm"}}"#).unwrap();
        assert!(parsed.events.is_empty());
        assert!(parsed.latest.is_object());
    }

    #[test]
    fn event_parses_with_missing_score() {
        let parsed: Event =
            serde_json::from_str(r#"{"timestamp": "t", "top_label": "calm"}"#).unwrap();
        assert_eq!(parsed.top_score, 0.0);
        assert!(!parsed.is_significant());
    }
}
