#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// No source attached, or torn down.
    #[default]
    Idle,
    /// Source assigned, waiting for it to become ready.
    Loading,
    Ready,
    /// A jump is in flight.
    Seeking,
}

/// Read-only view of the controller, as handed to the UI.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct PublishedState {
    pub phase: Phase,
    pub current_time_ms: i64,
    pub is_playing: bool,
    pub is_seeking: bool,
    pub active_segment_id: Option<String>,
    pub needs_manual_play_prompt: bool,
    pub playback_rate: f64,
    /// Message for the error panel after a fatal playback failure.
    pub error: Option<String>,
}

impl Default for PublishedState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            current_time_ms: 0,
            is_playing: false,
            is_seeking: false,
            active_segment_id: None,
            needs_manual_play_prompt: false,
            playback_rate: 1.0,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_camel_case() {
        let json = serde_json::to_value(PublishedState::default()).unwrap();
        assert_eq!(json["phase"], "idle");
        assert_eq!(json["currentTimeMs"], 0);
        assert_eq!(json["needsManualPlayPrompt"], false);
        assert_eq!(json["activeSegmentId"], serde_json::Value::Null);
        assert_eq!(json["playbackRate"], 1.0);
    }
}
