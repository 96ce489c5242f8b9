use serde::{Deserialize, Serialize};

pub const MAX_SEGMENT_DURATION_MS: i64 = 120_000;

/// Roughly fifty words at a conversational 2.5 words per second.
pub const DEFAULT_SENTENCE_WINDOW_MS: i64 = 20_000;

fn default_max_segment_ms() -> i64 {
    MAX_SEGMENT_DURATION_MS
}

fn default_sentence_window_ms() -> i64 {
    DEFAULT_SENTENCE_WINDOW_MS
}

/// Tuning for the utterance splitter.
///
/// `sentence_window_ms` is how far back from the duration limit the splitter
/// looks for a sentence end before settling for a plain word boundary. It is
/// a heuristic, not a correctness property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfig {
    #[serde(default = "default_max_segment_ms")]
    pub max_segment_ms: i64,
    #[serde(default = "default_sentence_window_ms")]
    pub sentence_window_ms: i64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_segment_ms: MAX_SEGMENT_DURATION_MS,
            sentence_window_ms: DEFAULT_SENTENCE_WINDOW_MS,
        }
    }
}

impl SplitConfig {
    pub fn with_max_segment_ms(mut self, max_segment_ms: i64) -> Self {
        self.max_segment_ms = max_segment_ms;
        self
    }

    pub fn with_sentence_window_ms(mut self, sentence_window_ms: i64) -> Self {
        self.sentence_window_ms = sentence_window_ms;
        self
    }

    pub(crate) fn limit(&self) -> i64 {
        self.max_segment_ms.max(1)
    }

    pub(crate) fn window(&self) -> i64 {
        self.sentence_window_ms.clamp(0, self.limit())
    }
}
