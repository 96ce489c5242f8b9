use crate::config::SplitConfig;
use crate::id::{IdGenerator, UuidIdGen};
use crate::split::split_utterance;
use crate::types::{RawTranscript, RawUtterance, Transcript, Utterance, is_sorted_by_start};
use crate::words::map_words;

/// Turns raw ASR output into a display-safe [`Transcript`].
///
/// Every output segment is within `config.max_segment_ms` (bar a single
/// oversized word) and has non-blank text. Nothing in here fails: degenerate
/// utterances degrade to a best-effort split instead of aborting the whole
/// transcript.
pub struct TranscriptNormalizer {
    config: SplitConfig,
    id_gen: Box<dyn IdGenerator>,
}

impl TranscriptNormalizer {
    pub fn new() -> Self {
        Self::with_config(SplitConfig::default(), UuidIdGen)
    }

    pub fn with_config(config: SplitConfig, id_gen: impl IdGenerator + 'static) -> Self {
        Self {
            config,
            id_gen: Box::new(id_gen),
        }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    pub fn normalize(&mut self, raw: RawTranscript) -> Transcript {
        let RawTranscript {
            mut utterances,
            mut words,
        } = raw;

        if !is_sorted_by_start(&utterances) {
            tracing::warn!("utterances_out_of_order");
            utterances.sort_by_key(|u| u.start_ms);
        }
        if !is_sorted_by_start(&words) {
            tracing::warn!("words_out_of_order");
            words.sort_by_key(|w| w.start_ms);
        }

        let input_count = utterances.len();
        let utterances: Vec<Utterance> = utterances
            .into_iter()
            .filter_map(|raw| self.adopt(raw))
            .collect();
        let matched = map_words(&utterances, &words);

        let segments: Vec<Utterance> = utterances
            .into_iter()
            .zip(matched)
            .flat_map(|(mut utterance, owned)| {
                if !owned.is_empty() {
                    utterance.words = owned;
                }
                utterance.cover_words();
                split_utterance(utterance, &self.config)
            })
            .filter(|segment| !segment.is_blank())
            .collect();

        tracing::debug!(
            utterances = input_count,
            words = words.len(),
            segments = segments.len(),
            "transcript_normalized"
        );

        Transcript::new(segments)
    }

    fn adopt(&mut self, raw: RawUtterance) -> Option<Utterance> {
        if raw.text.trim().is_empty() {
            return None;
        }

        let id = match raw.id {
            Some(id) if !id.is_empty() => id,
            _ => self.id_gen.next_id(),
        };

        Some(Utterance {
            id,
            start_ms: raw.start_ms,
            end_ms: raw.end_ms.max(raw.start_ms),
            text: raw.text,
            speaker: raw.speaker.filter(|s| !s.is_empty()),
            words: raw.words,
        })
    }
}

impl Default for TranscriptNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize with default settings and random ids.
pub fn normalize(raw: RawTranscript) -> Transcript {
    TranscriptNormalizer::new().normalize(raw)
}
