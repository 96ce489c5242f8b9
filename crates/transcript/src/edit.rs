//! Editor operations. Each keeps the transcript sorted, free of blank
//! segments and within the duration bound.

use crate::config::SplitConfig;
use crate::id::derive_segment_id;
use crate::split::text::align_words;
use crate::split::{proportional_cut, split_utterance};
use crate::types::{Timed, Transcript, Utterance};
use crate::{Error, Result};

impl Transcript {
    fn position(&self, id: &str) -> Result<usize> {
        self.utterances
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| Error::UtteranceNotFound(id.to_string()))
    }

    pub fn delete_utterance(&mut self, id: &str) -> Result<Utterance> {
        let idx = self.position(id)?;
        Ok(self.utterances.remove(idx))
    }

    /// Replace the text of one utterance. Blank text removes it. Word timing
    /// no longer matches edited text, so it is dropped.
    pub fn update_text(&mut self, id: &str, text: impl Into<String>) -> Result<()> {
        let idx = self.position(id)?;
        let text = text.into();

        if text.trim().is_empty() {
            self.utterances.remove(idx);
        } else {
            let utterance = &mut self.utterances[idx];
            utterance.text = text;
            utterance.words.clear();
        }

        Ok(())
    }

    /// Cut one utterance in two at `at_ms`, which must lie strictly inside it.
    ///
    /// With word timing the cut moves off any word it lands inside, to that
    /// word's nearer edge, and the text is divided where the first right-hand
    /// word sits. Without it the text is divided proportionally. Returns the
    /// ids of the resulting non-blank parts.
    pub fn split_utterance(&mut self, id: &str, at_ms: i64) -> Result<Vec<String>> {
        let idx = self.position(id)?;
        let source = &self.utterances[idx];

        if at_ms <= source.start_ms || at_ms >= source.end_ms {
            return Err(Error::SplitPointOutOfRange {
                id: id.to_string(),
                at_ms,
            });
        }

        let (at_ms, left_words, right_words, cut) = match word_cut(source, at_ms) {
            Some((boundary, cut_ms)) => {
                let spans = align_words(&source.text, &source.words);
                let cut = spans.get(boundary).map_or(source.text.len(), |span| span.0);
                let (left, right) = source.words.split_at(boundary);
                (cut_ms, left, right, cut)
            }
            None => {
                if !source.words.is_empty() {
                    tracing::debug!(utterance_id = %source.id, at_ms, "split_drops_word_timing");
                }
                let cut = proportional_cut(
                    &source.text,
                    at_ms - source.start_ms,
                    source.duration_ms(),
                    0,
                );
                (at_ms, &[][..], &[][..], cut)
            }
        };

        let parts: Vec<Utterance> = [
            Utterance {
                id: derive_segment_id(&source.id, 1),
                start_ms: source.start_ms,
                end_ms: at_ms,
                text: source.text[..cut].trim().to_string(),
                speaker: source.speaker.clone(),
                words: left_words.to_vec(),
            },
            Utterance {
                id: derive_segment_id(&source.id, 2),
                start_ms: at_ms,
                end_ms: source.end_ms,
                text: source.text[cut..].trim().to_string(),
                speaker: source.speaker.clone(),
                words: right_words.to_vec(),
            },
        ]
        .into_iter()
        .filter(|u| !u.is_blank())
        .collect();

        let ids = parts.iter().map(|u| u.id.clone()).collect();
        self.utterances.splice(idx..=idx, parts);
        Ok(ids)
    }

    /// Join an utterance with the one after it. The result goes back through
    /// the splitter, so merging two long turns can yield more than one id.
    /// Word timing survives only when both sides carry it.
    pub fn merge_with_next(&mut self, id: &str, config: &SplitConfig) -> Result<Vec<String>> {
        let idx = self.position(id)?;
        if idx + 1 >= self.utterances.len() {
            return Err(Error::NothingToMerge(id.to_string()));
        }

        let next = self.utterances.remove(idx + 1);
        let first = &self.utterances[idx];

        let words = if first.words.is_empty() == next.words.is_empty() {
            first.words.iter().cloned().chain(next.words).collect()
        } else {
            Vec::new()
        };

        let merged = Utterance {
            id: first.id.clone(),
            start_ms: first.start_ms.min(next.start_ms),
            end_ms: first.end_ms.max(next.end_ms),
            text: format!("{} {}", first.text.trim(), next.text.trim()),
            speaker: first.speaker.clone().or(next.speaker),
            words,
        };

        let parts: Vec<Utterance> = split_utterance(merged, config)
            .into_iter()
            .filter(|u| !u.is_blank())
            .collect();
        let ids = parts.iter().map(|u| u.id.clone()).collect();
        self.utterances.splice(idx..=idx, parts);
        Ok(ids)
    }
}

/// Number of words left of a cut near `at_ms`, and the time of that cut.
///
/// The cut must lie strictly inside the utterance with every left word ending
/// and every right word starting on its side. A cut landing inside a word is
/// moved to whichever edge of that word is nearer, falling back to the other
/// edge. `None` when the utterance has no words or no such cut exists.
fn word_cut(utterance: &Utterance, at_ms: i64) -> Option<(usize, i64)> {
    let words = &utterance.words;
    if words.is_empty() {
        return None;
    }

    let fits = |boundary: usize, ms: i64| {
        ms > utterance.start_ms
            && ms < utterance.end_ms
            && words[..boundary].iter().all(|w| w.end_ms <= ms)
            && words[boundary..].iter().all(|w| w.start_ms >= ms)
    };

    let boundary = words.partition_point(|w| w.start_ms < at_ms);
    if fits(boundary, at_ms) {
        return Some((boundary, at_ms));
    }

    let straddled = &words[boundary.checked_sub(1)?];
    let before = (boundary - 1, straddled.start_ms);
    let after = (
        boundary,
        words[..boundary]
            .iter()
            .map(|w| w.end_ms)
            .max()
            .unwrap_or(straddled.end_ms),
    );
    let candidates = if at_ms - straddled.start_ms < straddled.end_ms - at_ms {
        [before, after]
    } else {
        [after, before]
    };

    candidates
        .into_iter()
        .find(|&(boundary, ms)| fits(boundary, ms))
}
