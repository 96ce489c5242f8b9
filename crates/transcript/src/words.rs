use crate::types::{Timed, Word};

/// Assign each word to the first utterance whose interval it overlaps.
///
/// Both slices must be sorted ascending by start time. Intervals are
/// half-open, so a word starting exactly where an utterance ends belongs to
/// the next one. Noise words (confidence exactly 0) are never assigned.
///
/// Single cursor sweep, O(U + W): full-episode transcripts routinely carry
/// tens of thousands of words.
pub fn map_words<U: Timed>(utterances: &[U], words: &[Word]) -> Vec<Vec<Word>> {
    let mut assigned = Vec::with_capacity(utterances.len());
    let mut cursor = 0;

    for utterance in utterances {
        let (start, end) = (utterance.start_ms(), utterance.end_ms());

        while cursor < words.len() && ends_before(&words[cursor], start) {
            cursor += 1;
        }

        let mut owned = Vec::new();
        while cursor < words.len() && words[cursor].start_ms < end {
            let word = &words[cursor];
            if overlaps(word, start, end) && !word.is_noise() {
                owned.push(word.clone());
            }
            cursor += 1;
        }

        assigned.push(owned);
    }

    assigned
}

fn ends_before(word: &Word, start: i64) -> bool {
    word.start_ms < start && word.end_ms <= start
}

pub(crate) fn overlaps(word: &Word, start: i64, end: i64) -> bool {
    word.start_ms < end && !ends_before(word, start)
}
