use crate::types::Word;

/// How much unmatched text may sit between two aligned words before a match
/// is considered a false positive further down the utterance.
const MAX_ALIGN_SKIP: usize = 64;

const SENTENCE_END: [char; 7] = ['.', '?', '!', '…', '。', '？', '！'];
const CLOSING: [char; 7] = ['"', '\'', ')', ']', '”', '’', '»'];

pub(crate) fn ends_sentence(token: &str) -> bool {
    token
        .trim_end()
        .trim_end_matches(CLOSING)
        .ends_with(SENTENCE_END)
}

/// Byte span of each word inside `text`.
///
/// The utterance text is the oracle for where words sit. Tokens are matched
/// left to right; a token that cannot be found gets an empty span at the
/// current position so every cut derived from the spans stays monotonic.
pub(crate) fn align_words(text: &str, words: &[Word]) -> Vec<(usize, usize)> {
    let mut spans = Vec::with_capacity(words.len());
    let mut pos = 0;

    for word in words {
        let span = find_token(text, pos, word.text.trim()).unwrap_or((pos, pos));
        pos = span.1;
        spans.push(span);
    }

    spans
}

fn find_token(text: &str, pos: usize, token: &str) -> Option<(usize, usize)> {
    if token.is_empty() {
        return None;
    }

    let bare = token.trim_matches(|c: char| !c.is_alphanumeric());
    [token, bare]
        .into_iter()
        .filter(|needle| !needle.is_empty())
        .find_map(|needle| {
            let found = text[pos..].find(needle)?;
            (found <= MAX_ALIGN_SKIP).then(|| (pos + found, pos + found + needle.len()))
        })
}

/// Char index of a cut at or before char index `ideal`, searched no further
/// back than char index `floor`.
///
/// Preference order: right after a sentence end within `window` chars of
/// `ideal`, then right before the nearest whitespace, then a hard cut at
/// `ideal`. The flag reports whether the hard cut was needed.
pub(crate) fn snap_cut(
    chars: &[(usize, char)],
    floor: usize,
    ideal: usize,
    window: usize,
) -> (usize, bool) {
    let ideal = ideal.min(chars.len());
    if ideal <= floor {
        return (floor, false);
    }

    let sentence_floor = ideal.saturating_sub(window).max(floor + 1);
    for idx in (sentence_floor..=ideal).rev() {
        let closes = SENTENCE_END.contains(&chars[idx - 1].1);
        let followed_by_space = chars.get(idx).is_none_or(|(_, c)| c.is_whitespace());
        if closes && followed_by_space {
            return (idx, false);
        }
    }

    for idx in ((floor + 1)..=ideal.min(chars.len().saturating_sub(1))).rev() {
        if chars[idx].1.is_whitespace() {
            return (idx, false);
        }
    }

    (ideal, true)
}

/// Byte offset of char index `idx`, where `chars.len()` maps to the end.
pub(crate) fn byte_offset(chars: &[(usize, char)], text_len: usize, idx: usize) -> usize {
    chars.get(idx).map_or(text_len, |(b, _)| *b)
}
