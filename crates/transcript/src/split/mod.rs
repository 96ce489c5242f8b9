//! # Utterance splitting
//!
//! Bounds the duration of a single utterance so every resulting segment is
//! safe to display and navigate to.
//!
//! With word timing the cut points come from the words themselves
//! ([`timed`]); without it the text is divided proportionally to elapsed time
//! ([`proportional`]). Either way the pieces tile the original interval and
//! the original text exactly: no gaps, no overlaps, nothing dropped. Pieces
//! that end up with blank text (silence) are left for the caller to discard.

mod proportional;
pub(crate) mod text;
mod timed;

use std::ops::Range;

use crate::config::SplitConfig;
use crate::id::derive_segment_id;
use crate::types::{Timed, Utterance};

pub(crate) use proportional::proportional_cut;

/// One planned output piece, expressed as ranges into the source utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Piece {
    start_ms: i64,
    end_ms: i64,
    text: Range<usize>,
    words: Range<usize>,
}

/// Split one utterance so that no piece exceeds `config.max_segment_ms`.
///
/// An utterance already within the limit comes back unchanged as the only
/// element. Otherwise the pieces get ids derived from the source id, in
/// order. The only piece allowed to exceed the limit is one holding a single
/// word that is itself longer than the limit.
pub fn split_utterance(utterance: Utterance, config: &SplitConfig) -> Vec<Utterance> {
    if utterance.duration_ms() <= config.limit() {
        return vec![utterance];
    }

    let pieces = if utterance.words.is_empty() {
        proportional::plan(&utterance, config)
    } else {
        timed::plan(&utterance, config)
    };

    tracing::debug!(
        utterance_id = %utterance.id,
        duration_ms = utterance.duration_ms(),
        pieces = pieces.len(),
        "utterance_split"
    );

    pieces
        .into_iter()
        .enumerate()
        .map(|(idx, piece)| Utterance {
            id: derive_segment_id(&utterance.id, idx + 1),
            start_ms: piece.start_ms,
            end_ms: piece.end_ms,
            text: utterance.text[piece.text].trim().to_string(),
            speaker: utterance.speaker.clone(),
            words: utterance.words[piece.words].to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Word;

    fn squash(text: &str) -> String {
        text.split_whitespace().collect()
    }

    fn assert_tiles(source: &Utterance, pieces: &[Utterance]) {
        assert_eq!(pieces.first().unwrap().start_ms, source.start_ms);
        assert_eq!(pieces.last().unwrap().end_ms, source.end_ms);
        for pair in pieces.windows(2) {
            assert_eq!(pair[0].end_ms, pair[1].start_ms, "pieces must be contiguous");
        }
        let joined: String = pieces.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(squash(&joined), squash(&source.text));
    }

    /// 150 one-second words, with a sentence ending on the word that ends at 118s.
    fn long_timed_utterance() -> Utterance {
        let words: Vec<Word> = (0..150)
            .map(|i| {
                let text = if i == 117 { format!("w{i}.") } else { format!("w{i}") };
                Word::new(text, i * 1_000, i * 1_000 + 900)
            })
            .collect();
        let text = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Utterance::new("long", 0, 150_000, text).with_words(words)
    }

    #[test]
    fn short_utterance_is_returned_unchanged() {
        let utterance = Utterance::new("short", 0, 90_000, "Ninety seconds of talk.");
        let out = split_utterance(utterance.clone(), &SplitConfig::default());
        assert_eq!(out, vec![utterance]);
    }

    #[test]
    fn timed_split_closes_on_sentence_end_near_limit() {
        let source = long_timed_utterance();
        let out = split_utterance(source.clone(), &SplitConfig::default());

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].end_ms, 117_900);
        assert!(out[0].text.ends_with("w117."));
        assert!(out[1].text.starts_with("w118"));
        assert_eq!(out[0].id, "long#1");
        assert_eq!(out[1].id, "long#2");
        assert_eq!(out[0].words.len() + out[1].words.len(), 150);
        assert!(out.iter().all(|u| u.duration_ms() <= 120_000));
        assert_tiles(&source, &out);
    }

    #[test]
    fn timed_split_without_sentence_end_uses_last_fitting_word() {
        let mut source = long_timed_utterance();
        source.text = source.text.replace('.', "");
        for word in &mut source.words {
            word.text = word.text.replace('.', "");
        }

        let out = split_utterance(source.clone(), &SplitConfig::default());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].end_ms, 119_900);
        assert_eq!(out[0].words.last().unwrap().text, "w119");
        assert_tiles(&source, &out);
    }

    #[test]
    fn sentence_end_outside_window_is_ignored() {
        let source = long_timed_utterance();
        let config = SplitConfig::default().with_sentence_window_ms(1_000);
        let out = split_utterance(source.clone(), &config);
        assert_eq!(out[0].end_ms, 119_900);
        assert_tiles(&source, &out);
    }

    #[test]
    fn speaker_is_carried_to_every_piece() {
        let source = long_timed_utterance().with_speaker("host");
        let out = split_utterance(source, &SplitConfig::default());
        assert!(out.iter().all(|u| u.speaker.as_deref() == Some("host")));
    }

    #[test]
    fn oversized_single_word_is_forced_and_terminates() {
        let words = vec![
            Word::new("a", 0, 1_000),
            Word::new("looooong", 1_000, 10_000),
            Word::new("b", 10_000, 11_000),
        ];
        let source = Utterance::new("x", 0, 11_000, "a looooong b").with_words(words);
        let config = SplitConfig::default().with_max_segment_ms(3_000);

        let out = split_utterance(source.clone(), &config);
        assert_tiles(&source, &out);
        let long: Vec<_> = out.iter().filter(|u| u.duration_ms() > 3_000).collect();
        assert_eq!(long.len(), 1);
        assert_eq!(long[0].words.len(), 1);
        assert_eq!(long[0].words[0].text, "looooong");
    }

    #[test]
    fn long_silence_becomes_blank_pieces() {
        let words = vec![Word::new("hi", 0, 500), Word::new("bye", 9_500, 10_000)];
        let source = Utterance::new("x", 0, 10_000, "hi bye").with_words(words);
        let config = SplitConfig::default().with_max_segment_ms(3_000);

        let out = split_utterance(source.clone(), &config);
        assert_tiles(&source, &out);
        assert!(out.iter().all(|u| u.duration_ms() <= 3_000));
        let spoken: Vec<_> = out.iter().filter(|u| !u.is_blank()).collect();
        assert_eq!(spoken.len(), 2);
        assert_eq!(spoken[0].text, "hi");
        assert_eq!(spoken[1].text, "bye");
    }

    #[test]
    fn each_word_lands_in_exactly_one_piece() {
        let source = long_timed_utterance();
        let out = split_utterance(
            source.clone(),
            &SplitConfig::default().with_max_segment_ms(10_000),
        );
        let flattened: Vec<_> = out.iter().flat_map(|u| u.words.iter()).collect();
        assert_eq!(flattened.len(), source.words.len());
        assert!(flattened.iter().zip(&source.words).all(|(a, b)| *a == b));
        assert_tiles(&source, &out);
    }

    #[test]
    fn proportional_split_snaps_to_sentences() {
        let sentence = "This is one sentence of filler text. ";
        let text = sentence.repeat(20);
        let source = Utterance::new("p", 0, 300_000, text.trim_end());

        let out = split_utterance(source.clone(), &SplitConfig::default());
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].end_ms, 120_000);
        assert_eq!(out[1].end_ms, 240_000);
        for piece in &out[..2] {
            assert!(piece.text.ends_with('.'), "{:?}", piece.text);
        }
        assert_tiles(&source, &out);
    }

    #[test]
    fn proportional_split_of_unbroken_text_is_forced() {
        let source = Utterance::new("p", 0, 250_000, "x".repeat(250));
        let out = split_utterance(source.clone(), &SplitConfig::default());

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].text.len(), 120);
        assert_eq!(out[1].text.len(), 120);
        assert_eq!(out[2].text.len(), 10);
        assert_tiles(&source, &out);
    }
}
