use super::Piece;
use super::text::{align_words, ends_sentence};
use crate::config::SplitConfig;
use crate::types::{Timed, Utterance};

/// Plan pieces for an utterance that carries word timing.
///
/// Words are accumulated greedily. When the next word would push the piece
/// past the limit, the piece closes on the latest sentence-ending word inside
/// the trailing window, or else on the last word that fits. Each piece starts
/// where the previous one ended.
pub(super) fn plan(utterance: &Utterance, config: &SplitConfig) -> Vec<Piece> {
    let words = &utterance.words;
    let limit = config.limit();
    let window = config.window();

    let mut bounds: Vec<(i64, i64, usize, usize)> = Vec::new();
    let mut chunk_start = utterance.start_ms;
    let mut next = 0;

    loop {
        let budget_end = chunk_start.saturating_add(limit);
        if utterance.end_ms <= budget_end {
            bounds.push((chunk_start, utterance.end_ms, next, words.len()));
            break;
        }

        let fits = words[next..]
            .iter()
            .take_while(|w| w.end_ms <= budget_end)
            .count();

        if fits == 0 {
            let end = match words.get(next) {
                Some(word) if word.start_ms >= budget_end => budget_end,
                None => budget_end,
                Some(word) if word.duration_ms() <= limit => word.start_ms,
                Some(word) => {
                    tracing::debug!(
                        utterance_id = %utterance.id,
                        word = %word.text,
                        duration_ms = word.duration_ms(),
                        "segmentation_degenerate_forced_split"
                    );
                    let end = word.end_ms.clamp(chunk_start, utterance.end_ms);
                    bounds.push((chunk_start, end, next, next + 1));
                    next += 1;
                    chunk_start = end;
                    continue;
                }
            };
            bounds.push((chunk_start, end, next, next));
            chunk_start = end;
            continue;
        }

        let last_fit = next + fits - 1;
        let cut = (next..=last_fit)
            .rev()
            .take_while(|&idx| words[idx].end_ms >= budget_end - window)
            .find(|&idx| ends_sentence(&words[idx].text))
            .unwrap_or(last_fit);

        let end = words[cut].end_ms.clamp(chunk_start, utterance.end_ms);
        bounds.push((chunk_start, end, next, cut + 1));
        next = cut + 1;
        chunk_start = end;
    }

    let spans = align_words(&utterance.text, words);
    let cuts = text_cuts(&bounds, &spans, utterance.text.len());

    bounds
        .into_iter()
        .enumerate()
        .map(|(idx, (start_ms, end_ms, first, last))| Piece {
            start_ms,
            end_ms,
            text: cuts[idx]..cuts[idx + 1],
            words: first..last,
        })
        .collect()
}

/// Text boundaries between pieces: each piece's text begins where its first
/// word was found. Wordless pieces take an empty slice. Computed back to
/// front so the boundaries never decrease.
fn text_cuts(bounds: &[(i64, i64, usize, usize)], spans: &[(usize, usize)], len: usize) -> Vec<usize> {
    let mut cuts = vec![len; bounds.len() + 1];
    cuts[0] = 0;

    let mut next = len;
    for idx in (1..bounds.len()).rev() {
        let (_, _, first, last) = bounds[idx];
        if first < last {
            next = next.min(spans[first].0);
        }
        cuts[idx] = next;
    }

    cuts
}
