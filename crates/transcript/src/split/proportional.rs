use super::Piece;
use super::text::{byte_offset, snap_cut};
use crate::config::SplitConfig;
use crate::types::{Timed, Utterance};

/// Plan pieces for an utterance without word timing.
///
/// Time is cut every `limit` ms. The text is cut at the matching fraction of
/// its length, snapped back to a sentence end or whitespace; the last piece
/// takes whatever remains, so no characters drift or go missing.
pub(super) fn plan(utterance: &Utterance, config: &SplitConfig) -> Vec<Piece> {
    let limit = config.limit();
    let text = &utterance.text;
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let total_ms = utterance.duration_ms();
    let window = scale(chars.len(), config.window(), total_ms);

    let mut pieces = Vec::new();
    let mut start_ms = utterance.start_ms;
    let mut floor = 0;

    while utterance.end_ms - start_ms > limit {
        let end_ms = start_ms + limit;
        let ideal = scale(chars.len(), end_ms - utterance.start_ms, total_ms);
        let (cut, forced) = snap_cut(&chars, floor, ideal, window);
        if forced {
            tracing::debug!(
                utterance_id = %utterance.id,
                at_ms = end_ms,
                "segmentation_degenerate_forced_split"
            );
        }

        pieces.push(Piece {
            start_ms,
            end_ms,
            text: byte_offset(&chars, text.len(), floor)..byte_offset(&chars, text.len(), cut),
            words: 0..0,
        });
        floor = cut;
        start_ms = end_ms;
    }

    pieces.push(Piece {
        start_ms,
        end_ms: utterance.end_ms,
        text: byte_offset(&chars, text.len(), floor)..text.len(),
        words: 0..0,
    });

    pieces
}

/// Byte offset that divides `text` at `elapsed_ms` out of `total_ms`, snapped
/// like [`plan`] does.
pub(crate) fn proportional_cut(text: &str, elapsed_ms: i64, total_ms: i64, window_ms: i64) -> usize {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let ideal = scale(chars.len(), elapsed_ms, total_ms);
    let window = scale(chars.len(), window_ms, total_ms);
    let (cut, _) = snap_cut(&chars, 0, ideal, window);
    byte_offset(&chars, text.len(), cut)
}

fn scale(len: usize, part_ms: i64, total_ms: i64) -> usize {
    if total_ms <= 0 {
        return 0;
    }
    let fraction = (part_ms.max(0) as f64 / total_ms as f64).min(1.0);
    (len as f64 * fraction).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cut_lands_on_whitespace() {
        let text = "alpha beta gamma delta";
        let cut = proportional_cut(text, 50, 100, 0);
        assert_eq!(&text[..cut], "alpha beta");
    }

    #[test]
    fn scale_is_clamped() {
        assert_eq!(scale(10, 200, 100), 10);
        assert_eq!(scale(10, -5, 100), 0);
        assert_eq!(scale(10, 5, 0), 0);
    }
}
