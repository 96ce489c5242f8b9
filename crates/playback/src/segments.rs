use cast_transcript::{Timed, Transcript, locate};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Span {
    id: String,
    start_ms: i64,
    end_ms: i64,
}

impl Timed for Span {
    fn start_ms(&self) -> i64 {
        self.start_ms
    }

    fn end_ms(&self) -> i64 {
        self.end_ms
    }
}

/// Segment intervals used to resolve the active segment for a playback
/// position. Only ids and times are kept; text stays with the transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentIndex {
    spans: Vec<Span>,
}

impl SegmentIndex {
    pub fn new(transcript: &Transcript) -> Self {
        let mut spans: Vec<Span> = transcript
            .iter()
            .map(|u| Span {
                id: u.id.clone(),
                start_ms: u.start_ms,
                end_ms: u.end_ms,
            })
            .collect();
        spans.sort_by_key(|s| s.start_ms);
        Self { spans }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn active_at(&self, position_ms: i64) -> Option<&str> {
        locate(&self.spans, position_ms).map(|idx| self.spans[idx].id.as_str())
    }
}

impl From<&Transcript> for SegmentIndex {
    fn from(transcript: &Transcript) -> Self {
        Self::new(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cast_transcript::Utterance;

    #[test]
    fn resolves_active_segment() {
        let index = SegmentIndex::new(&Transcript::new(vec![
            Utterance::new("a", 0, 1_000, "One."),
            Utterance::new("b", 1_000, 2_000, "Two."),
            Utterance::new("c", 5_000, 6_000, "Three."),
        ]));

        assert_eq!(index.len(), 3);
        assert_eq!(index.active_at(0), Some("a"));
        assert_eq!(index.active_at(1_000), Some("b"));
        assert_eq!(index.active_at(3_000), None);
        assert_eq!(index.active_at(5_999), Some("c"));
        assert_eq!(index.active_at(6_000), None);
        assert_eq!(index.active_at(-1), None);
    }
}
