/// Anything with a `[start, end)` time interval in milliseconds.
pub trait Timed {
    fn start_ms(&self) -> i64;
    fn end_ms(&self) -> i64;

    fn duration_ms(&self) -> i64 {
        (self.end_ms() - self.start_ms()).max(0)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct Word {
    #[serde(rename = "start")]
    pub start_ms: i64,
    #[serde(rename = "end")]
    pub end_ms: i64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Word {
    pub fn new(text: impl Into<String>, start_ms: i64, end_ms: i64) -> Self {
        Self {
            start_ms,
            end_ms,
            text: text.into(),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Words scored with a confidence of exactly zero are ASR filler. A missing
    /// confidence is not noise.
    pub fn is_noise(&self) -> bool {
        self.confidence == Some(0.0)
    }
}

/// One speech turn, or after splitting, one display-safe segment of it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct Utterance {
    pub id: String,
    #[serde(rename = "start")]
    pub start_ms: i64,
    #[serde(rename = "end")]
    pub end_ms: i64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    /// Transient word-level timing. Never part of the persisted shape.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<Word>,
}

impl Utterance {
    pub fn new(id: impl Into<String>, start_ms: i64, end_ms: i64, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start_ms,
            end_ms,
            text: text.into(),
            speaker: None,
            words: Vec::new(),
        }
    }

    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    pub fn with_words(mut self, words: Vec<Word>) -> Self {
        self.words = words;
        self
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Widen the interval so it contains every attached word.
    pub(crate) fn cover_words(&mut self) {
        if let Some(first) = self.words.iter().map(|w| w.start_ms).min() {
            self.start_ms = self.start_ms.min(first);
        }
        if let Some(last) = self.words.iter().map(|w| w.end_ms).max() {
            self.end_ms = self.end_ms.max(last);
        }
    }
}

/// Utterance as delivered by the transcription collaborator. The persisted
/// compact shape also parses as this, so either can be re-normalized.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawUtterance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "start")]
    pub start_ms: i64,
    #[serde(rename = "end")]
    pub end_ms: i64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<Word>,
}

impl RawUtterance {
    pub fn new(start_ms: i64, end_ms: i64, text: impl Into<String>) -> Self {
        Self {
            id: None,
            start_ms,
            end_ms,
            text: text.into(),
            speaker: None,
            words: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawTranscript {
    #[serde(default)]
    pub utterances: Vec<RawUtterance>,
    #[serde(default)]
    pub words: Vec<Word>,
}

impl RawTranscript {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Ordered segment list, ascending by start time.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct Transcript {
    pub utterances: Vec<Utterance>,
}

impl Transcript {
    pub fn new(utterances: Vec<Utterance>) -> Self {
        Self { utterances }
    }

    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Utterance> {
        self.utterances.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Utterance> {
        self.utterances.iter().find(|u| u.id == id)
    }

    /// The segment playing at `ms`, if any. Gaps between segments have none.
    pub fn segment_at(&self, ms: i64) -> Option<&Utterance> {
        locate(&self.utterances, ms).map(|idx| &self.utterances[idx])
    }

    pub fn duration_ms(&self) -> i64 {
        self.utterances.iter().map(|u| u.end_ms).max().unwrap_or(0)
    }

    pub fn text(&self) -> String {
        self.utterances
            .iter()
            .map(|u| u.text.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Timed for Word {
    fn start_ms(&self) -> i64 {
        self.start_ms
    }

    fn end_ms(&self) -> i64 {
        self.end_ms
    }
}

impl Timed for Utterance {
    fn start_ms(&self) -> i64 {
        self.start_ms
    }

    fn end_ms(&self) -> i64 {
        self.end_ms
    }
}

impl Timed for RawUtterance {
    fn start_ms(&self) -> i64 {
        self.start_ms
    }

    fn end_ms(&self) -> i64 {
        self.end_ms
    }
}

/// Index of the item whose `[start, end)` interval contains `ms`.
///
/// `items` must be sorted by start. When intervals overlap, the item that
/// started last wins.
pub fn locate<T: Timed>(items: &[T], ms: i64) -> Option<usize> {
    let idx = items.partition_point(|item| item.start_ms() <= ms);
    let candidate = idx.checked_sub(1)?;
    (ms < items[candidate].end_ms()).then_some(candidate)
}

pub(crate) fn is_sorted_by_start<T: Timed>(items: &[T]) -> bool {
    items.windows(2).all(|w| w[0].start_ms() <= w[1].start_ms())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript() -> Transcript {
        Transcript::new(vec![
            Utterance::new("a", 0, 1_000, "First."),
            Utterance::new("b", 1_000, 2_500, "Second."),
            Utterance::new("c", 4_000, 5_000, "Third."),
        ])
    }

    #[test]
    fn segment_at_finds_containing_segment() {
        let t = transcript();
        assert_eq!(t.segment_at(0).map(|u| u.id.as_str()), Some("a"));
        assert_eq!(t.segment_at(999).map(|u| u.id.as_str()), Some("a"));
        assert_eq!(t.segment_at(1_000).map(|u| u.id.as_str()), Some("b"));
        assert_eq!(t.segment_at(4_500).map(|u| u.id.as_str()), Some("c"));
    }

    #[test]
    fn segment_at_gap_and_out_of_range_is_none() {
        let t = transcript();
        assert!(t.segment_at(-1).is_none());
        assert!(t.segment_at(3_000).is_none());
        assert!(t.segment_at(5_000).is_none());
        assert!(Transcript::default().segment_at(0).is_none());
    }

    #[test]
    fn raw_transcript_accepts_null_speaker_and_missing_words() {
        let raw = RawTranscript::from_json(
            r#"{"utterances":[{"start":0,"end":900,"text":"Hi","speaker":null}]}"#,
        )
        .unwrap();
        assert_eq!(raw.utterances.len(), 1);
        assert!(raw.utterances[0].speaker.is_none());
        assert!(raw.words.is_empty());
    }

    #[test]
    fn word_confidence_is_optional_on_the_wire() {
        let words: Vec<Word> = serde_json::from_str(
            r#"[{"start":0,"end":10,"text":"a"},{"start":10,"end":20,"text":"b","confidence":0}]"#,
        )
        .unwrap();
        assert!(!words[0].is_noise());
        assert!(words[1].is_noise());
    }

    #[test]
    fn cover_words_widens_interval() {
        let mut u = Utterance::new("x", 100, 200, "a b")
            .with_words(vec![Word::new("a", 90, 150), Word::new("b", 150, 230)]);
        u.cover_words();
        assert_eq!((u.start_ms, u.end_ms), (90, 230));
    }
}
