use crate::id::{IdGenerator, UuidIdGen};
use crate::types::{RawTranscript, RawUtterance, Transcript, Utterance};

/// Persisted shape of one segment. Word timing is deliberately absent so the
/// stored payload stays small and edits never re-send it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct CompactUtterance {
    #[serde(rename = "start")]
    pub start_ms: i64,
    #[serde(rename = "end")]
    pub end_ms: i64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct CompactTranscript {
    pub utterances: Vec<CompactUtterance>,
}

impl CompactTranscript {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn compact(transcript: &Transcript) -> CompactTranscript {
    CompactTranscript {
        utterances: transcript
            .iter()
            .map(|u| CompactUtterance {
                start_ms: u.start_ms,
                end_ms: u.end_ms,
                text: u.text.clone(),
                id: Some(u.id.clone()),
                speaker: u.speaker.clone(),
            })
            .collect(),
    }
}

impl From<&Transcript> for CompactTranscript {
    fn from(transcript: &Transcript) -> Self {
        compact(transcript)
    }
}

impl Transcript {
    /// Rebuild from the persisted shape. Entries stored without an id get a
    /// fresh one; word lists come back empty.
    pub fn from_compact(compact: CompactTranscript, id_gen: &mut dyn IdGenerator) -> Self {
        Transcript::new(
            compact
                .utterances
                .into_iter()
                .map(|c| Utterance {
                    id: c.id.unwrap_or_else(|| id_gen.next_id()),
                    start_ms: c.start_ms,
                    end_ms: c.end_ms,
                    text: c.text,
                    speaker: c.speaker,
                    words: Vec::new(),
                })
                .collect(),
        )
    }
}

impl From<CompactTranscript> for Transcript {
    fn from(compact: CompactTranscript) -> Self {
        Transcript::from_compact(compact, &mut UuidIdGen)
    }
}

impl From<CompactTranscript> for RawTranscript {
    fn from(compact: CompactTranscript) -> Self {
        RawTranscript {
            utterances: compact
                .utterances
                .into_iter()
                .map(|c| RawUtterance {
                    id: c.id,
                    start_ms: c.start_ms,
                    end_ms: c.end_ms,
                    text: c.text,
                    speaker: c.speaker,
                    words: Vec::new(),
                })
                .collect(),
            words: Vec::new(),
        }
    }
}
