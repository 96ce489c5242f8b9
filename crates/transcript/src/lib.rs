pub mod compact;
pub mod config;
mod edit;
mod error;
pub mod id;
pub mod normalize;
pub mod split;
pub mod types;
pub mod words;

pub use compact::{CompactTranscript, CompactUtterance, compact};
pub use config::{DEFAULT_SENTENCE_WINDOW_MS, MAX_SEGMENT_DURATION_MS, SplitConfig};
pub use error::{Error, Result};
pub use id::{IdGenerator, SequentialIdGen, UuidIdGen, derive_segment_id, source_id_of};
pub use normalize::{TranscriptNormalizer, normalize};
pub use split::split_utterance;
pub use types::{RawTranscript, RawUtterance, Timed, Transcript, Utterance, Word, locate};
pub use words::map_words;
