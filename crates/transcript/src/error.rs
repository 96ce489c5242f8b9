pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("utterance not found: {0}")]
    UtteranceNotFound(String),
    #[error("split point {at_ms}ms is not inside utterance {id}")]
    SplitPointOutOfRange { id: String, at_ms: i64 },
    #[error("utterance {0} has no successor to merge with")]
    NothingToMerge(String),
}
