pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to spawn playback actor: {0}")]
    Spawn(#[from] ractor::SpawnErr),
    #[error("playback actor is not running")]
    Send,
    #[error("playback actor call failed: {0}")]
    Rpc(String),
}

/// Failure reported by a [`crate::MediaSource`], either from a play attempt
/// or through its event stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    /// Interrupted by a superseding operation, e.g. an aborted load.
    #[error("media operation interrupted: {0}")]
    Transient(String),
    /// The environment refused to start playback without a user gesture.
    #[error("playback denied: {0}")]
    Denied(String),
    /// Decode or network failure on the audio resource.
    #[error("playback failed: {0}")]
    Fatal(String),
}

impl MediaError {
    pub fn is_transient(&self) -> bool {
        matches!(self, MediaError::Transient(_))
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, MediaError::Denied(_))
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, MediaError::Fatal(_))
    }
}
