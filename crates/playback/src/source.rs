use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::MediaError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Native signals emitted by an audio backend.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    BeganPlaying,
    Paused,
    Ended,
    SeekCompleted,
    ReadyToPlay,
    DataLoaded,
    TimeUpdate { position_ms: i64 },
    Error(MediaError),
}

/// The audio backend capability the controller drives.
///
/// Exactly one owner mutates a source. Everything else reads published
/// state. Any backend that can report its own play/pause/seek signals through
/// [`MediaSource::subscribe`] is acceptable, which keeps the controller
/// testable against an in-memory fake.
///
/// # Object safety
///
/// `play` returns an explicit [`BoxFuture`] so the trait can be used as
/// `dyn MediaSource`. The future must not borrow the source: it settles after
/// the controller has moved on to other work.
pub trait MediaSource: Send + 'static {
    /// Currently assigned resource, if any.
    fn source(&self) -> Option<String>;
    fn set_source(&mut self, url: &str);
    fn load(&mut self);

    fn current_time_ms(&self) -> i64;
    fn set_current_time_ms(&mut self, position_ms: i64);
    /// `None` until the resource's metadata is known.
    fn duration_ms(&self) -> Option<i64>;

    fn is_paused(&self) -> bool;
    fn is_ready_to_play(&self) -> bool;
    /// Whether enough data is buffered at `position_ms` to resume there
    /// without waiting for a seek acknowledgment.
    fn is_buffered_at(&self, position_ms: i64) -> bool;

    fn play(&mut self) -> BoxFuture<'static, Result<(), MediaError>>;
    fn pause(&mut self);
    fn set_playback_rate(&mut self, rate: f64);

    /// Stream of native events. Called once by the owner before any other
    /// operation.
    fn subscribe(&mut self) -> UnboundedReceiver<MediaEvent>;
}
