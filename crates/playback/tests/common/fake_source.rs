use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::FutureExt;
use playback::{BoxFuture, MediaError, MediaEvent, MediaSource};
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Succeed,
    Deny,
    Fail,
    /// Leave the attempt pending until [`FakeHandle::resolve_held`].
    Hold,
}

struct Inner {
    source: Option<String>,
    current_time_ms: i64,
    duration_ms: Option<i64>,
    paused: bool,
    ready: bool,
    buffered: bool,
    rate: f64,
    outcome: PlayOutcome,
    held: VecDeque<oneshot::Sender<Result<(), MediaError>>>,
    seeks: Vec<i64>,
    loads: usize,
    plays: usize,
    pauses: usize,
    events: Option<mpsc::UnboundedSender<MediaEvent>>,
}

impl Inner {
    fn emit(&self, event: MediaEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}

/// In-memory audio backend. The controller owns the [`FakeSource`]; the test
/// keeps the [`FakeHandle`] to drive native events and inspect calls.
pub struct FakeSource {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Clone)]
pub struct FakeHandle {
    inner: Arc<Mutex<Inner>>,
}

pub fn fake_source() -> (FakeSource, FakeHandle) {
    let inner = Arc::new(Mutex::new(Inner {
        source: None,
        current_time_ms: 0,
        duration_ms: None,
        paused: true,
        ready: false,
        buffered: true,
        rate: 1.0,
        outcome: PlayOutcome::Succeed,
        held: VecDeque::new(),
        seeks: Vec::new(),
        loads: 0,
        plays: 0,
        pauses: 0,
        events: None,
    }));

    (
        FakeSource {
            inner: inner.clone(),
        },
        FakeHandle { inner },
    )
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap()
}

impl MediaSource for FakeSource {
    fn source(&self) -> Option<String> {
        lock(&self.inner).source.clone()
    }

    fn set_source(&mut self, url: &str) {
        let mut inner = lock(&self.inner);
        inner.source = Some(url.to_string());
        inner.ready = false;
        inner.paused = true;
        inner.current_time_ms = 0;
    }

    fn load(&mut self) {
        let mut inner = lock(&self.inner);
        inner.loads += 1;
        inner.ready = false;
    }

    fn current_time_ms(&self) -> i64 {
        lock(&self.inner).current_time_ms
    }

    fn set_current_time_ms(&mut self, position_ms: i64) {
        let mut inner = lock(&self.inner);
        inner.seeks.push(position_ms);
        inner.current_time_ms = position_ms;
    }

    fn duration_ms(&self) -> Option<i64> {
        lock(&self.inner).duration_ms
    }

    fn is_paused(&self) -> bool {
        lock(&self.inner).paused
    }

    fn is_ready_to_play(&self) -> bool {
        lock(&self.inner).ready
    }

    fn is_buffered_at(&self, _position_ms: i64) -> bool {
        lock(&self.inner).buffered
    }

    fn play(&mut self) -> BoxFuture<'static, Result<(), MediaError>> {
        let mut inner = lock(&self.inner);
        inner.plays += 1;

        let outcome = inner.outcome;
        match outcome {
            PlayOutcome::Succeed => {
                inner.paused = false;
                inner.emit(MediaEvent::BeganPlaying);
                futures_util::future::ready(Ok(())).boxed()
            }
            PlayOutcome::Deny => futures_util::future::ready(Err(MediaError::Denied(
                "play() requires a user gesture".into(),
            )))
            .boxed(),
            PlayOutcome::Fail => {
                futures_util::future::ready(Err(MediaError::Fatal("decode error".into()))).boxed()
            }
            PlayOutcome::Hold => {
                let (tx, rx) = oneshot::channel();
                inner.held.push_back(tx);
                async move {
                    rx.await
                        .unwrap_or_else(|_| Err(MediaError::Transient("attempt dropped".into())))
                }
                .boxed()
            }
        }
    }

    fn pause(&mut self) {
        let mut inner = lock(&self.inner);
        inner.pauses += 1;
        if !inner.paused {
            inner.paused = true;
            inner.emit(MediaEvent::Paused);
        }
    }

    fn set_playback_rate(&mut self, rate: f64) {
        lock(&self.inner).rate = rate;
    }

    fn subscribe(&mut self) -> mpsc::UnboundedReceiver<MediaEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.inner).events = Some(tx);
        rx
    }
}

impl FakeHandle {
    pub fn set_outcome(&self, outcome: PlayOutcome) {
        lock(&self.inner).outcome = outcome;
    }

    pub fn set_buffered(&self, buffered: bool) {
        lock(&self.inner).buffered = buffered;
    }

    pub fn set_duration(&self, duration_ms: i64) {
        lock(&self.inner).duration_ms = Some(duration_ms);
    }

    pub fn become_ready(&self) {
        let mut inner = lock(&self.inner);
        inner.ready = true;
        inner.emit(MediaEvent::ReadyToPlay);
    }

    pub fn emit(&self, event: MediaEvent) {
        lock(&self.inner).emit(event);
    }

    /// Settle the oldest held play attempt. A successful attempt starts
    /// playback first, the way a real element fires `playing` before the
    /// promise resolves.
    pub fn resolve_held(&self, result: Result<(), MediaError>) {
        let mut inner = lock(&self.inner);
        let Some(tx) = inner.held.pop_front() else {
            panic!("no held play attempt");
        };
        if result.is_ok() {
            inner.paused = false;
            inner.emit(MediaEvent::BeganPlaying);
        }
        let _ = tx.send(result);
    }

    /// Playback started from outside the controller, e.g. a headset button.
    pub fn external_play(&self) {
        let mut inner = lock(&self.inner);
        inner.paused = false;
        inner.emit(MediaEvent::BeganPlaying);
    }

    pub fn external_pause(&self) {
        let mut inner = lock(&self.inner);
        inner.paused = true;
        inner.emit(MediaEvent::Paused);
    }

    pub fn source(&self) -> Option<String> {
        lock(&self.inner).source.clone()
    }

    pub fn is_paused(&self) -> bool {
        lock(&self.inner).paused
    }

    pub fn rate(&self) -> f64 {
        lock(&self.inner).rate
    }

    pub fn seeks(&self) -> Vec<i64> {
        lock(&self.inner).seeks.clone()
    }

    pub fn loads(&self) -> usize {
        lock(&self.inner).loads
    }

    pub fn plays(&self) -> usize {
        lock(&self.inner).plays
    }

    pub fn pauses(&self) -> usize {
        lock(&self.inner).pauses
    }
}
