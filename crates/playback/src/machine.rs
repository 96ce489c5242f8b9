//! # Playback state machine
//!
//! `Idle → Loading → Ready ⇄ Seeking`, owned by a single writer.
//!
//! Every method is synchronous and takes the current instant. Anything that
//! has to wait (a play attempt settling, a seek acknowledgment, a deferred
//! `isPlaying` change) comes back as a [`Directive`] for the driver to
//! schedule, and returns through [`PlaybackMachine::on_play_settled`],
//! [`PlaybackMachine::on_seek_timeout`] or [`PlaybackMachine::on_tick`].
//!
//! Stale completions are discarded by token: every operation that
//! supersedes earlier work bumps a version, and a play result is applied only
//! if its token is still the current version.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::PlaybackConfig;
use crate::error::MediaError;
use crate::segments::SegmentIndex;
use crate::source::{BoxFuture, MediaEvent, MediaSource};
use crate::state::{Phase, PublishedState};
use crate::throttle::{Offer, ToggleThrottle};

/// Work the driver must schedule on behalf of the machine.
pub enum Directive {
    /// Drive `attempt` to completion, then report through
    /// [`PlaybackMachine::on_play_settled`] with `token`.
    AwaitPlay {
        token: u64,
        attempt: BoxFuture<'static, Result<(), MediaError>>,
    },
    /// Call [`PlaybackMachine::on_seek_timeout`] with `token` after `after`.
    SeekTimeout { token: u64, after: Duration },
    /// Call [`PlaybackMachine::on_tick`] at `at`.
    FlushToggle { at: Instant },
}

impl fmt::Debug for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::AwaitPlay { token, .. } => f
                .debug_struct("AwaitPlay")
                .field("token", token)
                .finish_non_exhaustive(),
            Directive::SeekTimeout { token, after } => f
                .debug_struct("SeekTimeout")
                .field("token", token)
                .field("after", after)
                .finish(),
            Directive::FlushToggle { at } => {
                f.debug_struct("FlushToggle").field("at", at).finish()
            }
        }
    }
}

#[derive(Debug, Clone)]
struct PendingJump {
    target_ms: i64,
    play_after: bool,
    /// Source the jump was aimed at. `None` when nothing was attached yet, in
    /// which case the next episode adopts it.
    source: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct SeekInFlight {
    token: u64,
    play_after: bool,
}

pub struct PlaybackMachine {
    config: PlaybackConfig,
    media: Box<dyn MediaSource>,
    phase: Phase,
    version: u64,
    pending_jump: Option<PendingJump>,
    seek: Option<SeekInFlight>,
    last_jump_id: Option<String>,
    wants_playing: bool,
    resume_playing: bool,
    throttle: ToggleThrottle,
    segments: SegmentIndex,
    current_time_ms: i64,
    playback_rate: f64,
    needs_manual_play: bool,
    error: Option<String>,
}

impl PlaybackMachine {
    pub fn new(media: Box<dyn MediaSource>, config: PlaybackConfig) -> Self {
        Self {
            throttle: ToggleThrottle::new(config.toggle_throttle()),
            config,
            media,
            phase: Phase::Idle,
            version: 0,
            pending_jump: None,
            seek: None,
            last_jump_id: None,
            wants_playing: false,
            resume_playing: false,
            segments: SegmentIndex::default(),
            current_time_ms: 0,
            playback_rate: 1.0,
            needs_manual_play: false,
            error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn published(&self) -> PublishedState {
        PublishedState {
            phase: self.phase,
            current_time_ms: self.current_time_ms,
            is_playing: self.throttle.published(),
            is_seeking: self.phase == Phase::Seeking,
            active_segment_id: self
                .segments
                .active_at(self.current_time_ms)
                .map(str::to_string),
            needs_manual_play_prompt: self.needs_manual_play,
            playback_rate: self.playback_rate,
            error: self.error.clone(),
        }
    }

    /// Attach `url` unless it is already the loaded source.
    ///
    /// Supersedes every in-flight operation. A pending jump aimed at another
    /// source is dropped.
    pub fn load_episode(&mut self, url: &str, now: Instant) -> Vec<Directive> {
        if self.phase != Phase::Idle && self.media.source().as_deref() == Some(url) {
            tracing::debug!(url, "episode_unchanged");
            return Vec::new();
        }

        self.next_version();
        self.seek = None;
        self.pending_jump = self.pending_jump.take().and_then(|jump| match &jump.source {
            Some(source) if source != url => {
                tracing::debug!(jump_source = %source, "pending_jump_superseded");
                None
            }
            _ => Some(PendingJump {
                source: Some(url.to_string()),
                ..jump
            }),
        });

        self.wants_playing = false;
        self.needs_manual_play = false;
        self.error = None;
        self.current_time_ms = self.pending_jump.as_ref().map_or(0, |j| j.target_ms.max(0));

        if !self.media.is_paused() {
            self.media.pause();
        }
        self.media.set_source(url);
        self.media.load();
        self.phase = Phase::Loading;

        tracing::info!(url, "episode_loading");
        self.reconcile(now)
    }

    /// Move playback to `target_ms`. A `jump_id` equal to the last processed
    /// one is ignored. While nothing is ready the jump is held until the
    /// source becomes ready.
    pub fn request_jump(
        &mut self,
        target_ms: i64,
        jump_id: &str,
        play_after: bool,
        now: Instant,
    ) -> Vec<Directive> {
        if self.last_jump_id.as_deref() == Some(jump_id) {
            tracing::debug!(jump_id, "jump_duplicate_ignored");
            return Vec::new();
        }
        self.last_jump_id = Some(jump_id.to_string());
        tracing::debug!(jump_id, target_ms, play_after, "jump_requested");

        match self.phase {
            Phase::Idle | Phase::Loading => {
                self.current_time_ms = target_ms.max(0);
                let source = match self.phase {
                    Phase::Idle => None,
                    _ => self.media.source(),
                };
                self.pending_jump = Some(PendingJump {
                    target_ms,
                    play_after,
                    source,
                });
                Vec::new()
            }
            Phase::Ready | Phase::Seeking => self.start_jump(target_ms, play_after, now),
        }
    }

    pub fn toggle_play_pause(&mut self, now: Instant) -> Vec<Directive> {
        match self.phase {
            Phase::Idle | Phase::Loading => {
                tracing::debug!(phase = ?self.phase, "toggle_ignored");
                Vec::new()
            }
            Phase::Seeking => {
                let resumes = self.seek.is_some_and(|s| s.play_after);
                if resumes || self.wants_playing || !self.media.is_paused() {
                    self.pause(now)
                } else {
                    if let Some(seek) = &mut self.seek {
                        seek.play_after = true;
                    }
                    Vec::new()
                }
            }
            Phase::Ready => {
                if self.wants_playing || !self.media.is_paused() {
                    self.pause(now)
                } else {
                    self.attempt_play()
                }
            }
        }
    }

    /// Jump relative to the current position. Ignored until a source is ready.
    pub fn skip(&mut self, delta_seconds: f64, now: Instant) -> Vec<Directive> {
        if matches!(self.phase, Phase::Idle | Phase::Loading) || !delta_seconds.is_finite() {
            tracing::debug!(phase = ?self.phase, delta_seconds, "skip_ignored");
            return Vec::new();
        }

        let target = self
            .current_time_ms
            .saturating_add((delta_seconds * 1000.0).round() as i64);
        let play_after = self.seek.is_some_and(|s| s.play_after);
        self.start_jump(target, play_after, now)
    }

    /// Returns the applied rate, or `None` if `rate` was rejected.
    pub fn set_playback_rate(&mut self, rate: f64) -> Option<f64> {
        let Some(applied) = self.config.clamp_rate(rate) else {
            tracing::warn!(rate, "playback_rate_rejected");
            return None;
        };

        self.playback_rate = applied;
        if matches!(self.phase, Phase::Ready | Phase::Seeking) {
            self.media.set_playback_rate(applied);
        }
        Some(applied)
    }

    pub fn set_segments(&mut self, segments: SegmentIndex) {
        self.segments = segments;
    }

    /// Reload the current source after a fatal failure and resume from the
    /// last known position.
    pub fn retry(&mut self, now: Instant) -> Vec<Directive> {
        if self.error.is_none() {
            return Vec::new();
        }
        let Some(source) = self.media.source() else {
            return Vec::new();
        };

        tracing::info!(%source, position_ms = self.current_time_ms, "playback_retry");
        self.next_version();
        self.error = None;
        self.seek = None;
        self.pending_jump = Some(PendingJump {
            target_ms: self.current_time_ms,
            play_after: self.resume_playing,
            source: Some(source),
        });
        self.media.load();
        self.phase = Phase::Loading;
        self.reconcile(now)
    }

    pub fn on_event(&mut self, event: MediaEvent, now: Instant) -> Vec<Directive> {
        if self.phase == Phase::Idle {
            return Vec::new();
        }

        match event {
            MediaEvent::BeganPlaying => {
                self.needs_manual_play = false;
                self.offer_playing(true, now)
            }
            MediaEvent::Paused | MediaEvent::Ended => {
                self.wants_playing = false;
                self.offer_playing(false, now)
            }
            MediaEvent::SeekCompleted => self.finish_seek(),
            MediaEvent::ReadyToPlay | MediaEvent::DataLoaded => {
                // Readiness queued for a source replaced since is not ours.
                if self.phase == Phase::Loading && self.media.is_ready_to_play() {
                    self.become_ready(now)
                } else {
                    tracing::debug!(phase = ?self.phase, "readiness_ignored");
                    Vec::new()
                }
            }
            MediaEvent::TimeUpdate { position_ms } => {
                if self.phase == Phase::Ready {
                    self.current_time_ms = position_ms;
                }
                Vec::new()
            }
            MediaEvent::Error(error) => self.on_media_error(error, now),
        }
    }

    pub fn on_play_settled(
        &mut self,
        token: u64,
        result: Result<(), MediaError>,
        now: Instant,
    ) -> Vec<Directive> {
        if token != self.version {
            tracing::debug!(token, current = self.version, "play_result_stale");
            return Vec::new();
        }

        match result {
            Ok(()) => self.reconcile(now),
            Err(error) => self.on_media_error(error, now),
        }
    }

    pub fn on_seek_timeout(&mut self, token: u64) -> Vec<Directive> {
        match self.seek {
            Some(seek) if seek.token == token => {
                tracing::warn!(token, position_ms = self.current_time_ms, "seek_timeout");
                self.finish_seek()
            }
            _ => Vec::new(),
        }
    }

    pub fn on_tick(&mut self, now: Instant) -> Vec<Directive> {
        self.throttle.flush(now);
        match self.throttle.pending() {
            Some(value) => self.offer_playing(value, now),
            None => Vec::new(),
        }
    }

    /// Supersede everything, pause the source and return to `Idle`.
    pub fn teardown(&mut self) {
        self.next_version();
        self.pending_jump = None;
        self.seek = None;
        self.wants_playing = false;
        self.needs_manual_play = false;
        if !self.media.is_paused() {
            self.media.pause();
        }
        self.phase = Phase::Idle;
        self.throttle.reset(false);
        tracing::info!("playback_torn_down");
    }

    fn next_version(&mut self) -> u64 {
        self.version += 1;
        self.version
    }

    fn become_ready(&mut self, now: Instant) -> Vec<Directive> {
        self.phase = Phase::Ready;
        self.media.set_playback_rate(self.playback_rate);
        tracing::info!(source = ?self.media.source(), "episode_ready");

        if let Some(jump) = self.pending_jump.take() {
            return self.start_jump(jump.target_ms, jump.play_after, now);
        }
        if self.config.autoplay {
            return self.attempt_play();
        }
        Vec::new()
    }

    fn start_jump(&mut self, target_ms: i64, play_after: bool, now: Instant) -> Vec<Directive> {
        // Supersedes any play attempt in flight, whose result will now be
        // dropped. Play intent from here on is `play_after` alone.
        let token = self.next_version();
        self.wants_playing = false;
        let target = self.clamp_position(target_ms);

        self.current_time_ms = target;
        self.media.set_current_time_ms(target);

        if self.media.is_buffered_at(target) {
            self.seek = None;
            self.phase = Phase::Ready;
            let mut directives = self.reconcile(now);
            if play_after {
                directives.extend(self.attempt_play());
            }
            return directives;
        }

        self.phase = Phase::Seeking;
        self.seek = Some(SeekInFlight { token, play_after });
        vec![Directive::SeekTimeout {
            token,
            after: self.config.seek_timeout(),
        }]
    }

    fn finish_seek(&mut self) -> Vec<Directive> {
        let Some(seek) = self.seek.take() else {
            return Vec::new();
        };

        self.phase = Phase::Ready;
        if seek.play_after {
            self.attempt_play()
        } else {
            Vec::new()
        }
    }

    fn attempt_play(&mut self) -> Vec<Directive> {
        let token = self.next_version();
        self.wants_playing = true;
        self.needs_manual_play = false;
        tracing::debug!(token, "play_attempt");

        vec![Directive::AwaitPlay {
            token,
            attempt: self.media.play(),
        }]
    }

    fn pause(&mut self, now: Instant) -> Vec<Directive> {
        self.next_version();
        self.wants_playing = false;
        if let Some(seek) = &mut self.seek {
            seek.play_after = false;
        }
        if !self.media.is_paused() {
            self.media.pause();
        }
        self.reconcile(now)
    }

    fn on_media_error(&mut self, error: MediaError, now: Instant) -> Vec<Directive> {
        match error {
            MediaError::Transient(reason) => {
                tracing::debug!(%reason, "media_interrupted");
                self.wants_playing = false;
                self.reconcile(now)
            }
            MediaError::Denied(reason) => {
                tracing::info!(%reason, "autoplay_denied");
                self.wants_playing = false;
                self.needs_manual_play = true;
                self.reconcile(now)
            }
            MediaError::Fatal(reason) => {
                tracing::error!(%reason, "playback_fatal");
                self.next_version();
                self.resume_playing = self.wants_playing || self.throttle.published();
                self.wants_playing = false;
                self.seek = None;
                if self.phase == Phase::Seeking {
                    self.phase = Phase::Ready;
                }
                self.error = Some(reason);
                self.reconcile(now)
            }
        }
    }

    /// Align the visible `isPlaying` with what the source reports.
    fn reconcile(&mut self, now: Instant) -> Vec<Directive> {
        let playing = !self.media.is_paused();
        self.offer_playing(playing, now)
    }

    fn offer_playing(&mut self, playing: bool, now: Instant) -> Vec<Directive> {
        match self.throttle.offer(playing, now) {
            Offer::Deferred { until } => vec![Directive::FlushToggle { at: until }],
            Offer::Applied | Offer::Unchanged => Vec::new(),
        }
    }

    fn clamp_position(&self, position_ms: i64) -> i64 {
        let position_ms = position_ms.max(0);
        match self.media.duration_ms() {
            Some(duration) if duration >= 0 => position_ms.min(duration),
            _ => position_ms,
        }
    }
}
