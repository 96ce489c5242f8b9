use ractor::concurrency::JoinHandle;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use tokio::sync::watch;
use tokio::time::Instant;

use crate::config::PlaybackConfig;
use crate::error::{Error, MediaError, Result};
use crate::machine::{Directive, PlaybackMachine};
use crate::segments::SegmentIndex;
use crate::source::{MediaEvent, MediaSource};
use crate::state::PublishedState;

pub enum PlaybackMsg {
    LoadEpisode(String),
    RequestJump {
        target_ms: i64,
        jump_id: String,
        play_after: bool,
    },
    TogglePlayPause,
    Skip(f64),
    SetPlaybackRate(f64),
    SetSegments(SegmentIndex),
    Retry,
    Media(MediaEvent),
    PlaySettled {
        token: u64,
        result: std::result::Result<(), MediaError>,
    },
    SeekTimeout(u64),
    Tick,
    GetState(RpcReplyPort<PublishedState>),
}

pub struct PlaybackArgs {
    pub media: Box<dyn MediaSource>,
    pub config: PlaybackConfig,
    pub state_tx: watch::Sender<PublishedState>,
}

pub struct PlaybackState {
    machine: PlaybackMachine,
    state_tx: watch::Sender<PublishedState>,
    forwarder: tokio::task::JoinHandle<()>,
}

/// Sole owner of a [`MediaSource`]. Commands, native events and the
/// completions of its own timers and play attempts all arrive as messages,
/// so state transitions never run concurrently.
pub struct PlaybackActor;

#[ractor::async_trait]
impl Actor for PlaybackActor {
    type Msg = PlaybackMsg;
    type State = PlaybackState;
    type Arguments = PlaybackArgs;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> std::result::Result<Self::State, ActorProcessingErr> {
        let mut media = args.media;
        let mut events = media.subscribe();

        let forwarder = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if myself.cast(PlaybackMsg::Media(event)).is_err() {
                    break;
                }
            }
        });

        let machine = PlaybackMachine::new(media, args.config);
        args.state_tx.send_replace(machine.published());

        Ok(PlaybackState {
            machine,
            state_tx: args.state_tx,
            forwarder,
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> std::result::Result<(), ActorProcessingErr> {
        let now = Instant::now();
        let machine = &mut state.machine;

        let directives = match message {
            PlaybackMsg::LoadEpisode(url) => machine.load_episode(&url, now),
            PlaybackMsg::RequestJump {
                target_ms,
                jump_id,
                play_after,
            } => machine.request_jump(target_ms, &jump_id, play_after, now),
            PlaybackMsg::TogglePlayPause => machine.toggle_play_pause(now),
            PlaybackMsg::Skip(delta_seconds) => machine.skip(delta_seconds, now),
            PlaybackMsg::SetPlaybackRate(rate) => {
                machine.set_playback_rate(rate);
                Vec::new()
            }
            PlaybackMsg::SetSegments(segments) => {
                machine.set_segments(segments);
                Vec::new()
            }
            PlaybackMsg::Retry => machine.retry(now),
            PlaybackMsg::Media(event) => machine.on_event(event, now),
            PlaybackMsg::PlaySettled { token, result } => {
                machine.on_play_settled(token, result, now)
            }
            PlaybackMsg::SeekTimeout(token) => machine.on_seek_timeout(token),
            PlaybackMsg::Tick => machine.on_tick(now),
            PlaybackMsg::GetState(reply) => {
                let _ = reply.send(machine.published());
                Vec::new()
            }
        };

        schedule(&myself, directives);
        publish(state);
        Ok(())
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> std::result::Result<(), ActorProcessingErr> {
        state.forwarder.abort();
        state.machine.teardown();
        publish(state);
        Ok(())
    }
}

fn schedule(myself: &ActorRef<PlaybackMsg>, directives: Vec<Directive>) {
    for directive in directives {
        match directive {
            Directive::AwaitPlay { token, attempt } => {
                let actor = myself.clone();
                tokio::spawn(async move {
                    let result = attempt.await;
                    if actor.cast(PlaybackMsg::PlaySettled { token, result }).is_err() {
                        tracing::debug!(token, "play_settled_after_stop");
                    }
                });
            }
            Directive::SeekTimeout { token, after } => {
                myself.send_after(after, move || PlaybackMsg::SeekTimeout(token));
            }
            Directive::FlushToggle { at } => {
                let after = at.saturating_duration_since(Instant::now());
                myself.send_after(after, || PlaybackMsg::Tick);
            }
        }
    }
}

fn publish(state: &PlaybackState) {
    let next = state.machine.published();
    state.state_tx.send_if_modified(|current| {
        if *current == next {
            return false;
        }
        *current = next;
        true
    });
}

/// Handle to a running [`PlaybackActor`].
///
/// Commands are fire-and-forget. The UI observes the controller only through
/// the published state channel.
pub struct PlaybackController {
    actor: ActorRef<PlaybackMsg>,
    handle: JoinHandle<()>,
    state_rx: watch::Receiver<PublishedState>,
}

impl PlaybackController {
    pub async fn spawn(media: impl MediaSource, config: PlaybackConfig) -> Result<Self> {
        let (state_tx, state_rx) = watch::channel(PublishedState::default());
        let (actor, handle) = Actor::spawn(
            None,
            PlaybackActor,
            PlaybackArgs {
                media: Box::new(media),
                config,
                state_tx,
            },
        )
        .await?;

        tracing::debug!(actor_id = %actor.get_id(), "playback_controller_spawned");
        Ok(Self {
            actor,
            handle,
            state_rx,
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<PublishedState> {
        self.state_rx.clone()
    }

    pub fn state(&self) -> PublishedState {
        self.state_rx.borrow().clone()
    }

    /// State as of every message sent before this call.
    pub async fn snapshot(&self) -> Result<PublishedState> {
        ractor::call!(self.actor, PlaybackMsg::GetState).map_err(|e| Error::Rpc(e.to_string()))
    }

    pub fn load_episode(&self, url: impl Into<String>) -> Result<()> {
        self.send(PlaybackMsg::LoadEpisode(url.into()))
    }

    pub fn request_jump(
        &self,
        target_ms: i64,
        jump_id: impl Into<String>,
        play_after: bool,
    ) -> Result<()> {
        self.send(PlaybackMsg::RequestJump {
            target_ms,
            jump_id: jump_id.into(),
            play_after,
        })
    }

    /// UI seek. Each call is a distinct jump.
    pub fn seek(&self, target_ms: i64, and_play: bool) -> Result<()> {
        self.request_jump(target_ms, uuid::Uuid::new_v4().to_string(), and_play)
    }

    pub fn toggle_play_pause(&self) -> Result<()> {
        self.send(PlaybackMsg::TogglePlayPause)
    }

    pub fn skip(&self, delta_seconds: f64) -> Result<()> {
        self.send(PlaybackMsg::Skip(delta_seconds))
    }

    pub fn set_playback_rate(&self, rate: f64) -> Result<()> {
        self.send(PlaybackMsg::SetPlaybackRate(rate))
    }

    pub fn set_segments(&self, segments: SegmentIndex) -> Result<()> {
        self.send(PlaybackMsg::SetSegments(segments))
    }

    pub fn retry(&self) -> Result<()> {
        self.send(PlaybackMsg::Retry)
    }

    /// Stop the actor. The source is paused and the final published state
    /// is `Idle`.
    pub async fn unmount(self) -> Result<()> {
        self.actor.stop(Some("unmounted".to_string()));
        self.handle.await.map_err(|e| Error::Rpc(e.to_string()))
    }

    fn send(&self, message: PlaybackMsg) -> Result<()> {
        self.actor.cast(message).map_err(|_| Error::Send)
    }
}
