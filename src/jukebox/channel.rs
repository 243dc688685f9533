use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rand::{Rng, RngCore};
use tracing::debug;

use super::tracks::{advance, pick_initial};
use super::{AudioOutput, HostEvent, ListenerId, PlaybackError, FALLBACK_DURATION_SECS};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelOptions {
    /// Seek each freshly loaded track to a random offset once its duration is known.
    pub random_start: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelPhase {
    Loading,
    /// Waiting for the first `loadedmetadata` of the current track.
    RandomSeekPending,
    Playing,
    TornDown,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivationError {
    #[error("channel {channel} has an empty playlist")]
    EmptyPlaylist { channel: String },
    #[error("channel {channel} has no audio output bound")]
    MissingOutput { channel: String },
    #[error("channel {channel} is already active")]
    AlreadyActive { channel: String },
}

struct ChannelState {
    label: String,
    playlist: Vec<String>,
    options: ChannelOptions,
    index: usize,
    phase: ChannelPhase,
    ended_listener: Option<ListenerId>,
    metadata_listener: Option<ListenerId>,
    rng: Box<dyn RngCore>,
}

/// A single jukebox: one audio output looping over its playlist.
///
/// Listener callbacks only hold weak references and check the current phase
/// before touching anything, so events that arrive after [`ChannelPlayer::teardown`]
/// are ignored.
pub struct ChannelPlayer {
    output: Rc<dyn AudioOutput>,
    state: Rc<RefCell<ChannelState>>,
}

impl ChannelPlayer {
    /// Binds the playlist to `output`, loads a random first track and asks it to play.
    /// Nothing is registered on the output when activation fails.
    pub fn activate(
        label: &str,
        output: Option<Rc<dyn AudioOutput>>,
        playlist: Vec<String>,
        options: ChannelOptions,
        mut rng: Box<dyn RngCore>,
    ) -> Result<Self, ActivationError> {
        let Some(index) = pick_initial(&playlist, &mut rng) else {
            return Err(ActivationError::EmptyPlaylist {
                channel: label.to_string(),
            });
        };
        let Some(output) = output else {
            return Err(ActivationError::MissingOutput {
                channel: label.to_string(),
            });
        };

        let state = Rc::new(RefCell::new(ChannelState {
            label: label.to_string(),
            playlist,
            options,
            index,
            phase: ChannelPhase::Loading,
            ended_listener: None,
            metadata_listener: None,
            rng,
        }));

        let ended_id = output.listen(
            HostEvent::Ended,
            ended_handler(Rc::downgrade(&output), Rc::downgrade(&state)),
        );
        state.borrow_mut().ended_listener = Some(ended_id);

        debug!(channel = label, index, "jukebox channel activated");
        start_track(&output, &state);

        Ok(Self { output, state })
    }

    pub fn label(&self) -> String {
        self.state.borrow().label.clone()
    }

    pub fn phase(&self) -> ChannelPhase {
        self.state.borrow().phase
    }

    pub fn current_index(&self) -> usize {
        self.state.borrow().index
    }

    pub fn current_track(&self) -> String {
        let state = self.state.borrow();
        state.playlist[state.index].clone()
    }

    /// Retries playback of whatever is loaded, used by the unlock gesture.
    pub fn try_play(&self) -> Result<(), PlaybackError> {
        if self.phase() == ChannelPhase::TornDown {
            return Err(PlaybackError::Unavailable);
        }
        self.output.play()
    }

    /// Removes every listener this channel registered. Safe to call more than once
    /// and while a random seek is still pending.
    pub fn teardown(&self) {
        let (label, listeners) = {
            let mut state = self.state.borrow_mut();
            if state.phase == ChannelPhase::TornDown {
                return;
            }
            state.phase = ChannelPhase::TornDown;
            (
                state.label.clone(),
                [state.ended_listener.take(), state.metadata_listener.take()],
            )
        };
        for id in listeners.into_iter().flatten() {
            self.output.unlisten(id);
        }
        debug!(channel = %label, "jukebox channel torn down");
    }
}

/// Position for a random start. Unknown, infinite or zero durations fall back
/// to [`FALLBACK_DURATION_SECS`].
pub fn random_seek_position<R: Rng + ?Sized>(duration: f64, rng: &mut R) -> f64 {
    let ceiling = if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        FALLBACK_DURATION_SECS
    };
    rng.gen_range(0.0..ceiling)
}

fn start_track(output: &Rc<dyn AudioOutput>, state: &Rc<RefCell<ChannelState>>) {
    let (label, uri, random_start, stale_metadata) = {
        let mut state = state.borrow_mut();
        state.phase = ChannelPhase::Loading;
        (
            state.label.clone(),
            state.playlist[state.index].clone(),
            state.options.random_start,
            state.metadata_listener.take(),
        )
    };

    // A previous track that ended before its metadata arrived.
    if let Some(id) = stale_metadata {
        output.unlisten(id);
    }

    output.set_source(&uri);
    output.load();

    if random_start {
        let id = output.listen(
            HostEvent::LoadedMetadata,
            metadata_handler(Rc::downgrade(output), Rc::downgrade(state)),
        );
        let mut state = state.borrow_mut();
        state.metadata_listener = Some(id);
        state.phase = ChannelPhase::RandomSeekPending;
    }

    if let Err(err) = output.play() {
        debug!(channel = %label, %err, "playback attempt ignored");
    }

    let mut state = state.borrow_mut();
    if state.phase == ChannelPhase::Loading {
        state.phase = ChannelPhase::Playing;
    }
}

fn ended_handler(
    output: Weak<dyn AudioOutput>,
    state: Weak<RefCell<ChannelState>>,
) -> Box<dyn FnMut()> {
    Box::new(move || {
        let (Some(output), Some(state)) = (output.upgrade(), state.upgrade()) else {
            return;
        };
        {
            let mut state = state.borrow_mut();
            if !matches!(
                state.phase,
                ChannelPhase::Playing | ChannelPhase::RandomSeekPending
            ) {
                return;
            }
            state.index = advance(state.index, state.playlist.len());
            debug!(channel = %state.label, index = state.index, "track ended, advancing");
        }
        start_track(&output, &state);
    })
}

fn metadata_handler(
    output: Weak<dyn AudioOutput>,
    state: Weak<RefCell<ChannelState>>,
) -> Box<dyn FnMut()> {
    Box::new(move || {
        let (Some(output), Some(state)) = (output.upgrade(), state.upgrade()) else {
            return;
        };
        let listener = {
            let mut state = state.borrow_mut();
            if state.phase != ChannelPhase::RandomSeekPending {
                return;
            }
            state.phase = ChannelPhase::Playing;
            state.metadata_listener.take()
        };
        if let Some(id) = listener {
            output.unlisten(id);
        }

        let duration = output.duration();
        let position = {
            let mut state = state.borrow_mut();
            let position = random_seek_position(duration, &mut state.rng);
            debug!(channel = %state.label, duration, position, "random start");
            position
        };
        output.set_current_time(position);
    })
}
