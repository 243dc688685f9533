//! Jukebox - background audio channels for the landing page.
//! Each channel cycles its playlist on its own; a page-wide click handler unlocks
//! autoplay on the first gesture and navigates away on the next one.
//!
//! Everything here talks to the browser through the traits below so the state
//! machines run unchanged against the in-memory host used by the tests.

mod channel;
mod registry;
mod tracks;
mod unlock;

#[cfg(test)]
pub(crate) mod fake;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::rc::Rc;

pub use channel::{
    random_seek_position, ActivationError, ChannelOptions, ChannelPhase, ChannelPlayer,
};
pub use registry::Jukebox;
pub use tracks::{advance, pick_initial};
pub use unlock::{GestureOutcome, UnlockCoordinator};

/// Seek ceiling used when a track reports no usable duration (live streams).
pub const FALLBACK_DURATION_SECS: f64 = 3600.0;

/// Host events the jukebox subscribes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostEvent {
    Click,
    Ended,
    LoadedMetadata,
}

impl HostEvent {
    pub fn dom_name(self) -> &'static str {
        match self {
            HostEvent::Click => "click",
            HostEvent::Ended => "ended",
            HostEvent::LoadedMetadata => "loadedmetadata",
        }
    }
}

/// Token returned by [`EventSource::listen`], needed to remove the listener again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

pub type Handler = Box<dyn FnMut()>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaybackError {
    #[error("playback was rejected: {0}")]
    Rejected(String),
    #[error("audio output is not available")]
    Unavailable,
}

pub trait EventSource {
    fn listen(&self, event: HostEvent, handler: Handler) -> ListenerId;
    /// Removing an id that is not registered is a no-op.
    fn unlisten(&self, id: ListenerId);
}

/// One `<audio>` element plus the `<source>` bound to it.
pub trait AudioOutput: EventSource {
    fn set_source(&self, uri: &str);
    fn load(&self);
    /// Starts playback. The result only says whether the attempt could be issued;
    /// callers discard it, the next user gesture retries.
    fn play(&self) -> Result<(), PlaybackError>;
    fn duration(&self) -> f64;
    fn set_current_time(&self, seconds: f64);
}

/// The document hosting the jukebox.
pub trait Page: EventSource {
    /// Both handles must resolve, otherwise the channel stays inactive.
    fn resolve_output(&self, audio_id: &str, source_id: &str) -> Option<Rc<dyn AudioOutput>>;
    fn navigate(&self, uri: &str);
}
