use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info};

use super::{ActivationError, ChannelPlayer, HostEvent, ListenerId, Page, UnlockCoordinator};
use crate::config::{AppConfig, ChannelConfig};

/// Every active channel of one mount plus the page-wide click listener.
/// Dropping it (or calling [`Jukebox::dispose`]) releases every listener.
pub struct Jukebox {
    page: Rc<dyn Page>,
    channels: Rc<Vec<ChannelPlayer>>,
    unlock: Rc<RefCell<UnlockCoordinator>>,
    click_listener: Option<ListenerId>,
    disposed: bool,
}

impl Jukebox {
    pub fn mount(config: Option<&AppConfig>, page: Rc<dyn Page>) -> Self {
        Self::mount_with_rng(config, page, || Box::new(StdRng::from_entropy()))
    }

    /// Same as [`Jukebox::mount`] with a caller supplied random source per channel.
    pub fn mount_with_rng<F>(config: Option<&AppConfig>, page: Rc<dyn Page>, make_rng: F) -> Self
    where
        F: FnMut() -> Box<dyn RngCore>,
    {
        let Some(config) = config else {
            info!("no APP_CONFIG found, audio disabled");
            return Self {
                page,
                channels: Rc::new(Vec::new()),
                unlock: Rc::new(RefCell::new(UnlockCoordinator::default())),
                click_listener: None,
                disposed: false,
            };
        };
        Self::from_channels(config.channels(), config.next.clone(), page, make_rng)
    }

    /// Activates `channels` in order and starts listening for clicks.
    pub fn from_channels<F>(
        channels: Vec<ChannelConfig>,
        next: Option<String>,
        page: Rc<dyn Page>,
        mut make_rng: F,
    ) -> Self
    where
        F: FnMut() -> Box<dyn RngCore>,
    {
        let mut active_ids = HashSet::new();
        let mut players = Vec::new();
        for channel in channels {
            let result = if active_ids.contains(&channel.audio_id) {
                Err(ActivationError::AlreadyActive {
                    channel: channel.audio_id.clone(),
                })
            } else {
                let output = page.resolve_output(&channel.audio_id, &channel.source_id);
                ChannelPlayer::activate(
                    &channel.audio_id,
                    output,
                    channel.playlist,
                    channel.options,
                    make_rng(),
                )
            };

            match result {
                Ok(player) => {
                    active_ids.insert(channel.audio_id);
                    players.push(player);
                }
                Err(err) => debug!(%err, "channel left inactive"),
            }
        }

        let channels = Rc::new(players);
        let unlock = Rc::new(RefCell::new(UnlockCoordinator::new(next)));

        let click_listener = {
            let page_ref = Rc::downgrade(&page);
            let channels = Rc::downgrade(&channels);
            let unlock = Rc::downgrade(&unlock);
            page.listen(
                HostEvent::Click,
                Box::new(move || {
                    let (Some(page), Some(channels), Some(unlock)) =
                        (page_ref.upgrade(), channels.upgrade(), unlock.upgrade())
                    else {
                        return;
                    };
                    unlock.borrow_mut().on_gesture(&channels, &*page);
                }),
            )
        };

        info!(channels = channels.len(), "jukebox mounted");
        Self {
            page,
            channels,
            unlock,
            click_listener: Some(click_listener),
            disposed: false,
        }
    }

    pub fn channels(&self) -> &[ChannelPlayer] {
        &self.channels
    }

    pub fn gestures(&self) -> u32 {
        self.unlock.borrow().gestures()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Tears down every channel and removes the click listener. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        if let Some(id) = self.click_listener.take() {
            self.page.unlisten(id);
        }
        for channel in self.channels.iter() {
            channel.teardown();
        }
        debug!(channels = self.channels.len(), "jukebox disposed");
    }
}

impl Drop for Jukebox {
    fn drop(&mut self) {
        self.dispose();
    }
}
