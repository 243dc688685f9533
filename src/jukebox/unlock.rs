use tracing::{debug, info, warn};

use super::{ChannelPlayer, Page};

/// What a page-wide click did.
///
/// `issued` counts channels whose `play()` went out. Whether the browser then
/// honours it is settled later and never reported back here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GestureOutcome {
    Unlocked { attempted: usize, issued: usize },
    Navigated(String),
    NoTarget,
}

/// Two-phase click protocol: the first click is spent unlocking autoplay on every
/// channel, every later click leaves the page. Built fresh for each mount.
#[derive(Debug, Default)]
pub struct UnlockCoordinator {
    gestures: u32,
    target: Option<String>,
}

impl UnlockCoordinator {
    pub fn new(target: Option<String>) -> Self {
        Self {
            gestures: 0,
            target: target.filter(|uri| !uri.trim().is_empty()),
        }
    }

    pub fn gestures(&self) -> u32 {
        self.gestures
    }

    pub fn on_gesture(&mut self, channels: &[ChannelPlayer], page: &dyn Page) -> GestureOutcome {
        self.gestures = self.gestures.saturating_add(1);

        if self.gestures == 1 {
            // Each attempt stands alone; a failing channel must not stop the rest.
            let issued = channels
                .iter()
                .filter(|channel| match channel.try_play() {
                    Ok(()) => true,
                    Err(err) => {
                        debug!(channel = %channel.label(), %err, "unlock attempt not issued");
                        false
                    }
                })
                .count();
            info!(channels = channels.len(), issued, "audio unlock gesture");
            return GestureOutcome::Unlocked {
                attempted: channels.len(),
                issued,
            };
        }

        match &self.target {
            Some(target) => {
                info!(uri = %target, "navigating after second gesture");
                page.navigate(target);
                GestureOutcome::Navigated(target.clone())
            }
            None => {
                if self.gestures == 2 {
                    warn!("no navigation target configured");
                }
                GestureOutcome::NoTarget
            }
        }
    }
}
