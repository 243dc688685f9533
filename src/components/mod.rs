//! The components module contains the landing page and its audio controller.

mod app;
mod content_panel;
mod jukebox_controller;

pub use app::*;
pub use content_panel::*;
pub use jukebox_controller::*;
