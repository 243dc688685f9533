//! Landing page with background jukebox channels.
//!
//! The binary in `main.rs` only launches [`components::LandingPage`]; the audio
//! controller lives in [`jukebox`] and reads its playlists from [`config`].

pub mod components;
pub mod config;
pub mod jukebox;
