//! Page configuration injected by the host page as `window.APP_CONFIG`.

use serde::Deserialize;

use crate::jukebox::ChannelOptions;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_CONFIG is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(target_arch = "wasm32")]
    #[error("APP_CONFIG could not be serialized: {0}")]
    Stringify(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(rename = "DiskC", default)]
    pub disk_c: Option<Vec<String>>,
    #[serde(rename = "DiskD", default)]
    pub disk_d: Option<Vec<String>>,
    #[serde(rename = "Next", default)]
    pub next: Option<String>,
    #[serde(rename = "htmlContent", default)]
    pub html_content: Option<String>,
}

/// One jukebox channel: element ids to bind plus what to play on them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelConfig {
    pub audio_id: String,
    pub source_id: String,
    pub playlist: Vec<String>,
    pub options: ChannelOptions,
}

impl AppConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Channels in activation order. Both pick a random first track; DiskC starts
    /// each track at the beginning, DiskD drops into each track at a random point.
    pub fn channels(&self) -> Vec<ChannelConfig> {
        vec![
            channel("DiskC", self.disk_c.as_deref(), false),
            channel("DiskD", self.disk_d.as_deref(), true),
        ]
    }

    pub fn html_content(&self) -> &str {
        self.html_content.as_deref().unwrap_or_default()
    }
}

fn channel(id: &str, playlist: Option<&[String]>, random_start: bool) -> ChannelConfig {
    ChannelConfig {
        audio_id: id.to_string(),
        source_id: format!("{id}Source"),
        playlist: playlist
            .unwrap_or_default()
            .iter()
            .filter(|uri| !uri.trim().is_empty())
            .cloned()
            .collect(),
        options: ChannelOptions { random_start },
    }
}

/// Reads `window.APP_CONFIG`. `None` when the page did not provide one or it
/// does not parse, which leaves the audio subsystem inert.
#[cfg(target_arch = "wasm32")]
pub fn load_app_config() -> Option<AppConfig> {
    let window = web_sys::window()?;
    let raw = js_sys::Reflect::get(&window, &"APP_CONFIG".into()).ok()?;
    if raw.is_null() || raw.is_undefined() {
        return None;
    }

    let parsed = js_sys::JSON::stringify(&raw)
        .map_err(|err| ConfigError::Stringify(format!("{err:?}")))
        .and_then(|json| AppConfig::from_json(&String::from(json)));
    match parsed {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!(%err, "ignoring APP_CONFIG");
            None
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_app_config() -> Option<AppConfig> {
    None
}
