use dioxus::prelude::*;

use crate::components::{ContentPanel, JukeboxController, DEFAULT_CONTENT_HEIGHT};
use crate::config::load_app_config;

const HIRE_URL: &str = "https://president.mydream42.com";
const FIRE_URL: &str = "https://yelizariev.mydream42.com/?debug=https://x.com/yelizariev";

#[component]
pub fn LandingPage() -> Element {
    let config = use_hook(load_app_config);
    let mut content_height = use_signal(|| DEFAULT_CONTENT_HEIGHT);

    // Both channels always get their elements; an empty playlist just leaves them silent.
    let channels = config.clone().unwrap_or_default().channels();
    let html = config
        .as_ref()
        .map(|c| c.html_content().to_string())
        .unwrap_or_default();

    rsx! {
        for channel in channels {
            audio {
                key: "{channel.audio_id}",
                id: "{channel.audio_id}",
                autoplay: true,
                crossorigin: "anonymous",
                style: "display: none",
                source { id: "{channel.source_id}", r#type: "audio/mpeg" }
            }
        }

        ContentPanel {
            html,
            on_height: move |height| content_height.set(height),
        }
        SceneSurface { height: content_height() }

        a { href: HIRE_URL, class: "link top-right", "Hire ❄️ Me" }
        a { href: FIRE_URL, class: "link bottom-right", "Fire 🔥 Me" }

        JukeboxController { config }
    }
}

/// Host element for the 3D scene, kept as tall as the content panel.
#[component]
fn SceneSurface(height: f64) -> Element {
    rsx! {
        div { class: "scene", style: "width: 100%; height: {height}px;",
            canvas { id: "scene-canvas" }
        }
    }
}
