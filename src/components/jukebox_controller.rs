//! Mounts the jukebox once the hidden `<audio>` elements exist and releases it on unmount.
#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

use dioxus::prelude::*;

use crate::config::AppConfig;
#[cfg(target_arch = "wasm32")]
use crate::jukebox::{web::WebPage, Jukebox};

#[component]
pub fn JukeboxController(#[props(!optional)] config: Option<AppConfig>) -> Element {
    #[cfg(target_arch = "wasm32")]
    {
        let slot = use_hook(|| Rc::new(RefCell::new(None::<Jukebox>)));

        {
            let slot = slot.clone();
            use_effect(move || {
                // Effects can re-run; one jukebox per mount.
                if slot.borrow().is_some() {
                    return;
                }
                let Some(page) = WebPage::new() else {
                    return;
                };
                let jukebox = Jukebox::mount(config.as_ref(), Rc::new(page));
                *slot.borrow_mut() = Some(jukebox);
            });
        }

        use_drop(move || {
            if let Some(mut jukebox) = slot.borrow_mut().take() {
                jukebox.dispose();
            }
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    let _ = config;

    rsx! {}
}
