// Browser host: binds the jukebox to `<audio>`/`<source>` elements and the document.
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, warn};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, Document, EventTarget, HtmlAudioElement, HtmlSourceElement};

use super::{AudioOutput, EventSource, Handler, HostEvent, ListenerId, Page, PlaybackError};

#[derive(Default)]
struct ListenerRegistry {
    next_id: Cell<u64>,
    entries: RefCell<HashMap<ListenerId, (HostEvent, Closure<dyn FnMut()>)>>,
}

impl ListenerRegistry {
    fn listen(&self, target: &EventTarget, event: HostEvent, handler: Handler) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let closure = Closure::wrap(handler);
        if let Err(err) = target
            .add_event_listener_with_callback(event.dom_name(), closure.as_ref().unchecked_ref())
        {
            warn!(event = event.dom_name(), ?err, "failed to attach listener");
        }
        self.entries.borrow_mut().insert(id, (event, closure));
        id
    }

    fn unlisten(&self, target: &EventTarget, id: ListenerId) {
        let Some((event, closure)) = self.entries.borrow_mut().remove(&id) else {
            return;
        };
        let _ = target
            .remove_event_listener_with_callback(event.dom_name(), closure.as_ref().unchecked_ref());
        release_later(closure);
    }

    fn clear(&self, target: &EventTarget) {
        let entries: Vec<_> = self.entries.borrow_mut().drain().collect();
        for (_, (event, closure)) in entries {
            let _ = target.remove_event_listener_with_callback(
                event.dom_name(),
                closure.as_ref().unchecked_ref(),
            );
            release_later(closure);
        }
    }
}

// Handlers may remove themselves while running; dropping the closure has to wait
// until the current dispatch has returned.
fn release_later(closure: Closure<dyn FnMut()>) {
    wasm_bindgen_futures::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(0).await;
        drop(closure);
    });
}

pub struct WebAudioOutput {
    audio: HtmlAudioElement,
    source: HtmlSourceElement,
    listeners: ListenerRegistry,
}

impl WebAudioOutput {
    pub fn new(audio: HtmlAudioElement, source: HtmlSourceElement) -> Self {
        Self {
            audio,
            source,
            listeners: ListenerRegistry::default(),
        }
    }
}

impl EventSource for WebAudioOutput {
    fn listen(&self, event: HostEvent, handler: Handler) -> ListenerId {
        self.listeners.listen(self.audio.as_ref(), event, handler)
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners.unlisten(self.audio.as_ref(), id);
    }
}

impl AudioOutput for WebAudioOutput {
    fn set_source(&self, uri: &str) {
        self.source.set_src(uri);
    }

    fn load(&self) {
        self.audio.load();
    }

    fn play(&self) -> Result<(), PlaybackError> {
        let promise = self
            .audio
            .play()
            .map_err(|err| PlaybackError::Rejected(format!("{err:?}")))?;
        let id = self.audio.id();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = wasm_bindgen_futures::JsFuture::from(promise).await {
                debug!(channel = %id, ?err, "play() rejected, waiting for a gesture");
            }
        });
        Ok(())
    }

    fn duration(&self) -> f64 {
        self.audio.duration()
    }

    fn set_current_time(&self, seconds: f64) {
        self.audio.set_current_time(seconds);
    }
}

impl Drop for WebAudioOutput {
    fn drop(&mut self) {
        self.listeners.clear(self.audio.as_ref());
    }
}

pub struct WebPage {
    document: Document,
    listeners: ListenerRegistry,
}

impl WebPage {
    pub fn new() -> Option<Self> {
        let document = window()?.document()?;
        Some(Self {
            document,
            listeners: ListenerRegistry::default(),
        })
    }
}

impl EventSource for WebPage {
    fn listen(&self, event: HostEvent, handler: Handler) -> ListenerId {
        self.listeners.listen(self.document.as_ref(), event, handler)
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners.unlisten(self.document.as_ref(), id);
    }
}

impl Page for WebPage {
    fn resolve_output(&self, audio_id: &str, source_id: &str) -> Option<Rc<dyn AudioOutput>> {
        let audio = self
            .document
            .get_element_by_id(audio_id)?
            .dyn_into::<HtmlAudioElement>()
            .ok()?;
        let source = self
            .document
            .get_element_by_id(source_id)?
            .dyn_into::<HtmlSourceElement>()
            .ok()?;
        Some(Rc::new(WebAudioOutput::new(audio, source)))
    }

    fn navigate(&self, uri: &str) {
        let Some(location) = window().map(|w| w.location()) else {
            return;
        };
        if let Err(err) = location.set_href(uri) {
            warn!(?err, uri, "navigation failed");
        }
    }
}

impl Drop for WebPage {
    fn drop(&mut self) {
        self.listeners.clear(self.document.as_ref());
    }
}
