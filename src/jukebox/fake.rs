// In-memory host used by the jukebox tests: records every side effect and lets
// tests dispatch events by hand.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{AudioOutput, EventSource, Handler, HostEvent, ListenerId, Page, PlaybackError};

type SharedHandler = Rc<RefCell<Handler>>;

#[derive(Default)]
struct ListenerTable {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(ListenerId, HostEvent, SharedHandler)>>,
    unlisten_calls: Cell<usize>,
    keep_on_unlisten: Cell<bool>,
}

impl ListenerTable {
    fn listen(&self, event: HostEvent, handler: Handler) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries
            .borrow_mut()
            .push((id, event, Rc::new(RefCell::new(handler))));
        id
    }

    fn unlisten(&self, id: ListenerId) {
        self.unlisten_calls.set(self.unlisten_calls.get() + 1);
        if self.keep_on_unlisten.get() {
            return;
        }
        self.entries.borrow_mut().retain(|(entry, _, _)| *entry != id);
    }

    fn emit(&self, event: HostEvent) {
        // Snapshot first: handlers add and remove listeners while running.
        let handlers: Vec<SharedHandler> = self
            .entries
            .borrow()
            .iter()
            .filter(|(_, kind, _)| *kind == event)
            .map(|(_, _, handler)| handler.clone())
            .collect();
        for handler in handlers {
            let mut handler = handler.borrow_mut();
            let call: &mut dyn FnMut() = &mut **handler;
            call();
        }
    }

    fn count(&self, event: HostEvent) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(_, kind, _)| *kind == event)
            .count()
    }

    fn live(&self) -> usize {
        self.entries.borrow().len()
    }
}

pub(crate) struct FakeOutput {
    listeners: ListenerTable,
    source: RefCell<Option<String>>,
    loaded: RefCell<Vec<String>>,
    play_attempts: Cell<usize>,
    reject_playback: Cell<bool>,
    fail_playback: Cell<bool>,
    rejected_plays: Cell<usize>,
    duration: Cell<f64>,
    seeks: RefCell<Vec<f64>>,
}

impl FakeOutput {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self {
            listeners: ListenerTable::default(),
            source: RefCell::new(None),
            loaded: RefCell::new(Vec::new()),
            play_attempts: Cell::new(0),
            reject_playback: Cell::new(false),
            fail_playback: Cell::new(false),
            rejected_plays: Cell::new(0),
            duration: Cell::new(f64::NAN),
            seeks: RefCell::new(Vec::new()),
        })
    }

    pub(crate) fn emit(&self, event: HostEvent) {
        self.listeners.emit(event);
    }

    /// Autoplay block: the attempt is issued and the rejection arrives later,
    /// out of band, the way the browser settles the `play()` promise.
    pub(crate) fn reject_playback(&self, reject: bool) {
        self.reject_playback.set(reject);
    }

    /// `play()` itself throws before any promise exists.
    pub(crate) fn fail_playback(&self, fail: bool) {
        self.fail_playback.set(fail);
    }

    pub(crate) fn rejected_plays(&self) -> usize {
        self.rejected_plays.get()
    }

    pub(crate) fn set_duration(&self, seconds: f64) {
        self.duration.set(seconds);
    }

    /// Simulates an event source that keeps dispatching to removed listeners.
    pub(crate) fn keep_listeners_on_unlisten(&self, keep: bool) {
        self.listeners.keep_on_unlisten.set(keep);
    }

    pub(crate) fn loaded(&self) -> Vec<String> {
        self.loaded.borrow().clone()
    }

    pub(crate) fn play_attempts(&self) -> usize {
        self.play_attempts.get()
    }

    pub(crate) fn seeks(&self) -> Vec<f64> {
        self.seeks.borrow().clone()
    }

    pub(crate) fn listener_count(&self, event: HostEvent) -> usize {
        self.listeners.count(event)
    }

    pub(crate) fn live_listeners(&self) -> usize {
        self.listeners.live()
    }

    pub(crate) fn unlisten_calls(&self) -> usize {
        self.listeners.unlisten_calls.get()
    }
}

impl EventSource for FakeOutput {
    fn listen(&self, event: HostEvent, handler: Handler) -> ListenerId {
        self.listeners.listen(event, handler)
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners.unlisten(id);
    }
}

impl AudioOutput for FakeOutput {
    fn set_source(&self, uri: &str) {
        *self.source.borrow_mut() = Some(uri.to_string());
    }

    fn load(&self) {
        if let Some(source) = self.source.borrow().clone() {
            self.loaded.borrow_mut().push(source);
        }
    }

    fn play(&self) -> Result<(), PlaybackError> {
        self.play_attempts.set(self.play_attempts.get() + 1);
        if self.fail_playback.get() {
            return Err(PlaybackError::Rejected("InvalidStateError".to_string()));
        }
        if self.reject_playback.get() {
            self.rejected_plays.set(self.rejected_plays.get() + 1);
        }
        Ok(())
    }

    fn duration(&self) -> f64 {
        self.duration.get()
    }

    fn set_current_time(&self, seconds: f64) {
        self.seeks.borrow_mut().push(seconds);
    }
}

#[derive(Default)]
pub(crate) struct FakePage {
    listeners: ListenerTable,
    outputs: RefCell<Vec<(String, String, Rc<FakeOutput>)>>,
    navigations: RefCell<Vec<String>>,
}

impl FakePage {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn add_output(&self, audio_id: &str, source_id: &str) -> Rc<FakeOutput> {
        let output = FakeOutput::new();
        self.outputs.borrow_mut().push((
            audio_id.to_string(),
            source_id.to_string(),
            output.clone(),
        ));
        output
    }

    pub(crate) fn click(&self) {
        self.listeners.emit(HostEvent::Click);
    }

    pub(crate) fn navigations(&self) -> Vec<String> {
        self.navigations.borrow().clone()
    }

    pub(crate) fn click_listeners(&self) -> usize {
        self.listeners.count(HostEvent::Click)
    }
}

impl EventSource for FakePage {
    fn listen(&self, event: HostEvent, handler: Handler) -> ListenerId {
        self.listeners.listen(event, handler)
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners.unlisten(id);
    }
}

impl Page for FakePage {
    fn resolve_output(&self, audio_id: &str, source_id: &str) -> Option<Rc<dyn AudioOutput>> {
        self.outputs
            .borrow()
            .iter()
            .find(|(audio, source, _)| audio == audio_id && source == source_id)
            .map(|(_, _, output)| output.clone() as Rc<dyn AudioOutput>)
    }

    fn navigate(&self, uri: &str) {
        self.navigations.borrow_mut().push(uri.to_string());
    }
}
