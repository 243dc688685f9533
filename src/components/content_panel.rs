//! Host-supplied HTML plus the height the render surface follows.
#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use dioxus::core::{Runtime, RuntimeGuard};
use dioxus::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};
#[cfg(target_arch = "wasm32")]
use web_sys::{window, HtmlElement, ResizeObserver};

pub const DEFAULT_CONTENT_HEIGHT: f64 = 1000.0;
const CONTENT_ID: &str = "landing-content";

/// Height for the render surface; an unmeasured (zero) panel keeps the default.
pub fn effective_content_height(offset_height: f64) -> f64 {
    if offset_height.is_finite() && offset_height > 0.0 {
        offset_height
    } else {
        DEFAULT_CONTENT_HEIGHT
    }
}

#[component]
pub fn ContentPanel(html: String, on_height: EventHandler<f64>) -> Element {
    #[cfg(target_arch = "wasm32")]
    {
        let observer = use_hook(|| Rc::new(RefCell::new(None::<HeightObserver>)));

        {
            let observer = observer.clone();
            use_effect(move || {
                if observer.borrow().is_some() {
                    return;
                }
                *observer.borrow_mut() = HeightObserver::attach(CONTENT_ID, on_height);
            });
        }

        use_drop(move || {
            observer.borrow_mut().take();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    let _ = on_height;

    rsx! {
        div { id: CONTENT_ID, class: "content", dangerous_inner_html: "{html}" }
    }
}

#[cfg(target_arch = "wasm32")]
struct HeightObserver {
    observer: ResizeObserver,
    _callback: Closure<dyn FnMut()>,
}

#[cfg(target_arch = "wasm32")]
impl HeightObserver {
    fn attach(id: &str, on_height: EventHandler<f64>) -> Option<Self> {
        let element = window()?
            .document()?
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()?;

        on_height.call(effective_content_height(element.offset_height() as f64));

        let runtime = Runtime::current();
        let observed = element.clone();
        let callback = Closure::wrap(Box::new(move || {
            let _guard = RuntimeGuard::new(runtime.clone());
            on_height.call(effective_content_height(observed.offset_height() as f64));
        }) as Box<dyn FnMut()>);

        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref()).ok()?;
        observer.observe(&element);
        Some(Self {
            observer,
            _callback: callback,
        })
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for HeightObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
