//! DomHost - `FitHost` backed by a live `HtmlElement`
//!
//! Delays are gloo `Timeout`s and frames are gloo `AnimationFrame`s; both
//! cancel on drop. Watches wrap a ResizeObserver or MutationObserver and
//! disconnect on drop.

use std::rc::Rc;

use gloo_render::{AnimationFrame, request_animation_frame};
use gloo_timers::callback::Timeout;
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{HtmlElement, MutationObserver, MutationObserverInit, ResizeObserver};

use super::{FitHost, Viewport, WatchError};

pub struct DomHost {
    element: HtmlElement,
}

impl DomHost {
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }

    /// `None` for non-HTML elements (e.g. SVG), which have no inline style
    pub fn from_element(element: &web_sys::Element) -> Option<Self> {
        element.clone().dyn_into::<HtmlElement>().ok().map(Self::new)
    }
}

pub enum DomWatch {
    Resize {
        observer: ResizeObserver,
        _callback: Closure<dyn FnMut()>,
    },
    Mutation {
        observer: MutationObserver,
        _callback: Closure<dyn FnMut()>,
    },
}

impl Drop for DomWatch {
    fn drop(&mut self) {
        match self {
            Self::Resize { observer, .. } => observer.disconnect(),
            Self::Mutation { observer, .. } => observer.disconnect(),
        }
    }
}

fn js_closure(callback: Rc<dyn Fn()>) -> Closure<dyn FnMut()> {
    Closure::<dyn FnMut()>::new(move || callback())
}

impl FitHost for DomHost {
    type Delay = Timeout;
    type Frame = AnimationFrame;
    type Watch = DomWatch;

    fn text_content(&self) -> Option<String> {
        self.element.text_content()
    }

    fn client_width(&self) -> f64 {
        self.element.client_width() as f64
    }

    fn scroll_width(&self) -> f64 {
        self.element.scroll_width() as f64
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Err(err) = self.element.style().set_property(property, value) {
            warn!(property, value, ?err, "failed to set style");
        }
    }

    fn viewport(&self) -> Viewport {
        match web_sys::window() {
            Some(window) => {
                let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
                let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
                Viewport::new(w, h)
            }
            None => Viewport::new(0.0, 0.0),
        }
    }

    fn after_delay(&self, ms: u32, callback: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(ms, callback)
    }

    fn next_frame(&self, callback: Box<dyn FnOnce()>) -> AnimationFrame {
        request_animation_frame(move |_timestamp| callback())
    }

    fn watch_resize(&self, callback: Rc<dyn Fn()>) -> Result<DomWatch, WatchError> {
        let closure = js_closure(callback);
        let observer = ResizeObserver::new(closure.as_ref().unchecked_ref::<js_sys::Function>())
            .map_err(|err| WatchError::Resize(format!("{err:?}")))?;
        observer.observe(&self.element);
        Ok(DomWatch::Resize { observer, _callback: closure })
    }

    fn watch_mutations(&self, callback: Rc<dyn Fn()>) -> Result<DomWatch, WatchError> {
        let closure = js_closure(callback);
        let observer = MutationObserver::new(closure.as_ref().unchecked_ref::<js_sys::Function>())
            .map_err(|err| WatchError::Mutation(format!("{err:?}")))?;

        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_character_data(true);
        options.set_subtree(true);
        observer
            .observe_with_options(&self.element, &options)
            .map_err(|err| WatchError::Mutation(format!("{err:?}")))?;

        Ok(DomWatch::Mutation { observer, _callback: closure })
    }
}
