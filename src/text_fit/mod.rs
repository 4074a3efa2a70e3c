//! Text fit - scales a single-line element's font size to fill its container
//!
//! `TextFit` owns the lifecycle: it forces single-line layout on attach, runs
//! a first fit on the next frame, and after that re-fits whenever the host
//! reports a resize or a subtree mutation. Triggers are debounced through one
//! cancelable delay that hands off to an animation frame, so a burst of
//! events collapses into a single fit pass.
//!
//! The engine never touches the DOM directly. Everything it needs from the
//! browser goes through [`FitHost`]; `dom::DomHost` is the web-sys
//! implementation.

pub mod component;
pub mod dom;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{FitBounds, FitConfig};

pub use component::FitText;

/// Browser viewport size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

impl FitBounds {
    /// Upper bound for the current orientation
    pub fn max_for(&self, viewport: Viewport) -> u32 {
        if viewport.is_landscape() {
            self.max_landscape
        } else {
            self.max_portrait
        }
    }

    /// Clamp a candidate size into `[min, max]`. `min` wins if the two cross.
    pub fn clamp(&self, size: f64, max: u32) -> u32 {
        size.min(max as f64).max(self.min as f64) as u32
    }
}

/// `floor(max * container / text)`: the size at which the text measured at
/// `max` would span the container, assuming width scales linearly with size.
/// A zero `text_width` gives infinity, which [`FitBounds::clamp`] caps at max.
pub fn optimal_font_size(max: u32, container_width: f64, text_width: f64) -> f64 {
    (max as f64 * container_width / text_width).floor()
}

fn px(size: u32) -> String {
    format!("{size}px")
}

/// Result of one fit pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitOutcome {
    /// Element has no non-whitespace text; font size left alone
    NoText,
    /// Element has no width yet (not laid out or hidden)
    Hidden,
    Applied(u32),
}

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("resize observer unavailable: {0}")]
    Resize(String),
    #[error("mutation observer unavailable: {0}")]
    Mutation(String),
}

/// Everything the fit engine needs from its environment.
///
/// Handles returned by `after_delay`, `next_frame` and the `watch_*` methods
/// must cancel or disconnect when dropped; the engine relies on dropping them
/// for debounce and teardown.
pub trait FitHost: 'static {
    type Delay;
    type Frame;
    type Watch;

    fn text_content(&self) -> Option<String>;
    /// Inner width of the element's box
    fn client_width(&self) -> f64;
    /// Natural width of the element's content at the current font size
    fn scroll_width(&self) -> f64;
    fn set_style(&self, property: &str, value: &str);
    fn viewport(&self) -> Viewport;

    fn after_delay(&self, ms: u32, callback: Box<dyn FnOnce()>) -> Self::Delay;
    fn next_frame(&self, callback: Box<dyn FnOnce()>) -> Self::Frame;
    fn watch_resize(&self, callback: Rc<dyn Fn()>) -> Result<Self::Watch, WatchError>;
    fn watch_mutations(&self, callback: Rc<dyn Fn()>) -> Result<Self::Watch, WatchError>;
}

struct Inner<H: FitHost> {
    host: H,
    config: FitConfig,
    attached: Cell<bool>,
    delay: RefCell<Option<H::Delay>>,
    frame: RefCell<Option<H::Frame>>,
    watches: RefCell<Vec<H::Watch>>,
}

impl<H: FitHost> Inner<H> {
    fn apply_layout(&self) {
        self.host.set_style("white-space", "nowrap");
        self.host.set_style("width", "100%");
        self.host.set_style("display", "block");
    }

    /// Restart the debounce window. Replacing the handle drops (cancels) the
    /// previous one.
    fn schedule(self: &Rc<Self>) {
        if !self.attached.get() {
            return;
        }
        let weak = Rc::downgrade(self);
        let handle = self.host.after_delay(
            self.config.debounce_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.delay.borrow_mut().take();
                    inner.request_fit();
                }
            }),
        );
        *self.delay.borrow_mut() = Some(handle);
    }

    fn request_fit(self: &Rc<Self>) {
        if !self.attached.get() {
            return;
        }
        let weak: Weak<Self> = Rc::downgrade(self);
        let handle = self.host.next_frame(Box::new(move || {
            let Some(inner) = weak.upgrade() else { return };
            inner.frame.borrow_mut().take();
            if inner.attached.get() {
                inner.fit();
            }
        }));
        *self.frame.borrow_mut() = Some(handle);
    }

    fn fit(&self) -> FitOutcome {
        let has_text = self
            .host
            .text_content()
            .is_some_and(|text| !text.trim().is_empty());
        if !has_text {
            debug!("text fit skipped: no text");
            return FitOutcome::NoText;
        }

        let container_width = self.host.client_width();
        if container_width <= 0.0 {
            debug!(container_width, "text fit skipped: element has no width");
            return FitOutcome::Hidden;
        }

        let bounds = self.config.bounds;
        let max = bounds.max_for(self.host.viewport());
        self.host.set_style("font-size", &px(max));
        let text_width = self.host.scroll_width();

        let size = bounds.clamp(optimal_font_size(max, container_width, text_width), max);
        self.host.set_style("font-size", &px(size));
        debug!(container_width, text_width, max, size, "text fit applied");
        FitOutcome::Applied(size)
    }

    fn detach(&self) {
        if !self.attached.replace(false) {
            return;
        }
        drop(self.watches.take());
        drop(self.delay.take());
        drop(self.frame.take());
    }
}

/// Adaptive font-size behavior bound to one element.
///
/// Dropping the value detaches it.
pub struct TextFit<H: FitHost> {
    inner: Rc<Inner<H>>,
}

impl<H: FitHost> TextFit<H> {
    pub fn new(host: H, config: FitConfig) -> Self {
        Self {
            inner: Rc::new(Inner {
                host,
                config,
                attached: Cell::new(false),
                delay: RefCell::new(None),
                frame: RefCell::new(None),
                watches: RefCell::new(Vec::new()),
            }),
        }
    }

    #[cfg(test)]
    pub fn is_attached(&self) -> bool {
        self.inner.attached.get()
    }

    /// Call once the element is in the layout tree. Attaching twice is a no-op.
    pub fn attach(&self) {
        if self.inner.attached.replace(true) {
            return;
        }
        self.inner.apply_layout();
        self.inner.request_fit();

        let weak = Rc::downgrade(&self.inner);
        let trigger: Rc<dyn Fn()> = Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.schedule();
            }
        });

        let mut watches = Vec::with_capacity(2);
        match self.inner.host.watch_resize(Rc::clone(&trigger)) {
            Ok(watch) => watches.push(watch),
            Err(err) => warn!(%err, "text fit will not follow resizes"),
        }
        match self.inner.host.watch_mutations(trigger) {
            Ok(watch) => watches.push(watch),
            Err(err) => warn!(%err, "text fit will not follow content changes"),
        }
        *self.inner.watches.borrow_mut() = watches;
    }

    /// Stop watching and cancel anything pending. No fit pass runs afterwards.
    pub fn detach(&self) {
        self.inner.detach();
    }

    /// Run a fit pass immediately, bypassing debounce and frame deferral
    #[cfg(test)]
    pub fn fit_now(&self) -> FitOutcome {
        self.inner.fit()
    }
}

impl<H: FitHost> Drop for TextFit<H> {
    fn drop(&mut self) {
        self.inner.detach();
    }
}
