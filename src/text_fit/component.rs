use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use tracing::warn;

use super::TextFit;
use super::dom::DomHost;
use crate::config::FitConfig;

/// Single-line text whose font size tracks its container width
#[component]
pub fn FitText(text: String, #[props(default)] style: String) -> Element {
    let behavior = use_hook(|| Rc::new(RefCell::new(None::<TextFit<DomHost>>)));

    let teardown = Rc::clone(&behavior);
    use_drop(move || {
        if let Some(fit) = teardown.borrow_mut().take() {
            fit.detach();
        }
    });

    rsx! {
        div {
            style: "{style}",
            onmounted: move |evt: MountedEvent| {
                let Some(host) = evt.data().downcast::<web_sys::Element>().and_then(DomHost::from_element) else {
                    warn!("FitText mounted on something that is not an HTML element");
                    return;
                };
                let fit = TextFit::new(host, FitConfig::default());
                fit.attach();
                // any previous behavior is dropped here, which detaches it
                *behavior.borrow_mut() = Some(fit);
            },
            "{text}"
        }
    }
}
