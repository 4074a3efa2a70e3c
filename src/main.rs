mod config;
mod countdown;
mod home;
mod quote;
mod storage;
mod text_fit;

use dioxus::prelude::*;
use home::Home;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        div {
            style: "min-height: 100vh; background: #0f0f1a; display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 16px; font-family: system-ui, sans-serif; color: #9ca3af;",
            p { "Nothing at /{path}" }
            Link {
                to: Route::Home {},
                style: "padding: 10px 24px; background: #4f46e5; color: white; text-decoration: none; border-radius: 8px; font-weight: 600;",
                "Back to the countdown"
            }
        }
    }
}

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        div {
            id: "main",
            Router::<Route> {}
        }
    }
}

fn main() {
    console_error_panic_hook::set_once();
    dioxus::launch(App);
}
