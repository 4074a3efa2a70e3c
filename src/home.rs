use chrono::{DateTime, Utc};
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

use crate::config::{FALLBACK_QUOTE, TICK_MS};
use crate::countdown::{TimeRemaining, format_date_input, local_midnight, parse_date_input};
use crate::quote::{QuoteClient, QuoteError};
use crate::storage::EventStore;
use crate::text_fit::FitText;

const INPUT_STYLE: &str = "padding: 10px 14px; border: 1px solid #2a2a4a; border-radius: 6px; font-size: 16px; font-family: system-ui, sans-serif; background: #1a1a2e; color: #e5e7eb; box-sizing: border-box; width: 100%;";

/// What the quote panel shows for the current resource value and state
#[derive(Debug, Clone, PartialEq)]
struct QuoteView {
    text: Option<String>,
    error: Option<String>,
    loading: bool,
}

impl QuoteView {
    // A restart keeps the previous value until the new fetch settles
    fn new(value: Option<&Result<String, QuoteError>>, state: &UseResourceState) -> Self {
        let (text, error) = match value {
            None => (None, None),
            Some(Ok(text)) => (Some(text.clone()), None),
            Some(Err(err)) => (Some(FALLBACK_QUOTE.to_string()), Some(err.to_string())),
        };
        Self { text, error, loading: matches!(state, UseResourceState::Pending) }
    }
}

#[component]
pub fn Home() -> Element {
    let saved = use_hook(|| EventStore::default().load());
    let mut event_name = use_signal(|| saved.as_ref().map(|s| s.name.clone()).unwrap_or_default());
    let mut event_date = use_signal(|| saved.as_ref().and_then(|s| s.date));
    let mut remaining = use_signal(|| None::<TimeRemaining>);

    // Persist on every change; an empty form clears the record
    use_effect(move || {
        let name = event_name();
        let date: Option<DateTime<Utc>> = event_date();
        EventStore::default().sync(&name, date.as_ref());
    });

    // Restarted whenever the date changes, dropped on unmount
    let _ticker = use_resource(move || {
        let target = event_date();
        async move {
            let Some(target) = target else {
                remaining.set(None);
                return;
            };
            loop {
                remaining.set(Some(TimeRemaining::until(target)));
                TimeoutFuture::new(TICK_MS).await;
            }
        }
    });

    let mut quote = use_resource(|| async move { QuoteClient::default().random_quote().await });

    let QuoteView { text: quote_text, error: quote_error, loading: quote_loading } =
        QuoteView::new((*quote.read()).as_ref(), &quote.state().read());

    let date_value = event_date().map(|d| format_date_input(&d)).unwrap_or_default();
    let title = event_name();
    let countdown_text = match remaining() {
        Some(t) if t.is_expired() => "The day has arrived!".to_string(),
        Some(t) => t.to_string(),
        None => "Pick a date to start the countdown".to_string(),
    };

    rsx! {
        div {
            style: "min-height: 100vh; background: #0f0f1a; display: flex; flex-direction: column; align-items: center; padding: 40px 20px; font-family: system-ui, -apple-system, sans-serif; color: #e5e7eb; box-sizing: border-box;",

            div {
                style: "width: 100%; max-width: 960px; display: flex; flex-direction: column; gap: 24px;",

                // Inputs
                div {
                    style: "display: grid; grid-template-columns: 2fr 1fr; gap: 12px;",
                    input {
                        r#type: "text",
                        style: INPUT_STYLE,
                        placeholder: "Event name",
                        value: "{title}",
                        oninput: move |e: Event<FormData>| event_name.set(e.value()),
                    }
                    input {
                        r#type: "date",
                        style: INPUT_STYLE,
                        value: "{date_value}",
                        oninput: move |e: Event<FormData>| {
                            event_date.set(parse_date_input(&e.value()).and_then(local_midnight));
                        },
                    }
                }

                // Event name, scaled to the card width
                div {
                    style: "width: 100%; overflow: hidden;",
                    FitText {
                        text: title.clone(),
                        style: "font-weight: 800; line-height: 1.1; letter-spacing: -1px; color: #f9fafb;",
                    }
                }

                div {
                    style: "font-size: 28px; font-variant-numeric: tabular-nums; color: #a5b4fc;",
                    "{countdown_text}"
                }

                // Quote
                div {
                    style: "background: #1a1a2e; border: 1px solid #2a2a4a; border-radius: 10px; padding: 24px; display: flex; flex-direction: column; gap: 12px;",
                    if quote_loading {
                        p { style: "margin: 0; color: #6b7280;", "Loading quote..." }
                    }
                    if let Some(text) = quote_text {
                        p { style: "margin: 0; font-size: 18px; line-height: 1.6; font-style: italic;", "\u{201c}{text}\u{201d}" }
                    }
                    if let Some(message) = quote_error {
                        p { style: "margin: 0; font-size: 13px; color: #f87171;", "{message}" }
                    }
                    button {
                        style: "align-self: flex-start; padding: 8px 18px; border: none; border-radius: 6px; background: #4f46e5; color: white; font-size: 14px; font-weight: 600; cursor: pointer;",
                        disabled: quote_loading,
                        onclick: move |_| quote.restart(),
                        "New quote"
                    }
                }
            }
        }
    }
}
