//! Config - fixed tuning values and the structs built from them
//!
//! Everything here is compile-time. The quote endpoint can be swapped at
//! build time with `QUOTE_API_URL=... dx build`.

pub const MIN_FONT_SIZE: u32 = 12;
pub const MAX_FONT_SIZE_LANDSCAPE: u32 = 200;
pub const MAX_FONT_SIZE_PORTRAIT: u32 = 100;
pub const FIT_DEBOUNCE_MS: u32 = 16;

pub const STORAGE_KEY: &str = "countdown-event";

pub const DEFAULT_QUOTE_API_URL: &str = "https://dummyjson.com/quotes/random";
pub const QUOTE_TIMEOUT_MS: u32 = 5000;
pub const QUOTE_RETRIES: u32 = 2;
pub const QUOTE_RETRY_DELAY_MS: u32 = 1000;
pub const FALLBACK_QUOTE: &str = "Every moment is a fresh beginning.";
pub const QUOTE_ERROR_MESSAGE: &str = "Unable to load quote. Please try again.";

pub const TICK_MS: u32 = 1000;

/// Font-size bounds used by a fit pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitBounds {
    pub min: u32,
    pub max_landscape: u32,
    pub max_portrait: u32,
}

impl Default for FitBounds {
    fn default() -> Self {
        Self {
            min: MIN_FONT_SIZE,
            max_landscape: MAX_FONT_SIZE_LANDSCAPE,
            max_portrait: MAX_FONT_SIZE_PORTRAIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitConfig {
    pub bounds: FitBounds,
    pub debounce_ms: u32,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            bounds: FitBounds::default(),
            debounce_ms: FIT_DEBOUNCE_MS,
        }
    }
}

/// Fixed-delay retry policy. `retries` counts attempts after the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay_ms: u32,
}

impl RetryPolicy {
    pub const fn attempts(&self) -> u32 {
        self.retries + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteConfig {
    pub url: String,
    pub timeout_ms: u32,
    pub retry: RetryPolicy,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            url: option_env!("QUOTE_API_URL")
                .unwrap_or(DEFAULT_QUOTE_API_URL)
                .to_string(),
            timeout_ms: QUOTE_TIMEOUT_MS,
            retry: RetryPolicy {
                retries: QUOTE_RETRIES,
                delay_ms: QUOTE_RETRY_DELAY_MS,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bounds() {
        let b = FitBounds::default();
        assert_eq!(b.min, 12);
        assert_eq!(b.max_landscape, 200);
        assert_eq!(b.max_portrait, 100);
    }

    #[test]
    fn retry_policy_counts_first_attempt() {
        assert_eq!(QuoteConfig::default().retry.attempts(), 3);
    }
}
