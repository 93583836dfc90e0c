//! # Mux Configuration
//!
//! [`MuxConfig`] carries the few behavioral switches of a [`Mux`](crate::Mux).
//! It derives `Deserialize` with per-field defaults so it can sit inside an
//! application's own config file:
//!
//! ```rust
//! use segmux::MuxConfig;
//!
//! let cfg: MuxConfig = serde_json::from_str(r#"{ "redirect_trailing_slash": false }"#).unwrap();
//! assert!(!cfg.redirect_trailing_slash);
//! assert!(cfg.enforce_methods);
//! ```
//!
//! ## Options
//!
//! - `redirect_trailing_slash` (default `true`): answer `/a` with a 301 to `/a/`
//!   when only the prefix pattern `/a/` exists. When off, lookup falls through
//!   to the longest shorter prefix.
//! - `enforce_methods` (default `true`): honor method sets configured with
//!   [`Route::methods`](crate::Route::methods) by answering 405. When off the
//!   set is informational only.
//! - `slow_match_threshold_us` (default `1000`): lookups slower than this are
//!   logged at `warn`.

use serde::Deserialize;
use std::time::Duration;

/// Behavioral switches for a [`Mux`](crate::Mux).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MuxConfig {
    /// Redirect `/p` to `/p/` when only the prefix pattern `/p/` matches.
    pub redirect_trailing_slash: bool,
    /// Answer 405 for methods outside a route's configured method set.
    pub enforce_methods: bool,
    /// Lookups slower than this many microseconds are logged at `warn`.
    pub slow_match_threshold_us: u64,
}

impl Default for MuxConfig {
    fn default() -> Self {
        Self {
            redirect_trailing_slash: true,
            enforce_methods: true,
            slow_match_threshold_us: 1_000,
        }
    }
}

impl MuxConfig {
    #[must_use]
    pub fn slow_match_threshold(&self) -> Duration {
        Duration::from_micros(self.slow_match_threshold_us)
    }
}
