//! Responsive stock quote board.
//!
//! This crate aggregates:
//! - `models` — the `Quote` snapshot and the fixed list of displayed fields.
//! - `source` — the swappable `QuoteSource` and its HTTP implementation.
//! - `viewport` — viewport platforms and scoped media-query subscriptions.
//! - `view` — the responsive view component and its text/HTML renderers.
//! - `config` — layered application configuration.
pub mod config;
pub mod models;
pub mod source;
pub mod view;
pub mod viewport;

pub use config::AppConfig;
pub use models::{Field, Quote};
pub use source::{FetchError, HttpQuoteSource, QuoteSource};
pub use view::{MountedView, QuoteView, Screen, ViewState};
pub use viewport::{MediaQuery, MediaQuerySubscription, SimulatedViewport, ViewportPlatform};
