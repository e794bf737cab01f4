//! pagedash-core — rendering core for the persistence dashboard.
//!
//! Provides:
//! - `model` — status snapshot received from the persistence service
//! - `fmt` — number/byte formatting and HTML escaping
//! - `render` — occupancy widget, topic table, main content
//! - `statusbar` — status-bar controller with change tracking
//! - `document` — named regions the rendered markup is written into
//! - `source` — snapshot source abstraction and fetch errors
//! - `dashboard` — one poll cycle: apply a snapshot or a failure

pub mod dashboard;
pub mod document;
pub mod fmt;
pub mod model;
pub mod render;
pub mod source;
pub mod statusbar;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
