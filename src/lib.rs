#![forbid(unsafe_code)]

//! NavScope — live GNSS telemetry dashboard core.
//!
//! Three pillars:
//! 1. **Panel layout engine** — movable, resizable, persistent dashboard
//!    panels with synthesized grid/tile/cascade arrangements
//! 2. **Signal history** — a sliding 60-second per-satellite SNR window
//!    feeding the signal chart
//! 3. **Update pipeline** — supersede-semantics snapshot distribution from a
//!    reconnecting NDJSON feed, with heading-vector projection
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use navscope::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use navscope::core::config::Config;
//! use navscope::layout::engine::LayoutEngine;
//! ```

pub mod prelude;

pub mod core;
pub mod geo;
pub mod history;
pub mod layout;
pub mod logger;
pub mod prefs;
pub mod telemetry;
