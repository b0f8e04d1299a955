//! Windowed per-satellite signal history.

pub mod store;
