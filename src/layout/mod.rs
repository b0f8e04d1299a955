//! Panel layout model, geometry engine, synthesized arrangements, and
//! persistence.

pub mod builders;
pub mod engine;
pub mod panel;
pub mod store;

pub use builders::{build_grid_layout, cascade_layout, looks_like_auto_cascade, tile_layout};
pub use engine::{normalize, scale_to_fit, LayoutEngine};
pub use panel::{Layout, PanelEntry, PanelKind, PanelRect, Viewport};
pub use store::{resolve_startup_layout, LayoutLoad, LayoutStore, SaveSlot};
