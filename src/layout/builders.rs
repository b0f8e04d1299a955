//! Synthesized layouts: the 7×2 grid template, square-root tiling, and the
//! cascade arrangement plus its shape classifier.

use crate::layout::engine::place;
use crate::layout::panel::{Layout, PanelKind, Viewport, MIN_PANEL_H, MIN_PANEL_W};

/// Columns in the grid template.
pub const GRID_COLS: f64 = 7.0;
/// Rows in the grid template.
pub const GRID_ROWS: f64 = 2.0;
/// Horizontal and vertical offset between cascaded panels.
pub const CASCADE_STEP: f64 = 30.0;
/// Cascaded panel size as a fraction of the workspace.
pub const CASCADE_FRACTION: f64 = 0.6;

/// Grid template: `(panel, col, row, col_span, row_span)` on the 7×2 grid.
const GRID_TEMPLATE: [(PanelKind, f64, f64, f64, f64); 8] = [
    (PanelKind::Position, 0.0, 0.0, 1.0, 1.0),
    (PanelKind::Time, 1.0, 0.0, 1.0, 1.0),
    (PanelKind::Sky, 2.0, 0.0, 3.0, 1.0),
    (PanelKind::Map, 5.0, 0.0, 2.0, 2.0),
    (PanelKind::Snr, 0.0, 1.0, 2.0, 1.0),
    (PanelKind::Altitude, 2.0, 1.0, 1.0, 1.0),
    (PanelKind::Cog, 3.0, 1.0, 1.0, 1.0),
    (PanelKind::Speed, 4.0, 1.0, 1.0, 1.0),
];

/// Build the grid layout for a viewport: every panel visible, un-maximized,
/// placed on the 7×2 template with rounded cell edges. Z indexes are left
/// unassigned for the engine to seed.
#[must_use]
pub fn build_grid_layout(vp: Viewport) -> Layout {
    let col_w = vp.w / GRID_COLS;
    let row_h = vp.h / GRID_ROWS;
    let mut layout = Layout::default();
    for (kind, col, row, col_span, row_span) in GRID_TEMPLATE {
        *layout.get_mut(kind) = place(
            (col * col_w).round(),
            (row * row_h).round(),
            (col_span * col_w).round(),
            (row_span * row_h).round(),
        );
    }
    layout
}

/// Effective minimum panel size for grid normalization.
///
/// On viewports too small for a 7-column band of stock-minimum panels, the
/// minimum shrinks proportionally so the grid still fits.
#[must_use]
pub fn grid_min_size(vp: Viewport) -> (f64, f64) {
    let scale = (vp.w / (GRID_COLS * MIN_PANEL_W))
        .min(vp.h / (GRID_ROWS * MIN_PANEL_H))
        .min(1.0);
    (
        (MIN_PANEL_W * scale).round(),
        (MIN_PANEL_H * scale).round(),
    )
}

/// Re-tile panels into a near-square grid of equal cells.
///
/// With `show_all`, hidden panels are revealed and included; otherwise only
/// the currently visible panels are tiled and hidden ones are untouched.
/// Tiled panels get `z = index + 1` in canonical order.
pub fn tile_layout(layout: &mut Layout, vp: Viewport, show_all: bool) -> u64 {
    let targets: Vec<PanelKind> = if show_all {
        PanelKind::ALL.to_vec()
    } else {
        layout.visible_kinds()
    };
    let count = targets.len().max(1);
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cols = (count as f64).sqrt().ceil() as usize;
    let cols = cols.max(1);
    #[allow(clippy::cast_precision_loss)]
    let cell_w = vp.w / cols as f64;
    #[allow(clippy::cast_precision_loss)]
    let rows = (count as f64 / cols as f64).ceil();
    let cell_h = vp.h / rows;

    for (idx, kind) in targets.iter().enumerate() {
        let col = idx % cols;
        let row = idx / cols;
        #[allow(clippy::cast_precision_loss)]
        let entry = place(
            (col as f64 * cell_w).round(),
            (row as f64 * cell_h).round(),
            cell_w.round(),
            cell_h.round(),
        );
        let slot = layout.get_mut(*kind);
        let prev = slot.prev;
        *slot = entry;
        slot.z = idx as u64 + 1;
        slot.prev = prev;
    }
    targets.len() as u64 + 1
}

/// Stack the visible panels in a diagonal cascade.
///
/// Each panel becomes 60% of the workspace (floored at the panel minimum)
/// offset by [`CASCADE_STEP`] per index, with `z = index + 1`.
pub fn cascade_layout(layout: &mut Layout, vp: Viewport) -> u64 {
    let visible = layout.visible_kinds();
    let base_w = (vp.w * CASCADE_FRACTION).max(MIN_PANEL_W);
    let base_h = (vp.h * CASCADE_FRACTION).max(MIN_PANEL_H);
    for (idx, kind) in visible.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let offset = idx as f64 * CASCADE_STEP;
        let entry = layout.get_mut(*kind);
        entry.maximized = false;
        entry.rect.x = offset.clamp(0.0, (vp.w - base_w).max(0.0));
        entry.rect.y = offset.clamp(0.0, (vp.h - base_h).max(0.0));
        entry.rect.w = base_w;
        entry.rect.h = base_h;
        entry.z = idx as u64 + 1;
    }
    visible.len() as u64 + 1
}

/// Heuristic: does this layout look like an untouched cascade?
///
/// True when at least three panels are visible and the first three share a
/// rounded size, sit on the diagonal (`x == y`, multiples of the cascade
/// step), and advance by exactly one step each. Used to decide whether a
/// persisted layout is worth preserving verbatim.
#[must_use]
pub fn looks_like_auto_cascade(layout: &Layout) -> bool {
    let visible = layout.visible_kinds();
    if visible.len() < 3 {
        return false;
    }
    let first = layout.get(visible[0]);
    if first.maximized {
        return false;
    }
    let base_w = first.rect.w.round();
    let base_h = first.rect.h.round();
    let mut prev: Option<f64> = None;
    for kind in visible.iter().take(3) {
        let entry = layout.get(*kind);
        if entry.maximized {
            return false;
        }
        if entry.rect.w.round() != base_w || entry.rect.h.round() != base_h {
            return false;
        }
        let x = entry.rect.x.round();
        let y = entry.rect.y.round();
        if x != y || x % CASCADE_STEP != 0.0 {
            return false;
        }
        if let Some(prev_x) = prev
            && x != prev_x + CASCADE_STEP
        {
            return false;
        }
        prev = Some(x);
    }
    true
}

// ──────────────────────── tests ────────────────────────
