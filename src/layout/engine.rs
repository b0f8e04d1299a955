//! Layout geometry engine: normalization, fit-to-viewport scaling, and the
//! interactive panel operations (move, resize, hide, maximize, stacking).
//!
//! Every mutation runs through [`normalize`], which is idempotent: panels
//! are clamped to the minimum size, shrunk to the viewport, and kept fully
//! inside it. Maximized panels are pinned to the full viewport instead.

use crate::layout::builders::{cascade_layout, tile_layout};
use crate::layout::panel::{
    Layout, PanelEntry, PanelKind, PanelRect, Viewport, MIN_PANEL_H, MIN_PANEL_W,
    RESTORE_FALLBACK,
};

/// Scale factors this close to 1 are treated as a no-op in
/// [`scale_to_fit`], avoiding churn from rounding noise.
pub const SCALE_NOOP_THRESHOLD: f64 = 0.999;

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Clamp every panel into the viewport. Maximized panels become the full
/// viewport; others are clamped to `[min, viewport]` size and then shifted
/// so they stay fully contained. Idempotent for a fixed viewport.
pub fn normalize(layout: &mut Layout, vp: Viewport) {
    normalize_with_min(layout, vp, MIN_PANEL_W, MIN_PANEL_H);
}

/// [`normalize`] with an explicit minimum size (used when a synthesized
/// layout is scaled below the stock minimum on small viewports).
pub fn normalize_with_min(layout: &mut Layout, vp: Viewport, min_w: f64, min_h: f64) {
    for (_, entry) in layout.iter_mut() {
        if entry.maximized {
            entry.rect = PanelRect::new(0.0, 0.0, vp.w, vp.h);
        } else {
            let w = clamp(entry.rect.w, min_w, vp.w);
            let h = clamp(entry.rect.h, min_h, vp.h);
            let x = clamp(entry.rect.x, 0.0, (vp.w - w).max(0.0));
            let y = clamp(entry.rect.y, 0.0, (vp.h - h).max(0.0));
            entry.rect = PanelRect::new(x, y, w, h);
        }
    }
}

/// Bounding extent of the visible, non-maximized panels.
#[must_use]
pub fn layout_bounds(layout: &Layout) -> (f64, f64) {
    let mut max_x: f64 = 0.0;
    let mut max_y: f64 = 0.0;
    for (_, entry) in layout.iter() {
        if entry.hidden || entry.maximized {
            continue;
        }
        max_x = max_x.max(entry.rect.x + entry.rect.w);
        max_y = max_y.max(entry.rect.y + entry.rect.h);
    }
    (max_x, max_y)
}

/// Uniformly scale the layout down so its extent fits the viewport.
///
/// Scaling only shrinks (factor capped at 1) and factors above
/// [`SCALE_NOOP_THRESHOLD`] leave the layout untouched. Coordinates are
/// rounded; sizes are floored at the minimum panel size. Maximized panels
/// are left alone. Returns whether a rescale happened.
pub fn scale_to_fit(layout: &mut Layout, vp: Viewport) -> bool {
    let (bw, bh) = layout_bounds(layout);
    let scale = (vp.w / if bw == 0.0 { 1.0 } else { bw })
        .min(vp.h / if bh == 0.0 { 1.0 } else { bh })
        .min(1.0);
    if scale >= SCALE_NOOP_THRESHOLD {
        return false;
    }
    for (_, entry) in layout.iter_mut() {
        if entry.maximized {
            continue;
        }
        entry.rect = PanelRect::new(
            (entry.rect.x * scale).round(),
            (entry.rect.y * scale).round(),
            (entry.rect.w * scale).round().max(MIN_PANEL_W),
            (entry.rect.h * scale).round().max(MIN_PANEL_H),
        );
    }
    true
}

/// Interactive layout engine: the in-memory layout plus the stacking
/// counter that hands out z indexes.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    layout: Layout,
    z_counter: u64,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::from_layout(Layout::default())
    }
}

impl LayoutEngine {
    /// Adopt a layout, reseeding the stacking counter from its highest z.
    #[must_use]
    pub fn from_layout(layout: Layout) -> Self {
        let z_counter = layout.max_z();
        Self { layout, z_counter }
    }

    /// Current layout.
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Replace the layout wholesale (slot load, synthesized layout) and
    /// reseed the stacking counter.
    pub fn apply(&mut self, mut layout: Layout, vp: Viewport) {
        layout.seed_missing_z();
        normalize(&mut layout, vp);
        self.z_counter = layout.max_z();
        self.layout = layout;
    }

    /// Re-clamp after a viewport change.
    pub fn viewport_changed(&mut self, vp: Viewport) {
        normalize(&mut self.layout, vp);
    }

    /// Move a panel to `(x, y)`, clamped into the viewport.
    pub fn move_panel(&mut self, kind: PanelKind, x: f64, y: f64, vp: Viewport) {
        let entry = self.layout.get_mut(kind);
        entry.rect.x = x;
        entry.rect.y = y;
        normalize(&mut self.layout, vp);
    }

    /// Resize a panel, clamped to the minimum size and the viewport.
    pub fn resize_panel(&mut self, kind: PanelKind, w: f64, h: f64, vp: Viewport) {
        let entry = self.layout.get_mut(kind);
        entry.rect.w = w;
        entry.rect.h = h;
        normalize(&mut self.layout, vp);
    }

    /// Hide or reveal a panel. Revealing raises it to the top of the stack.
    pub fn set_hidden(&mut self, kind: PanelKind, hidden: bool, vp: Viewport) {
        if hidden {
            self.layout.get_mut(kind).hidden = true;
        } else {
            self.z_counter += 1;
            let z = self.z_counter;
            let entry = self.layout.get_mut(kind);
            entry.hidden = false;
            entry.z = z;
        }
        normalize(&mut self.layout, vp);
    }

    /// Raise a panel to the top of the stack.
    pub fn bring_to_front(&mut self, kind: PanelKind) {
        self.z_counter += 1;
        self.layout.get_mut(kind).z = self.z_counter;
    }

    /// Toggle a panel between maximized and its previous rect.
    ///
    /// Maximizing snapshots the current rect into `prev`, reveals the
    /// panel, and clears the maximized flag on every other panel so at
    /// most one panel is maximized. Restoring falls back to
    /// [`RESTORE_FALLBACK`] when no `prev` was stored.
    pub fn toggle_maximize(&mut self, kind: PanelKind, vp: Viewport) {
        let is_max = self.layout.get(kind).maximized;
        if is_max {
            let entry = self.layout.get_mut(kind);
            let prev = entry.prev.unwrap_or(RESTORE_FALLBACK);
            entry.maximized = false;
            entry.rect = prev;
        } else {
            let entry = self.layout.get_mut(kind);
            entry.prev = Some(entry.rect);
            entry.maximized = true;
            entry.hidden = false;
            for (other, entry) in self.layout.iter_mut() {
                if other != kind {
                    entry.maximized = false;
                }
            }
        }
        normalize(&mut self.layout, vp);
    }

    /// Re-tile panels into equal cells and reset the stacking counter.
    ///
    /// Untouched (hidden) panels may still hold a higher z, so the counter
    /// is reseeded to whichever is greater.
    pub fn retile(&mut self, vp: Viewport, show_all: bool) {
        let next_z = tile_layout(&mut self.layout, vp, show_all);
        self.z_counter = next_z.saturating_sub(1).max(self.layout.max_z());
        normalize(&mut self.layout, vp);
    }

    /// Cascade the visible panels and reset the stacking counter.
    pub fn cascade(&mut self, vp: Viewport) {
        let next_z = cascade_layout(&mut self.layout, vp);
        self.z_counter = next_z.saturating_sub(1).max(self.layout.max_z());
        normalize(&mut self.layout, vp);
    }

    /// Current top of the stacking order.
    #[must_use]
    pub fn z_counter(&self) -> u64 {
        self.z_counter
    }

    /// Consume the engine, yielding the layout for persistence.
    #[must_use]
    pub fn into_layout(self) -> Layout {
        self.layout
    }
}

// Entry helper shared by the builders.
pub(crate) fn place(x: f64, y: f64, w: f64, h: f64) -> PanelEntry {
    PanelEntry {
        rect: PanelRect::new(x, y, w, h),
        hidden: false,
        maximized: false,
        z: 0,
        prev: None,
    }
}

// ──────────────────────── tests ────────────────────────
