//! Cell Rendering Engine - folding a content list into a composite.
//!
//! ```text
//! default color ─▶ render(obj0) ─▶ render(obj1) ─▶ ... ─▶ background
//!                       │               │
//!                       └── overlays ───┴──▶ cache entry + expiry timers
//! ```
//!
//! The fold runs at most once per tick per cell: [`CellEngine::refresh`] only
//! folds when the tick has advanced past the one recorded in the cache entry.
//! Every other call hands back the stored background untouched, so hover and
//! mode repaints never re-run render functions.

use std::rc::{Rc, Weak};

use super::cache::{CacheEntry, RenderCache};
use super::object::{BoardObject, VisualOverlay};
use super::registry::RenderRegistry;
use crate::state::timers::{OverlayScheduler, Repaint};
use crate::types::{Coord, Rgba};

/// Result of folding one content list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldResult {
    pub color: Rgba,
    pub overlays: Vec<VisualOverlay>,
    /// Objects that had a render function.
    pub applied: usize,
}

/// Left-fold `contents` through their render functions, starting at `base`.
///
/// Objects are visited strictly in order and each one sees the composite the
/// previous one produced. Objects with an unregistered tag are skipped.
pub fn fold_contents(registry: &RenderRegistry, base: Rgba, contents: &[BoardObject]) -> FoldResult {
    let mut result = FoldResult {
        color: base,
        overlays: Vec::new(),
        applied: 0,
    };
    for object in contents {
        let Some(render) = registry.lookup(object.tag()) else {
            continue;
        };
        let output = render(object, result.color);
        result.color = output.color;
        result.overlays.extend(output.overlays);
        result.applied += 1;
    }
    result
}

/// What a refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// The tick advanced and the content list was folded.
    Folded { background: Rgba, overlays_added: usize },
    /// Same tick as the last fold; the stored background was reused.
    Reused { background: Rgba },
}

impl Refresh {
    pub fn background(&self) -> Rgba {
        match *self {
            Self::Folded { background, .. } | Self::Reused { background } => background,
        }
    }

    pub fn folded(&self) -> bool {
        matches!(self, Self::Folded { .. })
    }
}

/// Tick-gated fold writing into the shared cache.
#[derive(Debug, Clone)]
pub struct CellEngine {
    registry: Rc<RenderRegistry>,
    cache: RenderCache,
    scheduler: Rc<OverlayScheduler>,
}

impl CellEngine {
    pub fn new(registry: Rc<RenderRegistry>, cache: RenderCache, scheduler: Rc<OverlayScheduler>) -> Self {
        Self {
            registry,
            cache,
            scheduler,
        }
    }

    pub fn registry(&self) -> &RenderRegistry {
        &self.registry
    }

    /// Raw cache access. Reads here do not fire due expiries; go through
    /// [`entry`](Self::entry) for an up-to-date view.
    pub(crate) fn cache(&self) -> &RenderCache {
        &self.cache
    }

    /// Cache entry at `coord` after firing due expiries.
    pub fn entry(&self, coord: Coord) -> CacheEntry {
        self.scheduler.run_due();
        self.cache.get(coord)
    }

    /// Replace the entry at `coord` wholesale, after firing due expiries.
    /// Expiries still pending for overlays the new entry lacks become no-ops.
    pub fn set_entry(&self, coord: Coord, entry: CacheEntry) {
        self.scheduler.run_due();
        self.cache.set(coord, entry);
    }

    pub fn scheduler(&self) -> &OverlayScheduler {
        &self.scheduler
    }

    /// Bring the cache entry at `coord` up to `tick`.
    ///
    /// Folds only if `tick` is past the entry's last folded tick. New overlays
    /// are appended to the entry and armed in the same call, with `owner` as
    /// the cell to repaint when each expires.
    pub fn refresh(
        &self,
        coord: Coord,
        tick: u64,
        default_color: Rgba,
        contents: &[BoardObject],
        owner: &Weak<dyn Repaint>,
    ) -> Refresh {
        let last = self.cache.update(coord, |entry| {
            entry.folded_tick.map(|last| (last, entry.background))
        });
        if let Some((last, background)) = last {
            if tick <= last {
                return Refresh::Reused { background };
            }
        }

        let result = fold_contents(&self.registry, default_color, contents);
        let overlays_added = result.overlays.len();
        self.cache.update(coord, |entry| {
            entry.background = result.color;
            entry.folded_tick = Some(tick);
            entry.overlays.extend(result.overlays.iter().cloned());
        });
        for overlay in &result.overlays {
            self.scheduler.arm(coord, overlay, owner.clone());
        }

        tracing::debug!(
            coord = %coord,
            tick,
            objects = contents.len(),
            applied = result.applied,
            overlays_added,
            background = %result.color,
            "cell folded"
        );
        Refresh::Folded {
            background: result.color,
            overlays_added,
        }
    }
}
