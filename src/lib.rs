//! # spark-board
//!
//! Per-cell rendering and animation engine for a paintable grid board.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## Architecture
//!
//! Each cell of the board holds an ordered list of objects. On every
//! simulation tick a cell folds its list through the render registry, left
//! to right, starting from the board's default color. The result is stored
//! in a cache shared by the whole session, so a cell that is re-mounted
//! picks up where its previous view left off, and hovering never refolds.
//!
//! ```text
//! BoardState (tick, mode, colors, contents)
//!     -> CellEngine::refresh (fold once per tick) -> RenderCache
//!     -> CellView::render (hover, flips) -> PaintInstruction -> renderer
//! ```
//!
//! Transient overlays returned by render functions expire on a deadline; the
//! [`OverlayScheduler`](state::timers::OverlayScheduler) removes them from the
//! cache and repaints the owning view if it is still mounted.
//!
//! ## Modules
//!
//! - [`types`] - Core types (Rgba, Coord, CursorMode)
//! - [`engine`] - Objects, render registry, render cache, tick-gated fold
//! - [`state`] - Board state, pointer events, overlay timers
//! - [`pipeline`] - Cell views and the board session
//! - [`renderer`] - Terminal output and mouse routing
//! - [`config`] - JSON configuration

pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{BoardConfig, BoardSettings};
pub use error::{BoardError, ColorError, Result};

pub use engine::{
    fold_contents, paint_render, BoardObject, CacheEntry, CellEngine, ColorSpec, FoldResult,
    Refresh, RenderCache, RenderFn, RenderOutput, RenderRegistry, VisualOverlay,
    PAINT_FLASH_CLASS, PAINT_TAG,
};

pub use state::{
    BoardAction, BoardState, Clock, ManualClock, ModifierKey, Modifiers, OverlayScheduler,
    PointerAction, PointerButton, PointerEvent, Repaint, SystemClock,
};

pub use pipeline::{
    ActionSink, Board, BoardBuilder, CellView, Flip, Outline, PaintInstruction, Z_BASE, Z_RAISED,
};

pub use renderer::{paint_cells, PointerRouter};

/// Everything needed to drive a board.
pub mod prelude {
    pub use crate::config::{BoardConfig, BoardSettings};
    pub use crate::engine::{BoardObject, RenderOutput, RenderRegistry, VisualOverlay};
    pub use crate::error::{BoardError, Result};
    pub use crate::pipeline::{Board, CellView, Flip, Outline, PaintInstruction};
    pub use crate::state::{
        BoardAction, ManualClock, Modifiers, PointerButton, PointerEvent,
    };
    pub use crate::types::{Coord, CursorMode, Rgba};
}
