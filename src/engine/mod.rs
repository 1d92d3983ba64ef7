//! Board Engine - objects, render registry, cache and the tick-gated fold.
//!
//! ```text
//! content list ─▶ CellEngine::refresh (once per tick) ─▶ RenderCache
//!                        │                                    ▲
//!                        └─ arms ─▶ OverlayScheduler ─ removes ┘
//! ```

pub mod cache;
pub mod fold;
pub mod object;
pub mod registry;

pub use cache::{CacheEntry, RenderCache};
pub use fold::{fold_contents, CellEngine, FoldResult, Refresh};
pub use object::{BoardObject, ColorSpec, RenderOutput, VisualOverlay, PAINT_TAG};
pub use registry::{paint_render, RenderFn, RenderRegistry, PAINT_FLASH_CLASS};
