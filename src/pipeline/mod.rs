//! Pipeline - board sessions and the per-cell views they mount.
//!
//! ```text
//! Board ─ mount(coord) ─▶ CellView ─ render() ─▶ PaintInstruction
//!   │                        │
//!   └── BoardContext (state, engine, settings, action sink) shared by all views
//! ```

pub mod board;
pub mod cell;

pub use board::{ActionSink, Board, BoardBuilder};
pub use cell::{CellView, Flip, Outline, PaintInstruction, Z_BASE, Z_RAISED};
