//! Renderer - terminal output of paint instructions.
//!
//! The board core produces [`PaintInstruction`](crate::pipeline::PaintInstruction)s;
//! this module is one consumer of them, drawing cells with crossterm.

pub mod term;

pub use term::{cell_at, cell_origin, paint_cells, PointerRouter, CELL_COLUMNS};
