//! State Module - externally owned board state and the clocks around it.
//!
//! - **BoardState** - tick counter, cursor mode, live colors, content lists
//! - **Pointer** - pointer event types and modifier flags
//! - **Timers** - overlay expiry scheduler and its clocks

pub mod board_state;
pub mod pointer;
pub mod timers;

pub use board_state::{BoardAction, BoardState};
pub use pointer::{ModifierKey, Modifiers, PointerAction, PointerButton, PointerEvent};
pub use timers::{Clock, ManualClock, OverlayScheduler, Repaint, SystemClock};
