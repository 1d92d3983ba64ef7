//! Board State - externally owned values the cells read.
//!
//! Holds the tick counter, cursor mode and the live colors as reactive
//! signals, plus every cell's content list. Cells never write here directly:
//! they emit [`BoardAction`]s, and the owner applies them with
//! [`BoardState::dispatch`].
//!
//! # API
//!
//! - `tick` / `advance_tick` - discrete simulation clock
//! - `cursor_mode` / `set_cursor_mode` - global interaction mode
//! - `default_color`, `highlight_color`, `paint_color` - live colors
//! - `with_contents(coord, f)` - read a content list without cloning
//! - `dispatch(action)` - apply an action

use std::cell::RefCell;
use std::collections::HashMap;

use spark_signals::{signal, Signal};

use crate::config::BoardSettings;
use crate::engine::object::BoardObject;
use crate::types::{Coord, CursorMode, Rgba};

// =============================================================================
// ACTIONS
// =============================================================================

/// State change requested by a cell or by the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardAction {
    /// Append objects to a cell's content list, in order.
    LoadObjects { coord: Coord, objects: Vec<BoardObject> },
    /// Drop one object from a cell by id.
    RemoveObject { coord: Coord, id: String },
    /// Empty a cell's content list.
    ClearCell { coord: Coord },
    AdvanceTick,
    SetCursorMode(CursorMode),
    SetPaintColor(Rgba),
    SetHighlightColor(Rgba),
}

// =============================================================================
// STATE
// =============================================================================

/// Board-wide state for one session.
pub struct BoardState {
    width: u16,
    height: u16,
    cell_size_px: u16,
    tick: Signal<u64>,
    cursor_mode: Signal<CursorMode>,
    default_color: Signal<Rgba>,
    highlight_color: Signal<Rgba>,
    paint_color: Signal<Rgba>,
    contents: RefCell<HashMap<Coord, Vec<BoardObject>>>,
}

impl BoardState {
    pub fn new(settings: &BoardSettings) -> Self {
        Self {
            width: settings.width,
            height: settings.height,
            cell_size_px: settings.cell_size_px,
            tick: signal(0),
            cursor_mode: signal(CursorMode::Default),
            default_color: signal(settings.default_color),
            highlight_color: signal(settings.highlight_color),
            paint_color: signal(settings.paint_color),
            contents: RefCell::new(HashMap::new()),
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cell_size_px(&self) -> u16 {
        self.cell_size_px
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    // -------------------------------------------------------------------------
    // Signals
    // -------------------------------------------------------------------------

    /// Current tick (reactive).
    pub fn tick(&self) -> u64 {
        self.tick.get()
    }

    pub fn tick_signal(&self) -> Signal<u64> {
        self.tick.clone()
    }

    pub fn advance_tick(&self) -> u64 {
        let next = self.tick.get() + 1;
        self.tick.set(next);
        next
    }

    /// Current cursor mode (reactive).
    pub fn cursor_mode(&self) -> CursorMode {
        self.cursor_mode.get()
    }

    pub fn cursor_mode_signal(&self) -> Signal<CursorMode> {
        self.cursor_mode.clone()
    }

    pub fn set_cursor_mode(&self, mode: CursorMode) {
        self.cursor_mode.set(mode);
    }

    pub fn default_color(&self) -> Rgba {
        self.default_color.get()
    }

    pub fn highlight_color(&self) -> Rgba {
        self.highlight_color.get()
    }

    pub fn set_highlight_color(&self, color: Rgba) {
        self.highlight_color.set(color);
    }

    pub fn paint_color(&self) -> Rgba {
        self.paint_color.get()
    }

    pub fn set_paint_color(&self, color: Rgba) {
        self.paint_color.set(color);
    }

    // -------------------------------------------------------------------------
    // Content lists
    // -------------------------------------------------------------------------

    /// Run `f` over the content list at `coord` (empty if none).
    pub fn with_contents<R>(&self, coord: Coord, f: impl FnOnce(&[BoardObject]) -> R) -> R {
        let contents = self.contents.borrow();
        f(contents.get(&coord).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Clone of the content list at `coord`.
    pub fn contents(&self, coord: Coord) -> Vec<BoardObject> {
        self.with_contents(coord, <[BoardObject]>::to_vec)
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Apply an action. Content actions outside the board are ignored.
    pub fn dispatch(&self, action: BoardAction) {
        match action {
            BoardAction::LoadObjects { coord, objects } => {
                if !self.in_bounds(coord) || objects.is_empty() {
                    return;
                }
                tracing::debug!(coord = %coord, count = objects.len(), "objects loaded");
                self.contents
                    .borrow_mut()
                    .entry(coord)
                    .or_default()
                    .extend(objects);
            }
            BoardAction::RemoveObject { coord, id } => {
                if let Some(list) = self.contents.borrow_mut().get_mut(&coord) {
                    list.retain(|o| o.id() != id);
                }
            }
            BoardAction::ClearCell { coord } => {
                self.contents.borrow_mut().remove(&coord);
            }
            BoardAction::AdvanceTick => {
                self.advance_tick();
            }
            BoardAction::SetCursorMode(mode) => self.set_cursor_mode(mode),
            BoardAction::SetPaintColor(color) => self.set_paint_color(color),
            BoardAction::SetHighlightColor(color) => self.set_highlight_color(color),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> BoardState {
        BoardState::new(&BoardSettings {
            width: 4,
            height: 3,
            ..BoardSettings::default()
        })
    }

    #[test]
    fn test_initial_state() {
        let state = setup();
        assert_eq!(state.tick(), 0);
        assert_eq!(state.cursor_mode(), CursorMode::Default);
        assert_eq!(state.default_color(), Rgba::from_rgb_int(0xF0F0F0));
        assert!(state.contents(Coord::new(0, 0)).is_empty());
    }

    #[test]
    fn test_load_objects_appends_in_order() {
        let state = setup();
        let coord = Coord::new(1, 2);
        let a = BoardObject::paint("#f00").unwrap();
        let b = BoardObject::paint("#0f0").unwrap();
        let c = BoardObject::paint("#00f").unwrap();

        state.dispatch(BoardAction::LoadObjects { coord, objects: vec![a.clone(), b.clone()] });
        state.dispatch(BoardAction::LoadObjects { coord, objects: vec![c.clone()] });
        assert_eq!(state.contents(coord), vec![a, b.clone(), c.clone()]);

        let first_id = state.with_contents(coord, |list| list[0].id().to_string());
        state.dispatch(BoardAction::RemoveObject { coord, id: first_id });
        assert_eq!(state.contents(coord), vec![b, c]);

        state.dispatch(BoardAction::ClearCell { coord });
        assert!(state.contents(coord).is_empty());
    }

    #[test]
    fn test_out_of_bounds_load_ignored() {
        let state = setup();
        let coord = Coord::new(4, 0);
        state.dispatch(BoardAction::LoadObjects {
            coord,
            objects: vec![BoardObject::paint("#fff").unwrap()],
        });
        assert!(state.contents(coord).is_empty());
    }

    #[test]
    fn test_tick_and_mode_actions() {
        let state = setup();
        state.dispatch(BoardAction::AdvanceTick);
        state.dispatch(BoardAction::AdvanceTick);
        assert_eq!(state.tick(), 2);

        state.dispatch(BoardAction::SetCursorMode(CursorMode::Painting));
        assert_eq!(state.cursor_mode(), CursorMode::Painting);
        state.dispatch(BoardAction::SetCursorMode(state.cursor_mode().toggled()));
        assert_eq!(state.cursor_mode(), CursorMode::Default);

        state.dispatch(BoardAction::SetPaintColor(Rgba::BLUE));
        state.dispatch(BoardAction::SetHighlightColor(Rgba::RED));
        assert_eq!(state.paint_color(), Rgba::BLUE);
        assert_eq!(state.highlight_color(), Rgba::RED);
    }
}
