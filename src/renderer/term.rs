//! Terminal surface - crossterm input conversion and cell painting.
//!
//! Each cell occupies [`CELL_COLUMNS`] terminal columns and one row, starting
//! at an origin the caller picks.
//!
//! # API
//!
//! - `cell_at` / `cell_origin` - terminal position to board coordinate and back
//! - `convert_modifiers` / `convert_button` - crossterm to pointer types
//! - `PointerRouter` - turns raw mouse events into enter/leave/press per cell
//! - `paint_cells` - write paint instructions with ANSI colors

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::event::{
    KeyModifiers, MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent,
    MouseEventKind,
};
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};

use crate::pipeline::board::Board;
use crate::pipeline::cell::{Flip, Outline, PaintInstruction};
use crate::state::pointer::{Modifiers, PointerButton, PointerEvent};
use crate::types::{Coord, Rgba};

/// Terminal columns per cell.
pub const CELL_COLUMNS: u16 = 2;

// =============================================================================
// INPUT CONVERSION
// =============================================================================

/// Board coordinate under terminal position (`column`, `row`), given the
/// terminal position of cell (0, 0). Bounds are checked by the board.
pub fn cell_at(column: u16, row: u16, origin: (u16, u16)) -> Option<Coord> {
    let dx = column.checked_sub(origin.0)?;
    let dy = row.checked_sub(origin.1)?;
    Some(Coord::new(dx / CELL_COLUMNS, dy))
}

/// Largest column or row `MoveTo` can address (it emits position + 1).
pub const MAX_POSITION: u16 = u16::MAX - 1;

/// Terminal position of the left column of `coord`. Clamped to
/// [`MAX_POSITION`] on both axes.
pub fn cell_origin(coord: Coord, origin: (u16, u16)) -> (u16, u16) {
    (
        origin
            .0
            .saturating_add(coord.x.saturating_mul(CELL_COLUMNS))
            .min(MAX_POSITION),
        origin.1.saturating_add(coord.y).min(MAX_POSITION),
    )
}

/// Convert crossterm KeyModifiers to our Modifiers
pub fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    out.set(Modifiers::SHIFT, mods.contains(KeyModifiers::SHIFT));
    out.set(Modifiers::CTRL, mods.contains(KeyModifiers::CONTROL));
    out.set(Modifiers::ALT, mods.contains(KeyModifiers::ALT));
    out.set(
        Modifiers::META,
        mods.intersects(KeyModifiers::META | KeyModifiers::SUPER),
    );
    out
}

/// Convert crossterm MouseButton to our PointerButton
pub fn convert_button(btn: CrosstermMouseButton) -> PointerButton {
    match btn {
        CrosstermMouseButton::Left => PointerButton::Primary,
        CrosstermMouseButton::Right => PointerButton::Secondary,
        CrosstermMouseButton::Middle => PointerButton::Middle,
    }
}

/// Tracks the hovered cell across raw mouse events.
#[derive(Debug, Clone, Default)]
pub struct PointerRouter {
    origin: (u16, u16),
    hovered: Option<Coord>,
}

impl PointerRouter {
    pub fn new(origin: (u16, u16)) -> Self {
        Self {
            origin,
            hovered: None,
        }
    }

    pub fn hovered(&self) -> Option<Coord> {
        self.hovered
    }

    /// Route one crossterm mouse event to the board's mounted views.
    ///
    /// Movement fires leave/enter when the hovered cell changes. A button
    /// press goes to the cell under the pointer; a secondary press also asks
    /// for the (always suppressed) context menu. Returns true if consumed.
    pub fn route(&mut self, board: &Board, event: CrosstermMouseEvent) -> bool {
        let target = cell_at(event.column, event.row, self.origin).filter(|c| board.in_bounds(*c));
        let modifiers = convert_modifiers(event.modifiers);

        if target != self.hovered {
            if let Some(view) = self.hovered.and_then(|c| board.view(c)) {
                view.handle_pointer(&PointerEvent::leave().with_modifiers(modifiers));
            }
            if let Some(view) = target.and_then(|c| board.view(c)) {
                view.handle_pointer(&PointerEvent::enter().with_modifiers(modifiers));
            }
            self.hovered = target;
        }

        let MouseEventKind::Down(btn) = event.kind else {
            return false;
        };
        let Some(view) = target.and_then(|c| board.view(c)) else {
            return false;
        };
        let button = convert_button(btn);
        let mut consumed = view.handle_pointer(&PointerEvent::press(button).with_modifiers(modifiers));
        if button == PointerButton::Secondary {
            consumed |= view.handle_pointer(&PointerEvent::context_menu().with_modifiers(modifiers));
        }
        consumed
    }
}

// =============================================================================
// PAINTING
// =============================================================================

fn to_term_color(color: Rgba) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// The two glyphs drawn inside a cell.
pub fn cell_glyphs(paint: &PaintInstruction) -> [char; 2] {
    let dashed = paint.outline == Outline::Dashed;
    let left = if dashed {
        '┆'
    } else if !paint.overlay_classes.is_empty() {
        '*'
    } else {
        ' '
    };
    let right = if paint.flip == Flip::X | Flip::Y {
        '+'
    } else if paint.flip == Flip::X {
        '-'
    } else if paint.flip == Flip::Y {
        '|'
    } else if dashed {
        '┆'
    } else {
        ' '
    };
    [left, right]
}

/// Write `cells` to `out`, lower stacking order first, and flush.
pub fn paint_cells<W: Write>(out: &mut W, cells: &[PaintInstruction], origin: (u16, u16)) -> io::Result<()> {
    let mut ordered: Vec<&PaintInstruction> = cells.iter().collect();
    ordered.sort_by_key(|p| p.z_index);

    for paint in ordered {
        let [left, right] = cell_glyphs(paint);
        let (column, row) = cell_origin(paint.coord, origin);
        queue!(
            out,
            MoveTo(column, row),
            SetBackgroundColor(to_term_color(paint.background)),
            SetForegroundColor(Color::Black),
            Print(left),
            Print(right)
        )?;
    }
    queue!(out, ResetColor)?;
    out.flush()
}

// =============================================================================
// TESTS
// =============================================================================
