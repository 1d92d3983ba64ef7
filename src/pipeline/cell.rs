//! Cell View - interaction controller and paint output for one cell.
//!
//! A `CellView` is a view instance: cheap, recreatable, and holding only
//! presentation flags (hover, flips) that die with it. Everything that must
//! outlive a view lives in the board's cache entry for the coordinate.
//!
//! Each [`render`](CellView::render):
//! 1. drains due overlay expiries,
//! 2. asks the engine to fold the content list if the tick advanced,
//! 3. composes the stored background with hover / mode effects.
//!
//! The hover tint is computed at render time and never written back.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use bitflags::bitflags;
use spark_signals::{signal, Signal};

use super::board::BoardContext;
use crate::engine::object::{BoardObject, PAINT_TAG};
use crate::state::board_state::BoardAction;
use crate::state::pointer::{PointerAction, PointerButton, PointerEvent};
use crate::state::timers::Repaint;
use crate::types::{Coord, CursorMode, Rgba};

bitflags! {
    /// Local flip state toggled by modifier clicks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flip: u8 {
        const X = 1 << 0;
        const Y = 1 << 1;
    }
}

/// Border treatment of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outline {
    #[default]
    Solid,
    /// Painting-mode hover highlight.
    Dashed,
}

/// Stacking order of a resting cell.
pub const Z_BASE: i32 = 0;
/// Stacking order of a cell hovered in painting mode.
pub const Z_RAISED: i32 = 1;

/// Everything the view layer needs to draw one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintInstruction {
    pub coord: Coord,
    pub size_px: u16,
    pub background: Rgba,
    pub outline: Outline,
    /// Active overlay class names, oldest first.
    pub overlay_classes: Vec<String>,
    pub z_index: i32,
    pub flip: Flip,
}

impl PaintInstruction {
    /// Background as a `#RRGGBB` string.
    pub fn background_hex(&self) -> String {
        self.background.to_hex()
    }
}

/// One mounted cell.
pub struct CellView {
    coord: Coord,
    ctx: Rc<BoardContext>,
    weak_self: Weak<CellView>,
    hovered: Cell<bool>,
    flip: Cell<Flip>,
    repaint: Signal<u64>,
}

impl CellView {
    pub(crate) fn mount(coord: Coord, ctx: Rc<BoardContext>) -> Rc<Self> {
        Rc::new_cyclic(|weak_self| Self {
            coord,
            ctx,
            weak_self: weak_self.clone(),
            hovered: Cell::new(false),
            flip: Cell::new(Flip::empty()),
            repaint: signal(0),
        })
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered.get()
    }

    pub fn flip(&self) -> Flip {
        self.flip.get()
    }

    /// Repaint generation (reactive). Bumped by overlay expiry and by local
    /// interaction changes.
    pub fn repaint_generation(&self) -> u64 {
        self.repaint.get()
    }

    pub fn repaint_signal(&self) -> Signal<u64> {
        self.repaint.clone()
    }

    fn bump(&self) {
        self.repaint.set(self.repaint.get() + 1);
    }

    // -------------------------------------------------------------------------
    // Render
    // -------------------------------------------------------------------------

    /// Produce the paint instruction for the current tick and pointer state.
    pub fn render(&self) -> PaintInstruction {
        let ctx = &*self.ctx;
        ctx.engine.scheduler().run_due();
        // Track the generation so reactive callers re-run on expiry.
        let _ = self.repaint.get();

        let owner: Weak<dyn Repaint> = self.weak_self.clone();
        let tick = ctx.state.tick();
        let default_color = ctx.state.default_color();
        ctx.state.with_contents(self.coord, |contents| {
            ctx.engine
                .refresh(self.coord, tick, default_color, contents, &owner)
        });

        let entry = ctx.engine.cache().get(self.coord);
        let mut paint = PaintInstruction {
            coord: self.coord,
            size_px: ctx.state.cell_size_px(),
            background: entry.background,
            outline: Outline::Solid,
            overlay_classes: entry.overlay_classes(),
            z_index: Z_BASE,
            flip: self.flip.get(),
        };

        if self.hovered.get() {
            match ctx.state.cursor_mode() {
                CursorMode::Default => {
                    paint.background = Rgba::mix(entry.background, ctx.state.highlight_color());
                }
                CursorMode::Painting => {
                    paint.outline = Outline::Dashed;
                    paint.z_index = Z_RAISED;
                }
            }
        }
        paint
    }

    // -------------------------------------------------------------------------
    // Pointer handling
    // -------------------------------------------------------------------------

    /// Handle a pointer event targeted at this cell.
    ///
    /// Returns true when the platform default must be suppressed (the event
    /// was consumed). Context menus are always suppressed.
    pub fn handle_pointer(&self, event: &PointerEvent) -> bool {
        match event.action {
            PointerAction::Enter => {
                self.set_hovered(true);
                false
            }
            PointerAction::Leave => {
                self.set_hovered(false);
                false
            }
            PointerAction::ContextMenu => true,
            PointerAction::Press => match self.ctx.state.cursor_mode() {
                CursorMode::Default => self.press_default(event),
                CursorMode::Painting => self.press_painting(event),
            },
        }
    }

    fn set_hovered(&self, hovered: bool) {
        if self.hovered.replace(hovered) != hovered {
            self.bump();
        }
    }

    fn press_default(&self, event: &PointerEvent) -> bool {
        if event.button != PointerButton::Primary {
            return false;
        }
        let settings = &self.ctx.settings;
        let mut toggle = Flip::empty();
        if event.modifiers.contains(settings.rotate_y) {
            toggle |= Flip::Y;
        }
        if event.modifiers.contains(settings.rotate_x) {
            toggle |= Flip::X;
        }
        if toggle.is_empty() {
            return false;
        }
        self.flip.set(self.flip.get() ^ toggle);
        self.bump();
        true
    }

    fn press_painting(&self, event: &PointerEvent) -> bool {
        if event.button != PointerButton::Primary {
            return false;
        }
        let object = BoardObject::with_color(PAINT_TAG, self.ctx.state.paint_color());
        tracing::debug!(coord = %self.coord, id = object.id(), color = %object.primary(), "paint placed");
        (self.ctx.actions)(BoardAction::LoadObjects {
            coord: self.coord,
            objects: vec![object],
        });
        true
    }
}

impl Repaint for CellView {
    fn request_repaint(&self) {
        self.bump();
    }
}

impl std::fmt::Debug for CellView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellView")
            .field("coord", &self.coord)
            .field("hovered", &self.hovered.get())
            .field("flip", &self.flip.get())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
