//! Board Session - wiring of state, engine, cache, scheduler and views.
//!
//! One `Board` per session. It owns the single [`RenderCache`] every cell of
//! the session shares, the overlay scheduler, and the render registry, and
//! hands an `Rc` of that context to each mounted [`CellView`].
//!
//! # Example
//!
//! ```
//! use spark_board::prelude::*;
//!
//! let board = Board::new(&BoardConfig::default()).unwrap();
//! let cell = board.mount(Coord::new(0, 0)).unwrap();
//!
//! board.state().set_cursor_mode(CursorMode::Painting);
//! cell.handle_pointer(&PointerEvent::press(PointerButton::Primary));
//! board.advance_tick();
//!
//! let paint = cell.render();
//! assert_ne!(paint.background, board.state().default_color());
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use super::cell::{CellView, PaintInstruction};
use crate::config::{BoardConfig, BoardSettings};
use crate::engine::cache::{CacheEntry, RenderCache};
use crate::engine::fold::{CellEngine, Refresh};
use crate::engine::registry::RenderRegistry;
use crate::error::Result;
use crate::state::board_state::{BoardAction, BoardState};
use crate::state::timers::{Clock, OverlayScheduler, Repaint, SystemClock};
use crate::types::Coord;

/// Receiver of actions cells emit.
pub type ActionSink = Rc<dyn Fn(BoardAction)>;

/// Shared by every view of one session.
pub(crate) struct BoardContext {
    pub(crate) state: Rc<BoardState>,
    pub(crate) engine: CellEngine,
    pub(crate) settings: BoardSettings,
    pub(crate) actions: ActionSink,
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for a [`Board`] with a custom registry, clock or action sink.
pub struct BoardBuilder {
    settings: BoardSettings,
    registry: Option<RenderRegistry>,
    clock: Option<Rc<dyn Clock>>,
    actions: Option<ActionSink>,
}

impl BoardBuilder {
    /// Use `registry` instead of the built-in one. Bindings must be complete
    /// before the board is built; the registry is frozen afterwards.
    pub fn registry(mut self, registry: RenderRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Rc::new(clock));
        self
    }

    /// Route cell actions to `sink` instead of applying them to the board
    /// state.
    pub fn action_sink(mut self, sink: impl Fn(BoardAction) + 'static) -> Self {
        self.actions = Some(Rc::new(sink));
        self
    }

    pub fn build(self) -> Board {
        let settings = self.settings;
        let state = Rc::new(BoardState::new(&settings));
        let registry = self
            .registry
            .unwrap_or_else(|| RenderRegistry::with_builtins(settings.paint_flash));
        let clock = self.clock.unwrap_or_else(|| Rc::new(SystemClock));
        let cache = RenderCache::new(settings.default_color);
        let scheduler = Rc::new(OverlayScheduler::new(clock, cache.clone()));
        let engine = CellEngine::new(Rc::new(registry), cache, scheduler);
        let actions = self.actions.unwrap_or_else(|| {
            let state = state.clone();
            let sink: ActionSink = Rc::new(move |action: BoardAction| state.dispatch(action));
            sink
        });

        tracing::info!(
            width = settings.width,
            height = settings.height,
            registry = ?engine.registry(),
            "board created"
        );
        Board {
            ctx: Rc::new(BoardContext {
                state,
                engine,
                settings,
                actions,
            }),
            views: RefCell::new(BTreeMap::new()),
        }
    }
}

// =============================================================================
// Board
// =============================================================================

/// One board session.
pub struct Board {
    ctx: Rc<BoardContext>,
    views: RefCell<BTreeMap<Coord, Weak<CellView>>>,
}

impl Board {
    /// Board with the built-in registry and the system clock.
    pub fn new(config: &BoardConfig) -> Result<Self> {
        Ok(Self::builder(config.validate()?).build())
    }

    pub fn builder(settings: BoardSettings) -> BoardBuilder {
        BoardBuilder {
            settings,
            registry: None,
            clock: None,
            actions: None,
        }
    }

    pub fn settings(&self) -> &BoardSettings {
        &self.ctx.settings
    }

    pub fn state(&self) -> &Rc<BoardState> {
        &self.ctx.state
    }

    pub fn registry(&self) -> &RenderRegistry {
        self.ctx.engine.registry()
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        self.ctx.state.in_bounds(coord)
    }

    // -------------------------------------------------------------------------
    // Views
    // -------------------------------------------------------------------------

    /// Mount a fresh view for `coord`. `None` outside the board.
    ///
    /// A new view starts with no hover and no flips; the cache entry for the
    /// coordinate carries over.
    pub fn mount(&self, coord: Coord) -> Option<Rc<CellView>> {
        if !self.in_bounds(coord) {
            return None;
        }
        let view = CellView::mount(coord, self.ctx.clone());
        self.views.borrow_mut().insert(coord, Rc::downgrade(&view));
        Some(view)
    }

    /// The live view mounted at `coord`, if any.
    pub fn view(&self, coord: Coord) -> Option<Rc<CellView>> {
        self.views.borrow().get(&coord).and_then(Weak::upgrade)
    }

    /// Paint instructions of every live view, row-major.
    pub fn render_all(&self) -> Vec<PaintInstruction> {
        let live: Vec<Rc<CellView>> = {
            let mut views = self.views.borrow_mut();
            views.retain(|_, view| view.strong_count() > 0);
            let mut live: Vec<Rc<CellView>> = views.values().filter_map(Weak::upgrade).collect();
            live.sort_by_key(|view| (view.coord().y, view.coord().x));
            live
        };
        live.iter().map(|view| view.render()).collect()
    }

    // -------------------------------------------------------------------------
    // Engine access without a view
    // -------------------------------------------------------------------------

    /// Cache entry at `coord` after draining due expiries. `None` outside the
    /// board.
    pub fn entry(&self, coord: Coord) -> Option<CacheEntry> {
        if !self.in_bounds(coord) {
            return None;
        }
        Some(self.ctx.engine.entry(coord))
    }

    /// Replace the cache entry at `coord` wholesale. Expiries still pending
    /// for overlays the new entry lacks fire as no-ops. Returns false outside
    /// the board.
    pub fn set_entry(&self, coord: Coord, entry: CacheEntry) -> bool {
        if !self.in_bounds(coord) {
            return false;
        }
        self.ctx.engine.set_entry(coord, entry);
        true
    }

    /// Number of coordinates with a cache entry.
    pub fn cached_cells(&self) -> usize {
        self.ctx.engine.cache().len()
    }

    /// Fold `coord` for the current tick without going through a view.
    /// Expiries armed here repaint the live view at `coord`, if there is one.
    pub fn refresh(&self, coord: Coord) -> Option<Refresh> {
        if !self.in_bounds(coord) {
            return None;
        }
        let ctx = &*self.ctx;
        ctx.engine.scheduler().run_due();
        let owner: Weak<dyn Repaint> = match self.view(coord) {
            Some(view) => Rc::<CellView>::downgrade(&view),
            None => Weak::<CellView>::new(),
        };
        let tick = ctx.state.tick();
        let default_color = ctx.state.default_color();
        Some(ctx.state.with_contents(coord, |contents| {
            ctx.engine.refresh(coord, tick, default_color, contents, &owner)
        }))
    }

    // -------------------------------------------------------------------------
    // Clocks
    // -------------------------------------------------------------------------

    pub fn advance_tick(&self) -> u64 {
        self.ctx.state.advance_tick()
    }

    /// Apply an action to the board state directly.
    pub fn dispatch(&self, action: BoardAction) {
        self.ctx.state.dispatch(action);
    }

    /// Fire due overlay expiries. Returns how many fired.
    pub fn run_due_timers(&self) -> usize {
        self.ctx.engine.scheduler().run_due()
    }

    pub fn next_timer_deadline(&self) -> Option<Instant> {
        self.ctx.engine.scheduler().next_deadline()
    }

    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.ctx.engine.scheduler().time_until_next()
    }

    pub fn pending_timers(&self) -> usize {
        self.ctx.engine.scheduler().pending()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("settings", &self.ctx.settings)
            .field("tick", &self.ctx.state.tick())
            .field("mounted", &self.views.borrow().len())
            .field("scheduler", self.ctx.engine.scheduler())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
