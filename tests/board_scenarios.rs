//! End-to-end board behavior through the public API.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use spark_board::prelude::*;
use spark_board::{CacheEntry, RenderCache};

fn flash_registry() -> RenderRegistry {
    let mut registry = RenderRegistry::new();
    registry.register("paint", |object: &BoardObject, _composite: Rgba| {
        RenderOutput::color(object.primary()).with_overlay(VisualOverlay::from_millis("flash", 500))
    });
    registry.register("glow", |_object: &BoardObject, _composite: Rgba| {
        RenderOutput::color(Rgba::GREEN)
    });
    registry
}

fn board_with(registry: RenderRegistry) -> (ManualClock, Board) {
    let clock = ManualClock::new();
    let settings = BoardSettings {
        width: 8,
        height: 8,
        ..BoardSettings::default()
    };
    let board = Board::builder(settings)
        .registry(registry)
        .clock(clock.clone())
        .build();
    (clock, board)
}

fn load(board: &Board, coord: Coord, objects: Vec<BoardObject>) {
    board.dispatch(BoardAction::LoadObjects { coord, objects });
}

#[test]
fn empty_board_reads_default_color() {
    let board = Board::new(&BoardConfig::default()).unwrap();
    for coord in [Coord::new(0, 0), Coord::new(7, 3), Coord::new(15, 15)] {
        assert_eq!(board.entry(coord).unwrap().background.to_hex(), "#F0F0F0");
        let refresh = board.refresh(coord).unwrap();
        assert_eq!(refresh.background(), Rgba::parse("#F0F0F0").unwrap());
        assert!(board.entry(coord).unwrap().overlays.is_empty());
    }
}

#[test]
fn paint_overlay_expires_without_a_new_tick() {
    let (clock, board) = board_with(flash_registry());
    let coord = Coord::new(2, 3);
    let cell = board.mount(coord).unwrap();
    load(&board, coord, vec![BoardObject::new("paint", "#1E88E5").unwrap()]);
    board.advance_tick();

    let paint = cell.render();
    let blue = Rgba::parse("#1E88E5").unwrap();
    assert_eq!(paint.background, blue);
    assert_eq!(paint.overlay_classes, vec!["flash".to_string()]);
    assert_eq!(board.entry(coord).unwrap().overlays.len(), 1);

    clock.advance(Duration::from_millis(499));
    assert_eq!(board.entry(coord).unwrap().overlays.len(), 1);

    clock.advance(Duration::from_millis(1));
    let entry = board.entry(coord).unwrap();
    assert!(entry.overlays.is_empty());
    assert_eq!(entry.background, blue);
    assert_eq!(board.state().tick(), 1);
}

#[test]
fn last_object_in_list_wins_composite() {
    let (_clock, board) = board_with(flash_registry());
    let coord = Coord::new(4, 4);
    load(
        &board,
        coord,
        vec![
            BoardObject::new("paint", "#E53935").unwrap(),
            BoardObject::new("glow", "#000000").unwrap(),
        ],
    );
    let refresh = board.refresh(coord).unwrap();
    assert_eq!(refresh.background().to_hex(), "#00FF00");
}

#[test]
fn hover_mixes_with_highlight_without_touching_cache() {
    let clock = ManualClock::new();
    let settings = BoardSettings {
        default_color: Rgba::WHITE,
        highlight_color: Rgba::RED,
        ..BoardSettings::default()
    };
    let board = Board::builder(settings).clock(clock).build();
    let coord = Coord::new(0, 0);
    let cell = board.mount(coord).unwrap();

    cell.handle_pointer(&PointerEvent::enter());
    let paint = cell.render();
    assert_eq!(paint.background, Rgba::mix(Rgba::WHITE, Rgba::RED));
    assert_eq!(board.entry(coord).unwrap().background, Rgba::WHITE);
}

#[test]
fn refold_same_tick_is_idempotent() {
    let calls = Rc::new(Cell::new(0));
    let seen = calls.clone();
    let mut registry = RenderRegistry::new();
    registry.register("paint", move |object: &BoardObject, _composite: Rgba| {
        seen.set(seen.get() + 1);
        RenderOutput::color(object.primary()).with_overlay(VisualOverlay::from_millis("flash", 500))
    });
    let (_clock, board) = board_with(registry);
    let coord = Coord::new(1, 1);
    load(&board, coord, vec![BoardObject::new("paint", "red").unwrap()]);

    assert!(board.refresh(coord).unwrap().folded());
    assert!(!board.refresh(coord).unwrap().folded());

    // A fresh view of the same coordinate in the same tick reuses the fold
    let view = board.mount(coord).unwrap();
    view.render();
    view.render();
    assert_eq!(calls.get(), 1);
    assert_eq!(board.entry(coord).unwrap().overlays.len(), 1);
    assert_eq!(board.pending_timers(), 1);

    board.advance_tick();
    view.render();
    assert_eq!(calls.get(), 2);
    assert_eq!(board.entry(coord).unwrap().overlays.len(), 2);
}

#[test]
fn unregistered_tags_are_skipped() {
    let (_clock, board) = board_with(flash_registry());
    let coord = Coord::new(5, 0);
    load(&board, coord, vec![BoardObject::new("mystery", "#123456").unwrap()]);
    let refresh = board.refresh(coord).unwrap();
    assert!(refresh.folded());
    assert_eq!(refresh.background(), board.state().default_color());
}

#[test]
fn cache_set_then_get_round_trips() {
    let cache = RenderCache::new(Rgba::WHITE);
    let coord = Coord::new(3, 9);
    let mut entry = CacheEntry::new(Rgba::BLUE);
    entry.overlays.push(VisualOverlay::from_millis("flash", 10));
    entry.folded_tick = Some(7);
    cache.set(coord, entry.clone());
    assert_eq!(cache.get(coord), entry);
}

#[test]
fn replaced_entry_timer_fires_as_noop() {
    let (clock, board) = board_with(flash_registry());
    let coord = Coord::new(6, 6);
    load(&board, coord, vec![BoardObject::new("paint", "#FFFFFF").unwrap()]);
    board.refresh(coord).unwrap();

    let replacement = CacheEntry::new(Rgba::BLACK);
    assert!(board.set_entry(coord, replacement.clone()));
    assert_eq!(board.entry(coord).unwrap(), replacement);
    clock.advance(Duration::from_millis(500));
    assert_eq!(board.run_due_timers(), 1);
    assert_eq!(board.entry(coord).unwrap(), replacement);
    assert_eq!(board.pending_timers(), 0);
}

#[test]
fn expired_overlays_absent_from_every_observation() {
    let (clock, board) = board_with(flash_registry());
    let viewed = Coord::new(1, 5);
    let bare = Coord::new(5, 1);
    let view = board.mount(viewed).unwrap();
    for coord in [viewed, bare] {
        load(&board, coord, vec![BoardObject::new("paint", "#FDD835").unwrap()]);
    }
    view.render();
    board.refresh(bare).unwrap();

    clock.advance(Duration::from_millis(500));
    assert!(board.entry(bare).unwrap().overlays.is_empty());
    assert!(board.entry(viewed).unwrap().overlays.is_empty());
    assert!(view.render().overlay_classes.is_empty());
    assert!(board.render_all().iter().all(|paint| paint.overlay_classes.is_empty()));
    assert_eq!(board.pending_timers(), 0);
}

#[test]
fn unbounded_overlay_duration_does_not_panic() {
    let mut registry = RenderRegistry::new();
    registry.register("paint", |object: &BoardObject, _composite: Rgba| {
        RenderOutput::color(object.primary()).with_overlay(VisualOverlay::new("forever", Duration::MAX))
    });
    let (clock, board) = board_with(registry);
    let coord = Coord::new(0, 7);
    load(&board, coord, vec![BoardObject::new("paint", "#43A047").unwrap()]);

    let cell = board.mount(coord).unwrap();
    assert_eq!(cell.render().overlay_classes, vec!["forever".to_string()]);
    assert_eq!(board.pending_timers(), 0);
    clock.advance(Duration::from_secs(86_400));
    assert_eq!(cell.render().overlay_classes, vec!["forever".to_string()]);
}

#[test]
fn painting_click_then_tick_shows_paint() {
    let (_clock, board) = board_with(RenderRegistry::with_builtins(Duration::from_millis(400)));
    let coord = Coord::new(7, 7);
    let cell = board.mount(coord).unwrap();
    cell.render();

    board.dispatch(BoardAction::SetCursorMode(CursorMode::Painting));
    board.dispatch(BoardAction::SetPaintColor(Rgba::BLUE));
    assert!(cell.handle_pointer(&PointerEvent::press(PointerButton::Primary)));
    assert_eq!(board.state().contents(coord).len(), 1);

    // Same tick: the stored fold is reused
    assert_eq!(cell.render().background, board.state().default_color());

    board.advance_tick();
    let expected = Rgba::mix(board.state().default_color(), Rgba::BLUE);
    assert_eq!(cell.render().background, expected);
}

#[test]
fn rotation_flags_reset_on_remount() {
    let (_clock, board) = board_with(RenderRegistry::new());
    let coord = Coord::new(2, 2);
    let cell = board.mount(coord).unwrap();
    let rotate_y = PointerEvent::press(PointerButton::Primary).with_modifiers(Modifiers::SHIFT);
    let rotate_x = PointerEvent::press(PointerButton::Primary).with_modifiers(Modifiers::ALT);

    cell.handle_pointer(&rotate_y);
    cell.handle_pointer(&rotate_x);
    assert_eq!(cell.render().flip, Flip::X | Flip::Y);
    cell.handle_pointer(&rotate_y);
    assert_eq!(cell.render().flip, Flip::X);

    drop(cell);
    let again = board.mount(coord).unwrap();
    assert_eq!(again.render().flip, Flip::empty());
}

#[test]
fn bad_color_spec_fails_at_construction() {
    assert!(BoardObject::new("paint", "not-a-color").is_err());
    let config = BoardConfig {
        highlight_color: "#12".to_string(),
        ..BoardConfig::default()
    };
    assert!(matches!(Board::new(&config), Err(BoardError::Color(_))));
}
