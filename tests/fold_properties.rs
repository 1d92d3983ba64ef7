//! Property tests for the content-list fold.

use proptest::prelude::*;

use spark_board::prelude::*;
use spark_board::fold_contents;

const TAGS: [&str; 4] = ["paint", "shade", "glow", "mystery"];

/// `paint` mixes, `shade` darkens, `glow` replaces; `mystery` is unbound.
fn registry() -> RenderRegistry {
    let mut registry = RenderRegistry::new();
    registry.register("paint", |object: &BoardObject, composite: Rgba| {
        RenderOutput::color(Rgba::mix(composite, object.primary()))
    });
    registry.register("shade", |_object: &BoardObject, composite: Rgba| {
        RenderOutput::color(Rgba::rgb(composite.r / 2, composite.g / 2, composite.b / 2))
    });
    registry.register("glow", |object: &BoardObject, _composite: Rgba| {
        RenderOutput::color(object.primary())
            .with_overlay(VisualOverlay::from_millis("glow", 100))
    });
    registry
}

/// Reference fold written directly against the render functions.
fn expected(registry: &RenderRegistry, base: Rgba, contents: &[BoardObject]) -> (Rgba, usize) {
    contents.iter().fold((base, 0), |(color, overlays), object| {
        match registry.lookup(object.tag()) {
            Some(render) => {
                let output = render(object, color);
                (output.color, overlays + output.overlays.len())
            }
            None => (color, overlays),
        }
    })
}

fn object_strategy() -> impl Strategy<Value = BoardObject> {
    (0..TAGS.len(), any::<u32>()).prop_map(|(tag, rgb)| {
        BoardObject::with_color(TAGS[tag], Rgba::from_rgb_int(rgb & 0xFF_FFFF))
    })
}

proptest! {
    #[test]
    fn fold_is_sequential_left_fold(
        base in any::<u32>(),
        contents in prop::collection::vec(object_strategy(), 0..12),
    ) {
        let registry = registry();
        let base = Rgba::from_rgb_int(base & 0xFF_FFFF);
        let result = fold_contents(&registry, base, &contents);
        let (color, overlays) = expected(&registry, base, &contents);

        prop_assert_eq!(result.color, color);
        prop_assert_eq!(result.overlays.len(), overlays);
        prop_assert_eq!(
            result.applied,
            contents.iter().filter(|o| o.tag() != "mystery").count()
        );
    }

    #[test]
    fn replacing_tag_last_decides_composite(
        contents in prop::collection::vec(object_strategy(), 0..8),
        rgb in 0u32..0xFF_FFFF,
    ) {
        let registry = registry();
        let last = Rgba::from_rgb_int(rgb);
        let mut contents = contents;
        contents.push(BoardObject::with_color("glow", last));
        let result = fold_contents(&registry, Rgba::WHITE, &contents);
        prop_assert_eq!(result.color, last);
    }

    #[test]
    fn empty_or_unbound_contents_keep_base(
        base in any::<u32>(),
        count in 0usize..6,
    ) {
        let registry = registry();
        let base = Rgba::from_rgb_int(base & 0xFF_FFFF);
        let contents: Vec<BoardObject> = (0..count)
            .map(|_| BoardObject::with_color("mystery", Rgba::RED))
            .collect();
        let result = fold_contents(&registry, base, &contents);
        prop_assert_eq!(result.color, base);
        prop_assert!(result.overlays.is_empty());
    }
}

#[test]
fn order_of_non_commuting_objects_matters() {
    let registry = registry();
    let paint = BoardObject::with_color("paint", Rgba::RED);
    let glow = BoardObject::with_color("glow", Rgba::BLUE);

    let forward = fold_contents(&registry, Rgba::WHITE, &[paint.clone(), glow.clone()]);
    let reversed = fold_contents(&registry, Rgba::WHITE, &[glow, paint]);
    assert_eq!(forward.color, Rgba::BLUE);
    assert_eq!(reversed.color, Rgba::mix(Rgba::BLUE, Rgba::RED));
    assert_ne!(forward.color, reversed.color);
}
