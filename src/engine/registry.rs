//! Render Registry - tag to render function mapping.
//!
//! Resolves which transformation applies to an object kind. Registration is
//! last-wins: re-registering a tag replaces the previous function and hands
//! it back to the caller. Lookups of unknown tags return `None`; the fold
//! treats that as "no visual effect".

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use super::object::{BoardObject, RenderOutput, VisualOverlay, PAINT_TAG};
use crate::types::Rgba;

/// Class name of the overlay the built-in paint function emits.
pub const PAINT_FLASH_CLASS: &str = "paint-flash";

/// Pure per-tag transformation: `(object, incoming composite) -> output`.
pub type RenderFn = Rc<dyn Fn(&BoardObject, Rgba) -> RenderOutput>;

/// Tag to render function bindings for one board session.
#[derive(Clone, Default)]
pub struct RenderRegistry {
    functions: HashMap<String, RenderFn>,
}

impl RenderRegistry {
    /// Empty registry. Every tag is a no-op until registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `paint` function bound.
    pub fn with_builtins(paint_flash: Duration) -> Self {
        let mut registry = Self::new();
        registry.register(PAINT_TAG, paint_render(paint_flash));
        registry
    }

    /// Bind `tag` to `render`. Returns the function it replaced, if any.
    pub fn register<F>(&mut self, tag: impl Into<String>, render: F) -> Option<RenderFn>
    where
        F: Fn(&BoardObject, Rgba) -> RenderOutput + 'static,
    {
        self.register_rc(tag, Rc::new(render))
    }

    /// Bind an already shared function.
    pub fn register_rc(&mut self, tag: impl Into<String>, render: RenderFn) -> Option<RenderFn> {
        let tag = tag.into();
        let replaced = self.functions.insert(tag.clone(), render);
        if replaced.is_some() {
            tracing::debug!(%tag, "render function replaced");
        }
        replaced
    }

    pub fn lookup(&self, tag: &str) -> Option<&RenderFn> {
        self.functions.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.functions.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for RenderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&String> = self.functions.keys().collect();
        tags.sort();
        f.debug_struct("RenderRegistry").field("tags", &tags).finish()
    }
}

/// Built-in paint deposit: mixes the deposit's primary color into the
/// composite and flashes for `flash`. Each named animation on the object adds
/// one more overlay of the same lifetime, using the animation name as class.
pub fn paint_render(flash: Duration) -> impl Fn(&BoardObject, Rgba) -> RenderOutput {
    move |object, composite| {
        let mut output = RenderOutput::color(Rgba::mix(composite, object.primary()))
            .with_overlay(VisualOverlay::new(PAINT_FLASH_CLASS, flash));
        for name in object.animations() {
            output.overlays.push(VisualOverlay::new(name.as_str(), flash));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(color: Rgba) -> impl Fn(&BoardObject, Rgba) -> RenderOutput {
        move |_, _| RenderOutput::color(color)
    }

    #[test]
    fn test_lookup_unknown_tag_is_none() {
        let registry = RenderRegistry::new();
        assert!(registry.lookup("ghost").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = RenderRegistry::new();
        assert!(registry.register("glow", fixed(Rgba::RED)).is_none());
        assert!(registry.register("glow", fixed(Rgba::GREEN)).is_some());
        assert_eq!(registry.len(), 1);

        let obj = BoardObject::new("glow", "#000").unwrap();
        let render = registry.lookup("glow").unwrap();
        assert_eq!(render(&obj, Rgba::BLACK).color, Rgba::GREEN);
    }

    #[test]
    fn test_builtin_paint_mixes_and_flashes() {
        let registry = RenderRegistry::with_builtins(Duration::from_millis(300));
        assert!(registry.contains(PAINT_TAG));

        let obj = BoardObject::paint("#ff0000").unwrap().with_animation("drip");
        let out = registry.lookup(PAINT_TAG).unwrap()(&obj, Rgba::WHITE);
        assert_eq!(out.color, Rgba::mix(Rgba::WHITE, Rgba::RED));
        let classes: Vec<&str> = out.overlays.iter().map(VisualOverlay::class_name).collect();
        assert_eq!(classes, [PAINT_FLASH_CLASS, "drip"]);
        assert!(out.overlays.iter().all(|o| o.duration() == Duration::from_millis(300)));
    }

    #[test]
    fn test_debug_lists_sorted_tags() {
        let mut registry = RenderRegistry::new();
        registry.register("b", fixed(Rgba::RED));
        registry.register("a", fixed(Rgba::RED));
        assert_eq!(format!("{registry:?}"), r#"RenderRegistry { tags: ["a", "b"] }"#);
    }
}
