//! Board objects, visual overlays and render output.
//!
//! Objects are created by placement actions outside the core; the core only
//! reads them. Overlays are created by render functions and destroyed by
//! their own expiry timer.

use std::cell::Cell;
use std::time::Duration;

use crate::error::ColorError;
use crate::types::Rgba;

/// Tag of the paint deposit placed by a painting-mode click.
pub const PAINT_TAG: &str = "paint";

thread_local! {
    static OBJECT_COUNTER: Cell<u64> = const { Cell::new(0) };
    static OVERLAY_COUNTER: Cell<u64> = const { Cell::new(0) };
}

fn next_id(counter: &'static std::thread::LocalKey<Cell<u64>>, prefix: &str) -> String {
    counter.with(|c| {
        let n = c.get();
        c.set(n + 1);
        format!("{prefix}{n}")
    })
}

/// A color kept both as the spec the caller supplied and as the parsed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSpec {
    spec: String,
    color: Rgba,
}

impl ColorSpec {
    /// Parse a color spec. Fails with [`ColorError`] if `Rgba::parse` rejects it.
    pub fn parse(spec: impl Into<String>) -> Result<Self, ColorError> {
        let spec = spec.into();
        let color = Rgba::parse(&spec)?;
        Ok(Self { spec, color })
    }

    pub fn spec(&self) -> &str {
        &self.spec
    }

    pub fn color(&self) -> Rgba {
        self.color
    }
}

impl From<Rgba> for ColorSpec {
    fn from(color: Rgba) -> Self {
        Self {
            spec: color.to_hex(),
            color,
        }
    }
}

// =============================================================================
// Board Object
// =============================================================================

/// A logical object living in a cell's content list.
///
/// `tag` selects the render function, everything else is instance data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardObject {
    id: String,
    tag: String,
    primary: ColorSpec,
    secondary: Option<ColorSpec>,
    tertiary: Option<ColorSpec>,
    animations: Vec<String>,
}

impl BoardObject {
    /// Create an object with a generated unique id.
    ///
    /// Fails if `primary` is not a color spec `Rgba::parse` accepts.
    pub fn new(tag: impl Into<String>, primary: &str) -> Result<Self, ColorError> {
        Ok(Self::with_color(tag, ColorSpec::parse(primary)?))
    }

    /// Create an object from an already parsed primary color.
    pub fn with_color(tag: impl Into<String>, primary: impl Into<ColorSpec>) -> Self {
        Self {
            id: next_id(&OBJECT_COUNTER, "obj-"),
            tag: tag.into(),
            primary: primary.into(),
            secondary: None,
            tertiary: None,
            animations: Vec::new(),
        }
    }

    /// A paint deposit of the given color.
    pub fn paint(primary: &str) -> Result<Self, ColorError> {
        Self::new(PAINT_TAG, primary)
    }

    pub fn with_secondary(mut self, spec: &str) -> Result<Self, ColorError> {
        self.secondary = Some(ColorSpec::parse(spec)?);
        Ok(self)
    }

    pub fn with_tertiary(mut self, spec: &str) -> Result<Self, ColorError> {
        self.tertiary = Some(ColorSpec::parse(spec)?);
        Ok(self)
    }

    /// Attach a named animation. Render functions decide what it turns into.
    pub fn with_animation(mut self, name: impl Into<String>) -> Self {
        self.animations.push(name.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The primary color spec exactly as supplied.
    pub fn primary_spec(&self) -> &str {
        self.primary.spec()
    }

    pub fn primary(&self) -> Rgba {
        self.primary.color()
    }

    pub fn secondary(&self) -> Option<Rgba> {
        self.secondary.as_ref().map(ColorSpec::color)
    }

    pub fn tertiary(&self) -> Option<Rgba> {
        self.tertiary.as_ref().map(ColorSpec::color)
    }

    pub fn animations(&self) -> &[String] {
        &self.animations
    }
}

// =============================================================================
// Visual Overlay
// =============================================================================

/// A transient visual effect tag with a fixed lifetime.
///
/// Two overlays may share a class name; only `uid` identifies one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualOverlay {
    uid: String,
    class_name: String,
    duration: Duration,
}

impl VisualOverlay {
    /// Create an overlay with a fresh uid.
    pub fn new(class_name: impl Into<String>, duration: Duration) -> Self {
        Self {
            uid: next_id(&OVERLAY_COUNTER, "ov-"),
            class_name: class_name.into(),
            duration,
        }
    }

    pub fn from_millis(class_name: impl Into<String>, duration_ms: u64) -> Self {
        Self::new(class_name, Duration::from_millis(duration_ms))
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

// =============================================================================
// Render Output
// =============================================================================

/// What a render function returns: the new composite and any new overlays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    pub color: Rgba,
    pub overlays: Vec<VisualOverlay>,
}

impl RenderOutput {
    /// Output that only changes the color.
    pub fn color(color: Rgba) -> Self {
        Self {
            color,
            overlays: Vec::new(),
        }
    }

    pub fn with_overlay(mut self, overlay: VisualOverlay) -> Self {
        self.overlays.push(overlay);
        self
    }
}
