//! Pointer Module - pointer event types for cell interaction.
//!
//! Cells receive already-targeted events: the view layer (or
//! [`PointerRouter::route`](crate::renderer::term::PointerRouter::route) for terminals)
//! decides which cell is under the pointer.

use bitflags::bitflags;
use serde::Deserialize;

// =============================================================================
// TYPES
// =============================================================================

bitflags! {
    /// Modifier keys held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

/// A single modifier key, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    Shift,
    Ctrl,
    Alt,
    Meta,
}

impl ModifierKey {
    pub const fn flag(self) -> Modifiers {
        match self {
            Self::Shift => Modifiers::SHIFT,
            Self::Ctrl => Modifiers::CTRL,
            Self::Alt => Modifiers::ALT,
            Self::Meta => Modifiers::META,
        }
    }
}

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    #[default]
    None,
}

/// Pointer action type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    /// Pointer moved onto the cell.
    Enter,
    /// Pointer moved off the cell.
    Leave,
    /// A button was pressed on the cell.
    Press,
    /// The platform asked for a context menu (usually secondary click).
    ContextMenu,
}

/// Pointer event targeted at one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(action: PointerAction, button: PointerButton) -> Self {
        Self {
            action,
            button,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn enter() -> Self {
        Self::new(PointerAction::Enter, PointerButton::None)
    }

    pub fn leave() -> Self {
        Self::new(PointerAction::Leave, PointerButton::None)
    }

    pub fn press(button: PointerButton) -> Self {
        Self::new(PointerAction::Press, button)
    }

    pub fn context_menu() -> Self {
        Self::new(PointerAction::ContextMenu, PointerButton::Secondary)
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_key_flags() {
        assert_eq!(ModifierKey::Shift.flag(), Modifiers::SHIFT);
        assert_eq!(ModifierKey::Meta.flag(), Modifiers::META);
    }

    #[test]
    fn test_modifier_key_deserialize() {
        let key: ModifierKey = serde_json::from_str(r#""alt""#).unwrap();
        assert_eq!(key, ModifierKey::Alt);
        assert!(serde_json::from_str::<ModifierKey>(r#""hyper""#).is_err());
    }

    #[test]
    fn test_event_builders() {
        let event = PointerEvent::press(PointerButton::Primary)
            .with_modifiers(Modifiers::SHIFT | Modifiers::ALT);
        assert_eq!(event.action, PointerAction::Press);
        assert!(event.modifiers.contains(Modifiers::ALT));
        assert_eq!(PointerEvent::context_menu().button, PointerButton::Secondary);
        assert_eq!(PointerEvent::enter().modifiers, Modifiers::empty());
    }
}
