//! Generational widget identifiers.

use slotmap::new_key_type;

new_key_type! {
    /// A unique identifier for a widget in a screen's widget arena.
    ///
    /// Identifiers carry a generation counter, so an id that outlives its
    /// widget never resolves to a different widget that later reuses the slot.
    /// Back-references (a popup's parent window, its owning button) are stored
    /// as `WidgetId`s and simply stop resolving once the target is destroyed.
    pub struct WidgetId;
}
