//! Routing platform windows to screens.
//!
//! An application that owns several native windows keeps one
//! [`ScreenRegistry`] keyed by its window handle (usually
//! `winit::window::WindowId`) and forwards each translated
//! [`InputEvent`] to the screen registered under that handle.

use std::collections::HashMap;
use std::hash::Hash;

use trellis_core::logging::targets;

use super::input::InputEvent;
use crate::screen::Screen;
use crate::widget::DispatchResult;

/// Map from window handle to the screen shown in that window.
///
/// # Example
///
/// ```ignore
/// let mut registry = ScreenRegistry::new();
/// registry.register(window.id(), screen);
///
/// // In ApplicationHandler::window_event:
/// for input in translator.translate(&event) {
///     registry.dispatch(&window_id, input);
/// }
/// ```
pub struct ScreenRegistry<K> {
    screens: HashMap<K, Screen>,
}

impl<K> Default for ScreenRegistry<K> {
    fn default() -> Self {
        Self {
            screens: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + std::fmt::Debug> ScreenRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a screen, returning the one previously under `key`.
    pub fn register(&mut self, key: K, screen: Screen) -> Option<Screen> {
        tracing::debug!(target: targets::SCREEN, ?key, "screen registered");
        self.screens.insert(key, screen)
    }

    /// Remove and return the screen under `key`.
    pub fn unregister(&mut self, key: &K) -> Option<Screen> {
        let screen = self.screens.remove(key);
        if screen.is_some() {
            tracing::debug!(target: targets::SCREEN, ?key, "screen unregistered");
        }
        screen
    }

    pub fn get(&self, key: &K) -> Option<&Screen> {
        self.screens.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut Screen> {
        self.screens.get_mut(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.screens.contains_key(key)
    }

    /// Forward an input event to the screen under `key`. Events for unknown
    /// handles are ignored.
    pub fn dispatch(&mut self, key: &K, event: InputEvent) -> DispatchResult {
        match self.screens.get_mut(key) {
            Some(screen) => screen.handle_input(event),
            None => {
                tracing::trace!(
                    target: targets::INPUT,
                    ?key,
                    event = event.name(),
                    "input for unregistered window dropped"
                );
                DispatchResult::Ignored
            }
        }
    }

    /// Draw every registered screen.
    pub fn draw_all(&mut self) {
        for screen in self.screens.values_mut() {
            screen.draw_all();
        }
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.screens.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingContext;
    use crate::window::ScreenConfig;

    fn screen() -> Screen {
        Screen::new(
            ScreenConfig::new("test").with_size(200, 100),
            Box::new(RecordingContext::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_register_and_dispatch() {
        let mut registry = ScreenRegistry::new();
        assert!(registry.register(1u32, screen()).is_none());
        assert_eq!(registry.len(), 1);

        let result = registry.dispatch(
            &1,
            InputEvent::FramebufferResized {
                width: 0,
                height: 0,
            },
        );
        assert_eq!(result, DispatchResult::Ignored);
        assert_eq!(
            registry.dispatch(&2, InputEvent::Char('x')),
            DispatchResult::Ignored
        );
    }

    #[test]
    fn test_unregister() {
        let mut registry = ScreenRegistry::new();
        registry.register("main", screen());
        assert!(registry.contains(&"main"));
        assert!(registry.unregister(&"main").is_some());
        assert!(registry.unregister(&"main").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_routes_to_the_right_screen() {
        let mut registry = ScreenRegistry::new();
        registry.register(1u32, screen());
        registry.register(2u32, screen());
        registry.dispatch(
            &2,
            InputEvent::FramebufferResized {
                width: 640,
                height: 480,
            },
        );
        assert_eq!(registry.get(&1).unwrap().size().width, 200);
        assert_eq!(registry.get(&2).unwrap().size().width, 640);
    }
}
