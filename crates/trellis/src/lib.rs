//! Trellis - a small retained-mode widget toolkit.
//!
//! Trellis keeps a tree of widgets per native window and turns raw platform
//! input into widget events: hit-testing, keyboard focus paths, hover
//! tracking, drags, double clicks, modal windows and popups anchored to
//! buttons. Drawing goes through the [`DrawContext`](render::DrawContext)
//! trait, so any vector backend (or the recording context used in tests) can
//! sit underneath.
//!
//! # Example
//!
//! ```no_run
//! use trellis::prelude::*;
//!
//! fn main() -> trellis::Result<()> {
//!     let config = ScreenConfig::new("Demo").with_size(800, 600);
//!     let mut screen = Screen::new(config, Box::new(RecordingContext::new()))?;
//!
//!     let window = screen.add_window(WindowState::new("Controls"))?;
//!     screen.tree_mut().set_layout(window, BoxLayout::vertical().with_margin(15))?;
//!     let button = screen.tree_mut().add_child(window, Button::new("Apply"))?;
//!     if let Some(button) = screen.tree().downcast_ref::<Button>(button) {
//!         button.clicked.connect(|_| println!("applied"));
//!     }
//!     screen.perform_layout();
//!     screen.center_window(window)?;
//!
//!     screen.handle_input(InputEvent::CursorMoved { x: 400.0, y: 300.0 });
//!     screen.draw_all();
//!     Ok(())
//! }
//! ```

pub use trellis_core::*;

pub mod geometry;
pub mod prelude;
pub mod render;
pub mod screen;
pub mod theme;
pub mod widget;
pub mod window;

pub use screen::Screen;
