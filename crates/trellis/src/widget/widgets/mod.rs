//! Built-in widgets.
//!
//! This module provides the concrete widgets shipped with the toolkit:
//!
//! - [`Label`] - Static text
//! - [`Button`] - Clickable push or toggle button
//! - [`PopupButton`] - Toggle button that shows and hides a popup
//! - [`ComboBox`] - Popup button listing selectable items
//! - [`Slider`] - Draggable value in a range
//!
//! Widgets that own a popup implement [`PopupOwner`] and are added with
//! [`Screen::add_popup_owner`](crate::Screen::add_popup_owner), which creates
//! the popup window next to them.

mod button;
mod combo_box;
mod label;
mod popup_button;
mod slider;

pub use button::{Button, ButtonClicked, ButtonFlags};
pub use combo_box::ComboBox;
pub use label::Label;
pub use popup_button::{PopupButton, PopupOwner};
pub use slider::Slider;
