//! Core systems for Trellis.
//!
//! This crate provides the foundational pieces the widget toolkit is built on:
//!
//! - **Widget identifiers**: generational [`WidgetId`] keys for the widget arena
//! - **Signal/Slot System**: type-safe change notifications for widgets
//! - **Errors**: the [`TrellisError`] taxonomy shared by every crate
//! - **Logging**: `tracing` targets per subsystem and [`PerfSpan`] guards
//! - **Time**: the [`Clock`] abstraction driving double-click and tooltip timing
//!
//! # Signal/Slot Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```

pub mod clock;
mod error;
mod id;
pub mod logging;
pub mod signal;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use error::{Result, TreeError, TreeResult, TrellisError, WidgetError};
pub use id::WidgetId;
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
