//! Error types for Trellis.

use thiserror::Error;

use crate::id::WidgetId;

/// The main error type for Trellis operations.
#[derive(Error, Debug)]
pub enum TrellisError {
    /// The drawing backend could not provide a usable context.
    #[error("failed to create drawing context: {0}")]
    ContextCreation(String),

    /// A screen was configured with unusable values.
    #[error("invalid screen configuration: {0}")]
    InvalidConfig(String),

    /// A widget tree operation failed.
    #[error("widget tree error: {0}")]
    Tree(#[from] TreeError),

    /// A widget handler reported a fault.
    #[error("widget error: {0}")]
    Widget(#[from] WidgetError),
}

/// Errors raised by widget tree operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The id does not refer to a live widget.
    #[error("widget {0:?} does not exist")]
    InvalidWidget(WidgetId),

    /// A child index was out of range for its parent.
    #[error("child index {index} out of range for widget {parent:?} with {len} children")]
    InvalidChildIndex {
        parent: WidgetId,
        index: usize,
        len: usize,
    },

    /// The operation requires a window or popup.
    #[error("widget {0:?} is not a window")]
    NotAWindow(WidgetId),

    /// The root widget cannot be reparented or removed.
    #[error("the root widget cannot be reparented or removed")]
    CannotReparentRoot,
}

/// Errors reported by widget event handlers.
///
/// A handler returning an error aborts the current dispatch; the screen logs
/// the error and reports the event as faulted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    /// The handler failed while processing an event.
    #[error("handler fault: {0}")]
    Fault(String),

    /// The widget was asked to do something its state does not allow.
    #[error("invalid widget state: {0}")]
    InvalidState(String),
}

impl WidgetError {
    /// Create a handler fault with the given message.
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault(message.into())
    }
}

/// A specialized Result type for Trellis operations.
pub type Result<T> = std::result::Result<T, TrellisError>;

/// Result type for widget tree operations.
pub type TreeResult<T> = std::result::Result<T, TreeError>;
