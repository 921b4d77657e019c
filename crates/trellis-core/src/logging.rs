//! Logging facilities for Trellis.
//!
//! Trellis uses the `tracing` crate for instrumentation. Every subsystem logs
//! under its own target (see [`targets`]) so applications can filter, e.g.
//! `RUST_LOG=trellis::focus=trace,trellis::screen=debug`. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!     // ...
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Screen dispatch and frame driver target.
    pub const SCREEN: &str = "trellis::screen";
    /// Keyboard and hover focus path target.
    pub const FOCUS: &str = "trellis::focus";
    /// Popup placement and z-order target.
    pub const POPUP: &str = "trellis::popup";
    /// Widget tree mutation target.
    pub const TREE: &str = "trellis::tree";
    /// Platform input translation target.
    pub const INPUT: &str = "trellis::input";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "trellis::signal";
    /// Performance spans target.
    pub const PERF: &str = "trellis::perf";
}

/// Guard that keeps a named performance span entered until dropped.
///
/// ```
/// use trellis_core::PerfSpan;
///
/// {
///     let _span = PerfSpan::new("layout");
///     // timed work
/// }
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_share_prefix() {
        for target in [
            targets::SCREEN,
            targets::FOCUS,
            targets::POPUP,
            targets::TREE,
            targets::INPUT,
            targets::SIGNAL,
            targets::PERF,
        ] {
            assert!(target.starts_with("trellis::"));
        }
    }

    #[test]
    fn test_perf_span_with_subscriber() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        tracing::subscriber::with_default(subscriber, || {
            let _span = PerfSpan::new("test_operation");
            tracing::info!(target: targets::SCREEN, "inside span");
        });
    }
}
