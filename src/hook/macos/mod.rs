//! macOS hook implementation
//!
//! Uses CGEventTap for interception and synthesized CGEvents for emission.

pub mod emitter;
pub mod tap;

pub use tap::MacosBackend;
