//! Wheelglide - smooth scrolling for mice.
//!
//! Intercepts discrete mouse-wheel events at the OS input layer and
//! replaces each coarse jump with a stream of small, eased scroll pulses
//! emitted at the display refresh cadence. Modifier hotkeys toggle
//! axis-swap and a temporary smoothing block at runtime.

pub mod clock;
pub mod config;
pub mod engine;
pub mod hook;
pub mod lifecycle;

pub use clock::TickClock;
pub use config::Config;
pub use engine::ScrollEngine;
pub use lifecycle::ScrollHandler;
