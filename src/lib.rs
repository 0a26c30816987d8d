//! winlet
//!
//! A thin window/input layer built on winit: one window, one dedicated
//! event-pump thread, and a per-event-kind callback registry with a
//! switchable absolute/captured cursor mode.

/// Application configuration - profiles and environment overrides
pub mod config;

/// Window context - lifecycle, registration, modes, per-frame update
pub mod context;

/// Input dispatch - listener traits, handler slots, key chains
pub mod input;

/// Console text-edit overlay used by the demo
pub mod overlay;

pub use context::{ContextError, WindowContext};
