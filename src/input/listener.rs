//! Listener capability traits and handler slots
//!
//! Each trait covers exactly one event kind. Implementers receive only
//! the fields relevant to that kind and must tolerate whatever values
//! the platform reports; serving methods return nothing, and the
//! dispatcher treats every call as fire-and-forget.
//!
//! A slot accepts either a shared listener object or a free-standing
//! closure. Both forms dispatch through a single `invoke` call site, so
//! the dispatcher never knows which one is installed.

use std::sync::Arc;

use super::events::{Key, KeyAction, Modifiers, MouseButton};

/// Receives key events (code, action, modifiers)
pub trait KeyInputListener: Send + Sync {
    fn serve_key_input(&self, key: Key, action: KeyAction, mods: Modifiers);
}

/// Receives absolute cursor positions in window coordinates
pub trait CursorPositionListener: Send + Sync {
    fn serve_cursor_position(&self, x: f64, y: f64);
}

/// Receives relative mouse movement deltas
pub trait MouseMovementListener: Send + Sync {
    fn serve_mouse_movement(&self, dx: f64, dy: f64);
}

/// Receives mouse button events
pub trait MouseButtonListener: Send + Sync {
    fn serve_mouse_button(&self, button: MouseButton, action: KeyAction, mods: Modifiers);
}

/// Receives the new inner size after a window resize
pub trait WindowResizeListener: Send + Sync {
    fn serve_window_resized(&self, width: u32, height: u32);
}

/// Receives text input, one Unicode scalar at a time
pub trait CharacterListener: Send + Sync {
    fn serve_character(&self, ch: char);
}

/// Receives scroll deltas in pixels
pub trait ScrollListener: Send + Sync {
    fn serve_scroll(&self, dx: f64, dy: f64);
}

macro_rules! handler {
    ($(#[$doc:meta])* $name:ident, $listener:ident, $method:ident, ($($arg:ident: $ty:ty),*)) => {
        $(#[$doc])*
        pub enum $name {
            /// Shared listener object; the caller keeps its own `Arc`
            Listener(Arc<dyn $listener>),
            /// Owned closure
            Callback(Box<dyn Fn($($ty),*) + Send + Sync>),
        }

        impl $name {
            /// Wrap a closure as a handler
            pub fn callback<F>(f: F) -> Self
            where
                F: Fn($($ty),*) + Send + Sync + 'static,
            {
                Self::Callback(Box::new(f))
            }

            pub(crate) fn invoke(&self, $($arg: $ty),*) {
                match self {
                    Self::Listener(listener) => listener.$method($($arg),*),
                    Self::Callback(f) => f($($arg),*),
                }
            }
        }

        impl From<Arc<dyn $listener>> for $name {
            fn from(listener: Arc<dyn $listener>) -> Self {
                Self::Listener(listener)
            }
        }
    };
}

handler!(
    /// Installed key handler
    KeyHandler, KeyInputListener, serve_key_input,
    (key: Key, action: KeyAction, mods: Modifiers)
);
handler!(
    /// Installed cursor-position handler
    CursorPositionHandler, CursorPositionListener, serve_cursor_position,
    (x: f64, y: f64)
);
handler!(
    /// Installed mouse-movement handler
    MouseMovementHandler, MouseMovementListener, serve_mouse_movement,
    (dx: f64, dy: f64)
);
handler!(
    /// Installed mouse-button handler
    MouseButtonHandler, MouseButtonListener, serve_mouse_button,
    (button: MouseButton, action: KeyAction, mods: Modifiers)
);
handler!(
    /// Installed resize handler
    ResizeHandler, WindowResizeListener, serve_window_resized,
    (width: u32, height: u32)
);
handler!(
    /// Installed character handler
    CharacterHandler, CharacterListener, serve_character,
    (ch: char)
);
handler!(
    /// Installed scroll handler
    ScrollHandler, ScrollListener, serve_scroll,
    (dx: f64, dy: f64)
);
