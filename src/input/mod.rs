//! Input dispatch
//!
//! Raw events arrive from the windowing backend on a dedicated pump
//! thread and fan out to at most one registered handler per event kind:
//!
//! ```text
//! native events (pump thread) → Dispatcher → handler slots
//!                                   │
//!                                   ├─ focus gate (resize exempt)
//!                                   └─ cursor-mode transform
//!                                      (absolute pass-through, or
//!                                       delta + warp-to-center)
//! ```
//!
//! Key routing can additionally go through a [`KeyChain`]: an ordered
//! sequence of consumers where the first stage returning `true` stops
//! propagation, letting a UI overlay intercept keys before gameplay
//! bindings see them.

mod bindings;
mod chain;
mod dispatcher;
mod events;
mod listener;

pub use bindings::KeyBindings;
pub use chain::{KeyChain, KeyConsumer};
pub use dispatcher::{CursorControl, Dispatcher};
pub use events::{Key, KeyAction, Modifiers, MouseButton};
pub use listener::{
    CharacterHandler, CharacterListener, CursorPositionHandler, CursorPositionListener,
    KeyHandler, KeyInputListener, MouseButtonHandler, MouseButtonListener, MouseMovementHandler,
    MouseMovementListener, ResizeHandler, ScrollHandler, ScrollListener, WindowResizeListener,
};
