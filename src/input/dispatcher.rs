//! Event fan-out to registered handlers
//!
//! One `Dispatcher` instance is owned by the window context and shared
//! with the event-pump thread. Every slot holds at most one handler per
//! event kind; replacing a slot discards the previous handler and
//! installing `None` clears it. All dispatch happens on the pump thread.
//!
//! The dispatcher also owns the cursor-mode state: in relative mode each
//! absolute cursor sample is converted into a delta against the cached
//! window center and the native cursor is warped back to that center, so
//! an absolute-position device behaves as a delta device without
//! drifting into the screen edges.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Mutex, RwLock};

use tracing::{debug, trace};

use super::events::{Key, KeyAction, Modifiers, MouseButton};
use super::listener::{
    CharacterHandler, CursorPositionHandler, KeyHandler, MouseButtonHandler,
    MouseMovementHandler, ResizeHandler, ScrollHandler,
};

/// Native cursor control seam
///
/// Implemented over the winit window by the context; tests substitute a
/// recording mock. Warping is advisory: implementations log and continue
/// when the platform refuses.
pub trait CursorControl: Send + Sync {
    /// Move the pointer to window coordinates `(x, y)`
    fn warp(&self, x: i32, y: i32);
}

type Slot<T> = RwLock<Option<T>>;

fn install<T>(slot: &Slot<T>, handler: Option<T>, kind: &str) {
    let replaced = {
        let mut guard = slot.write().expect("handler slot lock");
        let had = guard.is_some();
        *guard = handler;
        had
    };
    debug!(kind, replaced, "handler slot updated");
}

/// Per-event-kind callback registry with focus gating and cursor-mode
/// transforms
pub struct Dispatcher {
    key: Slot<KeyHandler>,
    cursor_position: Slot<CursorPositionHandler>,
    mouse_movement: Slot<MouseMovementHandler>,
    mouse_button: Slot<MouseButtonHandler>,
    resize: Slot<ResizeHandler>,
    character: Slot<CharacterHandler>,
    scroll: Slot<ScrollHandler>,

    /// Window focus; while false everything but resize is dropped
    active: AtomicBool,
    /// Captured cursor mode (deltas) vs absolute positions
    relative: AtomicBool,
    /// Deltas arrive through the raw-motion device path instead of the
    /// warp transform
    raw_motion: AtomicBool,
    center_x: AtomicI32,
    center_y: AtomicI32,
    /// Last absolute sample the platform reported; feeds the replay on a
    /// switch to absolute mode
    last_sample: Mutex<Option<(f64, f64)>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            key: RwLock::new(None),
            cursor_position: RwLock::new(None),
            mouse_movement: RwLock::new(None),
            mouse_button: RwLock::new(None),
            resize: RwLock::new(None),
            character: RwLock::new(None),
            scroll: RwLock::new(None),
            active: AtomicBool::new(true),
            relative: AtomicBool::new(false),
            raw_motion: AtomicBool::new(false),
            center_x: AtomicI32::new(0),
            center_y: AtomicI32::new(0),
            last_sample: Mutex::new(None),
        }
    }

    // Registration; callable from any thread, last write wins.

    pub fn set_key_handler(&self, handler: Option<KeyHandler>) {
        install(&self.key, handler, "key");
    }

    pub fn set_cursor_position_handler(&self, handler: Option<CursorPositionHandler>) {
        install(&self.cursor_position, handler, "cursor_position");
    }

    pub fn set_mouse_movement_handler(&self, handler: Option<MouseMovementHandler>) {
        install(&self.mouse_movement, handler, "mouse_movement");
    }

    pub fn set_mouse_button_handler(&self, handler: Option<MouseButtonHandler>) {
        install(&self.mouse_button, handler, "mouse_button");
    }

    pub fn set_resize_handler(&self, handler: Option<ResizeHandler>) {
        install(&self.resize, handler, "resize");
    }

    pub fn set_character_handler(&self, handler: Option<CharacterHandler>) {
        install(&self.character, handler, "character");
    }

    pub fn set_scroll_handler(&self, handler: Option<ScrollHandler>) {
        install(&self.scroll, handler, "scroll");
    }

    // Cursor-mode state, managed by the context.

    pub fn set_cursor_mode(&self, relative: bool, raw_motion: bool) {
        self.relative.store(relative, Ordering::Release);
        self.raw_motion.store(raw_motion, Ordering::Release);
        debug!(relative, raw_motion, "cursor mode changed");
    }

    pub fn is_relative(&self) -> bool {
        self.relative.load(Ordering::Acquire)
    }

    pub fn set_center(&self, width: u32, height: u32) {
        self.center_x.store((width / 2) as i32, Ordering::Release);
        self.center_y.store((height / 2) as i32, Ordering::Release);
    }

    pub fn center(&self) -> (i32, i32) {
        (
            self.center_x.load(Ordering::Acquire),
            self.center_y.load(Ordering::Acquire),
        )
    }

    /// Re-issue one cursor-position callback from the last cached sample
    ///
    /// Called on a switch to absolute mode so the installed handler
    /// observes an up-to-date position without waiting for the next
    /// native event. Subject to the usual focus gate.
    pub fn replay_cursor_position(&self) {
        let sample = *self.last_sample.lock().expect("last sample lock");
        let Some((x, y)) = sample else {
            trace!("no cursor sample to replay");
            return;
        };
        if !self.active.load(Ordering::Acquire) {
            return;
        }
        if let Some(handler) = &*self.cursor_position.read().expect("handler slot lock") {
            handler.invoke(x, y);
        }
    }

    // Event entry points, driven by the pump thread.

    pub fn key_input(&self, key: Key, action: KeyAction, mods: Modifiers) {
        if !self.active.load(Ordering::Acquire) {
            return;
        }
        if let Some(handler) = &*self.key.read().expect("handler slot lock") {
            handler.invoke(key, action, mods);
        }
    }

    /// Serve an absolute cursor sample
    ///
    /// Absolute mode forwards the position unchanged. Relative mode
    /// delivers the delta against the window center and warps the native
    /// cursor back there, once per sample; when raw motion is active the
    /// sample is ignored because deltas arrive via [`Self::mouse_motion`].
    pub fn cursor_position(&self, x: f64, y: f64, cursor: &dyn CursorControl) {
        *self.last_sample.lock().expect("last sample lock") = Some((x, y));
        if !self.active.load(Ordering::Acquire) {
            return;
        }
        if !self.relative.load(Ordering::Acquire) {
            if let Some(handler) = &*self.cursor_position.read().expect("handler slot lock") {
                handler.invoke(x, y);
            }
            return;
        }
        if self.raw_motion.load(Ordering::Acquire) {
            trace!(x, y, "absolute sample ignored while raw motion is active");
            return;
        }
        let (cx, cy) = self.center();
        if let Some(handler) = &*self.mouse_movement.read().expect("handler slot lock") {
            handler.invoke(x - cx as f64, y - cy as f64);
        }
        cursor.warp(cx, cy);
    }

    /// Serve a raw motion delta from the device path
    ///
    /// Only meaningful while captured with raw motion; the locked grab
    /// pins the pointer, so no warp is needed.
    pub fn mouse_motion(&self, dx: f64, dy: f64) {
        if !self.active.load(Ordering::Acquire) {
            return;
        }
        if !self.relative.load(Ordering::Acquire) || !self.raw_motion.load(Ordering::Acquire) {
            return;
        }
        if let Some(handler) = &*self.mouse_movement.read().expect("handler slot lock") {
            handler.invoke(dx, dy);
        }
    }

    pub fn mouse_button(&self, button: MouseButton, action: KeyAction, mods: Modifiers) {
        if !self.active.load(Ordering::Acquire) {
            return;
        }
        if let Some(handler) = &*self.mouse_button.read().expect("handler slot lock") {
            handler.invoke(button, action, mods);
        }
    }

    /// Serve a window resize
    ///
    /// Never gated on focus: the center cache must stay coherent so a
    /// later cursor-mode switch sees the right geometry.
    pub fn window_resized(&self, width: u32, height: u32, cursor: &dyn CursorControl) {
        self.set_center(width, height);
        if self.relative.load(Ordering::Acquire) {
            let (cx, cy) = self.center();
            cursor.warp(cx, cy);
        }
        if let Some(handler) = &*self.resize.read().expect("handler slot lock") {
            handler.invoke(width, height);
        }
    }

    pub fn character(&self, ch: char) {
        if !self.active.load(Ordering::Acquire) {
            return;
        }
        if let Some(handler) = &*self.character.read().expect("handler slot lock") {
            handler.invoke(ch);
        }
    }

    pub fn scroll(&self, dx: f64, dy: f64) {
        if !self.active.load(Ordering::Acquire) {
            return;
        }
        if let Some(handler) = &*self.scroll.read().expect("handler slot lock") {
            handler.invoke(dx, dy);
        }
    }

    /// Focus changes are never gated; they control the gate itself
    pub fn focus_changed(&self, focused: bool) {
        self.active.store(focused, Ordering::Release);
        debug!(focused, "window focus changed");
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
