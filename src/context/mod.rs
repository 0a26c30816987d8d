//! Window context lifecycle
//!
//! [`WindowContext`] owns exactly one native window and the dedicated
//! event-pump thread that services it. The application constructs it,
//! registers handlers, calls [`WindowContext::update`] once per frame,
//! and drops it to shut down; dropping is guaranteed to join the pump
//! thread before the native windowing state goes away.

mod cursor;
mod pump;
mod window;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{debug, info, warn};
use winit::event_loop::EventLoopProxy;
use winit::window::{CursorGrabMode, Window};

use crate::config::WindowConfig;
use crate::input::{
    CharacterHandler, CursorControl, CursorPositionHandler, Dispatcher, KeyHandler,
    MouseButtonHandler, MouseMovementHandler, ResizeHandler, ScrollHandler,
};
use cursor::WinitCursor;
use pump::PumpRequest;

pub use window::window_attributes_from_config;

/// Fatal construction failures; there is no degraded mode
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("couldn't build the event loop: {0}")]
    EventLoop(String),
    #[error("couldn't create the window: {0}")]
    CreateWindow(String),
    #[error("couldn't start the event pump thread: {0}")]
    SpawnPump(std::io::Error),
    #[error("the event pump exited before the window was ready")]
    PumpExited,
}

/// One native window plus its event-pump thread
pub struct WindowContext {
    window: Arc<Window>,
    dispatcher: Arc<Dispatcher>,
    cursor: WinitCursor,
    /// The proxy is not Sync on every backend; the mutex keeps the
    /// context shareable across threads
    proxy: Mutex<EventLoopProxy<PumpRequest>>,
    running: Arc<AtomicBool>,
    close_requested: Arc<AtomicBool>,
    sticky_keys: AtomicBool,
    pump: Option<JoinHandle<()>>,
}

impl WindowContext {
    /// Create the window and start servicing its events
    ///
    /// Blocks until the pump thread has the window up, then applies the
    /// configured initial cursor mode. Event-loop or window failures
    /// abort construction.
    pub fn new(config: WindowConfig) -> Result<Self, ContextError> {
        let capture_cursor = config.capture_cursor;
        let dispatcher = Arc::new(Dispatcher::new());
        let running = Arc::new(AtomicBool::new(true));
        let close_requested = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = mpsc::channel();

        let pump = {
            let dispatcher = dispatcher.clone();
            let running = running.clone();
            let close_requested = close_requested.clone();
            thread::Builder::new()
                .name("winlet-pump".into())
                .spawn(move || pump::run(config, dispatcher, running, close_requested, ready_tx))
                .map_err(ContextError::SpawnPump)?
        };

        let handshake = match ready_rx.recv() {
            Ok(Ok(handshake)) => handshake,
            Ok(Err(err)) => {
                let _ = pump.join();
                return Err(err);
            }
            Err(_) => {
                let _ = pump.join();
                return Err(ContextError::PumpExited);
            }
        };

        let context = Self {
            cursor: WinitCursor::new(handshake.window.clone()),
            window: handshake.window,
            dispatcher,
            proxy: Mutex::new(handshake.proxy),
            running,
            close_requested,
            sticky_keys: AtomicBool::new(false),
            pump: Some(pump),
        };

        let (width, height) = context.dimensions();
        info!(width, height, capture_cursor, "window context ready");
        context.set_cursor_mode(capture_cursor);

        Ok(context)
    }

    // Registration operations; callable from any thread, last write wins,
    // `None` unregisters.

    pub fn set_key_handler(&self, handler: Option<KeyHandler>) {
        self.dispatcher.set_key_handler(handler);
    }

    pub fn set_cursor_position_handler(&self, handler: Option<CursorPositionHandler>) {
        self.dispatcher.set_cursor_position_handler(handler);
    }

    pub fn set_mouse_movement_handler(&self, handler: Option<MouseMovementHandler>) {
        self.dispatcher.set_mouse_movement_handler(handler);
    }

    pub fn set_mouse_button_handler(&self, handler: Option<MouseButtonHandler>) {
        self.dispatcher.set_mouse_button_handler(handler);
    }

    pub fn set_resize_handler(&self, handler: Option<ResizeHandler>) {
        self.dispatcher.set_resize_handler(handler);
    }

    pub fn set_character_handler(&self, handler: Option<CharacterHandler>) {
        self.dispatcher.set_character_handler(handler);
    }

    pub fn set_scroll_handler(&self, handler: Option<ScrollHandler>) {
        self.dispatcher.set_scroll_handler(handler);
    }

    /// Current inner size in physical pixels
    pub fn dimensions(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    /// Switch between captured (relative) and absolute cursor input
    ///
    /// Capturing prefers a locked grab, which delivers high-resolution
    /// deltas through the raw-motion path; when the platform refuses the
    /// lock, a confined grab plus the warp-to-center transform stands in.
    /// Releasing replays the last known position so an installed
    /// cursor-position handler observes an up-to-date value immediately.
    pub fn set_cursor_mode(&self, relative: bool) {
        if relative {
            self.dispatcher.set_cursor_mode(true, false);
            let (cx, cy) = self.dispatcher.center();
            self.cursor.warp(cx, cy);

            let raw_motion = match self.window.set_cursor_grab(CursorGrabMode::Locked) {
                Ok(()) => true,
                Err(err) => {
                    debug!(error = %err, "locked grab unavailable, confining instead");
                    if let Err(err) = self.window.set_cursor_grab(CursorGrabMode::Confined) {
                        warn!(error = %err, "cursor grab refused, capture relies on warping alone");
                    }
                    false
                }
            };
            if raw_motion {
                self.dispatcher.set_cursor_mode(true, true);
            }
            self.window.set_cursor_visible(false);
            info!(raw_motion, "cursor captured");
        } else {
            self.dispatcher.set_cursor_mode(false, false);
            if let Err(err) = self.window.set_cursor_grab(CursorGrabMode::None) {
                warn!(error = %err, "couldn't release the cursor grab");
            }
            self.window.set_cursor_visible(true);
            self.dispatcher.replay_cursor_position();
            info!("cursor released");
        }
    }

    /// Advisory stickiness toggle
    ///
    /// This backend queues every key transition, so releases cannot be
    /// missed by a slow consumer; the flag is recorded for API parity.
    pub fn set_sticky_keys(&self, enabled: bool) {
        self.sticky_keys.store(enabled, Ordering::Relaxed);
        debug!(enabled, "sticky keys");
    }

    pub fn sticky_keys(&self) -> bool {
        self.sticky_keys.load(Ordering::Relaxed)
    }

    /// Per-frame tick from the render thread
    ///
    /// Returns false exactly once the window has received a close
    /// request; otherwise asks for the next frame to be presented.
    /// Events are never polled here, the pump thread already delivered
    /// them asynchronously.
    pub fn update(&self) -> bool {
        if self.close_requested.load(Ordering::Acquire) {
            return false;
        }
        self.window.request_redraw();
        true
    }
}

impl Drop for WindowContext {
    fn drop(&mut self) {
        // Flag first, then wake the blocked wait so the pump can observe
        // it; the event loop is torn down on the pump thread only after
        // that wait returns, and the join fences everything here.
        self.running.store(false, Ordering::Release);
        if let Ok(proxy) = self.proxy.lock()
            && proxy.send_event(PumpRequest::WakeUp).is_err()
        {
            debug!("event pump already gone at shutdown");
        }
        if let Some(pump) = self.pump.take()
            && pump.join().is_err()
        {
            warn!("event pump panicked during shutdown");
        }
    }
}
