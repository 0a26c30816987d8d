//! The dedicated event-pump thread
//!
//! The pump owns the winit event loop: it blocks on the native event
//! queue, translates raw events into dispatcher calls, and is woken by a
//! proxy message at shutdown so the blocking wait returns before the
//! loop (and with it the native windowing state) is torn down.
//!
//! Every registered handler therefore runs on this thread, never on the
//! caller's render thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;

use tracing::{debug, error, info};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

use crate::config::WindowConfig;
use crate::input::{Dispatcher, Key, KeyAction, Modifiers};

use super::ContextError;
use super::cursor::WinitCursor;
use super::window::window_attributes_from_config;

/// Messages that break the pump out of its blocking wait
#[derive(Debug)]
pub(super) enum PumpRequest {
    /// Re-check the running flag (the post-empty-event analog)
    WakeUp,
}

/// Everything the constructor needs back once the window exists
pub(super) struct Handshake {
    pub window: Arc<Window>,
    pub proxy: EventLoopProxy<PumpRequest>,
}

/// Thread body: build the loop, run it, tear it down on this thread
///
/// Construction failures are reported through `ready` instead of being
/// propagated; the spawning side turns them back into [`ContextError`].
pub(super) fn run(
    config: WindowConfig,
    dispatcher: Arc<Dispatcher>,
    running: Arc<AtomicBool>,
    close_requested: Arc<AtomicBool>,
    ready: Sender<Result<Handshake, ContextError>>,
) {
    let event_loop = match build_event_loop() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            let _ = ready.send(Err(ContextError::EventLoop(err.to_string())));
            return;
        }
    };
    let proxy = event_loop.create_proxy();
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut pump = EventPump {
        config,
        dispatcher,
        running,
        close_requested,
        ready: Some(ready),
        proxy: Some(proxy),
        window: None,
        cursor: None,
        modifiers: Modifiers::empty(),
    };

    if let Err(err) = event_loop.run_app(&mut pump) {
        error!(error = %err, "event pump terminated abnormally");
    }
    // The event loop drops here, on the pump thread, strictly after its
    // blocking wait returned.
    info!("event pump stopped");
}

fn build_event_loop() -> Result<EventLoop<PumpRequest>, winit::error::EventLoopError> {
    let mut builder = EventLoop::<PumpRequest>::with_user_event();

    // The loop runs on a background thread; the supported desktop
    // platforms require an explicit opt-in for that.
    #[cfg(target_os = "linux")]
    {
        use winit::platform::x11::EventLoopBuilderExtX11;
        EventLoopBuilderExtX11::with_any_thread(&mut builder, true);
    }
    #[cfg(target_os = "windows")]
    {
        use winit::platform::windows::EventLoopBuilderExtWindows;
        EventLoopBuilderExtWindows::with_any_thread(&mut builder, true);
    }

    builder.build()
}

struct EventPump {
    config: WindowConfig,
    dispatcher: Arc<Dispatcher>,
    running: Arc<AtomicBool>,
    close_requested: Arc<AtomicBool>,
    ready: Option<Sender<Result<Handshake, ContextError>>>,
    proxy: Option<EventLoopProxy<PumpRequest>>,
    window: Option<Arc<Window>>,
    cursor: Option<WinitCursor>,
    /// Current modifier set, tracked from ModifiersChanged
    modifiers: Modifiers,
}

impl ApplicationHandler<PumpRequest> for EventPump {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = window_attributes_from_config(&self.config);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                error!(error = %err, "failed to create window");
                if let Some(ready) = self.ready.take() {
                    let _ = ready.send(Err(ContextError::CreateWindow(err.to_string())));
                }
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        info!(
            window.width = size.width,
            window.height = size.height,
            "window created"
        );
        self.dispatcher.set_center(size.width, size.height);

        self.cursor = Some(WinitCursor::new(window.clone()));
        self.window = Some(window.clone());
        if let (Some(ready), Some(proxy)) = (self.ready.take(), self.proxy.take()) {
            let _ = ready.send(Ok(Handshake { window, proxy }));
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested");
                self.close_requested.store(true, Ordering::Release);
            }
            WindowEvent::Resized(size) => {
                if let Some(cursor) = &self.cursor {
                    self.dispatcher.window_resized(size.width, size.height, cursor);
                }
            }
            WindowEvent::Focused(focused) => {
                self.dispatcher.focus_changed(focused);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state().into();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let key = Key::from(event.physical_key);
                let action = KeyAction::from_state(event.state, event.repeat);
                self.dispatcher.key_input(key, action, self.modifiers);

                // Text input rides on key events in this backend; each
                // scalar becomes one character callback.
                if event.state.is_pressed()
                    && let Some(text) = &event.text
                {
                    for ch in text.chars() {
                        self.dispatcher.character(ch);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(cursor) = &self.cursor {
                    self.dispatcher.cursor_position(position.x, position.y, cursor);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let action = KeyAction::from_state(state, false);
                self.dispatcher.mouse_button(button.into(), action, self.modifiers);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // Line deltas are normalized to pixel units
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (x as f64 * 20.0, y as f64 * 20.0),
                    MouseScrollDelta::PixelDelta(pos) => (pos.x, pos.y),
                };
                self.dispatcher.scroll(dx, dy);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.dispatcher.mouse_motion(dx, dy);
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, request: PumpRequest) {
        match request {
            PumpRequest::WakeUp => {
                if !self.running.load(Ordering::Acquire) {
                    debug!("shutdown requested, leaving the event loop");
                    event_loop.exit();
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.running.load(Ordering::Acquire) {
            event_loop.exit();
        }
    }
}
