//! Interactive input demo
//!
//! Wires a console text-edit overlay ahead of gameplay key bindings in a
//! key chain: J opens the overlay (which then consumes every key until
//! Escape), W/A/S/D print movement lines, and T toggles the cursor
//! between captured and absolute. Cursor output goes to stdout so the
//! dispatch behavior is visible without a renderer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::Context as _;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use winlet::WindowContext;
use winlet::config::AppConfig;
use winlet::input::{
    CharacterHandler, CursorPositionHandler, Key, KeyBindings, KeyChain, KeyHandler,
    MouseMovementHandler,
};
use winlet::overlay::{EditorKeys, TextEdit};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load_from_env().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using default configuration");
        AppConfig::default()
    });
    info!(profile = %config.profile, "Starting demo");
    info!(?config.window, "Window configuration");

    let captured = Arc::new(AtomicBool::new(config.window.capture_cursor));
    let context = Arc::new(WindowContext::new(config.window).context("window context startup")?);

    // The overlay eats text input while it is active
    let overlay = Arc::new(TextEdit::new());
    context.set_character_handler(Some(CharacterHandler::Listener(overlay.clone())));

    // Gameplay bindings take whatever the overlay lets through
    let mut bindings = KeyBindings::new();
    bindings.bind_press(Key::W, || println!("Forward"));
    bindings.bind_press(Key::S, || println!("Backward"));
    bindings.bind_press(Key::A, || println!("Left"));
    bindings.bind_press(Key::D, || println!("Right"));
    {
        // Weak: the binding lives inside the context's own dispatcher,
        // so a strong handle here would keep the context alive forever.
        let context = Arc::downgrade(&context);
        let captured = captured.clone();
        bindings.bind_press(Key::T, move || {
            if let Some(context) = context.upgrade() {
                let relative = !captured.fetch_xor(true, Ordering::Relaxed);
                context.set_cursor_mode(relative);
            }
        });
    }

    // Sticky keys are pointless mid-edit; mirror the overlay state
    let editor = {
        let context = Arc::downgrade(&context);
        EditorKeys::new(overlay.clone(), Key::J).on_mode_change(move |text_mode| {
            if let Some(context) = context.upgrade() {
                context.set_sticky_keys(!text_mode);
            }
        })
    };

    let chain = KeyChain::new()
        .with_stage(Arc::new(editor))
        .with_stage(Arc::new(bindings));
    context.set_key_handler(Some(KeyHandler::Listener(Arc::new(chain))));

    context.set_cursor_position_handler(Some(CursorPositionHandler::callback(|x, y| {
        println!("{x}; {y} - cursor");
    })));
    context.set_mouse_movement_handler(Some(MouseMovementHandler::callback(|dx, dy| {
        println!("{dx}; {dy} - mouse");
    })));

    while context.update() {
        thread::sleep(Duration::from_millis(500));
    }
    info!("close requested, shutting down");

    Ok(())
}
