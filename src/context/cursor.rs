//! Native cursor control over the winit window

use std::sync::Arc;

use tracing::warn;
use winit::dpi::PhysicalPosition;
use winit::window::Window;

use crate::input::CursorControl;

/// [`CursorControl`] backed by a winit window
///
/// Warping is advisory; a platform refusal (some compositors reject
/// programmatic pointer moves) is logged and ignored.
pub struct WinitCursor {
    window: Arc<Window>,
}

impl WinitCursor {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl CursorControl for WinitCursor {
    fn warp(&self, x: i32, y: i32) {
        if let Err(error) = self
            .window
            .set_cursor_position(PhysicalPosition::new(x, y))
        {
            warn!(%error, x, y, "cursor warp refused by the platform");
        }
    }
}
