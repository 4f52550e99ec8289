//! The `Engine` trait driven once per animation frame.
//!
//! The trait is object-safe so the frame loop can drive `&mut dyn Engine`.

use crate::pointer::PointerState;
use crate::surface::Surface;
use serde_json::Value;

/// A per-frame simulation that draws itself onto a [`Surface`].
///
/// Pointer state is passed in on every call rather than read from ambient
/// state, so an engine can be stepped in isolation from input wiring.
pub trait Engine {
    /// Advances every entity by one tick.
    fn advance(&mut self, pointer: &PointerState);

    /// Draws the current state. Does not clear the surface.
    fn render(&self, surface: &mut Surface);

    /// One full frame: clear, draw the current state, then advance.
    fn advance_and_render(&mut self, pointer: &PointerState, surface: &mut Surface) {
        surface.clear();
        self.render(surface);
        self.advance(pointer);
    }

    /// Current tuning values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing every tunable value, its range, and its default.
    fn param_schema(&self) -> Value;
}
