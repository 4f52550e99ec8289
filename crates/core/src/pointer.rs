//! Pointer state shared between input handling and the particle field.
//!
//! The input side writes it (move, leave); the field only reads it, once per
//! tick, through an explicit argument.

use glam::DVec2;

/// Default interaction radius in CSS pixels.
pub const DEFAULT_POINTER_RADIUS: f64 = 50.0;

/// Optional pointer position plus a fixed interaction radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    position: Option<DVec2>,
    radius: f64,
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new(DEFAULT_POINTER_RADIUS)
    }
}

impl PointerState {
    /// An inactive pointer with the given radius. Non-finite or negative
    /// radii collapse to zero, which disables repulsion.
    pub fn new(radius: f64) -> Self {
        let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
        Self {
            position: None,
            radius,
        }
    }

    /// An active pointer at `(x, y)`.
    pub fn at(x: f64, y: f64, radius: f64) -> Self {
        let mut p = Self::new(radius);
        p.move_to(x, y);
        p
    }

    pub fn position(&self) -> Option<DVec2> {
        self.position
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn is_active(&self) -> bool {
        self.position.is_some()
    }

    /// Records a pointer-move. Non-finite coordinates clear the pointer.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.position = (x.is_finite() && y.is_finite()).then(|| DVec2::new(x, y));
    }

    /// Records a pointer-leave or touch-end.
    pub fn clear(&mut self) {
        self.position = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_inactive_with_default_radius() {
        let p = PointerState::default();
        assert!(!p.is_active());
        assert_eq!(p.radius(), DEFAULT_POINTER_RADIUS);
    }

    #[test]
    fn move_then_clear() {
        let mut p = PointerState::new(40.0);
        p.move_to(10.0, 20.0);
        assert_eq!(p.position(), Some(DVec2::new(10.0, 20.0)));
        p.clear();
        assert_eq!(p.position(), None);
        assert_eq!(p.radius(), 40.0);
    }

    #[test]
    fn non_finite_move_clears() {
        let mut p = PointerState::at(1.0, 1.0, 50.0);
        p.move_to(f64::NAN, 3.0);
        assert!(!p.is_active());
    }

    #[test]
    fn bad_radius_collapses_to_zero() {
        assert_eq!(PointerState::new(-5.0).radius(), 0.0);
        assert_eq!(PointerState::new(f64::INFINITY).radius(), 0.0);
    }
}
