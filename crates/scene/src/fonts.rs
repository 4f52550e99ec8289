//! Font readiness hook run before the first sampling pass.

use glyph_dust_core::DustError;
use tracing::debug;

/// Something that can block until the fonts used for sampling are loaded.
///
/// The built-in bitmap font is always available; embedders that swap in
/// their own glyph source can use this to delay start-up until it is ready.
pub trait FontReadiness {
    fn wait_until_ready(&self) -> Result<(), DustError>;
}

/// Readiness that is always satisfied.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFont;

impl FontReadiness for BuiltinFont {
    fn wait_until_ready(&self) -> Result<(), DustError> {
        Ok(())
    }
}

/// Waits on `fonts` if present. A failure is logged and otherwise ignored,
/// so start-up always proceeds.
pub(crate) fn await_fonts(fonts: Option<&dyn FontReadiness>) {
    if let Some(fonts) = fonts {
        if let Err(error) = fonts.wait_until_ready() {
            debug!(%error, "font readiness failed, sampling with fallback glyphs");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counting<'a> {
        calls: &'a Cell<u32>,
        fail: bool,
    }

    impl FontReadiness for Counting<'_> {
        fn wait_until_ready(&self) -> Result<(), DustError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(DustError::Io("font load failed".into()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn readiness_is_awaited_once() {
        let calls = Cell::new(0);
        await_fonts(Some(&Counting { calls: &calls, fail: false }));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn failures_are_swallowed() {
        let calls = Cell::new(0);
        await_fonts(Some(&Counting { calls: &calls, fail: true }));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn builtin_font_is_ready() {
        assert!(BuiltinFont.wait_until_ready().is_ok());
        await_fonts(None);
    }
}
