//! CPU-side PNG rendering of a [`Scene`].
//!
//! This module is feature-gated behind `png` (default on) so that embedders
//! can depend on the scene crate without pulling in the `image` crate.
//! The pixel composition itself lives in [`crate::pixel`] (always available).

use crate::scene::Scene;
use glyph_dust_core::DustError;
use std::path::Path;

/// Writes the composed scene (particles, label, background) as a PNG.
///
/// Returns `DustError::InvalidDimensions` for an empty viewport or one whose
/// device size overflows `u32`, or `DustError::Io` on write failure.
pub fn write_png(scene: &Scene, path: &Path) -> Result<(), DustError> {
    if scene.viewport().is_degenerate() {
        return Err(DustError::InvalidDimensions);
    }
    let surface = scene.primary_surface();
    let w = u32::try_from(surface.width()).map_err(|_| DustError::InvalidDimensions)?;
    let h = u32::try_from(surface.height()).map_err(|_| DustError::InvalidDimensions)?;
    let rgba = scene.compose()?;
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| DustError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| DustError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use glyph_dust_core::Viewport;
    use std::time::Duration;

    #[test]
    fn write_png_round_trip() {
        let vp = Viewport::new(64.0, 48.0, 2.0).unwrap();
        let mut scene = Scene::new(SceneConfig::default(), vp).unwrap();
        scene.tick(Duration::ZERO).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.png");

        write_png(&scene, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 128);
        assert_eq!(img.height(), 96);
        assert!(img.pixels().any(|p| p.0[0] > 0));
    }

    #[test]
    fn empty_scene_is_not_written() {
        let vp = Viewport::new(0.0, 48.0, 1.0).unwrap();
        let scene = Scene::new(SceneConfig::default(), vp).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        assert!(matches!(
            write_png(&scene, &path),
            Err(DustError::InvalidDimensions)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let vp = Viewport::new(16.0, 16.0, 1.0).unwrap();
        let scene = Scene::new(SceneConfig::default(), vp).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        assert!(matches!(write_png(&scene, &path), Err(DustError::Io(_))));
    }
}
