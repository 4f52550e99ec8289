//! Straight-alpha RGBA color with CSS-style parsing.
//!
//! Colors in configs are written the way a stylesheet would write them:
//! `"#ffd700"`, `"#fff"`, `"rgba(255,215,0,0.85)"`, or a handful of names.
//! Components are stored as `f64` in [0, 1].

use crate::error::DustError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// RGBA color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Builds a color from 8-bit channels and a float alpha, as `rgba()` does.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Quantizes to four bytes, alpha included.
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }

    /// Parses `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r,g,b)`, `rgba(r,g,b,a)`,
    /// or one of `white`, `black`, `transparent`.
    pub fn parse(input: &str) -> Result<Rgba, DustError> {
        let s = input.trim();
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "white" => return Ok(Rgba::WHITE),
            "black" => return Ok(Rgba::BLACK),
            "transparent" => return Ok(Rgba::TRANSPARENT),
            _ => {}
        }
        if let Some(hex) = lower.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| DustError::InvalidColor(input.to_string()));
        }
        if let Some(body) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(body).ok_or_else(|| DustError::InvalidColor(input.to_string()));
        }
        Err(DustError::InvalidColor(input.to_string()))
    }

    /// Formats as `#rrggbb` when opaque, otherwise `rgba(r,g,b,a)`.
    pub fn to_css(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        if self.a >= 1.0 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("rgba({r},{g},{b},{})", self.a)
        }
    }
}

fn quantize(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
    match hex.len() {
        3 => Some(Rgba::from_rgba8(nibble(0)?, nibble(1)?, nibble(2)?, 1.0)),
        6 => Some(Rgba::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 1.0)),
        8 => Some(Rgba::from_rgba8(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            byte(6)? as f64 / 255.0,
        )),
        _ => None,
    }
}

fn parse_functional(body: &str) -> Option<Rgba> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |s: &str| -> Option<u8> {
        let v: f64 = s.parse().ok()?;
        v.is_finite().then(|| v.clamp(0.0, 255.0).round() as u8)
    };
    let alpha = match parts.get(3) {
        Some(s) => s.parse::<f64>().ok().filter(|a| a.is_finite())?,
        None => 1.0,
    };
    Some(Rgba::from_rgba8(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn parses_resting_gold() {
        let c = Rgba::parse("rgba(255,215,0,0.85)").unwrap();
        assert_eq!(c.to_rgba8()[..3], [255, 215, 0]);
        assert!(approx_eq(c.a, 0.85));
    }

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Rgba::parse("#ffffff").unwrap(), Rgba::WHITE);
        assert_eq!(Rgba::parse("#FFF").unwrap(), Rgba::WHITE);
        let c = Rgba::parse("#ffd70080").unwrap();
        assert_eq!(c.to_rgba8(), [255, 215, 0, 128]);
    }

    #[test]
    fn parses_rgb_with_spaces() {
        let c = Rgba::parse(" rgb( 10, 20 , 30 ) ").unwrap();
        assert_eq!(c.to_rgba8(), [10, 20, 30, 255]);
    }

    #[test]
    fn parses_names() {
        assert_eq!(Rgba::parse("White").unwrap(), Rgba::WHITE);
        assert_eq!(Rgba::parse("transparent").unwrap().a, 0.0);
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "#12", "#gggggg", "rgba(1,2)", "rgb(a,b,c)", "hsl(0,0%,0%)", "#é12"] {
            assert!(
                matches!(Rgba::parse(bad), Err(DustError::InvalidColor(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn alpha_is_clamped() {
        let c = Rgba::parse("rgba(0,0,0,3)").unwrap();
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn css_output_is_hex_when_opaque() {
        assert_eq!(Rgba::WHITE.to_css(), "#ffffff");
        assert_eq!(
            Rgba::from_rgba8(255, 215, 0, 0.25).to_css(),
            "rgba(255,215,0,0.25)"
        );
    }

    #[test]
    fn serde_uses_css_strings() {
        let c = Rgba::from_rgba8(255, 215, 0, 0.85);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"rgba(255,215,0,0.85)\"");
        let back: Rgba = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
        assert!(serde_json::from_str::<Rgba>("\"nope\"").is_err());
    }
}
