//! Packed ARGB colour values
//!
//! A [`Colour`] carries four independent 8-bit channels. Drawing operations
//! take the packed `0xAARRGGBB` form; convert with [`Colour::to_u32`] or `into()`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColourError {
    #[error("colour string is empty")]
    Empty,
    #[error("colour string '{0}' must have 3, 6 or 8 hex digits")]
    BadLength(String),
    #[error("colour string '{0}' contains a non-hex digit")]
    BadDigit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    pub alpha: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const BLACK: Colour = Colour::rgb(0, 0, 0);
    pub const WHITE: Colour = Colour::rgb(255, 255, 255);
    pub const RED: Colour = Colour::rgb(255, 0, 0);
    pub const GREEN: Colour = Colour::rgb(0, 255, 0);
    pub const BLUE: Colour = Colour::rgb(0, 0, 255);
    pub const TRANSPARENT: Colour = Colour::argb(0, 0, 0, 0);

    /// Opaque colour
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::argb(255, r, g, b)
    }

    pub const fn argb(alpha: u8, r: u8, g: u8, b: u8) -> Self {
        Self { alpha, r, g, b }
    }

    pub const fn from_u32(c: u32) -> Self {
        Self {
            alpha: (c >> 24) as u8,
            r: (c >> 16) as u8,
            g: (c >> 8) as u8,
            b: c as u8,
        }
    }

    /// Pack as `0xAARRGGBB`
    pub const fn to_u32(self) -> u32 {
        ((self.alpha as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self { alpha, ..self }
    }

    /// Parse `#rgb`, `#rrggbb` or `#aarrggbb` (the leading `#` is optional).
    /// Forms without an alpha component are opaque.
    pub fn from_hex(s: &str) -> Result<Self, ParseColourError> {
        let digits = s.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if digits.is_empty() {
            return Err(ParseColourError::Empty);
        }
        if !matches!(digits.len(), 3 | 6 | 8) {
            return Err(ParseColourError::BadLength(s.to_string()));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColourError::BadDigit(s.to_string()));
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| ParseColourError::BadDigit(s.to_string()))?;

        match digits.len() {
            3 => {
                // Each nibble doubles: #abc -> #aabbcc
                let expand = |n: u32| ((n & 0xf) * 0x11) as u8;
                Ok(Self::rgb(expand(value >> 8), expand(value >> 4), expand(value)))
            },
            6 => Ok(Self::from_u32(0xff00_0000 | value)),
            _ => Ok(Self::from_u32(value)),
        }
    }

    /// Format as `#rrggbb`; alpha is not represented
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Hue, saturation and brightness, each in `[0, 1]`
    pub fn to_hsb(&self) -> (f64, f64, f64) {
        let (r, g, b) = (i32::from(self.r), i32::from(self.g), i32::from(self.b));
        let cmax = r.max(g).max(b);
        let cmin = r.min(g).min(b);

        let brightness = cmax as f64 / 255.0;
        let saturation = if cmax != 0 {
            (cmax - cmin) as f64 / cmax as f64
        } else {
            0.0
        };

        if saturation == 0.0 {
            return (0.0, saturation, brightness);
        }

        let span = (cmax - cmin) as f64;
        let redc = (cmax - r) as f64 / span;
        let greenc = (cmax - g) as f64 / span;
        let bluec = (cmax - b) as f64 / span;

        let mut hue = if r == cmax {
            bluec - greenc
        } else if g == cmax {
            2.0 + redc - bluec
        } else {
            4.0 + greenc - redc
        } / 6.0;
        if hue < 0.0 {
            hue += 1.0;
        }

        (hue, saturation, brightness)
    }

    /// Build an opaque colour from hue, saturation and brightness.
    /// Hue wraps; saturation and brightness are clamped to `[0, 1]`.
    pub fn from_hsb(hue: f64, saturation: f64, brightness: f64) -> Self {
        let saturation = saturation.clamp(0.0, 1.0);
        let brightness = brightness.clamp(0.0, 1.0);
        let to_byte = |v: f64| (v * 255.0 + 0.5) as u8;

        if saturation <= 0.0 {
            let v = to_byte(brightness);
            return Self::rgb(v, v, v);
        }

        let h = (hue - hue.floor()) * 6.0;
        let f = h - h.floor();
        let p = brightness * (1.0 - saturation);
        let q = brightness * (1.0 - saturation * f);
        let t = brightness * (1.0 - saturation * (1.0 - f));

        let (r, g, b) = match h as i32 {
            0 => (brightness, t, p),
            1 => (q, brightness, p),
            2 => (p, brightness, t),
            3 => (p, q, brightness),
            4 => (t, p, brightness),
            _ => (brightness, p, q),
        };

        Self::rgb(to_byte(r), to_byte(g), to_byte(b))
    }
}

impl Default for Colour {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<u32> for Colour {
    fn from(c: u32) -> Self {
        Self::from_u32(c)
    }
}

impl From<Colour> for u32 {
    fn from(c: Colour) -> Self {
        c.to_u32()
    }
}

impl FromStr for Colour {
    type Err = ParseColourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alpha == 255 {
            f.write_str(&self.to_hex())
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.alpha, self.r, self.g, self.b)
        }
    }
}

impl TryFrom<String> for Colour {
    type Error = ParseColourError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<Colour> for String {
    fn from(c: Colour) -> Self {
        c.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_six_digits() {
        let c = Colour::from_hex("#110230").unwrap();
        assert_eq!((c.r, c.g, c.b, c.alpha), (0x11, 0x02, 0x30, 255));
        assert_eq!(c.to_hex(), "#110230");
    }

    #[test]
    fn test_hex_three_digits_expand() {
        let c: Colour = "#abc".parse().unwrap();
        assert_eq!((c.r, c.g, c.b), (0xaa, 0xbb, 0xcc));
        assert_eq!(c.to_hex(), "#aabbcc");
    }

    #[test]
    fn test_hex_with_alpha() {
        let c = Colour::from_hex("80ff0000").unwrap();
        assert_eq!(c, Colour::argb(0x80, 0xff, 0, 0));
        assert_eq!(c.to_string(), "#80ff0000");
    }

    #[test]
    fn test_hex_rejects_garbage() {
        assert_eq!(Colour::from_hex(""), Err(ParseColourError::Empty));
        assert!(matches!(Colour::from_hex("#12345"), Err(ParseColourError::BadLength(_))));
        assert!(matches!(Colour::from_hex("#zzzzzz"), Err(ParseColourError::BadDigit(_))));
    }

    #[test]
    fn test_packed_layout() {
        let c = Colour::argb(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.to_u32(), 0x12345678);
        assert_eq!(Colour::from(0x12345678u32), c);
        let packed: u32 = Colour::WHITE.into();
        assert_eq!(packed, 0xffffffff);
    }

    #[test]
    fn test_hsb_primaries() {
        assert_eq!(Colour::RED.to_hsb(), (0.0, 1.0, 1.0));
        let (h, s, b) = Colour::GREEN.to_hsb();
        assert!((h - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!((s, b), (1.0, 1.0));
        assert_eq!(Colour::from_hsb(0.0, 1.0, 1.0), Colour::RED);
        assert_eq!(Colour::from_hsb(2.0 / 3.0, 1.0, 1.0), Colour::BLUE);
    }

    #[test]
    fn test_hsb_grey_has_no_saturation() {
        let grey = Colour::rgb(128, 128, 128);
        let (h, s, b) = grey.to_hsb();
        assert_eq!((h, s), (0.0, 0.0));
        assert_eq!(Colour::from_hsb(h, s, b), grey);
    }

    #[test]
    fn test_hsb_round_trip_close() {
        let c = Colour::rgb(200, 120, 40);
        let (h, s, b) = c.to_hsb();
        let back = Colour::from_hsb(h, s, b);
        assert!((i32::from(back.r) - 200).abs() <= 1);
        assert!((i32::from(back.g) - 120).abs() <= 1);
        assert!((i32::from(back.b) - 40).abs() <= 1);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Colour::rgb(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let c: Colour = serde_json::from_str("\"#fff\"").unwrap();
        assert_eq!(c, Colour::WHITE);
        assert!(serde_json::from_str::<Colour>("\"nope\"").is_err());
    }
}
