//! Colors in RGBA space with HSL based derivation helpers

use crate::error::{CompilerError, Result};
use crate::utils::format_number;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: f64,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 1.0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 1.0 };
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0.0 };

    pub fn rgb(r: i32, g: i32, b: i32) -> Result<Self> {
        Self::rgba(r, g, b, 1.0)
    }

    pub fn rgba(r: i32, g: i32, b: i32, a: f64) -> Result<Self> {
        Ok(Self {
            r: channel("red", r)?,
            g: channel("green", g)?,
            b: channel("blue", b)?,
            a: alpha(a)?,
        })
    }

    /// Hue in degrees [0, 360], saturation and lightness in percent [0, 100]
    pub fn hsl(hue: f64, saturation: f64, lightness: f64) -> Result<Self> {
        Self::hsla(hue, saturation, lightness, 1.0)
    }

    pub fn hsla(hue: f64, saturation: f64, lightness: f64, a: f64) -> Result<Self> {
        in_range("hue", hue, 0.0, 360.0)?;
        in_range("saturation", saturation, 0.0, 100.0)?;
        in_range("lightness", lightness, 0.0, 100.0)?;
        let (r, g, b) = hsl_to_rgb(hue, saturation, lightness);
        Ok(Self { r, g, b, a: alpha(a)? })
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` notation
    pub fn hex(code: &str) -> Result<Self> {
        let digits = code.trim().trim_start_matches('#');

        let expanded = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 | 8 => digits.to_string(),
            _ => {
                return Err(CompilerError::value(format!(
                    "Invalid color code '{}' (expected 3, 6 or 8 hex digits)",
                    code
                )))
            }
        };

        let bytes = hex::decode(&expanded)
            .map_err(|e| CompilerError::value(format!("Invalid color code '{}': {}", code, e)))?;

        let a = match bytes.get(3) {
            Some(&alpha) => f64::from(alpha) / 255.0,
            None => 1.0,
        };

        Ok(Self {
            r: bytes[0],
            g: bytes[1],
            b: bytes[2],
            a: (a * 1000.0).round() / 1000.0,
        })
    }

    pub fn red(&self) -> u8 {
        self.r
    }

    pub fn green(&self) -> u8 {
        self.g
    }

    pub fn blue(&self) -> u8 {
        self.b
    }

    pub fn alpha(&self) -> f64 {
        self.a
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 1.0
    }

    /// Hue (degrees), saturation and lightness (percent)
    pub fn to_hsl(&self) -> (f64, f64, f64) {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let diff = max - min;
        let lightness = (max + min) / 2.0;

        if diff == 0.0 {
            return (0.0, 0.0, lightness * 100.0);
        }

        let saturation = if lightness < 0.5 {
            diff / (max + min)
        } else {
            diff / (2.0 - max - min)
        };

        let mut hue = if max == r {
            60.0 * (g - b) / diff
        } else if max == g {
            60.0 * (b - r) / diff + 120.0
        } else {
            60.0 * (r - g) / diff + 240.0
        };
        if hue < 0.0 {
            hue += 360.0;
        }

        (hue, saturation * 100.0, lightness * 100.0)
    }

    fn with_hsl(&self, hue: f64, saturation: f64, lightness: f64) -> Self {
        let hue = hue.rem_euclid(360.0);
        let (r, g, b) = hsl_to_rgb(hue, saturation.clamp(0.0, 100.0), lightness.clamp(0.0, 100.0));
        Self { r, g, b, a: self.a }
    }

    pub fn lighten(&self, amount: f64) -> Self {
        let (h, s, l) = self.to_hsl();
        self.with_hsl(h, s, l + amount)
    }

    pub fn darken(&self, amount: f64) -> Self {
        self.lighten(-amount)
    }

    pub fn saturate(&self, amount: f64) -> Self {
        let (h, s, l) = self.to_hsl();
        self.with_hsl(h, s + amount, l)
    }

    pub fn desaturate(&self, amount: f64) -> Self {
        self.saturate(-amount)
    }

    pub fn adjust_hue(&self, degrees: f64) -> Self {
        let (h, s, l) = self.to_hsl();
        self.with_hsl(h + degrees, s, l)
    }

    pub fn grayscale(&self) -> Self {
        self.desaturate(100.0)
    }

    pub fn complement(&self) -> Self {
        self.adjust_hue(180.0)
    }

    /// Shift alpha by `amount`, clamped into [0, 1]
    pub fn opacify(&self, amount: f64) -> Self {
        Self {
            a: (self.a + amount).clamp(0.0, 1.0),
            ..*self
        }
    }

    pub fn with_alpha(&self, a: f64) -> Result<Self> {
        Ok(Self { a: alpha(a)?, ..*self })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{}", hex::encode([self.r, self.g, self.b]))
        } else {
            write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, format_number(self.a))
        }
    }
}

fn channel(name: &str, value: i32) -> Result<u8> {
    u8::try_from(value)
        .map_err(|_| CompilerError::value(format!("Color {} channel {} must be between 0 and 255", name, value)))
}

fn alpha(value: f64) -> Result<f64> {
    in_range("alpha", value, 0.0, 1.0)?;
    Ok(value)
}

fn in_range(name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && min <= value && value <= max {
        Ok(())
    } else {
        Err(CompilerError::value(format!(
            "Color {} {} must be between {} and {}",
            name, value, min, max
        )))
    }
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let s = saturation / 100.0;
    let l = lightness / 100.0;

    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let sector = (hue % 360.0) / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let m = l - chroma / 2.0;

    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r), to_byte(g), to_byte(b))
}
