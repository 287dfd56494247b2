/// An sRGB colour.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Linear interpolation towards `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
        Self(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

/// A vertical two-stop gradient.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Gradient {
    pub bottom: Rgb,
    pub top: Rgb,
}

impl Gradient {
    /// Colour at `t`, where 0 is the bottom of the surface and 1 the top.
    pub fn at(&self, t: f32) -> Rgb {
        self.bottom.lerp(self.top, t)
    }
}

/// Axis-aligned rectangle in surface units, origin at the top-left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BarRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Fixed-size 2D drawing target for the spectrum.
pub trait Surface {
    /// `(width, height)` in surface units.
    fn size(&self) -> (f32, f32);

    fn clear(&mut self);

    fn fill_rounded_rect(&mut self, rect: BarRect, radius: f32, fill: &Gradient);
}
