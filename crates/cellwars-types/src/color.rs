//! HSV cell color with cyclic hue arithmetic.
//!
//! A cell's hue doubles as its genetic signature: kinship between two cells
//! is decided by the circular distance between their hues (see
//! [`hue_distance`]). Saturation and value only affect display; a corpse is
//! drawn desaturated and dark.
//!
//! Hue is normalized into `[0, 360)` on every write, so every read returns a
//! canonical value. Operations that combine two colors clamp saturation and
//! value into `[0, 1]`.

use core::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Size of the hue ring in degrees.
pub const HUE_RANGE: f64 = 360.0;

/// Half of the hue ring; the largest possible hue distance.
const HALF_RANGE: f64 = 180.0;

/// Width of one sector of the HSV color wheel in degrees.
const SECTOR_WIDTH: f64 = 60.0;

/// An 8-bit-per-channel display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Build a color from its three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);
}

/// Hue/saturation/value color carried by every cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellColor {
    /// Hue in degrees, always in `[0, 360)`.
    hue: f64,
    /// Saturation in `[0, 1]`.
    saturation: f64,
    /// Value (brightness) in `[0, 1]`.
    value: f64,
}

impl CellColor {
    /// Create a color, normalizing the hue and clamping saturation/value.
    pub fn new(hue: f64, saturation: f64, value: f64) -> Self {
        Self {
            hue: normalize_hue(hue),
            saturation: clamp_unit(saturation),
            value: clamp_unit(value),
        }
    }

    /// Fully saturated, fully bright color of the given hue.
    pub fn from_hue(hue: f64) -> Self {
        Self::new(hue, 1.0, 1.0)
    }

    /// The neutral color of an empty grid slot.
    pub const fn white() -> Self {
        Self {
            hue: 0.0,
            saturation: 0.0,
            value: 1.0,
        }
    }

    /// Hue in degrees, in `[0, 360)`.
    pub const fn hue(&self) -> f64 {
        self.hue
    }

    /// Saturation in `[0, 1]`.
    pub const fn saturation(&self) -> f64 {
        self.saturation
    }

    /// Value (brightness) in `[0, 1]`.
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Set the hue; any real value is wrapped onto the hue ring.
    pub fn set_hue(&mut self, hue: f64) {
        self.hue = normalize_hue(hue);
    }

    /// Set saturation, clamped into `[0, 1]`.
    pub fn set_saturation(&mut self, saturation: f64) {
        self.saturation = clamp_unit(saturation);
    }

    /// Set value, clamped into `[0, 1]`.
    pub fn set_value(&mut self, value: f64) {
        self.value = clamp_unit(value);
    }

    /// Restore full saturation and brightness, keeping the hue.
    pub const fn brighten(&mut self) {
        self.saturation = 1.0;
        self.value = 1.0;
    }

    /// Set saturation and value to the same low tint (corpse appearance).
    pub fn desaturate(&mut self, tint: f64) {
        self.set_saturation(tint);
        self.set_value(tint);
    }

    /// Midpoint of two colors: arithmetic mean of the hues (wrapped) and of
    /// saturation/value (clamped).
    pub fn blend(a: &Self, b: &Self) -> Self {
        Self::new(
            (a.hue + b.hue) / 2.0,
            (a.saturation + b.saturation) / 2.0,
            (a.value + b.value) / 2.0,
        )
    }

    /// Nudge the hue by `step` degrees toward `other`'s hue.
    ///
    /// The direction is decided by plain comparison of the two hues, not by
    /// the shorter way around the ring.
    pub fn shift_towards(&mut self, other: &Self, step: f64) {
        if other.hue > self.hue {
            self.set_hue(self.hue + step);
        } else {
            self.set_hue(self.hue - step);
        }
    }

    /// Display color via the 6-sector HSV to RGB conversion.
    pub fn to_rgb(&self) -> Rgb {
        let scaled = self.hue / SECTOR_WIDTH;
        let floor = scaled.floor();
        let fraction = scaled - floor;
        let value = self.value * 255.0;

        let v = to_channel(value);
        let p = to_channel(value * (1.0 - self.saturation));
        let q = to_channel(value * (1.0 - fraction * self.saturation));
        let t = to_channel(value * (1.0 - (1.0 - fraction) * self.saturation));

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let sector = floor.rem_euclid(6.0) as u32;
        match sector {
            0 => Rgb::new(v, t, p),
            1 => Rgb::new(q, v, p),
            2 => Rgb::new(p, v, t),
            3 => Rgb::new(p, q, v),
            4 => Rgb::new(t, p, v),
            _ => Rgb::new(v, p, q),
        }
    }

    /// Recover hue/saturation/value from a display color using the
    /// conventional max/min channel formula.
    pub fn from_rgb(rgb: Rgb) -> Self {
        let r = f64::from(rgb.r) / 255.0;
        let g = f64::from(rgb.g) / 255.0;
        let b = f64::from(rgb.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let hue = if delta <= f64::EPSILON {
            0.0
        } else if r >= g && r >= b {
            SECTOR_WIDTH * ((g - b) / delta).rem_euclid(6.0)
        } else if g >= b {
            SECTOR_WIDTH * ((b - r) / delta + 2.0)
        } else {
            SECTOR_WIDTH * ((r - g) / delta + 4.0)
        };
        let saturation = if max <= f64::EPSILON { 0.0 } else { delta / max };

        Self::new(hue, saturation, max)
    }
}

impl Default for CellColor {
    fn default() -> Self {
        Self::white()
    }
}

impl Add for CellColor {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.hue + rhs.hue,
            self.saturation + rhs.saturation,
            self.value + rhs.value,
        )
    }
}

impl Sub for CellColor {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.hue - rhs.hue,
            self.saturation - rhs.saturation,
            self.value - rhs.value,
        )
    }
}

/// Circular distance between two hues on the 360-degree ring.
///
/// Always in `[0, 180]`, symmetric, and zero iff the hues coincide modulo 360.
pub fn hue_distance(a: &CellColor, b: &CellColor) -> f64 {
    HALF_RANGE - (((a.hue - b.hue).abs() % HUE_RANGE) - HALF_RANGE).abs()
}

/// Wrap any real hue onto `[0, 360)`.
fn normalize_hue(hue: f64) -> f64 {
    if !hue.is_finite() {
        return 0.0;
    }
    let wrapped = hue.rem_euclid(HUE_RANGE);
    // rem_euclid of a tiny negative value rounds up to exactly 360.
    if wrapped >= HUE_RANGE { 0.0 } else { wrapped }
}

fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(x: f64) -> u8 {
    x.round().clamp(0.0, 255.0) as u8
}
