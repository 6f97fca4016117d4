//! Color helpers shared by the effects and the status LED.
//!
//! Pixels are stored as 8-bit `Srgb<u8>`, the format the LED drivers consume.
//! HSV conversion goes through `palette` with hue in degrees and saturation and
//! value in the 0-255 range used by the effect tables.

use palette::{FromColor, Hsv, Srgb};

/// One LED color.
pub type Pixel = Srgb<u8>;

pub const BLACK: Pixel = Srgb::new(0, 0, 0);
pub const RED: Pixel = Srgb::new(255, 0, 0);
pub const GREEN: Pixel = Srgb::new(0, 255, 0);
pub const BLUE: Pixel = Srgb::new(0, 0, 255);
pub const YELLOW: Pixel = Srgb::new(255, 255, 0);
pub const PINK: Pixel = Srgb::new(255, 64, 128);

/// Creates a pixel from hue (degrees, wraps at 360) and 8-bit saturation and value.
#[inline]
pub fn hsv(hue: f32, saturation: u8, value: u8) -> Pixel {
    let hsv: Hsv = Hsv::new(hue, saturation as f32 / 255.0, value as f32 / 255.0);
    let rgb: Srgb = Srgb::from_color(hsv);
    rgb.into_format()
}

/// Scales every channel by `factor` (0.0-1.0), truncating toward zero.
#[inline]
pub fn scale(pixel: Pixel, factor: f32) -> Pixel {
    let factor = factor.clamp(0.0, 1.0);
    Srgb::new(
        (pixel.red as f32 * factor) as u8,
        (pixel.green as f32 * factor) as u8,
        (pixel.blue as f32 * factor) as u8,
    )
}

/// Applies an 8-bit brightness, 255 leaves the pixel unchanged.
#[inline]
pub fn dim(pixel: Pixel, brightness: u8) -> Pixel {
    let scale8 = |c: u8| ((c as u16 * (brightness as u16 + 1)) >> 8) as u8;
    Srgb::new(scale8(pixel.red), scale8(pixel.green), scale8(pixel.blue))
}

/// Linear interpolation from `from` to `to`; `ratio` is clamped to 0.0-1.0.
#[inline]
pub fn lerp(from: Pixel, to: Pixel, ratio: f32) -> Pixel {
    let ratio = ratio.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| {
        let value = a as f32 + (b as f32 - a as f32) * ratio;
        libm::roundf(value) as u8
    };
    Srgb::new(
        channel(from.red, to.red),
        channel(from.green, to.green),
        channel(from.blue, to.blue),
    )
}

/// Battery gauge color: red at 0%, yellow at 50%, green at 100%.
///
/// Each half interpolates linearly, so every channel moves monotonically
/// within a half. Percentages above 100 are clamped.
pub fn battery_color(percentage: u8) -> Pixel {
    let percentage = percentage.min(100);
    if percentage <= 50 {
        lerp(RED, YELLOW, percentage as f32 / 50.0)
    } else {
        lerp(YELLOW, GREEN, (percentage - 50) as f32 / 50.0)
    }
}

/// Integer re-mapping of `value` from one range onto another.
///
/// Returns `out_min` when the input range is empty.
#[inline]
pub fn map_range(value: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    if in_max == in_min {
        return out_min;
    }
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Clamps a float into a color channel value.
#[inline]
pub(crate) fn channel(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}
