//! Unit conversions between Virtual Satellite JSON and the host document.
//!
//! JSON carries meters, radians and 24-bit RGB. Documents carry millimetres,
//! degrees and 32-bit RGBA.

/// Meters to millimetres.
pub const M_TO_MM: f64 = 1000.0;

/// Largest color value representable in 24-bit RGB.
pub const RGB_MAX: u32 = 0x00FF_FFFF;

pub fn meters_to_mm(meters: f64) -> f64 {
    meters * M_TO_MM
}

pub fn mm_to_meters(mm: f64) -> f64 {
    mm / M_TO_MM
}

pub fn radians_to_degrees(radians: f64) -> f64 {
    radians.to_degrees()
}

pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Pack 24-bit RGB into RGBA with a zero alpha channel.
pub const fn rgb_to_rgba(rgb: u32) -> u32 {
    rgb << 8
}

/// Drop the alpha channel of a packed RGBA color.
pub const fn rgba_to_rgb(rgba: u32) -> u32 {
    rgba >> 8
}
