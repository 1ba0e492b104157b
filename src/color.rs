//! Packed RGBA8 color helpers used when interpolating vertex colors.
//!
//! Colors are stored as `0xRRGGBBAA` in a single `u32`.

/// Pack normalized float channels into a `0xRRGGBBAA` value.
///
/// Channels are clamped to `[0, 1]` before quantization.
pub fn pack_color(r: f32, g: f32, b: f32, a: f32) -> u32 {
    let q = |c: f32| (c.max(0.0).min(1.0) * 255.0 + 0.5) as u32;
    (q(r) << 24) | (q(g) << 16) | (q(b) << 8) | q(a)
}

/// Unpack a `0xRRGGBBAA` value into normalized float channels.
pub fn unpack_color(color: u32) -> (f32, f32, f32, f32) {
    let c = |shift: u32| ((color >> shift) & 0xFF) as f32 / 255.0;
    (c(24), c(16), c(8), c(0))
}

/// Interpolate two packed colors channel by channel.
///
/// Endpoints are returned unchanged so `t == 0` and `t == 1` reproduce the
/// source bits exactly.
pub fn lerp_color(a: u32, b: u32, t: f32) -> u32 {
    if t <= 0.0 || a == b {
        return a;
    }
    if t >= 1.0 {
        return b;
    }
    let (r0, g0, b0, a0) = unpack_color(a);
    let (r1, g1, b1, a1) = unpack_color(b);
    pack_color(
        r0 + (r1 - r0) * t,
        g0 + (g1 - g0) * t,
        b0 + (b1 - b0) * t,
        a0 + (a1 - a0) * t,
    )
}
