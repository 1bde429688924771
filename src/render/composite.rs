use crate::foundation::error::{PrismError, PrismResult};
use crate::foundation::math::{mul_div255_u8, mul_div255_u16};
use crate::render::surface::CompositeMode;

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over with an extra opacity multiplier.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Porter-Duff source-atop: source shows only where the destination has coverage, and the
/// destination alpha is preserved.
pub fn atop(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let da = u16::from(dst[3]);
    if da == 0 {
        return dst;
    }
    if src[3] == 0 {
        return dst;
    }

    let inv_sa = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..3 {
        let sc = mul_div255_u16(u16::from(src[i]), da);
        let dc = mul_div255_u16(u16::from(dst[i]), inv_sa);
        out[i] = (sc + dc).min(da) as u8;
    }
    out[3] = dst[3];
    out
}

/// Blend one premultiplied pixel according to `mode`.
pub fn blend(dst: PremulRgba8, src: PremulRgba8, mode: CompositeMode) -> PremulRgba8 {
    match mode {
        CompositeMode::SourceOver => over(dst, src, 1.0),
        CompositeMode::SourceAtop => atop(dst, src),
        CompositeMode::Copy => src,
    }
}

/// Composite a full premultiplied RGBA8 layer onto `dst` in place.
pub fn composite_in_place(dst: &mut [u8], src: &[u8], mode: CompositeMode) -> PrismResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(PrismError::render(
            "composite_in_place expects equal-length rgba8 buffers",
        ));
    }
    if mode == CompositeMode::Copy {
        dst.copy_from_slice(src);
        return Ok(());
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = blend([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], mode);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Flatten premultiplied RGBA8 over an opaque background color (straight RGB).
pub fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> PrismResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(PrismError::render(
            "flatten_premul_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = u16::from(bg_rgba[0]);
    let bg_g = u16::from(bg_rgba[1]);
    let bg_b = u16::from(bg_rgba[2]);

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        d[0] = (u16::from(s[0]) + mul_div255_u16(bg_r, inv)).min(255) as u8;
        d[1] = (u16::from(s[1]) + mul_div255_u16(bg_g, inv)).min(255) as u8;
        d[2] = (u16::from(s[2]) + mul_div255_u16(bg_b, inv)).min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u8(x, y)
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
