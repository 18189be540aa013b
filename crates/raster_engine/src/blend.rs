use crate::{BitDepth, Pixel};

/// Source-over compositing of `src` onto `dst`.
///
/// `opacity` scales the source alpha and is given in the channel scale of `depth`
/// (`0..=255` or `0..=65535`). With `sa` the scaled source alpha and `da` the
/// destination alpha (both `0.0..=1.0`):
///
/// ```text
/// na      = sa + da - sa * da
/// channel = (src * sa + dst * da * (1 - sa)) / na
/// ```
///
/// A result alpha of zero yields [`Pixel::TRANSPARENT`].
pub fn composite_over(src: Pixel, dst: Pixel, opacity: u32, depth: BitDepth) -> Pixel {
    let max = f64::from(depth.max_value());
    let (sa, da, na) = blend_alphas(src.a, dst.a, opacity, depth);

    let alpha = (na * max + 0.5) as u16;
    if alpha == 0 {
        return Pixel::TRANSPARENT;
    }

    let da = da * (1.0 - sa);
    let inv = 1.0 / na;
    let mix = |s: u16, d: u16| -> u16 { ((f64::from(s) * sa + f64::from(d) * da) * inv + 0.5).min(max) as u16 };

    Pixel::new(mix(src.r, dst.r), mix(src.g, dst.g), mix(src.b, dst.b), alpha)
}

/// Like [`composite_over`], but only the alpha channel of `dst` changes.
pub fn composite_alpha(src: Pixel, dst: Pixel, opacity: u32, depth: BitDepth) -> Pixel {
    let max = f64::from(depth.max_value());
    let (_, _, na) = blend_alphas(src.a, dst.a, opacity, depth);
    Pixel { a: (na * max + 0.5) as u16, ..dst }
}

fn blend_alphas(src_alpha: u16, dst_alpha: u16, opacity: u32, depth: BitDepth) -> (f64, f64, f64) {
    let max = u64::from(depth.max_value());
    let scaled = u64::from(src_alpha) * u64::from(opacity) / max;
    let sa = scaled as f64 / max as f64;
    let da = f64::from(dst_alpha) / max as f64;
    (sa, da, sa + da - sa * da)
}
