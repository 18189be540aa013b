use super::util::{cmyk_to_rgb16, cmyk_to_rgb8, read16, write16};
use super::{ConvertFlags, ConvertParams, OutputKind};

/// Writes an 8-bit gray value as gray, RGB or RGBA; returns the next write offset.
#[inline]
fn put_gray8(dst: &mut [u8], at: usize, c: u8, output: OutputKind) -> usize {
    match output {
        OutputKind::None => {
            dst[at] = c;
            at + 1
        }
        OutputKind::Rgb => {
            dst[at..at + 3].fill(c);
            at + 3
        }
        OutputKind::Rgba => {
            dst[at..at + 3].fill(c);
            dst[at + 3] = 255;
            at + 4
        }
    }
}

/// Same as [`put_gray8`] for 16-bit samples; offsets count samples.
#[inline]
fn put_gray16(dst: &mut [u8], at: usize, c: u16, output: OutputKind) -> usize {
    match output {
        OutputKind::None => {
            write16(dst, at, c);
            at + 1
        }
        OutputKind::Rgb | OutputKind::Rgba => {
            write16(dst, at, c);
            write16(dst, at + 1, c);
            write16(dst, at + 2, c);
            if output == OutputKind::Rgba {
                write16(dst, at + 3, 0xFFFF);
                at + 4
            } else {
                at + 3
            }
        }
    }
}

/// Gray 1/2/4/8 bit -> gray/RGB/RGBA 8 bit.
pub(super) fn gray_1_2_4_8(p: &ConvertParams<'_>, bits: u8, src: &[u8], dst: &mut [u8]) {
    let reverse = p.has(ConvertFlags::REVERSE);

    if p.output == OutputKind::None && bits == 8 && !reverse {
        dst[..p.width].copy_from_slice(&src[..p.width]);
        return;
    }

    let bits = i32::from(bits);
    let mask = (1u32 << bits) - 1;
    let mul = if bits == 1 { 255 } else { 255 / mask };
    let mut shift = 8 - bits;
    let mut si = 0;
    let mut di = 0;

    for _ in 0..p.width {
        let mut c = (u32::from(src[si]) >> shift) & mask;
        if reverse {
            c = mask - c;
        }
        di = put_gray8(dst, di, (c * mul) as u8, p.output);

        shift -= bits;
        if shift < 0 {
            shift = 8 - bits;
            si += 1;
        }
    }
}

/// Gray 16 bit -> gray/RGB/RGBA 8/16 bit.
pub(super) fn gray16(p: &ConvertParams<'_>, _bits: u8, src: &[u8], dst: &mut [u8]) {
    let reverse = p.has(ConvertFlags::REVERSE);
    let to8bit = p.to_8bit();

    if p.output == OutputKind::None && !to8bit && !reverse {
        dst[..p.width * 2].copy_from_slice(&src[..p.width * 2]);
        return;
    }

    let mut di = 0;
    for i in 0..p.width {
        let mut c = read16(src, i);
        if reverse {
            c = 0xFFFF - c;
        }

        di = if to8bit {
            put_gray8(dst, di, (c >> 8) as u8, p.output)
        } else {
            put_gray16(dst, di, c, p.output)
        };
    }
}

/// Palette 1/2/4/8 bit -> index/RGB/RGBA 8 bit.
pub(super) fn palette_1_2_4_8(p: &ConvertParams<'_>, bits: u8, src: &[u8], dst: &mut [u8]) {
    if p.output == OutputKind::None && bits == 8 {
        dst[..p.width].copy_from_slice(&src[..p.width]);
        return;
    }

    debug_assert!(p.output == OutputKind::None || p.palette.is_some(), "palette conversion without palette");
    let palette = p.palette.unwrap_or_default();

    let bits = i32::from(bits);
    let mask = ((1u16 << bits) - 1) as u8;
    let mut shift = 8 - bits;
    let mut si = 0;
    let mut di = 0;

    for _ in 0..p.width {
        let c = (src[si] >> shift) & mask;

        match p.output {
            OutputKind::None => {
                dst[di] = c;
                di += 1;
            }
            OutputKind::Rgb => {
                let entry = usize::from(c) * 4;
                dst[di..di + 3].copy_from_slice(&palette[entry..entry + 3]);
                di += 3;
            }
            OutputKind::Rgba => {
                let entry = usize::from(c) * 4;
                dst[di..di + 4].copy_from_slice(&palette[entry..entry + 4]);
                di += 4;
            }
        }

        shift -= bits;
        if shift < 0 {
            shift = 8 - bits;
            si += 1;
        }
    }
}

/// RGB555 (16 bit, top bit optionally alpha) -> RGB/RGBA 8 bit.
pub(super) fn rgb555(p: &ConvertParams<'_>, _bits: u8, src: &[u8], dst: &mut [u8]) {
    let src_alpha = p.has(ConvertFlags::SRC_ALPHA);
    let dst_alpha = p.output == OutputKind::Rgba || (p.output == OutputKind::None && src_alpha);

    let mut di = 0;
    for i in 0..p.width {
        let c = read16(src, i);
        let channel = |v: u16| ((v & 31) << 3).min(255) as u8;

        dst[di] = channel(c >> 10);
        dst[di + 1] = channel(c >> 5);
        dst[di + 2] = channel(c);

        if dst_alpha {
            dst[di + 3] = if !src_alpha || c & 0x8000 != 0 { 255 } else { 0 };
            di += 4;
        } else {
            di += 3;
        }
    }
}

/// RGB/BGR 8 bit -> RGB/RGBA 8 bit.
pub(super) fn rgb8(p: &ConvertParams<'_>, _bits: u8, src: &[u8], dst: &mut [u8]) {
    let is_bgr = p.has(ConvertFlags::SRC_BGR_ORDER);
    let dst_alpha = p.output == OutputKind::Rgba;

    if !dst_alpha && !is_bgr {
        dst[..p.width * 3].copy_from_slice(&src[..p.width * 3]);
        return;
    }

    let step = if dst_alpha { 4 } else { 3 };
    for (ps, pd) in src.chunks_exact(3).zip(dst.chunks_exact_mut(step)).take(p.width) {
        copy_rgb(ps, pd, is_bgr);
        if dst_alpha {
            pd[3] = 255;
        }
    }
}

/// RGBA/BGRA 8 bit -> RGB/RGBA 8 bit.
///
/// With [`ConvertFlags::INVALID_ALPHA`] and [`OutputKind::None`] the row is written
/// as 3-byte RGB.
pub(super) fn rgba8(p: &ConvertParams<'_>, _bits: u8, src: &[u8], dst: &mut [u8]) {
    let is_bgr = p.has(ConvertFlags::SRC_BGR_ORDER);
    let invalid_alpha = p.has(ConvertFlags::INVALID_ALPHA);
    let dst_alpha = p.output == OutputKind::Rgba || (p.output == OutputKind::None && !invalid_alpha);

    if dst_alpha && !is_bgr && !invalid_alpha {
        dst[..p.width * 4].copy_from_slice(&src[..p.width * 4]);
        return;
    }

    let step = if dst_alpha { 4 } else { 3 };
    for (ps, pd) in src.chunks_exact(4).zip(dst.chunks_exact_mut(step)).take(p.width) {
        copy_rgb(ps, pd, is_bgr);
        if dst_alpha {
            pd[3] = if invalid_alpha { 255 } else { ps[3] };
        }
    }
}

#[inline]
fn copy_rgb(ps: &[u8], pd: &mut [u8], is_bgr: bool) {
    if is_bgr {
        pd[0] = ps[2];
        pd[1] = ps[1];
        pd[2] = ps[0];
    } else {
        pd[..3].copy_from_slice(&ps[..3]);
    }
}

/// RGB/RGBA 16 bit -> RGB/RGBA 8/16 bit.
pub(super) fn rgb_rgba16(p: &ConvertParams<'_>, _bits: u8, src: &[u8], dst: &mut [u8]) {
    let dst_alpha = p.output == OutputKind::Rgba;
    let src_alpha = p.has(ConvertFlags::SRC_ALPHA);
    let to8bit = p.to_8bit();
    let src_step = if src_alpha { 4 } else { 3 };
    let dst_step = if dst_alpha { 4 } else { 3 };

    for i in 0..p.width {
        let si = i * src_step;
        let rgb = [read16(src, si), read16(src, si + 1), read16(src, si + 2)];
        let a = if src_alpha { read16(src, si + 3) } else { 0xFFFF };
        let di = i * dst_step;

        if to8bit {
            for (n, v) in rgb.into_iter().enumerate() {
                dst[di + n] = (v >> 8) as u8;
            }
            if dst_alpha {
                dst[di + 3] = (a >> 8) as u8;
            }
        } else {
            for (n, v) in rgb.into_iter().enumerate() {
                write16(dst, di + n, v);
            }
            if dst_alpha {
                write16(dst, di + 3, a);
            }
        }
    }
}

/// CMYK 8 bit -> CMYK/RGB/RGBA 8 bit. CMYK carries no alpha.
pub(super) fn cmyk8(p: &ConvertParams<'_>, _bits: u8, src: &[u8], dst: &mut [u8]) {
    let reverse = p.has(ConvertFlags::REVERSE);
    let len = p.width * 4;

    if p.output == OutputKind::None {
        if reverse {
            for (d, s) in dst[..len].iter_mut().zip(&src[..len]) {
                *d = 255 - *s;
            }
        } else {
            dst[..len].copy_from_slice(&src[..len]);
        }
        return;
    }

    let dst_alpha = p.output == OutputKind::Rgba;
    let step = if dst_alpha { 4 } else { 3 };

    for (ps, pd) in src.chunks_exact(4).zip(dst.chunks_exact_mut(step)).take(p.width) {
        let mut ink = [ps[0], ps[1], ps[2], ps[3]];
        if reverse {
            ink = ink.map(|v| 255 - v);
        }

        pd[..3].copy_from_slice(&cmyk_to_rgb8(ink[0], ink[1], ink[2], ink[3]));
        if dst_alpha {
            pd[3] = 255;
        }
    }
}

/// CMYK 16 bit -> CMYK/RGB/RGBA 8/16 bit.
///
/// For 8-bit destinations the inks are truncated to 8 bits before the RGB
/// derivation, so the result is not the 16-bit derivation shifted down.
pub(super) fn cmyk16(p: &ConvertParams<'_>, _bits: u8, src: &[u8], dst: &mut [u8]) {
    let reverse = p.has(ConvertFlags::REVERSE);
    let to8bit = p.to_8bit();
    let dst_alpha = p.output == OutputKind::Rgba;
    let step = match p.output {
        OutputKind::None | OutputKind::Rgba => 4,
        OutputKind::Rgb => 3,
    };

    for i in 0..p.width {
        let mut ink = [read16(src, i * 4), read16(src, i * 4 + 1), read16(src, i * 4 + 2), read16(src, i * 4 + 3)];
        if reverse {
            ink = ink.map(|v| 0xFFFF - v);
        }
        let di = i * step;

        match (p.output, to8bit) {
            (OutputKind::None, true) => {
                for (n, v) in ink.into_iter().enumerate() {
                    dst[di + n] = (v >> 8) as u8;
                }
            }
            (OutputKind::None, false) => {
                for (n, v) in ink.into_iter().enumerate() {
                    write16(dst, di + n, v);
                }
            }
            (_, true) => {
                let [c, m, y, k] = ink.map(|v| (v >> 8) as u8);
                dst[di..di + 3].copy_from_slice(&cmyk_to_rgb8(c, m, y, k));
                if dst_alpha {
                    dst[di + 3] = 255;
                }
            }
            (_, false) => {
                let rgb = cmyk_to_rgb16(ink[0], ink[1], ink[2], ink[3]);
                for (n, v) in rgb.into_iter().enumerate() {
                    write16(dst, di + n, v);
                }
                if dst_alpha {
                    write16(dst, di + 3, 0xFFFF);
                }
            }
        }
    }
}
