//! Channel-separated sources (PSD and friends): each call writes one channel
//! into its slot of the interleaved destination row.

use super::util::{cmyk_to_rgb16, cmyk_to_rgb8, read16, write16};
use super::{ConvertFlags, ConvertParams, OutputKind};

/// Gray+alpha 8 bit -> gray+alpha/RGB/RGBA 8 bit. Channel 0 gray, 1 alpha.
pub(super) fn gray_alpha8(p: &ConvertParams<'_>, channel: usize, src: &[u8], dst: &mut [u8]) {
    let src = &src[..p.width];

    match p.output {
        OutputKind::None => {
            for (pd, &c) in dst[channel..].iter_mut().step_by(2).zip(src) {
                *pd = c;
            }
        }
        OutputKind::Rgb => {
            if channel != 0 {
                return;
            }
            for (pd, &c) in dst.chunks_exact_mut(3).zip(src) {
                pd.fill(c);
            }
        }
        OutputKind::Rgba => {
            if channel == 0 {
                for (pd, &c) in dst.chunks_exact_mut(4).zip(src) {
                    pd[..3].fill(c);
                }
            } else {
                for (pd, &c) in dst[3..].iter_mut().step_by(4).zip(src) {
                    *pd = c;
                }
            }
        }
    }
}

/// Gray+alpha 16 bit -> gray+alpha/RGB/RGBA 8/16 bit.
pub(super) fn gray_alpha16(p: &ConvertParams<'_>, channel: usize, src: &[u8], dst: &mut [u8]) {
    if p.output == OutputKind::Rgb && channel == 1 {
        return;
    }

    let to8bit = p.to_8bit();
    let (mut at, step) = match p.output {
        OutputKind::None => (channel, 2),
        OutputKind::Rgb => (0, 3),
        OutputKind::Rgba => (0, 4),
    };

    for i in 0..p.width {
        let c = read16(src, i);

        // `at` counts samples, so it doubles as a byte offset for 8-bit rows
        match (p.output, channel, to8bit) {
            (OutputKind::None, _, true) => dst[at] = (c >> 8) as u8,
            (OutputKind::None, _, false) => write16(dst, at, c),
            (_, 1, true) => dst[at + 3] = (c >> 8) as u8,
            (_, 1, false) => write16(dst, at + 3, c),
            (_, _, true) => dst[at..at + 3].fill((c >> 8) as u8),
            (_, _, false) => {
                for n in 0..3 {
                    write16(dst, at + n, c);
                }
            }
        }

        at += step;
    }
}

/// Resolves [`OutputKind::None`] to the source's own RGB or RGBA layout.
fn rgb_layout(p: &ConvertParams<'_>) -> OutputKind {
    match p.output {
        OutputKind::None if p.has(ConvertFlags::SRC_ALPHA) => OutputKind::Rgba,
        OutputKind::None => OutputKind::Rgb,
        other => other,
    }
}

/// RGB/RGBA 8 bit -> RGB/RGBA 8 bit. Channel 0..=2 R/G/B, 3 alpha.
pub(super) fn rgb_rgba8(p: &ConvertParams<'_>, channel: usize, src: &[u8], dst: &mut [u8]) {
    let layout = rgb_layout(p);
    let src = &src[..p.width];

    if layout == OutputKind::Rgb {
        if channel == 3 {
            return;
        }
        for (pd, &c) in dst[channel..].iter_mut().step_by(3).zip(src) {
            *pd = c;
        }
        return;
    }

    for (pd, &c) in dst[channel..].iter_mut().step_by(4).zip(src) {
        *pd = c;
    }

    if channel == 0 && !p.has(ConvertFlags::SRC_ALPHA) {
        for pd in dst[3..].iter_mut().step_by(4).take(p.width) {
            *pd = 255;
        }
    }
}

/// RGB/RGBA 16 bit -> RGB/RGBA 8/16 bit.
pub(super) fn rgb_rgba16(p: &ConvertParams<'_>, channel: usize, src: &[u8], dst: &mut [u8]) {
    let layout = rgb_layout(p);
    if layout == OutputKind::Rgb && channel == 3 {
        return;
    }

    let to8bit = p.to_8bit();
    let step = if layout == OutputKind::Rgb { 3 } else { 4 };

    for i in 0..p.width {
        let c = read16(src, i);
        let at = i * step + channel;
        if to8bit {
            dst[at] = (c >> 8) as u8;
        } else {
            write16(dst, at, c);
        }
    }

    if channel == 0 && layout == OutputKind::Rgba && !p.has(ConvertFlags::SRC_ALPHA) {
        for i in 0..p.width {
            if to8bit {
                dst[i * 4 + 3] = 255;
            } else {
                write16(dst, i * 4 + 3, 0xFFFF);
            }
        }
    }
}

/// CMYK 8 bit -> CMYK/RGB/RGBA 8 bit. Channel 0..=3 C/M/Y/K.
///
/// For RGB/RGBA output, channels 0..=2 park their ink in the pixel's first three
/// bytes and channel 3 replaces them with the derived color.
pub(super) fn cmyk8(p: &ConvertParams<'_>, channel: usize, src: &[u8], dst: &mut [u8]) {
    let reverse = p.has(ConvertFlags::REVERSE);
    let step = if p.output == OutputKind::Rgb { 3 } else { 4 };

    for (pd, &s) in dst.chunks_exact_mut(step).zip(&src[..p.width]) {
        let c = if reverse { 255 - s } else { s };

        if p.output == OutputKind::None || channel < 3 {
            pd[channel] = c;
        } else {
            let rgb = cmyk_to_rgb8(pd[0], pd[1], pd[2], c);
            pd[..3].copy_from_slice(&rgb);
            if p.output == OutputKind::Rgba {
                pd[3] = 255;
            }
        }
    }
}

/// CMYK 16 bit -> CMYK/RGB/RGBA 8/16 bit.
///
/// 8-bit destinations park 8-bit inks, so the K call derives from truncated values.
pub(super) fn cmyk16(p: &ConvertParams<'_>, channel: usize, src: &[u8], dst: &mut [u8]) {
    let reverse = p.has(ConvertFlags::REVERSE);
    let to8bit = p.to_8bit();
    let step = if p.output == OutputKind::Rgb { 3 } else { 4 };
    let derive = p.output != OutputKind::None && channel == 3;

    for i in 0..p.width {
        let mut c = read16(src, i);
        if reverse {
            c = 0xFFFF - c;
        }
        let at = i * step;

        match (derive, to8bit) {
            (false, true) => dst[at + channel] = (c >> 8) as u8,
            (false, false) => write16(dst, at + channel, c),
            (true, true) => {
                let rgb = cmyk_to_rgb8(dst[at], dst[at + 1], dst[at + 2], (c >> 8) as u8);
                dst[at..at + 3].copy_from_slice(&rgb);
                if p.output == OutputKind::Rgba {
                    dst[at + 3] = 255;
                }
            }
            (true, false) => {
                let rgb = cmyk_to_rgb16(read16(dst, at), read16(dst, at + 1), read16(dst, at + 2), c);
                for (n, v) in rgb.into_iter().enumerate() {
                    write16(dst, at + n, v);
                }
                if p.output == OutputKind::Rgba {
                    write16(dst, at + 3, 0xFFFF);
                }
            }
        }
    }
}
