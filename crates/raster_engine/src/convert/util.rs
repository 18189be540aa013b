use byteorder::{ByteOrder, NativeEndian};

/// Reads the 16-bit sample at sample index `i`.
#[inline]
pub(crate) fn read16(buf: &[u8], i: usize) -> u16 {
    NativeEndian::read_u16(&buf[i * 2..i * 2 + 2])
}

/// Writes a 16-bit sample at sample index `i`.
#[inline]
pub(crate) fn write16(buf: &mut [u8], i: usize, v: u16) {
    NativeEndian::write_u16(&mut buf[i * 2..i * 2 + 2], v);
}

/// CMYK ink amounts (0 = no ink) to an 8-bit RGB color.
pub fn cmyk_to_rgb8(c: u8, m: u8, y: u8, k: u8) -> [u8; 3] {
    let d = f64::from(255 - k) / 255.0;
    let k = f64::from(k);
    let conv = |ink: u8| 255 - (f64::from(ink) * d + k + 0.5) as u8;
    [conv(c), conv(m), conv(y)]
}

/// 16-bit variant of [`cmyk_to_rgb8`].
pub fn cmyk_to_rgb16(c: u16, m: u16, y: u16, k: u16) -> [u16; 3] {
    let d = f64::from(0xFFFF - k) / 65535.0;
    let k = f64::from(k);
    let conv = |ink: u16| 0xFFFF - (f64::from(ink) * d + k + 0.5) as u16;
    [conv(c), conv(m), conv(y)]
}

/// Swaps R and B of every pixel in place; `bytes` is 3 or 4.
pub fn swap_rb_8(buf: &mut [u8], width: usize, bytes: usize) {
    for px in buf.chunks_exact_mut(bytes).take(width) {
        px.swap(0, 2);
    }
}

/// Widens an RGB row to RGBA in place, alpha 255.
///
/// `buf` must hold `width * 4` bytes with the RGB data at the front.
pub fn rgb8_to_rgba8_extend(buf: &mut [u8], width: usize) {
    // back to front so no source pixel is overwritten before it is read
    for i in (0..width).rev() {
        let (s, d) = (i * 3, i * 4);
        let rgb = [buf[s], buf[s + 1], buf[s + 2]];
        buf[d..d + 3].copy_from_slice(&rgb);
        buf[d + 3] = 255;
    }
}

/// RGBX to RGB, dropping the fourth byte.
pub fn rgbx8_to_rgb8(dst: &mut [u8], src: &[u8], width: usize) {
    for (pd, ps) in dst.chunks_exact_mut(3).zip(src.chunks_exact(4)).take(width) {
        pd.copy_from_slice(&ps[..3]);
    }
}

/// RGBX to gray, using R as the gray level.
pub fn rgbx8_to_gray8(dst: &mut [u8], src: &[u8], width: usize) {
    for (pd, ps) in dst.iter_mut().zip(src.chunks_exact(4)).take(width) {
        *pd = ps[0];
    }
}

/// RGBX to 1-bit, MSB first. A pixel is set when the top bit of R is set.
///
/// A trailing partial byte is written with its unused low bits cleared.
pub fn rgbx8_to_gray1(dst: &mut [u8], src: &[u8], width: usize) {
    for (i, ps) in src.chunks_exact(4).take(width).enumerate() {
        let bit = 0x80 >> (i & 7);
        if i & 7 == 0 {
            dst[i >> 3] = 0;
        }
        if ps[0] & 0x80 != 0 {
            dst[i >> 3] |= bit;
        }
    }
}
