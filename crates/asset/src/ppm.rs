//! PPM texture decoder for the `P3` (ASCII) and `P6` (binary) variants.
//! 8-bit channels only; no compressed or 16-bit formats.

use std::path::Path;

use crate::error::{AssetError, Result};

/// Channel ordering of the decoded pixel buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    /// Swap red and blue, for consumers that sample BGR.
    Bgr,
}

/// Post-processing applied after the raw decode. The defaults keep the
/// file's own layout: rows top-to-bottom, RGB channels.
#[derive(Clone, Copy, Debug, Default)]
pub struct DecodeOptions {
    /// Reverse row order so row 0 becomes the bottom of the image,
    /// for bottom-up texture conventions.
    pub flip_vertical: bool,
    pub channel_order: ChannelOrder,
}

/// Decoded image, 3 bytes per pixel. The buffer is owned and released
/// with the value, on success and failure paths alike.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    /// `width * height * 3` bytes in the configured channel order.
    pub pixels: Vec<u8>,
}

impl Image {
    /// Returns `true` if dimensions are positive and the buffer length
    /// matches them.
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.pixels.len() == self.width as usize * self.height as usize * 3
    }

    /// Channel bytes of the pixel at `(x, y)` in buffer row order.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let at = (y as usize * self.width as usize + x as usize) * 3;
        [self.pixels[at], self.pixels[at + 1], self.pixels[at + 2]]
    }
}

/// Decode a PPM file from a path.
pub fn decode_ppm_from_path(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<Image> {
    let path = path.as_ref();
    log::info!("decoding PPM texture {}", path.display());
    let bytes = std::fs::read(path).map_err(|source| AssetError::io(path, source))?;
    decode_ppm(&bytes, options)
}

/// Decode a PPM image from an in-memory byte slice.
///
/// ASCII samples are cast to `u8`, truncating values above 255; the
/// header already bounds `maxval` at 255, so in-spec files are
/// unaffected.
pub fn decode_ppm(bytes: &[u8], options: &DecodeOptions) -> Result<Image> {
    let mut cursor = Cursor { bytes, pos: 0 };

    let binary = match cursor.token() {
        Some(b"P3") => false,
        Some(b"P6") => true,
        Some(other) => {
            return Err(AssetError::Format(format!(
                "unsupported PPM magic '{}' (only P3 and P6)",
                String::from_utf8_lossy(other)
            )));
        }
        None => return Err(AssetError::Format("empty PPM stream".into())),
    };

    let width = cursor.u32_field("width")?;
    let height = cursor.u32_field("height")?;
    let maxval = cursor.u32_field("max channel value")?;

    if width == 0 || height == 0 {
        return Err(AssetError::Format(format!(
            "image dimensions must be positive, got {width}x{height}"
        )));
    }
    if maxval > 255 {
        return Err(AssetError::Format(format!(
            "only 8-bit channels supported, max channel value is {maxval}"
        )));
    }

    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(|| {
            AssetError::Format(format!(
                "image dimensions {width}x{height} overflow the pixel buffer size"
            ))
        })?;
    let mut pixels = if binary {
        // Exactly one whitespace byte separates the header from the
        // raw payload; what follows is pixel data even if it happens
        // to be whitespace-valued.
        match cursor.bytes.get(cursor.pos) {
            Some(b) if b.is_ascii_whitespace() => cursor.pos += 1,
            _ => {
                return Err(AssetError::Format(
                    "missing whitespace separator after P6 header".into(),
                ));
            }
        }
        let payload = cursor
            .bytes
            .get(cursor.pos..cursor.pos + len)
            .ok_or_else(|| {
                AssetError::Format(format!(
                    "truncated P6 payload: expected {len} bytes, have {}",
                    cursor.bytes.len() - cursor.pos
                ))
            })?;
        payload.to_vec()
    } else {
        // Each ASCII sample takes at least one byte, so the remaining
        // stream bounds the allocation for oversized headers.
        let mut out = Vec::with_capacity(len.min(cursor.bytes.len() - cursor.pos));
        for channel in 0..len {
            let token = cursor.token().ok_or_else(|| {
                AssetError::Format(format!(
                    "truncated P3 payload: expected {len} channel values, have {channel}"
                ))
            })?;
            let value: u32 = std::str::from_utf8(token)
                .ok()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| {
                    AssetError::Format(format!(
                        "invalid channel value '{}' in P3 payload",
                        String::from_utf8_lossy(token)
                    ))
                })?;
            out.push(value as u8);
        }
        out
    };

    log::info!("decoded PPM image {width}x{height}, maxval {maxval}");

    if options.flip_vertical {
        flip_rows(&mut pixels, width as usize, height as usize);
    }
    if options.channel_order == ChannelOrder::Bgr {
        for px in pixels.chunks_exact_mut(3) {
            px.swap(0, 2);
        }
    }

    Ok(Image {
        width,
        height,
        pixels,
    })
}

fn flip_rows(pixels: &mut [u8], width: usize, height: usize) {
    let row = width * 3;
    for y in 0..height / 2 {
        let (top, rest) = pixels.split_at_mut((height - 1 - y) * row);
        top[y * row..y * row + row].swap_with_slice(&mut rest[..row]);
    }
}

/// Byte cursor with PPM whitespace/comment skipping.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn skip_filler(&mut self) {
        loop {
            match self.bytes.get(self.pos) {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'#') => {
                    // Comment runs to end of line.
                    while let Some(&b) = self.bytes.get(self.pos) {
                        self.pos += 1;
                        if b == b'\n' {
                            break;
                        }
                    }
                }
                _ => return,
            }
        }
    }

    fn token(&mut self) -> Option<&'a [u8]> {
        self.skip_filler();
        let start = self.pos;
        while matches!(self.bytes.get(self.pos), Some(b) if !b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        (self.pos > start).then(|| &self.bytes[start..self.pos])
    }

    fn u32_field(&mut self, what: &str) -> Result<u32> {
        let token = self
            .token()
            .ok_or_else(|| AssetError::Format(format!("missing {what} in PPM stream")))?;
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                AssetError::Format(format!(
                    "invalid {what} '{}' in PPM stream",
                    String::from_utf8_lossy(token)
                ))
            })
    }
}
