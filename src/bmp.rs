//! BMP reading: header validation and row-inverted pixel loading.
//!
//! Only the plain Windows layout this pipeline consumes is accepted:
//! 14-byte file header, 40-byte BITMAPINFOHEADER immediately after it
//! (pixel array at byte 54), 24 or 32 bpp, uncompressed (BI_RGB),
//! bottom-up row order. Everything else is a format error.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use rgb::ComponentBytes;

use crate::buffer::PixelBuffer;
use crate::error::EncodeError;

/// Pixel array offset implied by the supported header layout.
const PIXEL_ARRAY_OFFSET: u32 = 54;
/// 14-byte file header + 40-byte BITMAPINFOHEADER.
const HEADER_LEN: usize = 54;

/// Validated fields of a BMP header pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpHeader {
    /// Native width in pixels.
    pub width: u32,
    /// Native height in pixels (rows stored bottom-up on disk).
    pub height: u32,
    /// Bits per pixel, 24 or 32.
    pub bit_depth: u16,
}

impl BmpHeader {
    /// Byte padding appended to each 24-bpp row to reach a 4-byte
    /// boundary. 32-bpp rows are implicitly unpadded.
    pub fn row_padding(&self) -> u32 {
        match self.bit_depth {
            24 => (4 - (3 * self.width) % 4) % 4,
            _ => 0,
        }
    }

    /// On-disk byte stride of one pixel row.
    pub fn row_stride(&self) -> u64 {
        match self.bit_depth {
            24 => u64::from(3 * self.width + self.row_padding()),
            _ => u64::from(4 * self.width),
        }
    }

    fn bytes_per_pixel(&self) -> usize {
        usize::from(self.bit_depth) / 8
    }
}

/// Read and validate the headers of the BMP at `path` without touching
/// its pixel data. Used on the first frame to derive session
/// dimensions.
pub fn read_header(path: &Path) -> Result<BmpHeader, EncodeError> {
    let mut file = open(path)?;
    read_header_from(&mut file, path)
}

fn open(path: &Path) -> Result<File, EncodeError> {
    File::open(path).map_err(|source| EncodeError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn read_header_from(file: &mut File, path: &Path) -> Result<BmpHeader, EncodeError> {
    let mut raw = [0u8; HEADER_LEN];
    file.read_exact(&mut raw)
        .map_err(|e| format_error(path, format!("truncated header: {e}")))?;
    parse_header(&raw, path)
}

fn format_error(path: &Path, reason: String) -> EncodeError {
    EncodeError::Format {
        path: path.to_path_buf(),
        reason,
    }
}

fn u16_at(raw: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([raw[offset], raw[offset + 1]])
}

fn u32_at(raw: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        raw[offset],
        raw[offset + 1],
        raw[offset + 2],
        raw[offset + 3],
    ])
}

fn parse_header(raw: &[u8; HEADER_LEN], path: &Path) -> Result<BmpHeader, EncodeError> {
    if &raw[0..2] != b"BM" {
        return Err(format_error(path, "missing BM magic bytes".into()));
    }

    // File size (offset 2) and the two reserved fields (offset 6) are
    // informational only.
    let pixel_array_offset = u32_at(raw, 10);
    if pixel_array_offset != PIXEL_ARRAY_OFFSET {
        return Err(format_error(
            path,
            format!(
                "pixel array offset is {pixel_array_offset}, expected {PIXEL_ARRAY_OFFSET} \
                 (only BITMAPINFOHEADER files are supported)"
            ),
        ));
    }

    let info_header_size = u32_at(raw, 14);
    if info_header_size != 40 {
        return Err(format_error(
            path,
            format!("info header size is {info_header_size}, expected 40"),
        ));
    }

    // Width/height are signed on disk but treated as unsigned here;
    // top-down (negative-height) files fall out as dimension mismatches
    // or oversized reads rather than silently flipping.
    let width = u32_at(raw, 18);
    let height = u32_at(raw, 22);
    if width == 0 || height == 0 {
        return Err(format_error(
            path,
            format!("degenerate dimensions {width}x{height}"),
        ));
    }

    let planes = u16_at(raw, 26);
    if planes != 1 {
        return Err(format_error(
            path,
            format!("plane count is {planes}, expected 1"),
        ));
    }

    let bit_depth = u16_at(raw, 28);
    if bit_depth != 24 && bit_depth != 32 {
        return Err(format_error(
            path,
            format!("bit depth is {bit_depth} bpp, expected 24 or 32"),
        ));
    }

    let compression = u32_at(raw, 30);
    if compression != 0 {
        return Err(format_error(
            path,
            format!("compression method {compression} unsupported, expected 0 (BI_RGB)"),
        ));
    }

    Ok(BmpHeader {
        width,
        height,
        bit_depth,
    })
}

/// Reads one BMP file per call into a caller-owned [`PixelBuffer`].
///
/// Holds a scratch row for the 32-bpp path so repeated calls within a
/// session do not allocate.
#[derive(Default)]
pub struct BmpDecoder {
    scratch: Vec<u8>,
}

impl BmpDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the BMP at `path` into `buffer`, overwriting it in place.
    ///
    /// The buffer's dimensions are the session's effective (post-crop)
    /// dimensions; when they are smaller than the file's native
    /// dimensions only the leftmost/topmost effective region is kept.
    /// Rows are read bottom-to-top from disk into top-to-bottom buffer
    /// order, seeking past native row remainders so cropping never
    /// desynchronizes the file position.
    ///
    /// When `expected_native` is set (every frame after the first), a
    /// file whose native dimensions differ fails with
    /// [`EncodeError::DimensionMismatch`] naming the offending path —
    /// fatal for the whole session.
    pub fn decode_into(
        &mut self,
        path: &Path,
        buffer: &mut PixelBuffer,
        expected_native: Option<(u32, u32)>,
    ) -> Result<BmpHeader, EncodeError> {
        let mut file = open(path)?;
        let header = read_header_from(&mut file, path)?;

        if let Some((ew, eh)) = expected_native {
            if (header.width, header.height) != (ew, eh) {
                return Err(EncodeError::DimensionMismatch {
                    path: path.to_path_buf(),
                    expected_width: ew,
                    expected_height: eh,
                    width: header.width,
                    height: header.height,
                });
            }
        }

        debug_assert!(buffer.width() as u64 <= u64::from(header.width));
        debug_assert!(buffer.height() as u64 <= u64::from(header.height));

        let stride = header.row_stride();
        let bpp = header.bytes_per_pixel();
        if bpp == 4 {
            self.scratch.resize(buffer.width() * 4, 0);
        }

        // BMP pixel arrays are bottom-up: logical row y lives at disk
        // row (native_height - 1 - y).
        for y in 0..buffer.height() {
            let disk_row = u64::from(header.height) - 1 - y as u64;
            file.seek(SeekFrom::Start(u64::from(PIXEL_ARRAY_OFFSET) + disk_row * stride))
                .map_err(|e| format_error(path, format!("seek to row failed: {e}")))?;

            let row = buffer.row_mut(y);
            if bpp == 3 {
                // 24-bpp rows are packed BGR, the buffer's native
                // layout: read straight into the row.
                file.read_exact(row.as_bytes_mut())
                    .map_err(|e| format_error(path, format!("truncated pixel array: {e}")))?;
            } else {
                // 32-bpp rows carry a fourth (alpha/padding) byte that
                // is dropped.
                file.read_exact(&mut self.scratch)
                    .map_err(|e| format_error(path, format!("truncated pixel array: {e}")))?;
                for (px, quad) in row.iter_mut().zip(self.scratch.chunks_exact(4)) {
                    px.b = quad[0];
                    px.g = quad[1];
                    px.r = quad[2];
                }
            }
        }

        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_header_bytes(width: u32, height: u32, bit_depth: u16) -> [u8; HEADER_LEN] {
        let mut raw = [0u8; HEADER_LEN];
        raw[0..2].copy_from_slice(b"BM");
        raw[10..14].copy_from_slice(&54u32.to_le_bytes());
        raw[14..18].copy_from_slice(&40u32.to_le_bytes());
        raw[18..22].copy_from_slice(&width.to_le_bytes());
        raw[22..26].copy_from_slice(&height.to_le_bytes());
        raw[26..28].copy_from_slice(&1u16.to_le_bytes());
        raw[28..30].copy_from_slice(&bit_depth.to_le_bytes());
        raw[30..34].copy_from_slice(&0u32.to_le_bytes());
        raw
    }

    fn parse(raw: &[u8; HEADER_LEN]) -> Result<BmpHeader, EncodeError> {
        parse_header(raw, Path::new("test.bmp"))
    }

    #[test]
    fn accepts_24_and_32_bpp() {
        let header = parse(&valid_header_bytes(640, 480, 24)).unwrap();
        assert_eq!(header.width, 640);
        assert_eq!(header.height, 480);
        assert_eq!(header.bit_depth, 24);
        assert!(parse(&valid_header_bytes(1, 1, 32)).is_ok());
    }

    #[test]
    fn rejects_bad_magic() {
        let mut raw = valid_header_bytes(4, 4, 24);
        raw[0] = b'P';
        assert!(matches!(parse(&raw), Err(EncodeError::Format { .. })));
    }

    #[test]
    fn rejects_wrong_pixel_array_offset() {
        let mut raw = valid_header_bytes(4, 4, 24);
        raw[10..14].copy_from_slice(&138u32.to_le_bytes());
        assert!(matches!(parse(&raw), Err(EncodeError::Format { .. })));
    }

    #[test]
    fn rejects_wrong_info_header_size() {
        let mut raw = valid_header_bytes(4, 4, 24);
        raw[14..18].copy_from_slice(&108u32.to_le_bytes());
        assert!(matches!(parse(&raw), Err(EncodeError::Format { .. })));
    }

    #[test]
    fn rejects_unsupported_bit_depths() {
        for depth in [1u16, 8, 16, 48] {
            assert!(matches!(
                parse(&valid_header_bytes(4, 4, depth)),
                Err(EncodeError::Format { .. })
            ));
        }
    }

    #[test]
    fn rejects_compressed_files() {
        let mut raw = valid_header_bytes(4, 4, 24);
        raw[30..34].copy_from_slice(&1u32.to_le_bytes()); // BI_RLE8
        assert!(matches!(parse(&raw), Err(EncodeError::Format { .. })));
    }

    #[test]
    fn rejects_zero_dimensions_and_bad_planes() {
        assert!(parse(&valid_header_bytes(0, 4, 24)).is_err());
        assert!(parse(&valid_header_bytes(4, 0, 24)).is_err());
        let mut raw = valid_header_bytes(4, 4, 24);
        raw[26..28].copy_from_slice(&3u16.to_le_bytes());
        assert!(parse(&raw).is_err());
    }

    #[test]
    fn row_padding_formula() {
        let header = |width| BmpHeader {
            width,
            height: 1,
            bit_depth: 24,
        };
        assert_eq!(header(4).row_padding(), 0);
        assert_eq!(header(1).row_padding(), 1);
        assert_eq!(header(2).row_padding(), 2);
        assert_eq!(header(3).row_padding(), 3);
        assert_eq!(header(3).row_stride(), 12);

        let wide = BmpHeader {
            width: 3,
            height: 1,
            bit_depth: 32,
        };
        assert_eq!(wide.row_padding(), 0);
        assert_eq!(wide.row_stride(), 12);
    }
}
