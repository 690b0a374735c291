//! Frame plane assembly: one full-resolution luma plane followed by
//! two chroma planes laid out per the selected [`ColorSpace`].

use crate::buffer::{Pixel, PixelBuffer};
use crate::color;
use crate::colorspace::ColorSpace;

/// Turns a decoded [`PixelBuffer`] into the planar bytes of one Y4M
/// frame.
///
/// The output buffer is sized once at session start and reused; frame
/// byte length is fixed for the whole session.
pub struct Subsampler {
    colorspace: ColorSpace,
    frame: Vec<u8>,
}

impl Subsampler {
    /// Preallocates the frame buffer for effective dimensions
    /// `width` x `height`.
    pub fn new(colorspace: ColorSpace, width: usize, height: usize) -> Self {
        Self {
            colorspace,
            frame: Vec::with_capacity(colorspace.frame_size(width, height)),
        }
    }

    pub fn colorspace(&self) -> ColorSpace {
        self.colorspace
    }

    /// Encode one frame. Planes are traversed row-major, top-to-bottom,
    /// left-to-right, matching the buffer's already-inverted row order.
    pub fn encode_frame(&mut self, buffer: &PixelBuffer) -> &[u8] {
        self.frame.clear();

        for &p in buffer.pixels() {
            self.frame.push(color::luma(p));
        }
        write_chroma_plane(
            &mut self.frame,
            buffer,
            self.colorspace,
            color::chroma_blue,
            color::chroma_blue_avg,
        );
        write_chroma_plane(
            &mut self.frame,
            buffer,
            self.colorspace,
            color::chroma_red,
            color::chroma_red_avg,
        );

        &self.frame
    }
}

fn write_chroma_plane(
    frame: &mut Vec<u8>,
    buffer: &PixelBuffer,
    colorspace: ColorSpace,
    point: fn(Pixel) -> u8,
    block_avg: fn(&[Pixel]) -> u8,
) {
    let (w, h) = (buffer.width(), buffer.height());
    match colorspace {
        ColorSpace::C444 => {
            for &p in buffer.pixels() {
                frame.push(point(p));
            }
        }
        ColorSpace::C422 => {
            // One sample per horizontally adjacent pixel pair.
            for y in 0..h {
                let row = buffer.row(y);
                for pair in row.chunks_exact(2) {
                    frame.push(block_avg(pair));
                }
            }
        }
        ColorSpace::C420 => {
            // One sample per 2x2 block.
            for y in (0..h).step_by(2) {
                for x in (0..w).step_by(2) {
                    let block = [
                        buffer.pixel(x, y),
                        buffer.pixel(x + 1, y),
                        buffer.pixel(x, y + 1),
                        buffer.pixel(x + 1, y + 1),
                    ];
                    frame.push(block_avg(&block));
                }
            }
        }
        ColorSpace::C411 => {
            // One sample per 4 horizontally consecutive pixels.
            for y in 0..h {
                let row = buffer.row(y);
                for quad in row.chunks_exact(4) {
                    frame.push(block_avg(quad));
                }
            }
        }
        ColorSpace::C410 => {
            // One sample per 4x2 block.
            for y in (0..h).step_by(2) {
                for x in (0..w).step_by(4) {
                    let mut block = [buffer.pixel(x, y); 8];
                    for dx in 0..4 {
                        block[dx] = buffer.pixel(x + dx, y);
                        block[4 + dx] = buffer.pixel(x + dx, y + 1);
                    }
                    frame.push(block_avg(&block));
                }
            }
        }
    }
}
