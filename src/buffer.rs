//! Frame pixel storage.

/// One pixel in BMP native byte order: blue, green, red.
///
/// BMP stores 24-bpp pixel data as packed BGR triples, so reading a
/// row straight off disk yields a `[Pixel]` slice with no swizzling.
pub type Pixel = rgb::alt::BGR8;

/// Owned rectangular pixel grid, row-major, top-down.
///
/// Rows are already in logical (video) order, i.e. reversed from the
/// bottom-up order BMP files use on disk. Dimensions are the session's
/// *effective* (post-crop) dimensions, which may be smaller than the
/// native dimensions of the input files.
///
/// A session allocates one `PixelBuffer` and overwrites it for every
/// frame; it is never resized mid-session.
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<Pixel>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![Pixel { b: 0, g: 0, r: 0 }; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Pixel] {
        &self.data
    }

    /// One row, top-down indexing.
    pub fn row(&self, y: usize) -> &[Pixel] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [Pixel] {
        &mut self.data[y * self.width..(y + 1) * self.width]
    }

    /// Single pixel at (x, y), y counted from the top.
    pub fn pixel(&self, x: usize, y: usize) -> Pixel {
        self.data[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_top_down_and_width_long() {
        let mut buf = PixelBuffer::new(3, 2);
        buf.row_mut(0)[2] = Pixel { b: 1, g: 2, r: 3 };
        buf.row_mut(1)[0] = Pixel { b: 4, g: 5, r: 6 };

        assert_eq!(buf.width(), 3);
        assert_eq!(buf.height(), 2);
        assert_eq!(buf.pixel(2, 0), Pixel { b: 1, g: 2, r: 3 });
        assert_eq!(buf.pixel(0, 1), Pixel { b: 4, g: 5, r: 6 });
        assert_eq!(buf.pixels().len(), 6);
        assert_eq!(buf.row(0).len(), 3);
    }
}
