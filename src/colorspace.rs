//! Chroma subsampling layouts and their geometry rules.

use std::fmt;

/// Chroma subsampling layout for the output stream.
///
/// Fixed for the whole encode session. The variant determines how the
/// input is cropped, how the chroma planes are laid out, and the fixed
/// per-frame byte size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    /// 4:4:4 — no subsampling.
    C444,
    /// 4:2:2 — chroma halved horizontally.
    C422,
    /// 4:2:0 — chroma halved in both directions.
    C420,
    /// 4:1:1 — chroma quartered horizontally.
    C411,
    /// 4:1:0 — chroma quartered horizontally, halved vertically.
    /// Spec-conformant but rarely supported by downstream players.
    C410,
}

impl ColorSpace {
    /// The literal Y4M header tag, e.g. `C420`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::C444 => "C444",
            Self::C422 => "C422",
            Self::C420 => "C420",
            Self::C411 => "C411",
            Self::C410 => "C410",
        }
    }

    /// Apply this layout's cropping rule to native BMP dimensions.
    ///
    /// Horizontally subsampled layouts need an even (C422/C420) or
    /// multiple-of-four (C411/C410) width; vertically subsampled ones
    /// (C420/C410) need an even height. Excess columns/rows are
    /// dropped from the right/bottom. May return a zero dimension;
    /// the pipeline treats that as fatal.
    pub fn crop(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            Self::C444 => (width, height),
            Self::C422 => (width & !1, height),
            Self::C420 => (width & !1, height & !1),
            Self::C411 => (width & !3, height),
            Self::C410 => (width & !3, height & !1),
        }
    }

    /// Dimensions of each chroma plane for an effective frame size.
    pub fn chroma_plane_dims(self, width: usize, height: usize) -> (usize, usize) {
        match self {
            Self::C444 => (width, height),
            Self::C422 => (width / 2, height),
            Self::C420 => (width / 2, height / 2),
            Self::C411 => (width / 4, height),
            Self::C410 => (width / 4, height / 2),
        }
    }

    /// Total frame byte size: one full-resolution Y plane plus two
    /// chroma planes.
    pub fn frame_size(self, width: usize, height: usize) -> usize {
        let (cw, ch) = self.chroma_plane_dims(width, height);
        width * height + 2 * cw * ch
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::ColorSpace::*;

    #[test]
    fn crop_rules() {
        assert_eq!(C444.crop(7, 5), (7, 5));
        assert_eq!(C422.crop(7, 5), (6, 5));
        assert_eq!(C420.crop(7, 5), (6, 4));
        assert_eq!(C411.crop(7, 5), (4, 5));
        assert_eq!(C410.crop(7, 5), (4, 4));
        // Already-aligned dimensions pass through untouched.
        assert_eq!(C420.crop(64, 64), (64, 64));
        assert_eq!(C410.crop(8, 2), (8, 2));
    }

    #[test]
    fn crop_can_reach_zero() {
        assert_eq!(C420.crop(1, 1), (0, 0));
        assert_eq!(C411.crop(3, 2), (0, 2));
    }

    #[test]
    fn frame_sizes() {
        let (w, h) = (64usize, 32usize);
        assert_eq!(C444.frame_size(w, h), 3 * w * h);
        assert_eq!(C422.frame_size(w, h), 2 * w * h);
        assert_eq!(C420.frame_size(w, h), w * h * 3 / 2);
        assert_eq!(C411.frame_size(w, h), w * h * 3 / 2);
        assert_eq!(C410.frame_size(w, h), w * h * 5 / 4);
    }
}
