//! RGB to YCbCr colour conversion.
//!
//! Plain BT.601-style weighted sums. The rounding rule matches the
//! reference output this converter is checked against: truncate, then
//! increment when the fractional part is >= 0.5, capped at 255.
//! Averaged variants average the pre-rounded real values across a
//! pixel block and round once at the end; rounding each sample first
//! and then averaging gives different bytes for some inputs.

use crate::buffer::Pixel;

/// Truncate-then-round-half-up, saturating at 255.
///
/// Inputs are non-negative by construction (the chroma formulas bottom
/// out at +0.5 for 8-bit inputs), but 255.5 is reachable and must not
/// wrap to 0.
fn round_half_up(v: f64) -> u8 {
    let truncated = v as u32;
    let rounded = if v - f64::from(truncated) >= 0.5 {
        truncated + 1
    } else {
        truncated
    };
    rounded.min(255) as u8
}

fn luma_raw(p: Pixel) -> f64 {
    0.299 * f64::from(p.r) + 0.587 * f64::from(p.g) + 0.114 * f64::from(p.b)
}

fn chroma_blue_raw(p: Pixel) -> f64 {
    -0.169 * f64::from(p.r) - 0.331 * f64::from(p.g) + 0.500 * f64::from(p.b) + 128.0
}

fn chroma_red_raw(p: Pixel) -> f64 {
    0.500 * f64::from(p.r) - 0.419 * f64::from(p.g) - 0.081 * f64::from(p.b) + 128.0
}

/// Luma (Y) component.
pub fn luma(p: Pixel) -> u8 {
    round_half_up(luma_raw(p))
}

/// Blue-difference chroma (Cb), centered at 128.
pub fn chroma_blue(p: Pixel) -> u8 {
    round_half_up(chroma_blue_raw(p))
}

/// Red-difference chroma (Cr), centered at 128.
pub fn chroma_red(p: Pixel) -> u8 {
    round_half_up(chroma_red_raw(p))
}

/// Cb averaged over a block of pixels, rounded once at the end.
pub fn chroma_blue_avg(pixels: &[Pixel]) -> u8 {
    let sum: f64 = pixels.iter().map(|&p| chroma_blue_raw(p)).sum();
    round_half_up(sum / pixels.len() as f64)
}

/// Cr averaged over a block of pixels, rounded once at the end.
pub fn chroma_red_avg(pixels: &[Pixel]) -> u8 {
    let sum: f64 = pixels.iter().map(|&p| chroma_red_raw(p)).sum();
    round_half_up(sum / pixels.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(r: u8, g: u8, b: u8) -> Pixel {
        Pixel { b, g, r }
    }

    #[test]
    fn luma_endpoints() {
        assert_eq!(luma(px(255, 255, 255)), 255);
        assert_eq!(luma(px(0, 0, 0)), 0);
    }

    #[test]
    fn chroma_neutral_point() {
        assert_eq!(chroma_blue(px(128, 128, 128)), 128);
        assert_eq!(chroma_red(px(128, 128, 128)), 128);
    }

    #[test]
    fn chroma_red_saturates_at_255() {
        // 0.500*255 + 128 = 255.5: round-half-up must cap at 255, not
        // wrap to 0.
        assert_eq!(chroma_red(px(255, 0, 0)), 255);
    }

    #[test]
    fn rounding_is_half_up() {
        // Pure red: Cb = 128 - 0.169*255 = 84.905 -> 85.
        assert_eq!(chroma_blue(px(255, 0, 0)), 85);
        // Pure green: Cr = 128 - 0.419*255 = 21.155 -> 21.
        assert_eq!(chroma_red(px(0, 255, 0)), 21);
    }

    #[test]
    fn averaging_rounds_once_at_the_end() {
        // p1: Cb raw = 128 - 0.169 = 127.831 (rounds to 128)
        // p2: Cb raw = 128 + 0.5   = 128.5   (rounds to 129)
        let p1 = px(1, 0, 0);
        let p2 = px(0, 0, 1);

        // Average of raw values: 128.1655 -> 128.
        assert_eq!(chroma_blue_avg(&[p1, p2]), 128);

        // Averaging the already-rounded samples instead would give
        // (128 + 129) / 2 = 128.5 -> 129. The two orderings must
        // disagree for this pair.
        let rounded_then_averaged = round_half_up(
            (f64::from(chroma_blue(p1)) + f64::from(chroma_blue(p2))) / 2.0,
        );
        assert_eq!(rounded_then_averaged, 129);
        assert_ne!(chroma_blue_avg(&[p1, p2]), rounded_then_averaged);
    }

    #[test]
    fn block_average_of_uniform_block_is_pointwise_value() {
        let p = px(37, 201, 90);
        let block = [p; 8];
        assert_eq!(chroma_blue_avg(&block), chroma_blue(p));
        assert_eq!(chroma_red_avg(&block), chroma_red(p));
    }
}
