/// Resource limits for an encode session.
///
/// All fields default to `None` (no limit). Checked once, against the
/// effective frame dimensions, before the session pixel buffer is
/// allocated.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    /// Maximum pixel count (effective width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for the session pixel buffer allocation.
    pub max_buffer_bytes: Option<u64>,
}

impl Limits {
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), crate::EncodeError> {
        let pixels = u64::from(width) * u64::from(height);
        if let Some(max_px) = self.max_pixels {
            if pixels > max_px {
                return Err(crate::EncodeError::Allocation(format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        if let Some(max_mem) = self.max_buffer_bytes {
            let bytes = pixels * 3;
            if bytes > max_mem {
                return Err(crate::EncodeError::Allocation(format!(
                    "buffer of {bytes} bytes exceeds memory limit {max_mem}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Limits;
    use crate::EncodeError;

    #[test]
    fn unlimited_by_default() {
        assert!(Limits::default().check(10_000, 10_000).is_ok());
    }

    #[test]
    fn pixel_limit_rejects() {
        let limits = Limits {
            max_pixels: Some(64),
            ..Limits::default()
        };
        assert!(limits.check(8, 8).is_ok());
        assert!(matches!(
            limits.check(8, 9),
            Err(EncodeError::Allocation(_))
        ));
    }

    #[test]
    fn memory_limit_counts_three_bytes_per_pixel() {
        let limits = Limits {
            max_buffer_bytes: Some(3 * 64),
            ..Limits::default()
        };
        assert!(limits.check(8, 8).is_ok());
        assert!(matches!(
            limits.check(8, 9),
            Err(EncodeError::Allocation(_))
        ));
    }
}
