//! Encode session orchestration: sorted BMP paths in, one Y4M stream
//! out.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::bmp::{self, BmpDecoder};
use crate::buffer::PixelBuffer;
use crate::colorspace::ColorSpace;
use crate::error::EncodeError;
use crate::limits::Limits;
use crate::subsample::Subsampler;
use crate::y4m::{self, Interlacing, StreamHeader};

/// Resolved configuration for one encode session.
///
/// The caller (CLI or embedding application) is responsible for having
/// validated these values; the session itself re-checks only what the
/// container format requires.
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub colorspace: ColorSpace,
    /// Frame rate as a rational (numerator, denominator).
    pub frame_rate: (u32, u32),
    /// Remove each source BMP after its frame has been flushed to the
    /// output, never before.
    pub delete_sources: bool,
    /// Optional free-form header extension (serialized as ` X<ext>`).
    pub extension: Option<String>,
    pub limits: Limits,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            colorspace: ColorSpace::C420,
            frame_rate: (30, 1),
            delete_sources: false,
            extension: None,
            limits: Limits::default(),
        }
    }
}

/// What a completed session wrote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeSummary {
    pub frames: usize,
    pub bytes_written: u64,
}

/// Per-session reference values derived from the first frame before
/// any output exists.
struct SessionPlan {
    native: (u32, u32),
    effective: (u32, u32),
    header: StreamHeader,
}

fn plan_session(paths: &[PathBuf], config: &EncodeConfig) -> Result<SessionPlan, EncodeError> {
    let first = paths.first().ok_or(EncodeError::EmptyInput)?;

    let bmp_header = bmp::read_header(first)?;
    let native = (bmp_header.width, bmp_header.height);
    let effective = config.colorspace.crop(native.0, native.1);
    if effective.0 == 0 || effective.1 == 0 {
        return Err(EncodeError::ZeroSizeOutput {
            colorspace: config.colorspace.tag(),
            width: native.0,
            height: native.1,
        });
    }
    config.limits.check(effective.0, effective.1)?;

    if config.colorspace == ColorSpace::C410 {
        warn!("4:1:0 subsampling is rarely supported by players; consider 4:2:0 instead");
    }

    let header = StreamHeader::new(
        effective.0,
        effective.1,
        config.frame_rate,
        Interlacing::Progressive,
        (1, 1),
        config.colorspace.tag(),
        config.extension.as_deref(),
    )?;

    Ok(SessionPlan {
        native,
        effective,
        header,
    })
}

/// Encode `paths` (already filtered and sorted by the caller) into a
/// new file at `output`.
///
/// The output file is only created once the session plan has been
/// validated, so configuration errors (empty input, zero-size crop,
/// limit violations, bad header parameters) leave the filesystem
/// untouched. Any later failure aborts the session; a partially
/// written file must be treated as unusable.
pub fn encode_to_path(
    paths: &[PathBuf],
    config: &EncodeConfig,
    output: &Path,
) -> Result<EncodeSummary, EncodeError> {
    let plan = plan_session(paths, config)?;
    let file = File::create(output)?;
    let mut stream = BufWriter::new(file);
    run_session(paths, config, &plan, &mut stream)
}

/// Encode into an arbitrary writer. Same contract as
/// [`encode_to_path`], with output creation left to the caller.
pub fn encode_to_writer<W: Write>(
    paths: &[PathBuf],
    config: &EncodeConfig,
    output: &mut W,
) -> Result<EncodeSummary, EncodeError> {
    let plan = plan_session(paths, config)?;
    run_session(paths, config, &plan, output)
}

fn run_session<W: Write>(
    paths: &[PathBuf],
    config: &EncodeConfig,
    plan: &SessionPlan,
    output: &mut W,
) -> Result<EncodeSummary, EncodeError> {
    let header_bytes = plan.header.serialize();
    output.write_all(&header_bytes)?;
    let mut bytes_written = header_bytes.len() as u64;

    let (width, height) = (plan.effective.0 as usize, plan.effective.1 as usize);
    // One buffer and one frame scratch for the whole session; every
    // frame overwrites them in place.
    let mut buffer = PixelBuffer::new(width, height);
    let mut subsampler = Subsampler::new(config.colorspace, width, height);
    let mut decoder = BmpDecoder::new();

    for (index, path) in paths.iter().enumerate() {
        decoder.decode_into(path, &mut buffer, Some(plan.native))?;
        let frame = subsampler.encode_frame(&buffer);

        y4m::write_frame_marker(output)?;
        output.write_all(frame)?;
        bytes_written += (y4m::FRAME_MARKER.len() + frame.len()) as u64;

        if config.delete_sources {
            // The frame must be durably written before its source goes
            // away.
            output.flush()?;
            fs::remove_file(path)?;
        }

        debug!(
            frame = index + 1,
            total = paths.len(),
            path = %path.display(),
            "frame written"
        );
    }

    output.flush()?;
    Ok(EncodeSummary {
        frames: paths.len(),
        bytes_written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_fatal_before_any_output() {
        let mut out = Vec::new();
        let result = encode_to_writer(&[], &EncodeConfig::default(), &mut out);
        assert!(matches!(result, Err(EncodeError::EmptyInput)));
        assert!(out.is_empty());
    }

    #[test]
    fn missing_first_file_reports_open_error() {
        let paths = vec![PathBuf::from("/nonexistent/frame_000.bmp")];
        let mut out = Vec::new();
        let result = encode_to_writer(&paths, &EncodeConfig::default(), &mut out);
        assert!(matches!(result, Err(EncodeError::Open { .. })));
        assert!(out.is_empty());
    }
}
