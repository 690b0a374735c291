//! YUV4MPEG2 container framing: the single ASCII stream header line
//! and the per-frame marker.

use std::io::{self, Write};

use crate::error::EncodeError;

/// Literal marker preceding every frame's plane bytes.
pub const FRAME_MARKER: &[u8; 6] = b"FRAME\n";

/// Colour-space tags a Y4M stream header may carry.
const CANONICAL_TAGS: [&str; 9] = [
    "C444", "C444alpha", "C422", "C420", "C420jpeg", "C420mpeg2", "C420paldv", "C411", "C410",
];

/// Interlacing mode for the `I` header field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interlacing {
    /// `Ip` — this pipeline always produces progressive streams.
    #[default]
    Progressive,
    /// `It`
    TopFieldFirst,
    /// `Ib`
    BottomFieldFirst,
    /// `Im`
    Mixed,
}

impl Interlacing {
    fn flag(self) -> char {
        match self {
            Self::Progressive => 'p',
            Self::TopFieldFirst => 't',
            Self::BottomFieldFirst => 'b',
            Self::Mixed => 'm',
        }
    }
}

/// Validated parameters of the stream header line.
///
/// Built once per session from post-crop dimensions, serialized before
/// any frame is written.
#[derive(Clone, Debug)]
pub struct StreamHeader {
    width: u32,
    height: u32,
    frame_rate: (u32, u32),
    interlacing: Interlacing,
    pixel_aspect: (u32, u32),
    colorspace_tag: &'static str,
    extension: Option<String>,
}

impl StreamHeader {
    /// Validate and build a header.
    ///
    /// Fails on zero dimensions, zero frame-rate or pixel-aspect
    /// components, or a colour-space tag outside the canonical set. An
    /// extension that is empty, longer than 200 bytes, or contains
    /// anything but printable non-space ASCII is dropped entirely
    /// rather than included in part.
    pub fn new(
        width: u32,
        height: u32,
        frame_rate: (u32, u32),
        interlacing: Interlacing,
        pixel_aspect: (u32, u32),
        colorspace_tag: &str,
        extension: Option<&str>,
    ) -> Result<Self, EncodeError> {
        if width == 0 || height == 0 {
            return Err(EncodeError::ContainerHeader(format!(
                "frame dimensions must be non-zero, got {width}x{height}"
            )));
        }
        if frame_rate.0 == 0 || frame_rate.1 == 0 {
            return Err(EncodeError::ContainerHeader(format!(
                "frame rate components must be positive, got {}:{}",
                frame_rate.0, frame_rate.1
            )));
        }
        if pixel_aspect.0 == 0 || pixel_aspect.1 == 0 {
            return Err(EncodeError::ContainerHeader(format!(
                "pixel aspect components must be positive, got {}:{}",
                pixel_aspect.0, pixel_aspect.1
            )));
        }
        let colorspace_tag = CANONICAL_TAGS
            .iter()
            .find(|&&tag| tag == colorspace_tag)
            .copied()
            .ok_or_else(|| {
                EncodeError::ContainerHeader(format!(
                    "unknown colour-space tag {colorspace_tag:?}"
                ))
            })?;

        Ok(Self {
            width,
            height,
            frame_rate,
            interlacing,
            pixel_aspect,
            colorspace_tag,
            extension: extension.filter(|e| extension_is_valid(e)).map(String::from),
        })
    }

    /// Exact ASCII header line, newline-terminated.
    pub fn serialize(&self) -> Vec<u8> {
        let mut line = format!(
            "YUV4MPEG2 W{} H{} F{}:{} I{} A{}:{} {}",
            self.width,
            self.height,
            self.frame_rate.0,
            self.frame_rate.1,
            self.interlacing.flag(),
            self.pixel_aspect.0,
            self.pixel_aspect.1,
            self.colorspace_tag,
        );
        if let Some(ext) = &self.extension {
            line.push_str(" X");
            line.push_str(ext);
        }
        line.push('\n');
        line.into_bytes()
    }
}

/// Printable, non-space, non-DEL ASCII only, 1..=200 bytes.
fn extension_is_valid(ext: &str) -> bool {
    !ext.is_empty() && ext.len() <= 200 && ext.bytes().all(|b| (33..=126).contains(&b))
}

/// Write the stream header line. Once per session, before any frame.
pub fn write_stream_header<W: Write>(stream: &mut W, header: &StreamHeader) -> io::Result<()> {
    stream.write_all(&header.serialize())
}

/// Write the 6-byte `FRAME\n` marker that precedes each frame's plane
/// bytes.
pub fn write_frame_marker<W: Write>(stream: &mut W) -> io::Result<()> {
    stream.write_all(FRAME_MARKER)
}
