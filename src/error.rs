use std::path::PathBuf;

/// Errors from BMP decoding and Y4M encoding.
///
/// Every variant is fatal for the whole encode session; nothing is
/// retried. Variants carry enough context (path, expected vs. actual
/// values) for the caller to build a user-facing message.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EncodeError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid BMP format in {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    #[error(
        "dimension mismatch in {}: expected {expected_width}x{expected_height} \
         (from first frame), got {width}x{height}",
        path.display()
    )]
    DimensionMismatch {
        path: PathBuf,
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    #[error("{colorspace} cropping of {width}x{height} input leaves no pixels")]
    ZeroSizeOutput {
        colorspace: &'static str,
        width: u32,
        height: u32,
    },

    #[error("pixel buffer allocation rejected: {0}")]
    Allocation(String),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid Y4M stream header: {0}")]
    ContainerHeader(String),

    #[error("no BMP files to encode")]
    EmptyInput,
}
