use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bmp2y4m::{encode_to_path, ColorSpace, EncodeConfig, Limits};

#[derive(Parser, Debug)]
#[command(name = "bmp2y4m", version, about = "Convert a directory of BMP stills into a Y4M video")]
struct Args {
    /// Directory containing the .bmp frames
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Output .y4m path (default: Y4M_Video_<unix-secs>.y4m inside DIR)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Chroma subsampling layout
    #[arg(short = 'c', long, value_enum, default_value = "420")]
    colorspace: Subsampling,

    /// Frame rate numerator
    #[arg(long, default_value_t = 30)]
    fps_num: u32,

    /// Frame rate denominator
    #[arg(long, default_value_t = 1)]
    fps_den: u32,

    /// Delete each source BMP once its frame is written
    #[arg(long)]
    delete: bool,

    /// Free-form header extension (serialized as " X<ext>")
    #[arg(long)]
    extension: Option<String>,

    /// Refuse frames with more pixels than this
    #[arg(long)]
    max_pixels: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Subsampling {
    #[value(name = "444")]
    S444,
    #[value(name = "422")]
    S422,
    #[value(name = "420")]
    S420,
    #[value(name = "411")]
    S411,
    #[value(name = "410")]
    S410,
}

impl From<Subsampling> for ColorSpace {
    fn from(s: Subsampling) -> Self {
        match s {
            Subsampling::S444 => ColorSpace::C444,
            Subsampling::S422 => ColorSpace::C422,
            Subsampling::S420 => ColorSpace::C420,
            Subsampling::S411 => ColorSpace::C411,
            Subsampling::S410 => ColorSpace::C410,
        }
    }
}

/// Collect `*.bmp` paths from `dir`, sorted alphabetically without
/// regard to case, so numbered frames encode in order regardless of
/// directory iteration order.
fn collect_bmp_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("cannot read directory {}", dir.display()))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("bmp"))
        })
        .collect();

    paths.sort_by_key(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default()
    });
    Ok(paths)
}

fn default_output_path(dir: &Path) -> PathBuf {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    dir.join(format!("Y4M_Video_{secs}.y4m"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if !args.dir.is_dir() {
        bail!("{} is not a directory", args.dir.display());
    }

    let paths = collect_bmp_paths(&args.dir)?;
    if paths.is_empty() {
        bail!("no BMP files found in {}", args.dir.display());
    }

    let output = args.output.unwrap_or_else(|| default_output_path(&args.dir));
    let config = EncodeConfig {
        colorspace: args.colorspace.into(),
        frame_rate: (args.fps_num, args.fps_den),
        delete_sources: args.delete,
        extension: args.extension,
        limits: Limits {
            max_pixels: args.max_pixels,
            ..Limits::default()
        },
    };

    let started = Instant::now();
    let summary = encode_to_path(&paths, &config, &output)
        .with_context(|| format!("encoding to {}", output.display()))?;

    info!(
        frames = summary.frames,
        bytes = summary.bytes_written,
        elapsed_secs = started.elapsed().as_secs_f64(),
        output = %output.display(),
        "video written"
    );
    Ok(())
}
