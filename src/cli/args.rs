//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::config::file::DEFAULT_CONFIG_FILE;
use crate::domain::model::{PanDirection, WatermarkPosition, ZoomDirection};
use crate::engine::FFMPEG_ENV;

fn parse_crf(s: &str) -> Result<u8, String> {
    clap_num::number_range(s, 0, 51)
}

fn parse_unit(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("`{}` is not a number", s))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} is not in 0..=1", value))
    }
}

/// Arguments for the video command
#[derive(Args, Debug, Default)]
pub struct VideoArgs {
    /// Audio track (wav, mp3, aac, flac, ogg, m4a)
    #[arg(short, long)]
    pub audio: PathBuf,

    /// Image directory or single image
    #[arg(short, long, default_value = ".")]
    pub images: PathBuf,

    /// Output video file
    #[arg(short, long, default_value = "slideshow.mp4")]
    pub output: PathBuf,

    /// Project config file (TOML, or YAML for .yaml/.yml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Style preset (fast, cinematic, slow, dynamic, minimal)
    #[arg(long)]
    pub preset: Option<String>,

    /// Export profile, e.g. youtube or instagram_reels
    #[arg(long)]
    pub export: Option<String>,

    /// Render a fast low-quality preview
    #[arg(long)]
    pub preview: bool,

    /// Seed for shuffle and random motion, to reproduce a run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the ffmpeg command instead of running it
    #[arg(long)]
    pub dry_run: bool,

    /// Emit progress and results as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Seconds each image is shown
    #[arg(short, long)]
    pub duration: Option<f64>,

    /// Crossfade length in seconds
    #[arg(short = 'x', long)]
    pub crossfade: Option<f64>,

    /// Output frame rate
    #[arg(short, long)]
    pub fps: Option<u32>,

    /// Output width
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Output height
    #[arg(short = 'g', long)]
    pub height: Option<u32>,

    /// Zoom intensity (0.08 = 8%)
    #[arg(long)]
    pub zoom: Option<f64>,

    /// Pan intensity (0.25 = 25% of the spare width)
    #[arg(long)]
    pub pan: Option<f64>,

    /// Zoom direction
    #[arg(long, value_parser = clap::value_parser!(ZoomDirection))]
    pub zoom_dir: Option<ZoomDirection>,

    /// Pan direction
    #[arg(long, value_parser = clap::value_parser!(PanDirection))]
    pub pan_dir: Option<PanDirection>,

    /// Transition name, or "random"
    #[arg(long)]
    pub transition: Option<String>,

    /// Shuffle image order
    #[arg(long, conflicts_with = "reverse")]
    pub shuffle: bool,

    /// Reverse image order
    #[arg(long)]
    pub reverse: bool,

    /// Constant Rate Factor (0-51, lower is better)
    #[arg(short, long, value_parser = parse_crf)]
    pub quality: Option<u8>,

    /// Watermark image
    #[arg(long)]
    pub watermark: Option<PathBuf>,

    /// Watermark position
    #[arg(long, value_parser = clap::value_parser!(WatermarkPosition))]
    pub watermark_pos: Option<WatermarkPosition>,

    /// Watermark opacity (0-1)
    #[arg(long, value_parser = parse_unit)]
    pub watermark_opacity: Option<f64>,

    /// Watermark width as a fraction of the video width (0-1)
    #[arg(long, value_parser = parse_unit)]
    pub watermark_scale: Option<f64>,

    /// Title card text
    #[arg(long)]
    pub title: Option<String>,

    /// Title card subtitle
    #[arg(long, requires = "title")]
    pub subtitle: Option<String>,

    /// Path to the ffmpeg binary
    #[arg(long, env = FFMPEG_ENV)]
    pub ffmpeg: Option<PathBuf>,
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where to write the config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}
