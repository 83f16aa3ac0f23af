// Domain models - resolved settings, motion directions and per-image slots

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{EncoderPreset, TransitionChoice, TransitionKind};
use crate::error::PanZoomError;

/// Zoom direction setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    In,
    Out,
    #[default]
    Alternate,
    Random,
}

/// Pan direction setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanDirection {
    Left,
    Right,
    #[default]
    Alternate,
    Random,
}

/// Concrete zoom for one image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ZoomMotion {
    In,
    Out,
}

/// Concrete horizontal drift for one image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PanMotion {
    LeftToRight,
    RightToLeft,
}

/// Image ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderMode {
    #[default]
    Natural,
    Shuffle,
    Reverse,
}

/// Watermark anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

impl ZoomDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoomDirection::In => "in",
            ZoomDirection::Out => "out",
            ZoomDirection::Alternate => "alternate",
            ZoomDirection::Random => "random",
        }
    }
}

impl PanDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanDirection::Left => "left",
            PanDirection::Right => "right",
            PanDirection::Alternate => "alternate",
            PanDirection::Random => "random",
        }
    }
}

impl OrderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderMode::Natural => "natural",
            OrderMode::Shuffle => "shuffle",
            OrderMode::Reverse => "reverse",
        }
    }
}

impl WatermarkPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatermarkPosition::TopLeft => "top-left",
            WatermarkPosition::TopRight => "top-right",
            WatermarkPosition::BottomLeft => "bottom-left",
            WatermarkPosition::BottomRight => "bottom-right",
            WatermarkPosition::Center => "center",
        }
    }
}

impl FromStr for ZoomDirection {
    type Err = PanZoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in" => Ok(ZoomDirection::In),
            "out" => Ok(ZoomDirection::Out),
            "alternate" => Ok(ZoomDirection::Alternate),
            "random" => Ok(ZoomDirection::Random),
            _ => Err(PanZoomError::validation(format!(
                "Unknown zoom direction: {}. Use in, out, alternate or random",
                s
            ))),
        }
    }
}

impl FromStr for PanDirection {
    type Err = PanZoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(PanDirection::Left),
            "right" => Ok(PanDirection::Right),
            "alternate" => Ok(PanDirection::Alternate),
            "random" => Ok(PanDirection::Random),
            _ => Err(PanZoomError::validation(format!(
                "Unknown pan direction: {}. Use left, right, alternate or random",
                s
            ))),
        }
    }
}

impl FromStr for OrderMode {
    type Err = PanZoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "natural" => Ok(OrderMode::Natural),
            "shuffle" => Ok(OrderMode::Shuffle),
            "reverse" => Ok(OrderMode::Reverse),
            _ => Err(PanZoomError::validation(format!(
                "Unknown order: {}. Use natural, shuffle or reverse",
                s
            ))),
        }
    }
}

impl FromStr for WatermarkPosition {
    type Err = PanZoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "top-left" => Ok(WatermarkPosition::TopLeft),
            "top-right" => Ok(WatermarkPosition::TopRight),
            "bottom-left" => Ok(WatermarkPosition::BottomLeft),
            "bottom-right" => Ok(WatermarkPosition::BottomRight),
            "center" => Ok(WatermarkPosition::Center),
            _ => Err(PanZoomError::validation(format!(
                "Unknown watermark position: {}. Use top-left, top-right, bottom-left, bottom-right or center",
                s
            ))),
        }
    }
}

impl fmt::Display for ZoomMotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoomMotion::In => f.write_str("in"),
            ZoomMotion::Out => f.write_str("out"),
        }
    }
}

impl fmt::Display for PanMotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanMotion::LeftToRight => f.write_str("left-to-right"),
            PanMotion::RightToLeft => f.write_str("right-to-left"),
        }
    }
}

/// Watermark overlay settings
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkSpec {
    pub path: PathBuf,
    pub position: WatermarkPosition,
    /// 0.0 - 1.0
    pub opacity: f64,
    /// Fraction of the output width
    pub scale: f64,
    /// Pixels from the anchored edges
    pub margin: u32,
}

/// Title card shown before the first image
#[derive(Debug, Clone, PartialEq)]
pub struct TitleSpec {
    pub text: String,
    pub subtitle: Option<String>,
    pub duration: f64,
    pub font_size: u32,
    pub subtitle_size: u32,
    pub font_color: String,
    pub background_color: String,
    pub fade_in: f64,
    pub fade_out: f64,
    pub font_file: Option<PathBuf>,
}

/// Fully merged and validated render settings
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    pub image_duration: f64,
    pub crossfade: f64,
    pub zoom_intensity: f64,
    pub pan_intensity: f64,
    pub vertical_position: f64,
    pub zoom_direction: ZoomDirection,
    pub pan_direction: PanDirection,
    pub transition: TransitionChoice,
    pub order: OrderMode,
    pub crf: u8,
    pub encoder_preset: EncoderPreset,
    pub video_codec: String,
    pub audio_codec: String,
    pub audio_bitrate: String,
    pub watermark: Option<WatermarkSpec>,
    pub title: Option<TitleSpec>,
}

impl ResolvedSettings {
    /// Low-resolution variant for quick previews
    pub fn preview(&self) -> Self {
        Self {
            width: 640,
            height: 360,
            fps: 15,
            crf: 35,
            encoder_preset: EncoderPreset::Ultrafast,
            audio_bitrate: "96k".to_string(),
            ..self.clone()
        }
    }

    /// Frames each image is displayed for, never fewer than two
    pub fn frames_per_image(&self) -> u32 {
        ((self.image_duration * self.fps as f64).round() as u32).max(2)
    }

    /// Planned output length in seconds for `images` inputs, title included
    pub fn total_duration(&self, images: usize) -> f64 {
        if images == 0 {
            return 0.0;
        }
        let n = images as f64;
        let slideshow = n * self.image_duration - (n - 1.0) * self.crossfade;
        slideshow + self.title.as_ref().map_or(0.0, |t| t.duration)
    }

    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// One image in the final sequence with its motion resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSlot {
    pub path: PathBuf,
    pub index: usize,
    pub frame_count: u32,
    pub zoom: ZoomMotion,
    pub pan: PanMotion,
    /// Transition from the previous slot; `None` for the first
    pub transition_in: Option<TransitionKind>,
}
