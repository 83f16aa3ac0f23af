// Project config file - TOML by default, YAML for .yaml/.yml

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{
    SettingsOverlay, TitleOverlay, VideoOverlay, WatermarkOverlay, DEFAULT_AUDIO_BITRATE,
    DEFAULT_CROSSFADE, DEFAULT_CRF, DEFAULT_FPS, DEFAULT_HEIGHT, DEFAULT_IMAGE_DURATION,
    DEFAULT_PAN_INTENSITY, DEFAULT_VERTICAL_POSITION, DEFAULT_WIDTH, DEFAULT_ZOOM_INTENSITY,
};
use crate::domain::model::{OrderMode, PanDirection, WatermarkPosition, ZoomDirection};
use crate::error::{PanZoomError, PanZoomResult};

/// Default file written by `panzoom init`
pub const DEFAULT_CONFIG_FILE: &str = "panzoom.yaml";

/// On-disk project configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Engine binary, used when neither --ffmpeg nor PANZOOM_FFMPEG is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ffmpeg_path: Option<PathBuf>,
    pub video: VideoOverlay,
    pub watermark: WatermarkOverlay,
    pub title: TitleOverlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Yaml,
}

impl FileFormat {
    fn of(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            _ => FileFormat::Toml,
        }
    }
}

impl ConfigFile {
    /// Read and parse a config file
    pub fn load(path: &Path) -> PanZoomResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| config_error(path, e))?;
        let config = Self::parse(&content, path)?;
        info!("Loaded config file: {}", path.display());
        Ok(config)
    }

    /// Parse config text, choosing the format from `path`'s extension
    pub fn parse(content: &str, path: &Path) -> PanZoomResult<Self> {
        match FileFormat::of(path) {
            FileFormat::Toml => toml::from_str(content).map_err(|e| config_error(path, e)),
            FileFormat::Yaml => serde_yaml::from_str(content).map_err(|e| config_error(path, e)),
        }
    }

    /// Serialize in the format matching `path`
    pub fn render(&self, path: &Path) -> PanZoomResult<String> {
        match FileFormat::of(path) {
            FileFormat::Toml => toml::to_string_pretty(self).map_err(|e| config_error(path, e)),
            FileFormat::Yaml => serde_yaml::to_string(self).map_err(|e| config_error(path, e)),
        }
    }

    /// Write the config, creating parent directories as needed
    pub fn save(&self, path: &Path) -> PanZoomResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = self.render(path)?;
        std::fs::write(path, content)?;
        info!("Saved config file: {}", path.display());
        Ok(())
    }

    /// Settings layer contributed by this file
    pub fn overlay(&self) -> SettingsOverlay {
        SettingsOverlay {
            video: self.video.clone(),
            watermark: self.watermark.clone(),
            title: self.title.clone(),
        }
    }

    /// Every setting spelled out with its built-in default
    pub fn with_defaults() -> Self {
        ConfigFile {
            ffmpeg_path: None,
            video: VideoOverlay {
                image_duration: Some(DEFAULT_IMAGE_DURATION),
                crossfade: Some(DEFAULT_CROSSFADE),
                fps: Some(DEFAULT_FPS),
                width: Some(DEFAULT_WIDTH),
                height: Some(DEFAULT_HEIGHT),
                zoom_intensity: Some(DEFAULT_ZOOM_INTENSITY),
                pan_intensity: Some(DEFAULT_PAN_INTENSITY),
                vertical_position: Some(DEFAULT_VERTICAL_POSITION),
                zoom_direction: Some(ZoomDirection::Alternate),
                pan_direction: Some(PanDirection::Alternate),
                transition: Some("fade".to_string()),
                order: Some(OrderMode::Natural),
                crf: Some(DEFAULT_CRF),
                encoder_preset: Some("slow".to_string()),
                video_codec: Some("libx264".to_string()),
                audio_codec: Some("aac".to_string()),
                audio_bitrate: Some(DEFAULT_AUDIO_BITRATE.to_string()),
            },
            watermark: WatermarkOverlay {
                enabled: Some(false),
                image_path: None,
                position: Some(WatermarkPosition::BottomRight),
                opacity: Some(0.7),
                scale: Some(0.15),
                margin: Some(20),
            },
            title: TitleOverlay {
                enabled: Some(false),
                text: None,
                subtitle: None,
                duration: Some(4.0),
                font_size: Some(72),
                subtitle_size: Some(36),
                font_color: Some("white".to_string()),
                background_color: Some("black".to_string()),
                fade_in: Some(1.0),
                fade_out: Some(1.0),
                font_file: None,
            },
        }
    }
}

fn config_error(path: &Path, e: impl std::fmt::Display) -> PanZoomError {
    PanZoomError::Config {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}
