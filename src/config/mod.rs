//! Layered settings resolution
//!
//! Every source of settings (CLI flags, export profile, style preset, config
//! file) is expressed as a [`SettingsOverlay`] of optional fields. Overlays are
//! merged highest precedence first and the result is validated into a
//! [`ResolvedSettings`].

pub mod file;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::catalog::{
    EncoderPreset, ExportProfile, Preset, PresetValues, ProfileValues, TransitionChoice,
};
use crate::domain::model::{
    OrderMode, PanDirection, ResolvedSettings, TitleSpec, WatermarkPosition, WatermarkSpec,
    ZoomDirection,
};
use crate::error::{PanZoomError, PanZoomResult};

pub const DEFAULT_IMAGE_DURATION: f64 = 10.0;
pub const DEFAULT_CROSSFADE: f64 = 2.0;
pub const DEFAULT_FPS: u32 = 60;
pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;
pub const DEFAULT_ZOOM_INTENSITY: f64 = 0.08;
pub const DEFAULT_PAN_INTENSITY: f64 = 0.25;
pub const DEFAULT_VERTICAL_POSITION: f64 = 0.22;
pub const DEFAULT_CRF: u8 = 18;
pub const DEFAULT_AUDIO_BITRATE: &str = "320k";

/// Zoom intensities above this still render but tend to look jumpy
pub const RECOMMENDED_MAX_ZOOM: f64 = 0.2;

/// Video and encoding fields of one settings layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoOverlay {
    #[serde(rename = "duration", skip_serializing_if = "Option::is_none")]
    pub image_duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crossfade: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_intensity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan_intensity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_position: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_direction: Option<ZoomDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan_direction: Option<PanDirection>,
    /// Catalog name or "random"; checked during resolution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crf: Option<u8>,
    #[serde(rename = "preset", skip_serializing_if = "Option::is_none")]
    pub encoder_preset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_codec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_bitrate: Option<String>,
}

/// Watermark fields of one settings layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkOverlay {
    /// Defaults to "on when an image path is set"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<WatermarkPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<u32>,
}

/// Title card fields of one settings layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleOverlay {
    /// Defaults to "on when text is set"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade_in: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade_out: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_file: Option<PathBuf>,
}

/// One layer of settings; `None` means "not set here"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverlay {
    pub video: VideoOverlay,
    pub watermark: WatermarkOverlay,
    pub title: TitleOverlay,
}

impl VideoOverlay {
    /// Fill unset fields from `lower`
    pub fn merge(self, lower: VideoOverlay) -> VideoOverlay {
        VideoOverlay {
            image_duration: self.image_duration.or(lower.image_duration),
            crossfade: self.crossfade.or(lower.crossfade),
            fps: self.fps.or(lower.fps),
            width: self.width.or(lower.width),
            height: self.height.or(lower.height),
            zoom_intensity: self.zoom_intensity.or(lower.zoom_intensity),
            pan_intensity: self.pan_intensity.or(lower.pan_intensity),
            vertical_position: self.vertical_position.or(lower.vertical_position),
            zoom_direction: self.zoom_direction.or(lower.zoom_direction),
            pan_direction: self.pan_direction.or(lower.pan_direction),
            transition: self.transition.or(lower.transition),
            order: self.order.or(lower.order),
            crf: self.crf.or(lower.crf),
            encoder_preset: self.encoder_preset.or(lower.encoder_preset),
            video_codec: self.video_codec.or(lower.video_codec),
            audio_codec: self.audio_codec.or(lower.audio_codec),
            audio_bitrate: self.audio_bitrate.or(lower.audio_bitrate),
        }
    }
}

impl WatermarkOverlay {
    pub fn merge(self, lower: WatermarkOverlay) -> WatermarkOverlay {
        WatermarkOverlay {
            enabled: self.enabled.or(lower.enabled),
            image_path: self.image_path.or(lower.image_path),
            position: self.position.or(lower.position),
            opacity: self.opacity.or(lower.opacity),
            scale: self.scale.or(lower.scale),
            margin: self.margin.or(lower.margin),
        }
    }
}

impl TitleOverlay {
    pub fn merge(self, lower: TitleOverlay) -> TitleOverlay {
        TitleOverlay {
            enabled: self.enabled.or(lower.enabled),
            text: self.text.or(lower.text),
            subtitle: self.subtitle.or(lower.subtitle),
            duration: self.duration.or(lower.duration),
            font_size: self.font_size.or(lower.font_size),
            subtitle_size: self.subtitle_size.or(lower.subtitle_size),
            font_color: self.font_color.or(lower.font_color),
            background_color: self.background_color.or(lower.background_color),
            fade_in: self.fade_in.or(lower.fade_in),
            fade_out: self.fade_out.or(lower.fade_out),
            font_file: self.font_file.or(lower.font_file),
        }
    }
}

impl SettingsOverlay {
    /// Layer `self` on top of `lower`
    pub fn merge(self, lower: SettingsOverlay) -> SettingsOverlay {
        SettingsOverlay {
            video: self.video.merge(lower.video),
            watermark: self.watermark.merge(lower.watermark),
            title: self.title.merge(lower.title),
        }
    }
}

impl From<PresetValues> for SettingsOverlay {
    fn from(values: PresetValues) -> Self {
        SettingsOverlay {
            video: VideoOverlay {
                image_duration: Some(values.image_duration),
                crossfade: Some(values.crossfade),
                fps: Some(values.fps),
                zoom_intensity: Some(values.zoom_intensity),
                pan_intensity: Some(values.pan_intensity),
                encoder_preset: Some(values.encoder_preset.to_string()),
                crf: Some(values.crf),
                ..VideoOverlay::default()
            },
            ..SettingsOverlay::default()
        }
    }
}

impl From<ProfileValues> for SettingsOverlay {
    fn from(values: ProfileValues) -> Self {
        SettingsOverlay {
            video: VideoOverlay {
                width: Some(values.width),
                height: Some(values.height),
                fps: Some(values.fps),
                crf: Some(values.crf),
                encoder_preset: Some(values.encoder_preset.to_string()),
                audio_bitrate: Some(values.audio_bitrate.to_string()),
                ..VideoOverlay::default()
            },
            ..SettingsOverlay::default()
        }
    }
}

/// Merge all layers and validate the result.
///
/// Precedence, highest first: `explicit`, export profile, preset, config file,
/// built-in defaults.
pub fn resolve(
    explicit: &SettingsOverlay,
    preset: Option<&str>,
    profile: Option<&str>,
    config_file: Option<&SettingsOverlay>,
) -> PanZoomResult<ResolvedSettings> {
    let profile_layer = match profile {
        Some(name) => {
            let profile: ExportProfile = name.parse()?;
            info!("Applying export profile: {}", profile.values().label);
            SettingsOverlay::from(profile.values())
        }
        None => SettingsOverlay::default(),
    };

    let preset_layer = match preset {
        Some(name) => {
            let preset: Preset = name.parse()?;
            info!("Applying preset: {}", preset.as_str());
            SettingsOverlay::from(preset.values())
        }
        None => SettingsOverlay::default(),
    };

    let file_layer = config_file.cloned().unwrap_or_default();

    let merged = explicit
        .clone()
        .merge(profile_layer)
        .merge(preset_layer)
        .merge(file_layer);
    debug!("Merged settings overlay: {:?}", merged);

    build(merged)
}

fn build(overlay: SettingsOverlay) -> PanZoomResult<ResolvedSettings> {
    let v = overlay.video;

    let image_duration = v.image_duration.unwrap_or(DEFAULT_IMAGE_DURATION);
    if !image_duration.is_finite() || image_duration <= 0.0 {
        return Err(PanZoomError::validation(format!(
            "Image duration must be positive, got {}",
            image_duration
        )));
    }

    let crossfade = v.crossfade.unwrap_or(DEFAULT_CROSSFADE);
    if !crossfade.is_finite() || crossfade < 0.0 {
        return Err(PanZoomError::validation(format!(
            "Crossfade cannot be negative, got {}",
            crossfade
        )));
    }
    if crossfade >= image_duration {
        return Err(PanZoomError::validation(format!(
            "Crossfade ({}s) must be shorter than the image duration ({}s)",
            crossfade, image_duration
        )));
    }

    let fps = v.fps.unwrap_or(DEFAULT_FPS);
    if fps == 0 {
        return Err(PanZoomError::validation("Frame rate must be positive"));
    }

    let width = v.width.unwrap_or(DEFAULT_WIDTH);
    let height = v.height.unwrap_or(DEFAULT_HEIGHT);
    if width == 0 || height == 0 {
        return Err(PanZoomError::validation(format!(
            "Resolution must be positive, got {}x{}",
            width, height
        )));
    }
    if width % 2 != 0 || height % 2 != 0 {
        return Err(PanZoomError::validation(format!(
            "Resolution must be even for yuv420p output, got {}x{}",
            width, height
        )));
    }

    let zoom_intensity = v.zoom_intensity.unwrap_or(DEFAULT_ZOOM_INTENSITY);
    if !zoom_intensity.is_finite() || zoom_intensity < 0.0 {
        return Err(PanZoomError::validation(format!(
            "Zoom intensity cannot be negative, got {}",
            zoom_intensity
        )));
    }
    if zoom_intensity > RECOMMENDED_MAX_ZOOM {
        warn!(
            "Zoom intensity {} is above the recommended maximum of {}",
            zoom_intensity, RECOMMENDED_MAX_ZOOM
        );
    }

    let pan_intensity = v.pan_intensity.unwrap_or(DEFAULT_PAN_INTENSITY);
    check_unit_range("Pan intensity", pan_intensity)?;

    let vertical_position = v.vertical_position.unwrap_or(DEFAULT_VERTICAL_POSITION);
    check_unit_range("Vertical position", vertical_position)?;

    let crf = v.crf.unwrap_or(DEFAULT_CRF);
    if crf > 51 {
        return Err(PanZoomError::validation(format!(
            "CRF must be between 0 and 51, got {}",
            crf
        )));
    }

    let encoder_preset = match v.encoder_preset {
        Some(name) => name.parse()?,
        None => EncoderPreset::Slow,
    };

    let transition = match v.transition {
        Some(name) => name.parse()?,
        None => TransitionChoice::default(),
    };

    let audio_bitrate = v
        .audio_bitrate
        .unwrap_or_else(|| DEFAULT_AUDIO_BITRATE.to_string());
    if !is_valid_bitrate(&audio_bitrate) {
        return Err(PanZoomError::validation(format!(
            "Invalid audio bitrate: {} (expected e.g. 320k)",
            audio_bitrate
        )));
    }

    let settings = ResolvedSettings {
        fps,
        width,
        height,
        image_duration,
        crossfade,
        zoom_intensity,
        pan_intensity,
        vertical_position,
        zoom_direction: v.zoom_direction.unwrap_or_default(),
        pan_direction: v.pan_direction.unwrap_or_default(),
        transition,
        order: v.order.unwrap_or_default(),
        crf,
        encoder_preset,
        video_codec: v.video_codec.unwrap_or_else(|| "libx264".to_string()),
        audio_codec: v.audio_codec.unwrap_or_else(|| "aac".to_string()),
        audio_bitrate,
        watermark: build_watermark(overlay.watermark)?,
        title: build_title(overlay.title)?,
    };

    info!(
        "Resolved settings: {} @ {}fps, {}s per image, {}s crossfade, transition {}",
        settings.resolution(),
        settings.fps,
        settings.image_duration,
        settings.crossfade,
        settings.transition
    );

    Ok(settings)
}

fn build_watermark(overlay: WatermarkOverlay) -> PanZoomResult<Option<WatermarkSpec>> {
    let path = overlay
        .image_path
        .filter(|p| !p.as_os_str().is_empty());
    let enabled = overlay.enabled.unwrap_or(path.is_some());
    if !enabled {
        return Ok(None);
    }

    let path = path.ok_or_else(|| {
        PanZoomError::validation("Watermark is enabled but no image path is set")
    })?;
    if !path.is_file() {
        return Err(PanZoomError::validation(format!(
            "Watermark image not found: {}",
            path.display()
        )));
    }

    let opacity = overlay.opacity.unwrap_or(0.7);
    check_unit_range("Watermark opacity", opacity)?;

    let scale = overlay.scale.unwrap_or(0.15);
    check_unit_range("Watermark scale", scale)?;
    if scale == 0.0 {
        return Err(PanZoomError::validation("Watermark scale must be above 0"));
    }

    Ok(Some(WatermarkSpec {
        path,
        position: overlay.position.unwrap_or_default(),
        opacity,
        scale,
        margin: overlay.margin.unwrap_or(20),
    }))
}

fn build_title(overlay: TitleOverlay) -> PanZoomResult<Option<TitleSpec>> {
    let enabled = overlay.enabled.unwrap_or(overlay.text.is_some());
    if !enabled {
        return Ok(None);
    }

    let text = overlay.text.unwrap_or_default();
    if text.trim().is_empty() {
        return Err(PanZoomError::validation("Title text cannot be empty"));
    }

    let duration = overlay.duration.unwrap_or(4.0);
    if !duration.is_finite() || duration <= 0.0 {
        return Err(PanZoomError::validation(format!(
            "Title duration must be positive, got {}",
            duration
        )));
    }

    let fade_in = overlay.fade_in.unwrap_or(1.0);
    let fade_out = overlay.fade_out.unwrap_or(1.0);
    if fade_in < 0.0 || fade_out < 0.0 {
        return Err(PanZoomError::validation("Title fades cannot be negative"));
    }

    Ok(Some(TitleSpec {
        text,
        subtitle: overlay.subtitle.filter(|s| !s.trim().is_empty()),
        duration,
        font_size: overlay.font_size.unwrap_or(72),
        subtitle_size: overlay.subtitle_size.unwrap_or(36),
        font_color: overlay.font_color.unwrap_or_else(|| "white".to_string()),
        background_color: overlay
            .background_color
            .unwrap_or_else(|| "black".to_string()),
        fade_in,
        fade_out,
        font_file: overlay.font_file,
    }))
}

fn check_unit_range(what: &str, value: f64) -> PanZoomResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(PanZoomError::validation(format!(
            "{} must be between 0.0 and 1.0, got {}",
            what, value
        )));
    }
    Ok(())
}

/// Digits with an optional `k`/`M` suffix, e.g. `320k`
pub fn is_valid_bitrate(value: &str) -> bool {
    let digits = value
        .strip_suffix('k')
        .or_else(|| value.strip_suffix('K'))
        .or_else(|| value.strip_suffix('M'))
        .unwrap_or(value);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::TransitionKind;

    fn explicit(video: VideoOverlay) -> SettingsOverlay {
        SettingsOverlay {
            video,
            ..SettingsOverlay::default()
        }
    }

    #[test]
    fn test_defaults() {
        let s = resolve(&SettingsOverlay::default(), None, None, None).unwrap();
        assert_eq!((s.width, s.height, s.fps), (1920, 1080, 60));
        assert_eq!(s.image_duration, 10.0);
        assert_eq!(s.crossfade, 2.0);
        assert_eq!(s.vertical_position, 0.22);
        assert_eq!(s.transition, TransitionChoice::Fixed(TransitionKind::Fade));
        assert_eq!(s.encoder_preset, EncoderPreset::Slow);
        assert_eq!(s.audio_bitrate, "320k");
        assert!(s.watermark.is_none());
        assert!(s.title.is_none());
    }

    #[test]
    fn test_precedence_explicit_over_profile_over_preset_over_file() {
        let file = explicit(VideoOverlay {
            fps: Some(24),
            crf: Some(30),
            zoom_intensity: Some(0.01),
            vertical_position: Some(0.5),
            ..VideoOverlay::default()
        });
        let cli = explicit(VideoOverlay {
            crf: Some(10),
            ..VideoOverlay::default()
        });

        let s = resolve(&cli, Some("dynamic"), Some("instagram_feed"), Some(&file)).unwrap();

        assert_eq!(s.crf, 10); // explicit
        assert_eq!(s.fps, 30); // profile beats preset's 60
        assert_eq!((s.width, s.height), (1080, 1080)); // profile
        assert_eq!(s.zoom_intensity, 0.12); // preset beats file
        assert_eq!(s.vertical_position, 0.5); // file beats default
        assert_eq!(s.image_duration, 8.0); // preset
    }

    #[test]
    fn test_crossfade_equal_to_duration_is_rejected() {
        let cli = explicit(VideoOverlay {
            image_duration: Some(2.0),
            crossfade: Some(2.0),
            ..VideoOverlay::default()
        });
        let err = resolve(&cli, None, None, None).unwrap_err();
        assert!(matches!(err, PanZoomError::Validation { .. }));
    }

    #[test]
    fn test_unknown_transition() {
        let cli = explicit(VideoOverlay {
            transition: Some("sparkle".to_string()),
            ..VideoOverlay::default()
        });
        let err = resolve(&cli, None, None, None).unwrap_err();
        assert!(matches!(err, PanZoomError::UnknownTransition { .. }));
    }

    #[test]
    fn test_random_transition_is_accepted() {
        let cli = explicit(VideoOverlay {
            transition: Some("random".to_string()),
            ..VideoOverlay::default()
        });
        let s = resolve(&cli, None, None, None).unwrap();
        assert_eq!(s.transition, TransitionChoice::Random);
    }

    #[test]
    fn test_unknown_preset_and_profile() {
        let none = SettingsOverlay::default();
        assert!(matches!(
            resolve(&none, Some("turbo"), None, None),
            Err(PanZoomError::Validation { .. })
        ));
        assert!(matches!(
            resolve(&none, None, Some("myspace"), None),
            Err(PanZoomError::Validation { .. })
        ));
    }

    #[test]
    fn test_odd_resolution_is_rejected() {
        let cli = explicit(VideoOverlay {
            width: Some(1921),
            ..VideoOverlay::default()
        });
        assert!(resolve(&cli, None, None, None).is_err());
    }

    #[test]
    fn test_range_checks() {
        for video in [
            VideoOverlay {
                pan_intensity: Some(1.5),
                ..VideoOverlay::default()
            },
            VideoOverlay {
                zoom_intensity: Some(-0.1),
                ..VideoOverlay::default()
            },
            VideoOverlay {
                crf: Some(52),
                ..VideoOverlay::default()
            },
            VideoOverlay {
                fps: Some(0),
                ..VideoOverlay::default()
            },
            VideoOverlay {
                audio_bitrate: Some("loud".to_string()),
                ..VideoOverlay::default()
            },
            VideoOverlay {
                encoder_preset: Some("warp".to_string()),
                ..VideoOverlay::default()
            },
        ] {
            let err = resolve(&explicit(video.clone()), None, None, None).unwrap_err();
            assert!(
                matches!(err, PanZoomError::Validation { .. }),
                "{:?}",
                video
            );
        }
    }

    #[test]
    fn test_large_zoom_is_not_clamped() {
        let cli = explicit(VideoOverlay {
            zoom_intensity: Some(0.5),
            ..VideoOverlay::default()
        });
        assert_eq!(resolve(&cli, None, None, None).unwrap().zoom_intensity, 0.5);
    }

    #[test]
    fn test_missing_watermark_file_is_rejected() {
        let cli = SettingsOverlay {
            watermark: WatermarkOverlay {
                image_path: Some(PathBuf::from("/definitely/not/here.png")),
                ..WatermarkOverlay::default()
            },
            ..SettingsOverlay::default()
        };
        assert!(matches!(
            resolve(&cli, None, None, None),
            Err(PanZoomError::Validation { .. })
        ));
    }

    #[test]
    fn test_disabled_watermark_in_file_is_ignored() {
        let file = SettingsOverlay {
            watermark: WatermarkOverlay {
                enabled: Some(false),
                image_path: Some(PathBuf::from("/definitely/not/here.png")),
                ..WatermarkOverlay::default()
            },
            ..SettingsOverlay::default()
        };
        let s = resolve(&SettingsOverlay::default(), None, None, Some(&file)).unwrap();
        assert!(s.watermark.is_none());
    }

    #[test]
    fn test_title_defaults_and_empty_text() {
        let cli = SettingsOverlay {
            title: TitleOverlay {
                text: Some("Summer 2024".to_string()),
                subtitle: Some(String::new()),
                ..TitleOverlay::default()
            },
            ..SettingsOverlay::default()
        };
        let title = resolve(&cli, None, None, None).unwrap().title.unwrap();
        assert_eq!(title.duration, 4.0);
        assert_eq!(title.font_size, 72);
        assert_eq!(title.subtitle, None);

        let empty = SettingsOverlay {
            title: TitleOverlay {
                enabled: Some(true),
                text: Some("  ".to_string()),
                ..TitleOverlay::default()
            },
            ..SettingsOverlay::default()
        };
        assert!(resolve(&empty, None, None, None).is_err());
    }

    #[test]
    fn test_bitrate_format() {
        assert!(is_valid_bitrate("320k"));
        assert!(is_valid_bitrate("2M"));
        assert!(is_valid_bitrate("128000"));
        assert!(!is_valid_bitrate("k"));
        assert!(!is_valid_bitrate("32.5k"));
    }
}
