// Static catalogs - transitions, style presets, export profiles, encoder presets

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PanZoomError;

/// Crossfade kinds understood by the engine's `xfade` filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Fade,
    FadeBlack,
    FadeWhite,
    WipeLeft,
    WipeRight,
    WipeUp,
    WipeDown,
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
    SmoothLeft,
    SmoothRight,
    CircleCrop,
    CircleClose,
    CircleOpen,
    Dissolve,
    Pixelize,
    Radial,
    HBlur,
    HlSlice,
    VlSlice,
    ZoomIn,
    SqueezeH,
    SqueezeV,
}

impl TransitionKind {
    /// Every catalog entry, in listing order
    pub const ALL: [TransitionKind; 25] = [
        TransitionKind::Fade,
        TransitionKind::FadeBlack,
        TransitionKind::FadeWhite,
        TransitionKind::WipeLeft,
        TransitionKind::WipeRight,
        TransitionKind::WipeUp,
        TransitionKind::WipeDown,
        TransitionKind::SlideLeft,
        TransitionKind::SlideRight,
        TransitionKind::SlideUp,
        TransitionKind::SlideDown,
        TransitionKind::SmoothLeft,
        TransitionKind::SmoothRight,
        TransitionKind::CircleCrop,
        TransitionKind::CircleClose,
        TransitionKind::CircleOpen,
        TransitionKind::Dissolve,
        TransitionKind::Pixelize,
        TransitionKind::Radial,
        TransitionKind::HBlur,
        TransitionKind::HlSlice,
        TransitionKind::VlSlice,
        TransitionKind::ZoomIn,
        TransitionKind::SqueezeH,
        TransitionKind::SqueezeV,
    ];

    /// Name as passed to `xfade=transition=`
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::Fade => "fade",
            TransitionKind::FadeBlack => "fadeblack",
            TransitionKind::FadeWhite => "fadewhite",
            TransitionKind::WipeLeft => "wipeleft",
            TransitionKind::WipeRight => "wiperight",
            TransitionKind::WipeUp => "wipeup",
            TransitionKind::WipeDown => "wipedown",
            TransitionKind::SlideLeft => "slideleft",
            TransitionKind::SlideRight => "slideright",
            TransitionKind::SlideUp => "slideup",
            TransitionKind::SlideDown => "slidedown",
            TransitionKind::SmoothLeft => "smoothleft",
            TransitionKind::SmoothRight => "smoothright",
            TransitionKind::CircleCrop => "circlecrop",
            TransitionKind::CircleClose => "circleclose",
            TransitionKind::CircleOpen => "circleopen",
            TransitionKind::Dissolve => "dissolve",
            TransitionKind::Pixelize => "pixelize",
            TransitionKind::Radial => "radial",
            TransitionKind::HBlur => "hblur",
            TransitionKind::HlSlice => "hlslice",
            TransitionKind::VlSlice => "vlslice",
            TransitionKind::ZoomIn => "zoomin",
            TransitionKind::SqueezeH => "squeezeh",
            TransitionKind::SqueezeV => "squeezev",
        }
    }

    /// Short human description for listings
    pub fn description(&self) -> &'static str {
        match self {
            TransitionKind::Fade => "Classic crossfade",
            TransitionKind::FadeBlack => "Fade through black",
            TransitionKind::FadeWhite => "Fade through white",
            TransitionKind::WipeLeft => "Wipe to the left",
            TransitionKind::WipeRight => "Wipe to the right",
            TransitionKind::WipeUp => "Wipe upwards",
            TransitionKind::WipeDown => "Wipe downwards",
            TransitionKind::SlideLeft => "Slide to the left",
            TransitionKind::SlideRight => "Slide to the right",
            TransitionKind::SlideUp => "Slide upwards",
            TransitionKind::SlideDown => "Slide downwards",
            TransitionKind::SmoothLeft => "Smooth slide left",
            TransitionKind::SmoothRight => "Smooth slide right",
            TransitionKind::CircleCrop => "Circle crop",
            TransitionKind::CircleClose => "Closing circle",
            TransitionKind::CircleOpen => "Opening circle",
            TransitionKind::Dissolve => "Dissolve",
            TransitionKind::Pixelize => "Pixelize",
            TransitionKind::Radial => "Radial sweep",
            TransitionKind::HBlur => "Horizontal blur",
            TransitionKind::HlSlice => "Horizontal slices",
            TransitionKind::VlSlice => "Vertical slices",
            TransitionKind::ZoomIn => "Zoom in",
            TransitionKind::SqueezeH => "Horizontal squeeze",
            TransitionKind::SqueezeV => "Vertical squeeze",
        }
    }

    /// Listing group used by `panzoom transitions`
    pub fn group(&self) -> TransitionGroup {
        match self {
            TransitionKind::Fade
            | TransitionKind::FadeBlack
            | TransitionKind::FadeWhite
            | TransitionKind::Dissolve => TransitionGroup::Fades,
            TransitionKind::WipeLeft
            | TransitionKind::WipeRight
            | TransitionKind::WipeUp
            | TransitionKind::WipeDown => TransitionGroup::Wipes,
            TransitionKind::SlideLeft
            | TransitionKind::SlideRight
            | TransitionKind::SlideUp
            | TransitionKind::SlideDown
            | TransitionKind::SmoothLeft
            | TransitionKind::SmoothRight => TransitionGroup::Slides,
            TransitionKind::CircleCrop
            | TransitionKind::CircleClose
            | TransitionKind::CircleOpen
            | TransitionKind::Radial => TransitionGroup::Circles,
            TransitionKind::Pixelize
            | TransitionKind::HBlur
            | TransitionKind::HlSlice
            | TransitionKind::VlSlice
            | TransitionKind::ZoomIn
            | TransitionKind::SqueezeH
            | TransitionKind::SqueezeV => TransitionGroup::Effects,
        }
    }

    /// Catalog entries belonging to `group`, in listing order
    pub fn in_group(group: TransitionGroup) -> impl Iterator<Item = TransitionKind> {
        Self::ALL.into_iter().filter(move |k| k.group() == group)
    }
}

/// Headings the transition catalog is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionGroup {
    Fades,
    Wipes,
    Slides,
    Circles,
    Effects,
}

impl TransitionGroup {
    pub const ALL: [TransitionGroup; 5] = [
        TransitionGroup::Fades,
        TransitionGroup::Wipes,
        TransitionGroup::Slides,
        TransitionGroup::Circles,
        TransitionGroup::Effects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionGroup::Fades => "Fades",
            TransitionGroup::Wipes => "Wipes",
            TransitionGroup::Slides => "Slides",
            TransitionGroup::Circles => "Circles",
            TransitionGroup::Effects => "Effects",
        }
    }
}

impl fmt::Display for TransitionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransitionKind {
    type Err = PanZoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TransitionKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == wanted)
            .ok_or(PanZoomError::UnknownTransition {
                name: s.to_string(),
            })
    }
}

/// Transition setting: one fixed kind, or an independent draw per image pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionChoice {
    Fixed(TransitionKind),
    Random,
}

impl Default for TransitionChoice {
    fn default() -> Self {
        TransitionChoice::Fixed(TransitionKind::Fade)
    }
}

impl FromStr for TransitionChoice {
    type Err = PanZoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("random") {
            return Ok(TransitionChoice::Random);
        }
        s.parse().map(TransitionChoice::Fixed)
    }
}

impl fmt::Display for TransitionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionChoice::Fixed(kind) => write!(f, "{}", kind),
            TransitionChoice::Random => f.write_str("random"),
        }
    }
}

/// x264/x265 speed presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncoderPreset {
    Ultrafast,
    Superfast,
    Veryfast,
    Faster,
    Fast,
    Medium,
    Slow,
    Slower,
    Veryslow,
    Placebo,
}

impl EncoderPreset {
    pub const ALL: [EncoderPreset; 10] = [
        EncoderPreset::Ultrafast,
        EncoderPreset::Superfast,
        EncoderPreset::Veryfast,
        EncoderPreset::Faster,
        EncoderPreset::Fast,
        EncoderPreset::Medium,
        EncoderPreset::Slow,
        EncoderPreset::Slower,
        EncoderPreset::Veryslow,
        EncoderPreset::Placebo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EncoderPreset::Ultrafast => "ultrafast",
            EncoderPreset::Superfast => "superfast",
            EncoderPreset::Veryfast => "veryfast",
            EncoderPreset::Faster => "faster",
            EncoderPreset::Fast => "fast",
            EncoderPreset::Medium => "medium",
            EncoderPreset::Slow => "slow",
            EncoderPreset::Slower => "slower",
            EncoderPreset::Veryslow => "veryslow",
            EncoderPreset::Placebo => "placebo",
        }
    }
}

impl fmt::Display for EncoderPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncoderPreset {
    type Err = PanZoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        EncoderPreset::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                PanZoomError::validation(format!(
                    "Unknown encoder preset: {}. Valid presets: ultrafast, superfast, veryfast, faster, fast, medium, slow, slower, veryslow, placebo",
                    s
                ))
            })
    }
}

/// Values a style preset overrides
#[derive(Debug, Clone, PartialEq)]
pub struct PresetValues {
    pub image_duration: f64,
    pub crossfade: f64,
    pub fps: u32,
    pub zoom_intensity: f64,
    pub pan_intensity: f64,
    pub encoder_preset: EncoderPreset,
    pub crf: u8,
}

/// Named motion/pacing styles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Fast,
    Cinematic,
    Slow,
    Dynamic,
    Minimal,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Fast,
        Preset::Cinematic,
        Preset::Slow,
        Preset::Dynamic,
        Preset::Minimal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Fast => "fast",
            Preset::Cinematic => "cinematic",
            Preset::Slow => "slow",
            Preset::Dynamic => "dynamic",
            Preset::Minimal => "minimal",
        }
    }

    pub fn values(&self) -> PresetValues {
        match self {
            Preset::Fast => PresetValues {
                image_duration: 6.0,
                crossfade: 1.0,
                fps: 30,
                zoom_intensity: 0.04,
                pan_intensity: 0.15,
                encoder_preset: EncoderPreset::Fast,
                crf: 23,
            },
            Preset::Cinematic => PresetValues {
                image_duration: 12.0,
                crossfade: 3.0,
                fps: 60,
                zoom_intensity: 0.06,
                pan_intensity: 0.20,
                encoder_preset: EncoderPreset::Slow,
                crf: 16,
            },
            Preset::Slow => PresetValues {
                image_duration: 15.0,
                crossfade: 4.0,
                fps: 60,
                zoom_intensity: 0.04,
                pan_intensity: 0.15,
                encoder_preset: EncoderPreset::Slow,
                crf: 18,
            },
            Preset::Dynamic => PresetValues {
                image_duration: 8.0,
                crossfade: 1.5,
                fps: 60,
                zoom_intensity: 0.12,
                pan_intensity: 0.35,
                encoder_preset: EncoderPreset::Medium,
                crf: 20,
            },
            Preset::Minimal => PresetValues {
                image_duration: 10.0,
                crossfade: 2.0,
                fps: 30,
                zoom_intensity: 0.02,
                pan_intensity: 0.10,
                encoder_preset: EncoderPreset::Medium,
                crf: 22,
            },
        }
    }
}

impl FromStr for Preset {
    type Err = PanZoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Preset::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                PanZoomError::validation(format!(
                    "Unknown preset: {}. Available: {}",
                    s,
                    Preset::ALL.map(|p| p.as_str()).join(", ")
                ))
            })
    }
}

/// Values an export profile overrides
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileValues {
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub crf: u8,
    pub encoder_preset: EncoderPreset,
    pub audio_bitrate: &'static str,
    pub description: &'static str,
}

/// Platform-targeted output sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportProfile {
    Youtube,
    Youtube4k,
    InstagramFeed,
    InstagramPortrait,
    InstagramReels,
    Tiktok,
    Facebook,
    Twitter,
    Preview,
}

impl ExportProfile {
    pub const ALL: [ExportProfile; 9] = [
        ExportProfile::Youtube,
        ExportProfile::Youtube4k,
        ExportProfile::InstagramFeed,
        ExportProfile::InstagramPortrait,
        ExportProfile::InstagramReels,
        ExportProfile::Tiktok,
        ExportProfile::Facebook,
        ExportProfile::Twitter,
        ExportProfile::Preview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportProfile::Youtube => "youtube",
            ExportProfile::Youtube4k => "youtube4k",
            ExportProfile::InstagramFeed => "instagram_feed",
            ExportProfile::InstagramPortrait => "instagram_portrait",
            ExportProfile::InstagramReels => "instagram_reels",
            ExportProfile::Tiktok => "tiktok",
            ExportProfile::Facebook => "facebook",
            ExportProfile::Twitter => "twitter",
            ExportProfile::Preview => "preview",
        }
    }

    pub fn values(&self) -> ProfileValues {
        let (label, width, height, fps, crf, encoder_preset, audio_bitrate, description) =
            match self {
                ExportProfile::Youtube => (
                    "YouTube HD",
                    1920,
                    1080,
                    60,
                    18,
                    EncoderPreset::Slow,
                    "320k",
                    "Optimal for YouTube (1080p60)",
                ),
                ExportProfile::Youtube4k => (
                    "YouTube 4K",
                    3840,
                    2160,
                    60,
                    18,
                    EncoderPreset::Slow,
                    "320k",
                    "YouTube 4K UHD",
                ),
                ExportProfile::InstagramFeed => (
                    "Instagram Feed",
                    1080,
                    1080,
                    30,
                    20,
                    EncoderPreset::Medium,
                    "256k",
                    "Instagram square (1:1)",
                ),
                ExportProfile::InstagramPortrait => (
                    "Instagram Portrait",
                    1080,
                    1350,
                    30,
                    20,
                    EncoderPreset::Medium,
                    "256k",
                    "Instagram portrait (4:5)",
                ),
                ExportProfile::InstagramReels => (
                    "Instagram Reels",
                    1080,
                    1920,
                    30,
                    20,
                    EncoderPreset::Medium,
                    "256k",
                    "Instagram/TikTok vertical (9:16)",
                ),
                ExportProfile::Tiktok => (
                    "TikTok",
                    1080,
                    1920,
                    30,
                    20,
                    EncoderPreset::Medium,
                    "256k",
                    "TikTok vertical (9:16)",
                ),
                ExportProfile::Facebook => (
                    "Facebook",
                    1280,
                    720,
                    30,
                    22,
                    EncoderPreset::Medium,
                    "192k",
                    "Facebook 720p",
                ),
                ExportProfile::Twitter => (
                    "Twitter/X",
                    1280,
                    720,
                    30,
                    22,
                    EncoderPreset::Medium,
                    "192k",
                    "Twitter/X 720p",
                ),
                ExportProfile::Preview => (
                    "Preview (fast)",
                    640,
                    360,
                    15,
                    35,
                    EncoderPreset::Ultrafast,
                    "96k",
                    "Quick low-quality preview",
                ),
            };

        ProfileValues {
            label,
            width,
            height,
            fps,
            crf,
            encoder_preset,
            audio_bitrate,
            description,
        }
    }
}

impl FromStr for ExportProfile {
    type Err = PanZoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ExportProfile::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                PanZoomError::validation(format!(
                    "Unknown export profile: {}. Available: {}",
                    s,
                    ExportProfile::ALL.map(|p| p.as_str()).join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_catalog_has_25_unique_names() {
        let mut names: Vec<&str> = TransitionKind::ALL.iter().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 25);
    }

    #[test]
    fn test_every_group_lists_some_transitions() {
        let listed: usize = TransitionGroup::ALL
            .iter()
            .map(|&g| {
                let count = TransitionKind::in_group(g).count();
                assert!(count > 0, "{} is empty", g);
                count
            })
            .sum();
        assert_eq!(listed, TransitionKind::ALL.len());
        assert_eq!(TransitionKind::Radial.group(), TransitionGroup::Circles);
        assert_eq!(TransitionKind::Dissolve.group(), TransitionGroup::Fades);
    }

    #[test]
    fn test_transition_parse_is_case_insensitive() {
        assert_eq!("WipeLeft".parse::<TransitionKind>().unwrap(), TransitionKind::WipeLeft);
        assert_eq!(
            "random".parse::<TransitionChoice>().unwrap(),
            TransitionChoice::Random
        );
    }

    #[test]
    fn test_unknown_transition_is_rejected() {
        let err = "sparkle".parse::<TransitionChoice>().unwrap_err();
        assert!(matches!(err, PanZoomError::UnknownTransition { ref name } if name == "sparkle"));
    }

    #[test]
    fn test_preview_profile_matches_preview_settings() {
        let v = ExportProfile::Preview.values();
        assert_eq!((v.width, v.height, v.fps, v.crf), (640, 360, 15, 35));
        assert_eq!(v.encoder_preset, EncoderPreset::Ultrafast);
    }

    #[test]
    fn test_unknown_preset_and_profile_are_validation_errors() {
        assert!(matches!(
            "turbo".parse::<Preset>(),
            Err(PanZoomError::Validation { .. })
        ));
        assert!(matches!(
            "myspace".parse::<ExportProfile>(),
            Err(PanZoomError::Validation { .. })
        ));
    }

    #[test]
    fn test_every_preset_keeps_crossfade_below_duration() {
        for preset in Preset::ALL {
            let v = preset.values();
            assert!(v.crossfade < v.image_duration, "{:?}", preset);
        }
    }
}
