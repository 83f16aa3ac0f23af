//! Image discovery and sequencing
//!
//! Turns a list of image paths into ordered [`ImageSlot`]s with every random
//! decision (order, zoom, pan, transition) drawn up front from one seeded RNG.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::domain::catalog::{TransitionChoice, TransitionKind};
use crate::domain::model::{
    ImageSlot, OrderMode, PanDirection, PanMotion, ResolvedSettings, ZoomDirection, ZoomMotion,
};
use crate::error::{PanZoomError, PanZoomResult};

/// Extensions picked up by [`scan_images`], compared case-insensitively
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "bmp", "tiff"];

/// Whether `path` has a supported image extension
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// List the supported images in a directory (not recursive), or accept a single file
pub fn scan_images(path: &Path) -> PanZoomResult<Vec<PathBuf>> {
    if path.is_file() {
        return if is_supported_image(path) {
            Ok(vec![path.to_path_buf()])
        } else {
            Err(PanZoomError::EmptyInput {
                path: path.display().to_string(),
            })
        };
    }

    if !path.is_dir() {
        return Err(PanZoomError::validation(format!(
            "Images path does not exist: {}",
            path.display()
        )));
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(path).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && is_supported_image(entry.path()) {
            images.push(entry.into_path());
        }
    }

    if images.is_empty() {
        return Err(PanZoomError::EmptyInput {
            path: path.display().to_string(),
        });
    }

    debug!("Found {} images in {}", images.len(), path.display());
    Ok(images)
}

/// Orders images and resolves per-image motion
pub struct Sequencer<'a> {
    settings: &'a ResolvedSettings,
    seed: u64,
}

impl<'a> Sequencer<'a> {
    /// New sequencer with a seed drawn from OS entropy
    pub fn new(settings: &'a ResolvedSettings) -> Self {
        Self {
            settings,
            seed: rand::random(),
        }
    }

    /// Use a fixed seed so the run can be reproduced
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Order `paths` and build one slot per image.
    ///
    /// Draw order is fixed: the shuffle first, then zoom, pan and transition
    /// for each slot in turn.
    pub fn sequence(&self, mut paths: Vec<PathBuf>, order: OrderMode) -> PanZoomResult<Vec<ImageSlot>> {
        if paths.is_empty() {
            return Err(PanZoomError::EmptyInput {
                path: "<no images given>".to_string(),
            });
        }

        info!("Sequencing {} images ({} order, seed {})", paths.len(), order.as_str(), self.seed);
        let mut rng = StdRng::seed_from_u64(self.seed);

        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));
        match order {
            OrderMode::Natural => {}
            OrderMode::Reverse => paths.reverse(),
            OrderMode::Shuffle => paths.shuffle(&mut rng),
        }

        let frame_count = self.settings.frames_per_image();
        let slots = paths
            .into_iter()
            .enumerate()
            .map(|(index, path)| {
                let zoom = self.zoom_for(index, &mut rng);
                let pan = self.pan_for(index, &mut rng);
                let transition_in = if index == 0 {
                    None
                } else {
                    Some(self.transition_for(&mut rng))
                };
                debug!(
                    "Slot {}: {} zoom {} pan {} transition {:?}",
                    index,
                    path.display(),
                    zoom,
                    pan,
                    transition_in
                );
                ImageSlot {
                    path,
                    index,
                    frame_count,
                    zoom,
                    pan,
                    transition_in,
                }
            })
            .collect();

        Ok(slots)
    }

    fn zoom_for(&self, index: usize, rng: &mut StdRng) -> ZoomMotion {
        let zoom_in = match self.settings.zoom_direction {
            ZoomDirection::In => true,
            ZoomDirection::Out => false,
            ZoomDirection::Alternate => index % 2 == 0,
            ZoomDirection::Random => rng.gen_bool(0.5),
        };
        if zoom_in {
            ZoomMotion::In
        } else {
            ZoomMotion::Out
        }
    }

    fn pan_for(&self, index: usize, rng: &mut StdRng) -> PanMotion {
        let left_to_right = match self.settings.pan_direction {
            PanDirection::Left => true,
            PanDirection::Right => false,
            PanDirection::Alternate => index % 2 == 0,
            PanDirection::Random => rng.gen_bool(0.5),
        };
        if left_to_right {
            PanMotion::LeftToRight
        } else {
            PanMotion::RightToLeft
        }
    }

    fn transition_for(&self, rng: &mut StdRng) -> TransitionKind {
        match self.settings.transition {
            TransitionChoice::Fixed(kind) => kind,
            TransitionChoice::Random => {
                TransitionKind::ALL[rng.gen_range(0..TransitionKind::ALL.len())]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, SettingsOverlay, VideoOverlay};
    use std::fs::File;
    use tempfile::TempDir;

    fn settings_with(video: VideoOverlay) -> ResolvedSettings {
        let overlay = SettingsOverlay {
            video,
            ..SettingsOverlay::default()
        };
        resolve(&overlay, None, None, None).unwrap()
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_scan_filters_extensions_case_insensitively() {
        let dir = TempDir::new().unwrap();
        for name in ["b.JPG", "a.png", "c.txt", "d.TIFF", "e.gif"] {
            File::create(dir.path().join(name)).unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let mut found: Vec<String> = scan_images(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        found.sort();
        assert_eq!(found, vec!["a.png", "b.JPG", "d.TIFF"]);
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        assert!(matches!(
            scan_images(dir.path()),
            Err(PanZoomError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_scan_single_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("only.webp");
        File::create(&file).unwrap();
        assert_eq!(scan_images(&file).unwrap(), vec![file]);
    }

    #[test]
    fn test_natural_and_reverse_order() {
        let s = settings_with(VideoOverlay::default());
        let seq = Sequencer::new(&s).with_seed(1);

        let natural = seq.sequence(paths(&["c.jpg", "a.jpg", "b.jpg"]), OrderMode::Natural).unwrap();
        let names: Vec<_> = natural.iter().map(|s| s.path.clone()).collect();
        assert_eq!(names, paths(&["a.jpg", "b.jpg", "c.jpg"]));

        let reverse = seq.sequence(paths(&["c.jpg", "a.jpg", "b.jpg"]), OrderMode::Reverse).unwrap();
        let names: Vec<_> = reverse.iter().map(|s| s.path.clone()).collect();
        assert_eq!(names, paths(&["c.jpg", "b.jpg", "a.jpg"]));
    }

    #[test]
    fn test_alternate_directions() {
        let s = settings_with(VideoOverlay::default());
        let slots = Sequencer::new(&s)
            .sequence(paths(&["a.jpg", "b.jpg", "c.jpg"]), OrderMode::Natural)
            .unwrap();
        assert_eq!(slots[0].zoom, ZoomMotion::In);
        assert_eq!(slots[0].pan, PanMotion::LeftToRight);
        assert_eq!(slots[1].zoom, ZoomMotion::Out);
        assert_eq!(slots[1].pan, PanMotion::RightToLeft);
        assert_eq!(slots[2].zoom, ZoomMotion::In);
    }

    #[test]
    fn test_first_slot_has_no_transition() {
        let s = settings_with(VideoOverlay::default());
        let slots = Sequencer::new(&s)
            .sequence(paths(&["a.jpg", "b.jpg"]), OrderMode::Natural)
            .unwrap();
        assert_eq!(slots[0].transition_in, None);
        assert_eq!(slots[1].transition_in, Some(TransitionKind::Fade));
        assert!(slots.iter().all(|s| s.frame_count == 600));
    }

    #[test]
    fn test_same_seed_same_slots() {
        let s = settings_with(VideoOverlay {
            zoom_direction: Some(ZoomDirection::Random),
            pan_direction: Some(PanDirection::Random),
            transition: Some("random".to_string()),
            ..VideoOverlay::default()
        });
        let names: Vec<String> = (0..12).map(|i| format!("img{:02}.png", i)).collect();
        let input: Vec<PathBuf> = names.iter().map(PathBuf::from).collect();

        let a = Sequencer::new(&s).with_seed(42).sequence(input.clone(), OrderMode::Shuffle).unwrap();
        let b = Sequencer::new(&s).with_seed(42).sequence(input, OrderMode::Shuffle).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_sequence_is_rejected() {
        let s = settings_with(VideoOverlay::default());
        assert!(matches!(
            Sequencer::new(&s).sequence(Vec::new(), OrderMode::Natural),
            Err(PanZoomError::EmptyInput { .. })
        ));
    }
}
