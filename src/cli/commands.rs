//! Command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::args::{InitArgs, VideoArgs};
use crate::cli::report::{ConsoleReporter, JsonReporter, ProgressReporter};
use crate::config::file::ConfigFile;
use crate::config::{resolve, SettingsOverlay, TitleOverlay, VideoOverlay, WatermarkOverlay};
use crate::domain::catalog::{ExportProfile, Preset, TransitionGroup, TransitionKind};
use crate::domain::model::{OrderMode, ResolvedSettings};
use crate::engine::{EngineCommand, EngineLocator, RenderDriver};
use crate::error::PanZoomError;
use crate::planner::{plan, RenderPlan};
use crate::sequencer::{scan_images, Sequencer};
use crate::utils::time::format_clock;

/// Audio containers the engine is asked to decode
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "aac", "flac", "ogg", "m4a"];

/// Execute the video command
pub fn video(args: VideoArgs) -> Result<()> {
    info!("Starting video operation");
    info!("Images: {}", args.images.display());
    info!("Audio: {}", args.audio.display());
    info!("Output: {}", args.output.display());

    validate_audio(&args.audio)?;

    let config = match &args.config {
        Some(path) => Some(ConfigFile::load(path).context("Failed to load config file")?),
        None => None,
    };
    let file_layer = config.as_ref().map(ConfigFile::overlay);

    let explicit = explicit_overlay(&args);
    let mut settings = resolve(
        &explicit,
        args.preset.as_deref(),
        args.export.as_deref(),
        file_layer.as_ref(),
    )
    .context("Failed to resolve settings")?;

    if args.preview {
        info!("Preview mode: rendering at reduced quality");
        settings = settings.preview();
    }

    let images = scan_images(&args.images)?;
    let sequencer = match args.seed {
        Some(seed) => Sequencer::new(&settings).with_seed(seed),
        None => Sequencer::new(&settings),
    };
    info!("Sequencing seed: {} (pass --seed to reproduce)", sequencer.seed());
    let slots = sequencer.sequence(images, settings.order)?;

    let render_plan = plan(slots, &settings).context("Failed to build filter graph")?;
    info!(
        "Planned {} filter stages, {} of output",
        render_plan.graph.len(),
        format_clock(render_plan.timeline.total_duration)
    );

    let engine_path = args
        .ffmpeg
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.ffmpeg_path.clone()));

    if args.dry_run {
        let program = match EngineLocator::detect(engine_path.as_deref()) {
            Ok(engine) => engine.path,
            Err(e) => {
                warn!("{}", e);
                engine_path.unwrap_or_else(|| PathBuf::from("ffmpeg"))
            }
        };
        let command =
            EngineCommand::build(&program, &render_plan, &settings, &args.audio, &args.output);
        println!("{}", command.display());
        return Ok(());
    }

    let engine = EngineLocator::detect(engine_path.as_deref())?;
    let mut driver = RenderDriver::new(engine);
    let command = driver.command(&render_plan, &settings, &args.audio, &args.output);

    let mut reporter: Box<dyn ProgressReporter> = if args.json {
        print_json_summary(&args, &settings, &render_plan, sequencer.seed())?;
        Box::new(JsonReporter)
    } else {
        print_summary(&args, &settings, &render_plan);
        Box::new(ConsoleReporter::new())
    };

    let total = render_plan.timeline.total_duration;
    reporter.on_start(&args.output, total);

    match driver.render(&command, total, |event| reporter.on_progress(event)) {
        Ok(outcome) => {
            reporter.on_complete(&args.output, &outcome);
            info!("Video operation completed successfully");
            Ok(())
        }
        Err(e) => {
            reporter.on_error(&e.to_string());
            if matches!(e, PanZoomError::RenderFailed { .. } | PanZoomError::Cancelled) {
                remove_partial_output(&args.output);
            }
            Err(e).context("Failed to render video")
        }
    }
}

/// Execute the presets command
pub fn presets() -> Result<()> {
    println!("Available Presets:");
    println!();
    for preset in Preset::ALL {
        let values = preset.values();
        println!("  {}", preset.as_str());
        println!("    duration: {}", values.image_duration);
        println!("    crossfade: {}", values.crossfade);
        println!("    fps: {}", values.fps);
        println!("    zoom_intensity: {}", values.zoom_intensity);
        println!("    pan_intensity: {}", values.pan_intensity);
        println!("    preset: {}", values.encoder_preset);
        println!("    crf: {}", values.crf);
        println!();
    }
    println!("Use with: panzoom video --preset <name>");
    Ok(())
}

/// Execute the transitions command
pub fn transitions() -> Result<()> {
    println!("Available Transitions:");
    println!();
    for group in TransitionGroup::ALL {
        println!("  {}:", group);
        for kind in TransitionKind::in_group(group) {
            println!("    {:15} {}", kind.as_str(), kind.description());
        }
        println!();
    }
    println!("  {:15} A different transition for every image", "random");
    println!();
    println!("Use with: panzoom video --transition <name>");
    Ok(())
}

/// Execute the exports command
pub fn exports() -> Result<()> {
    println!("Export Profiles:");
    println!();
    for profile in ExportProfile::ALL {
        let values = profile.values();
        let resolution = format!("{}x{}", values.width, values.height);
        println!(
            "  {:20} {:10} {}fps  {}",
            profile.as_str(),
            resolution,
            values.fps,
            values.description
        );
    }
    println!();
    println!("Use with: panzoom video --export <profile>");
    Ok(())
}

/// Execute the init command
pub fn init(args: InitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config file already exists: {} (use --force to overwrite)",
            args.output.display()
        ));
    }

    ConfigFile::with_defaults()
        .save(&args.output)
        .context("Failed to write config file")?;

    println!("Configuration file created: {}", args.output.display());
    println!("Edit this file to customize default settings");
    Ok(())
}

fn validate_audio(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(anyhow::anyhow!("Audio file not found: {}", path.display()));
    }
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if !AUDIO_EXTENSIONS.contains(&extension.as_str()) {
        return Err(anyhow::anyhow!(
            "Unsupported audio format: {} (supported: {})",
            path.display(),
            AUDIO_EXTENSIONS.join(", ")
        ));
    }
    Ok(())
}

/// Settings given on the command line, the highest layer
fn explicit_overlay(args: &VideoArgs) -> SettingsOverlay {
    let order = if args.shuffle {
        Some(OrderMode::Shuffle)
    } else if args.reverse {
        Some(OrderMode::Reverse)
    } else {
        None
    };

    SettingsOverlay {
        video: VideoOverlay {
            image_duration: args.duration,
            crossfade: args.crossfade,
            fps: args.fps,
            width: args.width,
            height: args.height,
            zoom_intensity: args.zoom,
            pan_intensity: args.pan,
            zoom_direction: args.zoom_dir,
            pan_direction: args.pan_dir,
            transition: args.transition.clone(),
            order,
            crf: args.quality,
            ..VideoOverlay::default()
        },
        watermark: WatermarkOverlay {
            image_path: args.watermark.clone(),
            position: args.watermark_pos,
            opacity: args.watermark_opacity,
            scale: args.watermark_scale,
            ..WatermarkOverlay::default()
        },
        title: TitleOverlay {
            text: args.title.clone(),
            subtitle: args.subtitle.clone(),
            ..TitleOverlay::default()
        },
    }
}

fn print_summary(args: &VideoArgs, settings: &ResolvedSettings, plan: &RenderPlan) {
    println!("Configuration:");
    println!("  Images:      {} files", plan.slots.len());
    println!("  Audio:       {}", args.audio.display());
    println!("  Output:      {}", args.output.display());
    println!("  Duration:    {}s per image", settings.image_duration);
    println!(
        "  Resolution:  {} @ {}fps",
        settings.resolution(),
        settings.fps
    );
    println!(
        "  Zoom:        {:.0}% ({})",
        settings.zoom_intensity * 100.0,
        settings.zoom_direction.as_str()
    );
    println!(
        "  Pan:         {:.0}% ({})",
        settings.pan_intensity * 100.0,
        settings.pan_direction.as_str()
    );
    println!("  Transition:  {}", settings.transition);
    println!("  Order:       {}", settings.order.as_str());
    if let Some(watermark) = &settings.watermark {
        println!(
            "  Watermark:   {} ({:.0}%)",
            watermark.position.as_str(),
            watermark.opacity * 100.0
        );
    }
    if let Some(title) = &settings.title {
        println!("  Title:       {}", title.text);
    }
    println!(
        "  Est. length: {}",
        format_clock(plan.timeline.total_duration)
    );
    if args.preview {
        println!("  Mode:        PREVIEW (low quality)");
    }
    println!();
}

fn print_json_summary(
    args: &VideoArgs,
    settings: &ResolvedSettings,
    plan: &RenderPlan,
    seed: u64,
) -> Result<()> {
    let summary = serde_json::json!({
        "event": "plan",
        "images": plan.slots.len(),
        "audio": args.audio,
        "output": args.output,
        "resolution": settings.resolution(),
        "fps": settings.fps,
        "transition": settings.transition.to_string(),
        "seed": seed,
        "preview": args.preview,
        "timeline": plan.timeline,
        "timestamp": chrono::Utc::now().to_rfc3339()
    });
    let line = serde_json::to_string(&summary).context("Failed to serialize plan summary")?;
    println!("{}", line);
    Ok(())
}

fn remove_partial_output(output: &Path) {
    if output.exists() {
        match std::fs::remove_file(output) {
            Ok(()) => info!("Removed partial output: {}", output.display()),
            Err(e) => warn!("Could not remove partial output {}: {}", output.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_audio() {
        let dir = TempDir::new().unwrap();
        let song = dir.path().join("song.MP3");
        std::fs::write(&song, b"id3").unwrap();
        assert!(validate_audio(&song).is_ok());

        let text = dir.path().join("notes.txt");
        std::fs::write(&text, b"hi").unwrap();
        assert!(validate_audio(&text).is_err());

        assert!(validate_audio(&dir.path().join("missing.wav")).is_err());
    }

    #[test]
    fn test_explicit_overlay_order() {
        let args = VideoArgs {
            reverse: true,
            quality: Some(12),
            title: Some("Holiday".to_string()),
            ..VideoArgs::default()
        };
        let overlay = explicit_overlay(&args);
        assert_eq!(overlay.video.order, Some(OrderMode::Reverse));
        assert_eq!(overlay.video.crf, Some(12));
        assert_eq!(overlay.title.text.as_deref(), Some("Holiday"));
        assert_eq!(overlay.video.image_duration, None);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("panzoom.yaml");
        init(InitArgs {
            output: path.clone(),
            force: false,
        })
        .unwrap();
        assert!(path.exists());

        let again = init(InitArgs {
            output: path.clone(),
            force: false,
        });
        assert!(again.is_err());

        init(InitArgs {
            output: path,
            force: true,
        })
        .unwrap();
    }
}
