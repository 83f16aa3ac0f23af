//! Render driver tests against scripted stand-ins for ffmpeg
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use panzoom_cli::config::{resolve, SettingsOverlay, VideoOverlay};
use panzoom_cli::domain::model::{ImageSlot, PanMotion, ResolvedSettings, ZoomMotion};
use panzoom_cli::engine::{
    EngineCommand, EngineInfo, FailureReason, RenderDriver, RenderState,
};
use panzoom_cli::planner::plan;
use panzoom_cli::{PanZoomError, RenderPlan};
use tempfile::TempDir;

// Test utilities

/// Write an executable shell script standing in for the engine
fn fake_engine(dir: &Path, body: &str) -> EngineInfo {
    let path = dir.join("ffmpeg");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    EngineInfo {
        path,
        version: "ffmpeg version test".to_string(),
    }
}

fn fixture() -> (RenderPlan, ResolvedSettings) {
    let settings = resolve(
        &SettingsOverlay {
            video: VideoOverlay {
                image_duration: Some(2.0),
                crossfade: Some(0.5),
                fps: Some(10),
                ..VideoOverlay::default()
            },
            ..SettingsOverlay::default()
        },
        None,
        None,
        None,
    )
    .unwrap();
    let slots = (0..2)
        .map(|i| ImageSlot {
            path: PathBuf::from(format!("{}.jpg", i)),
            index: i,
            frame_count: settings.frames_per_image(),
            zoom: ZoomMotion::Out,
            pan: PanMotion::RightToLeft,
            transition_in: None,
        })
        .collect();
    (plan(slots, &settings).unwrap(), settings)
}

fn command_for(driver: &RenderDriver, dir: &Path) -> EngineCommand {
    let (plan, settings) = fixture();
    driver.command(&plan, &settings, Path::new("song.mp3"), &dir.join("out.mp4"))
}

#[test]
fn test_successful_render_reports_progress() {
    let dir = TempDir::new().unwrap();
    let engine = fake_engine(
        dir.path(),
        r#"printf 'frame=   10 fps=0.0 q=28.0 size=       0kB time=00:00:01.00 bitrate=N/A speed=2.00x\r' >&2
printf 'frame=   20 fps=0.0 q=28.0 size=      48kB time=00:00:02.00 bitrate=N/A speed=2.00x\r' >&2
printf 'frame=   35 fps=0.0 q=-1.0 Lsize=     96kB time=00:00:03.50 bitrate=N/A speed=2.10x\n' >&2
exit 0"#,
    );
    let mut driver = RenderDriver::new(engine);
    let command = command_for(&driver, dir.path());

    let mut frames = Vec::new();
    let outcome = driver
        .render(&command, 3.5, |event| frames.push(event.frame))
        .unwrap();

    assert_eq!(frames, vec![10, 20, 35]);
    assert_eq!(outcome.state, RenderState::Succeeded);
    assert_eq!(outcome.exit_code, Some(0));
    assert_eq!(outcome.last_progress.unwrap().percent, Some(100.0));
    assert_eq!(driver.state(), RenderState::Succeeded);
}

#[test]
fn test_failing_engine_yields_render_failed() {
    let dir = TempDir::new().unwrap();
    let engine = fake_engine(
        dir.path(),
        r#"printf 'frame=    5 fps=0.0 q=28.0 size=       0kB time=00:00:00.50 bitrate=N/A speed=N/A\r' >&2
echo '[Parsed_xfade_8 @ 0x55] First input link main timebase do not match' >&2
echo 'Error while filtering: Invalid argument' >&2
exit 1"#,
    );
    let mut driver = RenderDriver::new(engine);
    let command = command_for(&driver, dir.path());

    let mut callbacks = 0;
    let err = driver.render(&command, 3.5, |_| callbacks += 1).unwrap_err();

    assert_eq!(callbacks, 1);
    match err {
        PanZoomError::RenderFailed { code, diagnostics } => {
            assert_eq!(code, Some(1));
            assert!(diagnostics.contains("Invalid argument"));
            assert!(diagnostics.contains("timebase"));
        }
        other => panic!("expected RenderFailed, got {:?}", other),
    }
    assert_eq!(
        driver.state(),
        RenderState::Failed(FailureReason::ExitCode(1))
    );
}

#[test]
fn test_cancel_stops_running_engine() {
    let dir = TempDir::new().unwrap();
    let engine = fake_engine(
        dir.path(),
        r#"printf 'frame=    1 fps=0.0 q=28.0 size=       0kB time=00:00:00.10 bitrate=N/A speed=N/A\n' >&2
exec sleep 30"#,
    );
    let mut driver = RenderDriver::new(engine);
    let token = driver.cancel_token();
    let command = command_for(&driver, dir.path());

    let started = Instant::now();
    let err = driver.render(&command, 3.5, |_| token.cancel()).unwrap_err();

    assert!(matches!(err, PanZoomError::Cancelled));
    assert!(!err.is_retryable());
    assert!(started.elapsed() < Duration::from_secs(20));
    assert_eq!(
        driver.state(),
        RenderState::Failed(FailureReason::Cancelled)
    );
}

#[test]
fn test_engine_killed_by_signal_is_cancelled() {
    let dir = TempDir::new().unwrap();
    let engine = fake_engine(
        dir.path(),
        r#"printf 'frame=    1 fps=0.0 q=28.0 size=       0kB time=00:00:00.10 bitrate=N/A speed=N/A\n' >&2
kill -TERM $$"#,
    );
    let mut driver = RenderDriver::new(engine);
    let command = command_for(&driver, dir.path());

    // Nobody touches the cancel token; the signal alone marks the run cancelled
    let err = driver.render(&command, 3.5, |_| {}).unwrap_err();

    assert!(matches!(err, PanZoomError::Cancelled));
    assert_eq!(
        driver.state(),
        RenderState::Failed(FailureReason::Cancelled)
    );
}

#[test]
fn test_missing_binary_is_spawn_error() {
    let dir = TempDir::new().unwrap();
    let mut driver = RenderDriver::new(EngineInfo {
        path: dir.path().join("no-such-ffmpeg"),
        version: String::new(),
    });
    let command = command_for(&driver, dir.path());

    let err = driver.render(&command, 3.5, |_| {}).unwrap_err();

    assert!(matches!(err, PanZoomError::IoError(_)));
    assert_eq!(
        driver.state(),
        RenderState::Failed(FailureReason::SpawnError)
    );
}
