//! Command-line tests for the panzoom binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn panzoom() -> Command {
    let mut cmd = Command::cargo_bin("panzoom").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("PANZOOM_FFMPEG");
    cmd
}

/// Three placeholder images and an audio file
fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let images = dir.path().join("photos");
    std::fs::create_dir(&images).unwrap();
    for name in ["b.jpg", "a.jpg", "c.png", "notes.txt"] {
        std::fs::write(images.join(name), b"").unwrap();
    }
    std::fs::write(dir.path().join("song.mp3"), b"").unwrap();
    dir
}

#[test]
fn test_transitions_listing() {
    panzoom()
        .arg("transitions")
        .assert()
        .success()
        .stdout(predicate::str::contains("circleopen"))
        .stdout(predicate::str::contains("random"));
}

#[test]
fn test_presets_listing() {
    panzoom()
        .arg("presets")
        .assert()
        .success()
        .stdout(predicate::str::contains("cinematic"))
        .stdout(predicate::str::contains("crossfade"));
}

#[test]
fn test_exports_listing() {
    panzoom()
        .arg("exports")
        .assert()
        .success()
        .stdout(predicate::str::contains("instagram_reels"))
        .stdout(predicate::str::contains("1080x1920"));
}

#[test]
fn test_dry_run_prints_engine_command() {
    let dir = project();
    panzoom()
        .current_dir(dir.path())
        .args(["--log-level", "warn", "video", "-i", "photos", "-a", "song.mp3"])
        .args(["-o", "out.mp4", "-d", "10", "-x", "2", "-f", "30", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-filter_complex"))
        .stdout(predicate::str::contains("xfade=transition=fade:duration=2:offset=8[x1]"))
        .stdout(predicate::str::contains("-map '[vout]' -map 3:a"))
        .stdout(predicate::str::contains("photos/a.jpg"));

    assert!(!dir.path().join("out.mp4").exists());
}

#[test]
fn test_unknown_transition_fails() {
    let dir = project();
    panzoom()
        .current_dir(dir.path())
        .args(["video", "-i", "photos", "-a", "song.mp3", "--transition", "sparkle"])
        .args(["--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown transition: sparkle"));
}

#[test]
fn test_missing_audio_fails() {
    let dir = project();
    panzoom()
        .current_dir(dir.path())
        .args(["video", "-i", "photos", "-a", "missing.mp3", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Audio file not found"));
}

#[test]
fn test_empty_image_directory_fails() {
    let dir = project();
    std::fs::create_dir(dir.path().join("empty")).unwrap();
    panzoom()
        .current_dir(dir.path())
        .args(["video", "-i", "empty", "-a", "song.mp3", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No images found"));
}

#[test]
fn test_init_writes_config_once() {
    let dir = TempDir::new().unwrap();
    panzoom()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("panzoom.yaml"));

    let content = std::fs::read_to_string(dir.path().join("panzoom.yaml")).unwrap();
    assert!(content.contains("crossfade"));

    panzoom()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    panzoom()
        .current_dir(dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
}
