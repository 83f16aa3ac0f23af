// Engine binary discovery

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::{PanZoomError, PanZoomResult};

/// Environment variable naming the engine binary
pub const FFMPEG_ENV: &str = "PANZOOM_FFMPEG";

/// A resolved, runnable engine binary
#[derive(Debug, Clone, PartialEq)]
pub struct EngineInfo {
    pub path: PathBuf,
    /// First line of `-version` output
    pub version: String,
}

/// Finds the engine binary
pub struct EngineLocator;

impl EngineLocator {
    /// Resolve the engine: `explicit`, then `$PANZOOM_FFMPEG`, then `ffmpeg` on PATH
    pub fn detect(explicit: Option<&Path>) -> PanZoomResult<EngineInfo> {
        let candidate = match explicit {
            Some(path) => path.to_path_buf(),
            None => match std::env::var_os(FFMPEG_ENV).filter(|v| !v.is_empty()) {
                Some(value) => PathBuf::from(value),
                None => PathBuf::from("ffmpeg"),
            },
        };
        debug!("Looking for engine: {}", candidate.display());

        let path = which::which(&candidate).map_err(|e| PanZoomError::EngineNotFound {
            message: format!("{} ({})", candidate.display(), e),
        })?;

        let version = Self::probe_version(&path)?;
        info!("Using {} ({})", path.display(), version);

        Ok(EngineInfo { path, version })
    }

    fn probe_version(path: &Path) -> PanZoomResult<String> {
        let output = Command::new(path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| PanZoomError::EngineNotFound {
                message: format!("{} could not be run: {}", path.display(), e),
            })?;

        if !output.status.success() {
            return Err(PanZoomError::EngineNotFound {
                message: format!("{} -version exited with {}", path.display(), output.status),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .next()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "unknown version".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_explicit_binary() {
        let err = EngineLocator::detect(Some(Path::new("/no/such/dir/ffmpeg"))).unwrap_err();
        assert!(matches!(err, PanZoomError::EngineNotFound { .. }));
        assert!(err.to_string().contains("install"));
    }

    #[cfg(unix)]
    #[test]
    fn test_fake_engine_version_line() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("ffmpeg");
        std::fs::write(&script, "#!/bin/sh\necho 'ffmpeg version 6.1-test Copyright'\necho second\n")
            .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let info = EngineLocator::detect(Some(&script)).unwrap();
        assert_eq!(info.version, "ffmpeg version 6.1-test Copyright");
        assert!(info.path.ends_with("ffmpeg"));
    }
}
