//! Progress reporting for the video command
//!
//! Console output redraws one status line; JSON output writes one object per
//! line to stdout.

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::engine::{ProgressEvent, RenderOutcome};
use crate::utils::time::{format_clock, format_duration};
use crate::utils::Utils;

/// Minimum percent change between two console redraws
const REDRAW_STEP: f64 = 2.0;
const BAR_WIDTH: usize = 30;

/// Receives render lifecycle events
pub trait ProgressReporter {
    fn on_start(&mut self, output: &Path, total_duration: f64);
    fn on_progress(&mut self, event: &ProgressEvent);
    fn on_complete(&mut self, output: &Path, outcome: &RenderOutcome);
    fn on_error(&mut self, error: &str);
}

/// Single redrawn status line for terminals
pub struct ConsoleReporter {
    last_percent: Option<f64>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self { last_percent: None }
    }

    fn clear_line(&self) {
        if self.last_percent.is_some() {
            print!("\r{}\r", " ".repeat(BAR_WIDTH + 50));
        }
    }
}

/// Flush a partial status line, logging rather than failing on error
fn flush_status<W: Write>(out: &mut W) -> bool {
    match out.flush() {
        Ok(()) => true,
        Err(e) => {
            debug!("Status line flush failed: {}", e);
            false
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleReporter {
    fn on_start(&mut self, output: &Path, total_duration: f64) {
        println!(
            "Rendering {} ({})",
            output.display(),
            format_clock(total_duration)
        );
    }

    fn on_progress(&mut self, event: &ProgressEvent) {
        let percent = event.percent.unwrap_or(0.0);
        if let Some(last) = self.last_percent {
            if percent < 100.0 && percent - last < REDRAW_STEP {
                return;
            }
        }
        self.last_percent = Some(percent);

        let eta = event
            .eta
            .map(|eta| format_clock(eta.as_secs_f64()))
            .unwrap_or_else(|| "--:--".to_string());
        let speed = event
            .speed
            .map(|s| format!("{:.1}x", s))
            .unwrap_or_else(|| "-.-x".to_string());

        print!(
            "\r  {} | ETA: {} | Speed: {}   ",
            Utils::progress_bar(percent, BAR_WIDTH),
            eta,
            speed
        );
        flush_status(&mut std::io::stdout());
    }

    fn on_complete(&mut self, output: &Path, outcome: &RenderOutcome) {
        self.clear_line();
        let size = std::fs::metadata(output)
            .map(|m| Utils::format_file_size(m.len()))
            .unwrap_or_else(|_| "unknown size".to_string());
        println!(
            "Video created: {} ({}, rendered in {})",
            output.display(),
            size,
            format_duration(outcome.elapsed)
        );
    }

    fn on_error(&mut self, error: &str) {
        self.clear_line();
        eprintln!("Error: {}", error);
    }
}

/// Machine-readable events, one JSON object per line
pub struct JsonReporter;

impl JsonReporter {
    fn emit(event: serde_json::Value) {
        println!("{}", event);
    }
}

impl ProgressReporter for JsonReporter {
    fn on_start(&mut self, output: &Path, total_duration: f64) {
        Self::emit(serde_json::json!({
            "event": "start",
            "output": output,
            "total_duration": total_duration,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn on_progress(&mut self, event: &ProgressEvent) {
        Self::emit(serde_json::json!({
            "event": "progress",
            "frame": event.frame,
            "elapsed": event.elapsed.as_secs_f64(),
            "percent": event.percent,
            "speed": event.speed,
            "eta": event.eta.map(|d| d.as_secs_f64()),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn on_complete(&mut self, output: &Path, outcome: &RenderOutcome) {
        let size = std::fs::metadata(output).map(|m| m.len()).ok();
        Self::emit(serde_json::json!({
            "event": "complete",
            "output": output,
            "size_bytes": size,
            "elapsed": outcome.elapsed.as_secs_f64(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn on_error(&mut self, error: &str) {
        Self::emit(serde_json::json!({
            "event": "error",
            "message": error,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn event(percent: f64) -> ProgressEvent {
        ProgressEvent {
            elapsed: Duration::from_secs(1),
            frame: 30,
            speed: Some(2.0),
            eta: Some(Duration::from_secs(5)),
            percent: Some(percent),
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn test_flush_failure_is_reported_not_raised() {
        assert!(!flush_status(&mut BrokenPipe));
        assert!(flush_status(&mut Vec::<u8>::new()));
    }

    #[test]
    fn test_console_redraws_in_steps() {
        let mut reporter = ConsoleReporter::new();
        reporter.on_progress(&event(10.0));
        assert_eq!(reporter.last_percent, Some(10.0));
        reporter.on_progress(&event(11.0));
        assert_eq!(reporter.last_percent, Some(10.0));
        reporter.on_progress(&event(12.5));
        assert_eq!(reporter.last_percent, Some(12.5));
        reporter.on_progress(&event(100.0));
        assert_eq!(reporter.last_percent, Some(100.0));
    }
}
