//! Engine status decoding
//!
//! ffmpeg `-stats` output rewrites one status line with `\r`, so stderr is
//! split on both `\r` and `\n` and each piece is parsed on its own.

use std::io::{self, BufRead};
use std::time::Duration;

use serde::Serialize;

use crate::utils::time::parse_timestamp;

/// One decoded status update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    /// Output time written so far
    pub elapsed: Duration,
    pub frame: u64,
    /// Encoding speed multiplier, `None` when the engine reports N/A
    pub speed: Option<f64>,
    pub eta: Option<Duration>,
    /// 0.0 - 100.0 against the planned timeline
    pub percent: Option<f64>,
}

/// Parses status lines against a planned output length
#[derive(Debug, Clone)]
pub struct ProgressParser {
    total: Option<f64>,
}

impl ProgressParser {
    /// `total_seconds` of `None` (or non-positive) disables percent and ETA
    pub fn new(total_seconds: Option<f64>) -> Self {
        Self {
            total: total_seconds.filter(|t| *t > 0.0),
        }
    }

    /// Decode a status line; anything without `frame=` and `time=` is not progress
    pub fn parse_line(&self, line: &str) -> Option<ProgressEvent> {
        let frame: u64 = field(line, "frame")?.parse().ok()?;
        let elapsed = parse_timestamp(field(line, "time")?)?;
        // Clocks too large for a Duration are noise, not progress
        let elapsed_duration = Duration::try_from_secs_f64(elapsed).ok()?;

        let speed = field(line, "speed")
            .and_then(|s| s.trim_end_matches('x').parse::<f64>().ok())
            .filter(|s| s.is_finite() && *s >= 0.0);

        let percent = self
            .total
            .map(|total| (elapsed / total * 100.0).min(100.0));

        let eta = match (self.total, speed) {
            (Some(total), Some(speed)) if speed > 0.0 => {
                Duration::try_from_secs_f64((total - elapsed).max(0.0) / speed).ok()
            }
            _ => None,
        };

        Some(ProgressEvent {
            elapsed: elapsed_duration,
            frame,
            speed,
            eta,
            percent,
        })
    }
}

/// Value of `key=` in a status line, tolerating padding after `=`
fn field<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let needle = format!("{}=", key);
    let mut search = 0;
    while let Some(pos) = line[search..].find(&needle) {
        let start = search + pos;
        let at_boundary = line[..start]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace);
        if at_boundary {
            let rest = line[start + needle.len()..].trim_start();
            let value = rest.split_whitespace().next()?;
            return Some(value);
        }
        search = start + needle.len();
    }
    None
}

/// Splits a byte stream into lines on `\r` or `\n`, skipping empty ones
pub struct StatusLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> StatusLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    fn take_line(&mut self) -> Option<String> {
        let line = String::from_utf8_lossy(&self.buf).trim().to_string();
        self.buf.clear();
        if line.is_empty() {
            None
        } else {
            Some(line)
        }
    }
}

impl<R: BufRead> Iterator for StatusLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let available = match self.reader.fill_buf() {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Some(Err(e)),
            };

            if available.is_empty() {
                return self.take_line().map(Ok);
            }

            match available.iter().position(|b| *b == b'\r' || *b == b'\n') {
                Some(pos) => {
                    self.buf.extend_from_slice(&available[..pos]);
                    self.reader.consume(pos + 1);
                    if let Some(line) = self.take_line() {
                        return Some(Ok(line));
                    }
                }
                None => {
                    let len = available.len();
                    self.buf.extend_from_slice(available);
                    self.reader.consume(len);
                }
            }
        }
    }
}
