//! Engine subprocess driver
//!
//! Runs one render as a child process and walks it through
//! `Idle -> Spawning -> Streaming -> Succeeded | Failed`.

use std::collections::VecDeque;
use std::io::BufReader;
use std::path::Path;
use std::process::{Child, ExitStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::domain::model::ResolvedSettings;
use crate::engine::command::EngineCommand;
use crate::engine::detection::EngineInfo;
use crate::engine::progress::{ProgressEvent, ProgressParser, StatusLines};
use crate::error::{PanZoomError, PanZoomResult};
use crate::planner::RenderPlan;

/// Non-progress stderr lines kept for error reports
pub const DIAGNOSTICS_TAIL: usize = 20;

/// Why a render ended without success
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    ExitCode(i32),
    Signal,
    Cancelled,
    SpawnError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    Spawning,
    Streaming,
    Succeeded,
    Failed(FailureReason),
}

/// Shared flag to stop a running render
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of a successful render
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub state: RenderState,
    pub exit_code: Option<i32>,
    pub elapsed: Duration,
    pub last_progress: Option<ProgressEvent>,
    pub diagnostics: Vec<String>,
}

/// Drives the engine for renders, one at a time
pub struct RenderDriver {
    engine: EngineInfo,
    state: RenderState,
    cancel: CancelToken,
}

impl RenderDriver {
    pub fn new(engine: EngineInfo) -> Self {
        Self {
            engine,
            state: RenderState::Idle,
            cancel: CancelToken::new(),
        }
    }

    /// Share an externally owned cancellation flag
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn engine(&self) -> &EngineInfo {
        &self.engine
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Build the invocation for `plan` with this driver's engine
    pub fn command(
        &self,
        plan: &RenderPlan,
        settings: &ResolvedSettings,
        audio: &Path,
        output: &Path,
    ) -> EngineCommand {
        EngineCommand::build(&self.engine.path, plan, settings, audio, output)
    }

    /// Run `command` to completion, calling `on_progress` once per status line.
    ///
    /// `total_duration` is the planned output length used for percent and ETA.
    /// Callbacks only fire while the child's stderr is being read, never after
    /// it has exited.
    pub fn render<F>(
        &mut self,
        command: &EngineCommand,
        total_duration: f64,
        mut on_progress: F,
    ) -> PanZoomResult<RenderOutcome>
    where
        F: FnMut(&ProgressEvent),
    {
        self.state = RenderState::Spawning;
        debug!("Spawning engine: {}", command.display());

        let started = Instant::now();
        let mut child = match command.to_command().spawn() {
            Ok(child) => child,
            Err(e) => {
                error!("Failed to start {}: {}", command.program().display(), e);
                self.state = RenderState::Failed(FailureReason::SpawnError);
                return Err(PanZoomError::IoError(e));
            }
        };

        self.state = RenderState::Streaming;
        info!("Engine started (pid {})", child.id());

        let parser = ProgressParser::new(Some(total_duration));
        let mut last_progress = None;
        let mut tail: VecDeque<String> = VecDeque::with_capacity(DIAGNOSTICS_TAIL);

        if let Some(stderr) = child.stderr.take() {
            for line in StatusLines::new(BufReader::new(stderr)) {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("Error reading engine output: {}", e);
                        break;
                    }
                };

                match parser.parse_line(&line) {
                    Some(event) => {
                        on_progress(&event);
                        last_progress = Some(event);
                    }
                    None => {
                        debug!("engine: {}", line);
                        if tail.len() == DIAGNOSTICS_TAIL {
                            tail.pop_front();
                        }
                        tail.push_back(line);
                    }
                }

                if self.cancel.is_cancelled() {
                    return self.abort(child);
                }
            }
        }

        let status = child.wait()?;
        let elapsed = started.elapsed();
        let diagnostics: Vec<String> = tail.into_iter().collect();

        if status.success() {
            self.state = RenderState::Succeeded;
            info!("Render finished in {:.1}s", elapsed.as_secs_f64());
            return Ok(RenderOutcome {
                state: self.state,
                exit_code: status.code(),
                elapsed,
                last_progress,
                diagnostics,
            });
        }

        let reason = failure_reason(&status);
        self.state = RenderState::Failed(reason);
        match reason {
            FailureReason::Cancelled => {
                warn!("Engine was stopped by a signal");
                Err(PanZoomError::Cancelled)
            }
            _ => {
                error!("Engine failed: {}", status);
                Err(PanZoomError::RenderFailed {
                    code: status.code(),
                    diagnostics: diagnostics.join("\n"),
                })
            }
        }
    }

    fn abort(&mut self, mut child: Child) -> PanZoomResult<RenderOutcome> {
        warn!("Cancelling render (pid {})", child.id());
        if let Err(e) = child.kill() {
            debug!("Kill failed, engine probably exited: {}", e);
        }
        child.wait()?;
        self.state = RenderState::Failed(FailureReason::Cancelled);
        Err(PanZoomError::Cancelled)
    }
}

#[cfg(unix)]
fn failure_reason(status: &ExitStatus) -> FailureReason {
    use std::os::unix::process::ExitStatusExt;

    const SIGINT: i32 = 2;
    const SIGKILL: i32 = 9;
    const SIGTERM: i32 = 15;

    match (status.code(), status.signal()) {
        (Some(code), _) => FailureReason::ExitCode(code),
        (None, Some(SIGINT | SIGKILL | SIGTERM)) => FailureReason::Cancelled,
        _ => FailureReason::Signal,
    }
}

#[cfg(not(unix))]
fn failure_reason(status: &ExitStatus) -> FailureReason {
    match status.code() {
        Some(code) => FailureReason::ExitCode(code),
        None => FailureReason::Signal,
    }
}
