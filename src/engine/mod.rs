//! Engine driving: binary discovery, invocation, subprocess and status decoding

pub mod command;
pub mod detection;
pub mod driver;
pub mod progress;

pub use command::EngineCommand;
pub use detection::{EngineInfo, EngineLocator, FFMPEG_ENV};
pub use driver::{CancelToken, FailureReason, RenderDriver, RenderOutcome, RenderState};
pub use progress::{ProgressEvent, ProgressParser, StatusLines};
