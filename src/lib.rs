//! PanZoom slideshow library
//!
//! Builds Ken Burns style slideshows: images are ordered and given a zoom and
//! pan motion, compiled into one ffmpeg filter graph, and rendered by driving
//! the ffmpeg binary as a subprocess.

pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod planner;
pub mod sequencer;
pub mod utils;

// Re-export commonly used types
pub use config::resolve;
pub use domain::model::{ImageSlot, ResolvedSettings};
pub use engine::{RenderDriver, RenderOutcome};
pub use error::{PanZoomError, PanZoomResult};
pub use planner::{plan, RenderPlan};
pub use sequencer::{scan_images, Sequencer};
