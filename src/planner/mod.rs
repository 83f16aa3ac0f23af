//! Render planning: filter-graph synthesis from sequenced image slots
//!
//! Engine inputs are laid out as images `0..N`, the audio track at `N` and the
//! optional watermark at `N+1`. The planned graph always ends in `[vout]`.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::model::{ImageSlot, ResolvedSettings};
use crate::error::{PanZoomError, PanZoomResult};

pub mod graph;
pub mod motion;
pub mod overlay;
pub mod transition;

use graph::{Label, Param, StageGraph, StageKind};
use transition::SlotStream;

/// Label of the mapped video output
pub const OUTPUT_LABEL: &str = "vout";

/// One looped still-image input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageInput {
    pub path: PathBuf,
    /// Seconds the looped input lasts (`frame_count / fps`)
    pub duration: f64,
}

/// Engine input indices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputLayout {
    pub images: Vec<ImageInput>,
    pub audio_index: usize,
    pub watermark_index: Option<usize>,
}

/// Where things land on the output timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    /// Start of each crossfade, relative to the first image
    pub offsets: Vec<f64>,
    pub title_duration: f64,
    /// `T + N*D - (N-1)*C`
    pub total_duration: f64,
}

/// Everything needed to invoke the engine for one render
#[derive(Debug, Clone)]
pub struct RenderPlan {
    pub graph: StageGraph,
    pub output_label: Label,
    pub layout: InputLayout,
    pub watermark: Option<PathBuf>,
    pub timeline: Timeline,
    pub slots: Vec<ImageSlot>,
}

impl RenderPlan {
    /// Serialized `-filter_complex` argument
    pub fn filter_complex(&self) -> String {
        self.graph.to_filter_complex()
    }
}

/// Build the complete stage graph for `slots`
pub fn plan(slots: Vec<ImageSlot>, settings: &ResolvedSettings) -> PanZoomResult<RenderPlan> {
    if slots.is_empty() {
        return Err(PanZoomError::EmptyInput {
            path: "<no images given>".to_string(),
        });
    }

    let n = slots.len();
    let layout = InputLayout {
        images: slots
            .iter()
            .map(|slot| ImageInput {
                path: slot.path.clone(),
                duration: slot.frame_count as f64 / settings.fps as f64,
            })
            .collect(),
        audio_index: n,
        watermark_index: settings.watermark.as_ref().map(|_| n + 1),
    };

    let mut graph = StageGraph::new();

    let mut streams = Vec::with_capacity(n);
    for (input_index, slot) in slots.iter().enumerate() {
        let label = motion::build_motion_stage(&mut graph, slot, input_index, settings)?;
        streams.push(SlotStream {
            label,
            transition_in: slot.transition_in,
        });
    }

    let (chained, offsets) = transition::build_chain(&mut graph, streams, settings)?;

    let overlaid = overlay::apply_overlays(
        &mut graph,
        chained,
        settings.watermark.as_ref(),
        settings.title.as_ref(),
        &layout,
        settings,
    )?;

    let output_label = graph.add(
        StageKind::Format,
        vec![overlaid.into()],
        "format",
        vec![Param::new("pix_fmts", "yuv420p")],
        OUTPUT_LABEL,
    );

    graph.validate()?;

    let timeline = Timeline {
        offsets,
        title_duration: settings.title.as_ref().map_or(0.0, |t| t.duration),
        total_duration: settings.total_duration(n),
    };

    info!(
        "Planned {} stages for {} images, {:.1}s total",
        graph.len(),
        n,
        timeline.total_duration
    );
    debug!("Filter graph: {}", graph.to_filter_complex());

    Ok(RenderPlan {
        graph,
        output_label,
        layout,
        watermark: settings.watermark.as_ref().map(|w| w.path.clone()),
        timeline,
        slots,
    })
}
