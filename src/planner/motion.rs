// Per-image pan/zoom stages

use crate::domain::model::{ImageSlot, PanMotion, ResolvedSettings, ZoomMotion};
use crate::error::{PanZoomError, PanZoomResult};
use crate::planner::graph::{format_number, Label, Param, StageGraph, StageKind, StreamRef};

/// zoompan `z` expression for a progress term `t`
pub fn zoom_expr(zoom: ZoomMotion, intensity: f64, t: &str) -> String {
    match zoom {
        ZoomMotion::In => format!("1+{}*{}", format_number(intensity), t),
        ZoomMotion::Out => format!(
            "{}-{}*{}",
            format_number(1.0 + intensity),
            format_number(intensity),
            t
        ),
    }
}

/// zoompan `x` expression for a progress term `t`
pub fn pan_expr(pan: PanMotion, intensity: f64, t: &str) -> String {
    match pan {
        PanMotion::LeftToRight => format!("(iw-ow)*({}*{})", format_number(intensity), t),
        PanMotion::RightToLeft => format!("(iw-ow)*({}*(1-{}))", format_number(intensity), t),
    }
}

/// Emit scale, zoompan, format and setsar stages for one image input.
///
/// The input must be looped at the output frame rate so that `d=1` yields
/// exactly `frame_count` frames with `on` running `0..frame_count-1`.
pub fn build_motion_stage(
    graph: &mut StageGraph,
    slot: &ImageSlot,
    input_index: usize,
    settings: &ResolvedSettings,
) -> PanZoomResult<Label> {
    if slot.frame_count < 2 {
        return Err(PanZoomError::validation(format!(
            "Image {} needs at least 2 frames, got {}",
            slot.index, slot.frame_count
        )));
    }

    let i = slot.index;
    let t = format!("(on/{})", slot.frame_count - 1);

    let scaled = graph.add(
        StageKind::Scale,
        vec![StreamRef::video(input_index)],
        "scale",
        vec![
            Param::new("w", settings.width * 2),
            Param::new("h", settings.height * 2),
            Param::new("force_original_aspect_ratio", "increase"),
        ],
        format!("s{}", i),
    );

    let moved = graph.add(
        StageKind::Motion,
        vec![scaled.into()],
        "zoompan",
        vec![
            Param::expr("z", zoom_expr(slot.zoom, settings.zoom_intensity, &t)),
            Param::expr("x", pan_expr(slot.pan, settings.pan_intensity, &t)),
            Param::expr(
                "y",
                format!("(ih-oh)*{}", format_number(settings.vertical_position)),
            ),
            Param::new("d", 1),
            Param::new("s", settings.resolution()),
            Param::new("fps", settings.fps),
        ],
        format!("z{}", i),
    );

    let formatted = graph.add(
        StageKind::Format,
        vec![moved.into()],
        "format",
        vec![Param::new("pix_fmts", "yuv420p")],
        format!("f{}", i),
    );

    Ok(graph.add(
        StageKind::Format,
        vec![formatted.into()],
        "setsar",
        vec![Param::new("sar", 1)],
        format!("v{}", i),
    ))
}
