// Crossfade chain between per-image streams

use crate::domain::catalog::TransitionKind;
use crate::domain::model::ResolvedSettings;
use crate::error::{PanZoomError, PanZoomResult};
use crate::planner::graph::{Label, Param, StageGraph, StageKind};

/// A finished per-image stream and the transition leading into it
#[derive(Debug, Clone)]
pub struct SlotStream {
    pub label: Label,
    pub transition_in: Option<TransitionKind>,
}

/// Offset of the `i`-th transition (1-based), in seconds
pub fn transition_offset(i: usize, settings: &ResolvedSettings) -> f64 {
    i as f64 * (settings.image_duration - settings.crossfade)
}

/// Fold the streams into one with an `xfade` per adjacent pair.
///
/// Returns the chain's output label and the transition offsets.
pub fn build_chain(
    graph: &mut StageGraph,
    streams: Vec<SlotStream>,
    settings: &ResolvedSettings,
) -> PanZoomResult<(Label, Vec<f64>)> {
    let mut streams = streams.into_iter();
    let first = streams
        .next()
        .ok_or_else(|| PanZoomError::validation("Transition chain needs at least one stream"))?;

    let mut acc = first.label;
    let mut offsets = Vec::new();

    for (i, stream) in streams.enumerate().map(|(n, s)| (n + 1, s)) {
        let offset = transition_offset(i, settings);
        let kind = stream.transition_in.unwrap_or(TransitionKind::Fade);
        acc = graph.add(
            StageKind::Transition,
            vec![acc.into(), stream.label.into()],
            "xfade",
            vec![
                Param::new("transition", kind),
                Param::num("duration", settings.crossfade),
                Param::num("offset", offset),
            ],
            format!("x{}", i),
        );
        offsets.push(offset);
    }

    Ok((acc, offsets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, SettingsOverlay, VideoOverlay};

    fn settings() -> ResolvedSettings {
        let overlay = SettingsOverlay {
            video: VideoOverlay {
                image_duration: Some(10.0),
                crossfade: Some(2.0),
                ..VideoOverlay::default()
            },
            ..SettingsOverlay::default()
        };
        resolve(&overlay, None, None, None).unwrap()
    }

    fn streams(kinds: &[Option<TransitionKind>]) -> Vec<SlotStream> {
        kinds
            .iter()
            .enumerate()
            .map(|(i, k)| SlotStream {
                label: Label::new(format!("v{}", i)),
                transition_in: *k,
            })
            .collect()
    }

    #[test]
    fn test_three_stream_chain() {
        let mut graph = StageGraph::new();
        let (label, offsets) = build_chain(
            &mut graph,
            streams(&[None, Some(TransitionKind::Fade), Some(TransitionKind::WipeLeft)]),
            &settings(),
        )
        .unwrap();

        assert_eq!(label.name(), "x2");
        assert_eq!(offsets, vec![8.0, 16.0]);
        assert_eq!(
            graph.to_filter_complex(),
            "[v0][v1]xfade=transition=fade:duration=2:offset=8[x1];\
             [x1][v2]xfade=transition=wipeleft:duration=2:offset=16[x2]"
        );
    }

    #[test]
    fn test_single_stream_passes_through() {
        let mut graph = StageGraph::new();
        let (label, offsets) = build_chain(&mut graph, streams(&[None]), &settings()).unwrap();
        assert_eq!(label.name(), "v0");
        assert!(offsets.is_empty());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_offsets_are_multiplied_not_accumulated() {
        let mut s = settings();
        s.image_duration = 0.7;
        s.crossfade = 0.1;
        assert_eq!(transition_offset(30, &s), 30.0 * (0.7 - 0.1));
    }
}
