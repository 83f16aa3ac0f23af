// Title card and watermark stages

use crate::domain::model::{ResolvedSettings, TitleSpec, WatermarkPosition, WatermarkSpec};
use crate::error::{PanZoomError, PanZoomResult};
use crate::planner::graph::{format_number, Label, Param, StageGraph, StageKind, StreamRef};
use crate::planner::InputLayout;

/// Characters the filter option parser splits or unquotes on
const OPTION_SPECIALS: &[char] = &['\\', '\'', ':'];
/// Characters the filter graph parser splits or unquotes on
const GRAPH_SPECIALS: &[char] = &['\\', '\'', '[', ']', ',', ';'];
/// Characters drawtext expansion interprets
const EXPANSION_SPECIALS: &[char] = &['\\', '%'];

fn backslash_escape(text: &str, specials: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if specials.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape a literal option value for use inside `-filter_complex`.
///
/// The engine unescapes the graph text first and each option value second,
/// so the value is escaped for the option level and then again for the graph.
pub fn escape_filter_value(raw: &str) -> String {
    backslash_escape(&backslash_escape(raw, OPTION_SPECIALS), GRAPH_SPECIALS)
}

/// Escape literal drawtext `text=`; `%` would otherwise start an expansion
pub fn escape_drawtext(text: &str) -> String {
    escape_filter_value(&backslash_escape(text, EXPANSION_SPECIALS))
}

/// `overlay` x/y expressions for a watermark anchor
pub fn watermark_xy(position: WatermarkPosition, margin: u32) -> (String, String) {
    let m = margin;
    match position {
        WatermarkPosition::TopLeft => (format!("{}", m), format!("{}", m)),
        WatermarkPosition::TopRight => (format!("W-w-{}", m), format!("{}", m)),
        WatermarkPosition::BottomLeft => (format!("{}", m), format!("H-h-{}", m)),
        WatermarkPosition::BottomRight => (format!("W-w-{}", m), format!("H-h-{}", m)),
        WatermarkPosition::Center => ("(W-w)/2".to_string(), "(H-h)/2".to_string()),
    }
}

/// Prepend the title card (if any), then put the watermark (if any) on top.
///
/// With neither present `base` is returned unchanged.
pub fn apply_overlays(
    graph: &mut StageGraph,
    base: Label,
    watermark: Option<&WatermarkSpec>,
    title: Option<&TitleSpec>,
    layout: &InputLayout,
    settings: &ResolvedSettings,
) -> PanZoomResult<Label> {
    let mut current = base;

    if let Some(title) = title {
        current = build_title(graph, current, title, settings);
    }

    if let Some(watermark) = watermark {
        let input = layout.watermark_index.ok_or_else(|| {
            PanZoomError::validation("Watermark is set but has no engine input")
        })?;
        current = build_watermark(graph, current, watermark, input, settings);
    }

    Ok(current)
}

fn drawtext_params(
    text: &str,
    size: u32,
    y: String,
    title: &TitleSpec,
) -> Vec<Param> {
    let mut params = Vec::new();
    if let Some(font) = &title.font_file {
        params.push(Param::new(
            "fontfile",
            escape_filter_value(&font.to_string_lossy()),
        ));
    }
    params.push(Param::new("text", escape_drawtext(text)));
    params.push(Param::new("fontsize", size));
    params.push(Param::new("fontcolor", &title.font_color));
    params.push(Param::expr("x", "(w-text_w)/2"));
    params.push(Param::expr("y", y));
    params
}

fn build_title(
    graph: &mut StageGraph,
    base: Label,
    title: &TitleSpec,
    settings: &ResolvedSettings,
) -> Label {
    let d = title.duration;

    let bg = graph.add(
        StageKind::Source,
        vec![],
        "color",
        vec![
            Param::new("c", &title.background_color),
            Param::new("s", settings.resolution()),
            Param::num("d", d),
            Param::new("r", settings.fps),
        ],
        "tbg",
    );
    let formatted = graph.add(
        StageKind::Format,
        vec![bg.into()],
        "format",
        vec![Param::new("pix_fmts", "yuv420p")],
        "tfmt",
    );
    let square = graph.add(
        StageKind::Format,
        vec![formatted.into()],
        "setsar",
        vec![Param::new("sar", 1)],
        "tsar",
    );

    let title_y = match title.subtitle {
        Some(_) => format!("(h-text_h)/2-{}", title.subtitle_size),
        None => "(h-text_h)/2".to_string(),
    };
    let mut card = graph.add(
        StageKind::Text,
        vec![square.into()],
        "drawtext",
        drawtext_params(&title.text, title.font_size, title_y, title),
        "ttext",
    );

    if let Some(subtitle) = &title.subtitle {
        let sub_y = format!("(h-text_h)/2+{}", title.font_size / 2);
        card = graph.add(
            StageKind::Text,
            vec![card.into()],
            "drawtext",
            drawtext_params(subtitle, title.subtitle_size, sub_y, title),
            "tsub",
        );
    }

    let fade_in = title.fade_in.min(d);
    if fade_in > 0.0 {
        card = graph.add(
            StageKind::Fade,
            vec![card.into()],
            "fade",
            vec![
                Param::new("t", "in"),
                Param::num("st", 0.0),
                Param::num("d", fade_in),
            ],
            "tfadein",
        );
    }

    let fade_out = title.fade_out.min(d);
    if fade_out > 0.0 {
        card = graph.add(
            StageKind::Fade,
            vec![card.into()],
            "fade",
            vec![
                Param::new("t", "out"),
                Param::num("st", (d - fade_out).max(0.0)),
                Param::num("d", fade_out),
            ],
            "tfadeout",
        );
    }

    graph.add(
        StageKind::Concat,
        vec![card.into(), base.into()],
        "concat",
        vec![
            Param::new("n", 2),
            Param::new("v", 1),
            Param::new("a", 0),
        ],
        "titled",
    )
}

fn build_watermark(
    graph: &mut StageGraph,
    base: Label,
    watermark: &WatermarkSpec,
    input: usize,
    settings: &ResolvedSettings,
) -> Label {
    let width = (settings.width as f64 * watermark.scale).round().max(1.0) as u32;

    let scaled = graph.add(
        StageKind::Scale,
        vec![StreamRef::video(input)],
        "scale",
        vec![Param::new("w", width), Param::new("h", -1)],
        "wmscaled",
    );
    let rgba = graph.add(
        StageKind::Format,
        vec![scaled.into()],
        "format",
        vec![Param::new("pix_fmts", "rgba")],
        "wmrgba",
    );
    let faded = graph.add(
        StageKind::Alpha,
        vec![rgba.into()],
        "colorchannelmixer",
        vec![Param::new("aa", format_number(watermark.opacity))],
        "wm",
    );

    let (x, y) = watermark_xy(watermark.position, watermark.margin);
    graph.add(
        StageKind::Overlay,
        vec![base.into(), faded.into()],
        "overlay",
        vec![Param::expr("x", x), Param::expr("y", y)],
        "marked",
    )
}
