//! Stage graph model and filter-graph text serialization

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::{PanZoomError, PanZoomResult};

/// Name of a stream produced inside the graph
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Label(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Video,
    Audio,
}

/// Stage input: a raw engine input or a label produced earlier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamRef {
    Source { input: usize, kind: StreamKind },
    Label(Label),
}

impl StreamRef {
    pub fn video(input: usize) -> Self {
        StreamRef::Source {
            input,
            kind: StreamKind::Video,
        }
    }
}

impl From<Label> for StreamRef {
    fn from(label: Label) -> Self {
        StreamRef::Label(label)
    }
}

impl From<&Label> for StreamRef {
    fn from(label: &Label) -> Self {
        StreamRef::Label(label.clone())
    }
}

impl fmt::Display for StreamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamRef::Source { input, kind } => {
                let k = match kind {
                    StreamKind::Video => "v",
                    StreamKind::Audio => "a",
                };
                write!(f, "[{}:{}]", input, k)
            }
            StreamRef::Label(label) => write!(f, "{}", label),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Scale,
    Motion,
    Format,
    Transition,
    Overlay,
    Text,
    Source,
    Fade,
    Alpha,
    Concat,
}

/// One `key=value` filter option
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub key: &'static str,
    pub value: String,
}

impl Param {
    pub fn new(key: &'static str, value: impl ToString) -> Self {
        Param {
            key,
            value: value.to_string(),
        }
    }

    /// Expression value, single-quoted so `,` and `:` stay inside the option
    pub fn expr(key: &'static str, value: impl AsRef<str>) -> Self {
        Param {
            key,
            value: format!("'{}'", value.as_ref()),
        }
    }

    /// Numeric value printed with [`format_number`]
    pub fn num(key: &'static str, value: f64) -> Self {
        Param {
            key,
            value: format_number(value),
        }
    }
}

/// A single filter invocation in the graph
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub kind: StageKind,
    pub inputs: Vec<StreamRef>,
    pub filter: &'static str,
    pub params: Vec<Param>,
    pub output: Label,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for input in &self.inputs {
            write!(f, "{}", input)?;
        }
        f.write_str(self.filter)?;
        for (i, param) in self.params.iter().enumerate() {
            let sep = if i == 0 { '=' } else { ':' };
            write!(f, "{}{}={}", sep, param.key, param.value)?;
        }
        write!(f, "{}", self.output)
    }
}

/// Ordered list of stages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageGraph {
    stages: Vec<Stage>,
}

impl StageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage and return its output label
    pub fn add(
        &mut self,
        kind: StageKind,
        inputs: Vec<StreamRef>,
        filter: &'static str,
        params: Vec<Param>,
        output: impl Into<String>,
    ) -> Label {
        let output = Label::new(output);
        self.stages.push(Stage {
            kind,
            inputs,
            filter,
            params,
            output: output.clone(),
        });
        output
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Number of stages of one kind
    pub fn count(&self, kind: StageKind) -> usize {
        self.stages.iter().filter(|s| s.kind == kind).count()
    }

    pub fn final_label(&self) -> Option<&Label> {
        self.stages.last().map(|s| &s.output)
    }

    /// Check label wiring.
    ///
    /// Every label input must come from an earlier stage, output labels are
    /// unique and every label except the final one is consumed exactly once.
    pub fn validate(&self) -> PanZoomResult<()> {
        let final_label = self
            .final_label()
            .ok_or_else(|| graph_error("graph has no stages".to_string()))?;

        let mut produced: HashSet<&Label> = HashSet::new();
        let mut consumed: HashMap<&Label, usize> = HashMap::new();

        for stage in &self.stages {
            for input in &stage.inputs {
                if let StreamRef::Label(label) = input {
                    if !produced.contains(label) {
                        return Err(graph_error(format!(
                            "{} reads {} before it is produced",
                            stage.filter, label
                        )));
                    }
                    *consumed.entry(label).or_insert(0) += 1;
                }
            }
            if !produced.insert(&stage.output) {
                return Err(graph_error(format!("label {} produced twice", stage.output)));
            }
        }

        for label in &produced {
            let uses = consumed.get(label).copied().unwrap_or(0);
            if *label == final_label {
                if uses != 0 {
                    return Err(graph_error(format!(
                        "final label {} must not be consumed",
                        label
                    )));
                }
            } else if uses != 1 {
                return Err(graph_error(format!(
                    "label {} consumed {} times, expected once",
                    label, uses
                )));
            }
        }

        Ok(())
    }

    /// Serialize as `-filter_complex` text
    pub fn to_filter_complex(&self) -> String {
        self.stages
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(";")
    }
}

fn graph_error(message: String) -> PanZoomError {
    PanZoomError::validation(format!("Invalid filter graph: {}", message))
}

/// Print a number with at most 6 decimals and no trailing zeros
pub fn format_number(value: f64) -> String {
    let text = format!("{:.6}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
