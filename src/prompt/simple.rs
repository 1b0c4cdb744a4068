//! Simple-mode draft state and its plain-text composer.
use serde::{Deserialize, Serialize};

use super::fields;

pub const MAX_LABEL_CHARS: usize = 50;
pub const MAX_CONTEXT_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    #[serde(alias = "activa")]
    Active,
    #[serde(alias = "pasiva")]
    Passive,
}

impl Voice {
    /// Wire value, also used verbatim in the tone sentence.
    pub fn label(&self) -> &'static str {
        match self {
            Voice::Active => "active",
            Voice::Passive => "passive",
        }
    }
}

/// One structured simple-mode draft. Only role, objective and format are required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimplePromptData {
    pub role: String,
    pub role_custom: String,
    pub objective: String,
    pub audience: Vec<String>,
    pub format: String,
    pub format_columns: Vec<String>,
    pub format_headers: bool,
    pub constraints: Vec<String>,
    pub tone: String,
    pub voice: Option<Voice>,
    pub criteria: Vec<String>,
    pub context: String,
    pub example_input: String,
    pub example_output: String,
}

/// Why a label was not added to one of the list fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRejection {
    Empty,
    TooLong,
    Duplicate,
}

fn push_label(list: &mut Vec<String>, label: &str) -> Result<(), LabelRejection> {
    let label = label.trim();
    if label.is_empty() {
        return Err(LabelRejection::Empty);
    }
    if label.chars().count() > MAX_LABEL_CHARS {
        return Err(LabelRejection::TooLong);
    }
    let lowered = label.to_lowercase();
    if list.iter().any(|l| l.to_lowercase() == lowered) {
        return Err(LabelRejection::Duplicate);
    }
    list.push(label.to_string());
    Ok(())
}

impl SimplePromptData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_audience(&mut self, label: &str) -> Result<(), LabelRejection> {
        push_label(&mut self.audience, label)
    }

    pub fn add_constraint(&mut self, label: &str) -> Result<(), LabelRejection> {
        push_label(&mut self.constraints, label)
    }

    pub fn add_format_column(&mut self, label: &str) -> Result<(), LabelRejection> {
        push_label(&mut self.format_columns, label)
    }

    pub fn add_criterion(&mut self, label: &str) -> Result<(), LabelRejection> {
        push_label(&mut self.criteria, label)
    }

    /// Moves a criterion to a new priority slot. Out-of-range indices are ignored.
    pub fn move_criterion(&mut self, from: usize, to: usize) {
        if from >= self.criteria.len() || to >= self.criteria.len() {
            return;
        }
        let item = self.criteria.remove(from);
        self.criteria.insert(to, item);
    }

    pub fn remove_audience(&mut self, index: usize) {
        if index < self.audience.len() {
            self.audience.remove(index);
        }
    }

    pub fn remove_constraint(&mut self, index: usize) {
        if index < self.constraints.len() {
            self.constraints.remove(index);
        }
    }

    pub fn remove_criterion(&mut self, index: usize) {
        if index < self.criteria.len() {
            self.criteria.remove(index);
        }
    }

    pub fn remove_format_column(&mut self, index: usize) {
        if index < self.format_columns.len() {
            self.format_columns.remove(index);
        }
    }

    pub fn set_context(&mut self, context: &str) {
        self.context = context.chars().take(MAX_CONTEXT_CHARS).collect();
    }

    pub fn resolved_role(&self) -> &str {
        fields::resolve_role(&self.role, &self.role_custom)
    }
}

/// Builds the plain-text prompt: pillar sentences in fixed order, blank-line separated.
pub fn compose_simple(data: &SimplePromptData) -> String {
    let parts = [
        fields::make_role(&data.role, &data.role_custom),
        fields::make_objective(&data.objective),
        fields::make_audience(&data.audience),
        fields::make_format(&data.format, &data.format_columns, data.format_headers),
        fields::make_constraints(&data.constraints),
        fields::make_tone(&data.tone, data.voice),
        fields::make_criteria(&data.criteria),
        fields::make_context(&data.context),
        fields::make_example(&data.example_input, &data.example_output),
    ];
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
