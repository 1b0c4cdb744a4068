//! Advanced-mode block model.
//!
//! Blocks keep a dense zero-based `order`: every structural mutation (add,
//! remove, reorder) renumbers the sequence.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::variables::{self, Variables};
use crate::error::{AppError, AppResult};

pub const DEFAULT_AUDIENCE_LEVEL: u8 = 3;
pub const MAX_AUDIENCE_LEVEL: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    System,
    User,
    Assistant,
    #[serde(alias = "cot")]
    ChainOfThought,
    #[serde(alias = "react")]
    ReasoningTrace,
    Output,
    Restrictions,
    #[serde(alias = "audience")]
    AudienceProfile,
    Variables,
    Rubric,
}

impl BlockType {
    pub const ALL: [BlockType; 10] = [
        BlockType::System,
        BlockType::User,
        BlockType::Assistant,
        BlockType::ChainOfThought,
        BlockType::ReasoningTrace,
        BlockType::Output,
        BlockType::Restrictions,
        BlockType::AudienceProfile,
        BlockType::Variables,
        BlockType::Rubric,
    ];

    pub fn default_title(&self) -> &'static str {
        match self {
            BlockType::System => "Sistema",
            BlockType::User => "Usuario",
            BlockType::Assistant => "Asistente",
            BlockType::ChainOfThought => "Cadena de pensamiento",
            BlockType::ReasoningTrace => "Razonamiento (ReAct)",
            BlockType::Output => "Estructura de salida",
            BlockType::Restrictions => "Restricciones",
            BlockType::AudienceProfile => "Perfil de audiencia",
            BlockType::Variables => "Variables",
            BlockType::Rubric => "Checklist de evaluación",
        }
    }

    /// Tag name used by the markup renderer.
    pub fn tag(&self) -> &'static str {
        match self {
            BlockType::System => "system",
            BlockType::User => "user",
            BlockType::Assistant => "assistant",
            BlockType::ChainOfThought => "cot",
            BlockType::ReasoningTrace => "react",
            BlockType::Output => "estructura",
            BlockType::Restrictions => "restricciones",
            BlockType::AudienceProfile => "audiencia_avanzada",
            BlockType::Variables => "variables",
            BlockType::Rubric => "checklist",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CotOptions {
    pub step_list: bool,
    pub intermediate_questions: bool,
    pub final_verification: bool,
}

/// Three 0-5 sliders; a missing value reads as 3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudienceProfile {
    pub technical: Option<u8>,
    pub urgency: Option<u8>,
    pub visual: Option<u8>,
}

impl AudienceProfile {
    pub fn seeded() -> Self {
        Self {
            technical: Some(DEFAULT_AUDIENCE_LEVEL),
            urgency: Some(DEFAULT_AUDIENCE_LEVEL),
            visual: Some(DEFAULT_AUDIENCE_LEVEL),
        }
    }

    fn level(value: Option<u8>) -> u8 {
        value.unwrap_or(DEFAULT_AUDIENCE_LEVEL).min(MAX_AUDIENCE_LEVEL)
    }

    pub fn technical(&self) -> u8 {
        Self::level(self.technical)
    }

    pub fn urgency(&self) -> u8 {
        Self::level(self.urgency)
    }

    pub fn visual(&self) -> u8 {
        Self::level(self.visual)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlockConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cot: Option<CotOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<AudienceProfile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_sections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub order: usize,
    #[serde(default)]
    pub config: BlockConfig,
}

fn enabled_by_default() -> bool {
    true
}

impl AdvancedBlock {
    pub fn new(block_type: BlockType, order: usize) -> Self {
        let config = match block_type {
            BlockType::AudienceProfile => BlockConfig {
                audience: Some(AudienceProfile::seeded()),
                ..Default::default()
            },
            _ => BlockConfig::default(),
        };
        Self {
            id: Uuid::new_v4().to_string(),
            block_type,
            title: block_type.default_title().to_string(),
            content: String::new(),
            enabled: true,
            order,
            config,
        }
    }

    pub fn is_renderable(&self) -> bool {
        self.enabled && !self.content.trim().is_empty()
    }

    pub fn audience(&self) -> AudienceProfile {
        self.config.audience.unwrap_or_default()
    }

    pub fn cot(&self) -> CotOptions {
        self.config.cot.unwrap_or_default()
    }

    /// JSON schema text, if one is configured and not blank.
    pub fn json_schema(&self) -> Option<&str> {
        self.config
            .json_schema
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Partial update merged into an existing block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlockPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub enabled: Option<bool>,
    pub config: Option<BlockConfig>,
}

impl BlockPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedPromptData {
    pub blocks: Vec<AdvancedBlock>,
    pub variables: Variables,
}

impl AdvancedPromptData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a block of `block_type` and returns its id.
    pub fn add(&mut self, block_type: BlockType) -> String {
        self.renumber();
        let block = AdvancedBlock::new(block_type, self.blocks.len());
        let id = block.id.clone();
        self.blocks.push(block);
        id
    }

    pub fn get(&self, id: &str) -> Option<&AdvancedBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Merges `patch` into the block with `id`. Returns false if no block matched.
    pub fn update(&mut self, id: &str, patch: BlockPatch) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|b| b.id == id) else {
            return false;
        };
        if let Some(title) = patch.title {
            block.title = title;
        }
        if let Some(content) = patch.content {
            block.content = content;
        }
        if let Some(enabled) = patch.enabled {
            block.enabled = enabled;
        }
        if let Some(config) = patch.config {
            block.config = config;
        }
        true
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        match self.blocks.iter_mut().find(|b| b.id == id) {
            Some(block) => {
                block.enabled = !block.enabled;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.id != id);
        let removed = self.blocks.len() != before;
        if removed {
            self.renumber();
        }
        removed
    }

    /// Moves the block at position `from` (in current order) to position `to`.
    pub fn reorder(&mut self, from: usize, to: usize) {
        self.blocks.sort_by_key(|b| b.order);
        if from >= self.blocks.len() || to >= self.blocks.len() {
            return;
        }
        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
        for (index, block) in self.blocks.iter_mut().enumerate() {
            block.order = index;
        }
    }

    /// Blocks sorted by `order`.
    pub fn ordered(&self) -> Vec<&AdvancedBlock> {
        let mut blocks: Vec<&AdvancedBlock> = self.blocks.iter().collect();
        blocks.sort_by_key(|b| b.order);
        blocks
    }

    /// Enabled, non-empty blocks in render order.
    pub fn renderable(&self) -> Vec<&AdvancedBlock> {
        self.ordered()
            .into_iter()
            .filter(|b| b.is_renderable())
            .collect()
    }

    pub fn set_variable(&mut self, name: &str, value: &str) -> AppResult<()> {
        let name = name.trim();
        if !variables::is_valid_name(name) {
            return Err(AppError::InvalidVariable(format!(
                "'{}' is not a valid identifier",
                name
            )));
        }
        if value.trim().is_empty() {
            return Err(AppError::InvalidVariable(format!("'{}' needs a value", name)));
        }
        self.variables.insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn remove_variable(&mut self, name: &str) -> bool {
        self.variables.remove(name).is_some()
    }

    /// Placeholder names referenced by renderable blocks.
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for block in self.renderable() {
            for name in variables::placeholders(&block.content) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn unresolved_placeholders(&self) -> Vec<String> {
        self.placeholders()
            .into_iter()
            .filter(|name| !self.variables.contains_key(name))
            .collect()
    }

    fn renumber(&mut self) {
        self.blocks.sort_by_key(|b| b.order);
        for (index, block) in self.blocks.iter_mut().enumerate() {
            block.order = index;
        }
    }
}
