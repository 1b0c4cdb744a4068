//! Prompt construction entry point.
//!
//! Given a draft in either authoring mode and a target format, picks the
//! matching composer or renderer and returns the final text with its length.
use serde::{Deserialize, Serialize};

use super::advanced::compose_advanced;
use super::blocks::AdvancedPromptData;
use super::render::{advanced_html, advanced_json, simple_html, simple_json, PromptFormat};
use super::simple::{compose_simple, SimplePromptData};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "data", rename_all = "lowercase")]
pub enum Draft {
    Simple(SimplePromptData),
    Advanced(AdvancedPromptData),
}

impl Default for Draft {
    fn default() -> Self {
        Draft::Simple(SimplePromptData::default())
    }
}

impl Draft {
    /// A fresh empty draft in the same mode.
    pub fn emptied(&self) -> Self {
        match self {
            Draft::Simple(_) => Draft::Simple(SimplePromptData::default()),
            Draft::Advanced(_) => Draft::Advanced(AdvancedPromptData::default()),
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Draft::Simple(_) => "simple",
            Draft::Advanced(_) => "advanced",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPrompt {
    pub text: String,
    pub char_count: usize,
    pub format: PromptFormat,
}

impl RenderedPrompt {
    pub fn new(text: String, format: PromptFormat) -> Self {
        let char_count = text.chars().count();
        RenderedPrompt {
            text,
            char_count,
            format,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PromptConstructor;

impl PromptConstructor {
    pub fn new() -> Self {
        PromptConstructor
    }

    pub fn construct(&self, draft: &Draft, format: PromptFormat) -> RenderedPrompt {
        let text = match (draft, format) {
            (Draft::Simple(data), PromptFormat::Text) => compose_simple(data),
            (Draft::Simple(data), PromptFormat::Html) => simple_html(data),
            (Draft::Simple(data), PromptFormat::Json) => simple_json(data),
            (Draft::Advanced(data), PromptFormat::Text) => compose_advanced(data),
            (Draft::Advanced(data), PromptFormat::Html) => advanced_html(data),
            (Draft::Advanced(data), PromptFormat::Json) => advanced_json(data),
        };
        tracing::debug!(
            mode = draft.mode(),
            format = %format,
            chars = text.len(),
            "rendered prompt"
        );
        RenderedPrompt::new(text, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::blocks::{BlockPatch, BlockType};

    fn simple() -> Draft {
        Draft::Simple(SimplePromptData {
            role: "Profesor de nivel".into(),
            objective: "explicar fotosíntesis".into(),
            format: "Lista".into(),
            ..Default::default()
        })
    }

    #[test]
    fn counts_characters_not_bytes() {
        let rendered = PromptConstructor::new().construct(&simple(), PromptFormat::Text);
        assert_eq!(rendered.char_count, rendered.text.chars().count());
        assert!(rendered.char_count < rendered.text.len());
    }

    #[test]
    fn rendering_is_deterministic() {
        let constructor = PromptConstructor::new();
        let draft = simple();
        for format in [PromptFormat::Text, PromptFormat::Html, PromptFormat::Json] {
            assert_eq!(
                constructor.construct(&draft, format),
                constructor.construct(&draft, format)
            );
        }
    }

    #[test]
    fn switching_format_and_back_reproduces_text() {
        let constructor = PromptConstructor::new();
        let mut data = AdvancedPromptData::new();
        let id = data.add(BlockType::User);
        data.update(&id, BlockPatch::content("hola ${x}"));
        let draft = Draft::Advanced(data);

        let original = constructor.construct(&draft, PromptFormat::Text);
        let _ = constructor.construct(&draft, PromptFormat::Json);
        let _ = constructor.construct(&draft, PromptFormat::Html);
        assert_eq!(constructor.construct(&draft, PromptFormat::Text), original);
    }

    #[test]
    fn draft_wire_format_is_tagged_by_mode() {
        let draft: Draft = serde_json::from_str(
            r#"{"mode":"advanced","data":{"blocks":[{"id":"b1","type":"system","title":"S","content":"Eres útil"}]}}"#,
        )
        .unwrap();
        let rendered = PromptConstructor::new().construct(&draft, PromptFormat::Text);
        assert_eq!(rendered.text, "[SYSTEM]\nEres útil");
        assert_eq!(draft.emptied(), Draft::Advanced(AdvancedPromptData::default()));
    }
}
