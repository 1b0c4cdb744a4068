//! Advanced-mode plain-text composer.
use super::blocks::{AdvancedBlock, AdvancedPromptData, BlockType};
use super::variables::{substitute, Variables};

pub const COT_INSTRUCTION: &str =
    "Think step by step. Reason silently and present only the final answer unless told otherwise.";
pub const COT_VERIFICATION: &str = "Validate your answer with a brief check.";
pub const SCHEMA_LABEL: &str = "JSON Schema:";

/// Fixed chain-of-thought instruction. Only the verification option changes the text.
pub fn cot_instruction(block: &AdvancedBlock) -> String {
    if block.cot().final_verification {
        format!("{} {}", COT_INSTRUCTION, COT_VERIFICATION)
    } else {
        COT_INSTRUCTION.to_string()
    }
}

pub fn audience_sentence(block: &AdvancedBlock) -> String {
    let profile = block.audience();
    format!(
        "Audience profile: technical knowledge {}/5, urgency {}/5, visual preference {}/5.",
        profile.technical(),
        profile.urgency(),
        profile.visual()
    )
}

/// The text a block contributes once its own framing is removed: generated
/// sentences for chain-of-thought and audience blocks, substituted content otherwise.
pub fn block_body(block: &AdvancedBlock, vars: &Variables) -> String {
    match block.block_type {
        BlockType::ChainOfThought => cot_instruction(block),
        BlockType::AudienceProfile => audience_sentence(block),
        _ => substitute(&block.content, vars),
    }
}

fn format_block(block: &AdvancedBlock, vars: &Variables, out: &mut String) {
    let header = match block.block_type {
        BlockType::System => Some("[SYSTEM]"),
        BlockType::User => Some("[USER]"),
        BlockType::Assistant => Some("[ASSISTANT]"),
        _ => None,
    };
    if let Some(header) = header {
        out.push_str(header);
        out.push('\n');
        out.push_str(&substitute(&block.content, vars));
        out.push_str("\n\n");
        return;
    }

    match block.block_type {
        BlockType::ChainOfThought | BlockType::AudienceProfile => {
            out.push_str(&block_body(block, vars));
            out.push_str("\n\n");
        }
        BlockType::Output => {
            if let Some(schema) = block.json_schema() {
                out.push_str(SCHEMA_LABEL);
                out.push('\n');
                out.push_str(schema);
                out.push_str("\n\n");
            }
            let content = substitute(&block.content, vars);
            if !content.trim().is_empty() {
                push_titled(out, &block.title, &content);
            }
        }
        _ => push_titled(out, &block.title, &substitute(&block.content, vars)),
    }
}

fn push_titled(out: &mut String, title: &str, content: &str) {
    out.push_str(title);
    out.push_str(":\n");
    out.push_str(content);
    out.push_str("\n\n");
}

pub fn compose_advanced(data: &AdvancedPromptData) -> String {
    let mut out = String::new();
    for block in data.renderable() {
        format_block(block, &data.variables, &mut out);
    }
    out.truncate(out.trim_end().len());
    out
}
