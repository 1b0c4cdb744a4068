//! Prompt composition engine.
//!
//! Simple mode turns a fixed set of fields into sentences; advanced mode
//! renders an ordered list of typed blocks with `${name}` substitution. Both
//! can be serialized as plain text, tagged markup or JSON.
pub mod advanced;
pub mod blocks;
pub mod constructor;
pub mod fields;
pub mod render;
pub mod simple;
pub mod templates;
pub mod variables;
pub mod wizard;

pub use blocks::{AdvancedBlock, AdvancedPromptData, BlockConfig, BlockPatch, BlockType};
pub use constructor::{Draft, PromptConstructor, RenderedPrompt};
pub use render::PromptFormat;
pub use simple::SimplePromptData;
pub use templates::TemplateStore;
pub use wizard::{Wizard, WizardStep};
