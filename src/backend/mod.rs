pub mod client;

pub use client::{Difficulty, PromptApiClient, PromptRecord, PromptStore, TagRef, TagSource, TagSuggestion};
