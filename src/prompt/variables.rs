//! `${name}` placeholder substitution for block content.
//!
//! Substitution is a single pass: values are inserted verbatim and never
//! re-expanded, and names without a mapping entry stay as literal text.
use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid placeholder regex"));

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

pub type Variables = BTreeMap<String, String>;

pub fn is_valid_name(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

pub fn substitute(content: &str, vars: &Variables) -> String {
    if vars.is_empty() || !content.contains("${") {
        return content.to_string();
    }
    PLACEHOLDER
        .replace_all(content, |caps: &Captures| match vars.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Placeholder names referenced in `content`, in first-seen order.
pub fn placeholders(content: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(content) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}
