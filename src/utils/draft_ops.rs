//! `KEY=VALUE` overrides applied to a serialized draft.
//!
//! Keys are dotted paths into the draft's `data` object, e.g. `objective`,
//! `variables.texto` or `blocks.0.content`. Numeric segments index arrays.
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::prompt::Draft;

pub fn parse_set_pairs(items: &[String]) -> AppResult<Vec<(Vec<String>, String)>> {
    let mut out = Vec::new();
    for s in items {
        let Some((k, val)) = s.split_once('=') else {
            return Err(AppError::InvalidOverride(format!(
                "'{}', expected KEY=VALUE",
                s
            )));
        };
        let key_path: Vec<String> = k.trim().split('.').map(|p| p.to_string()).collect();
        if key_path.iter().any(|p| p.is_empty()) {
            return Err(AppError::InvalidOverride(format!("empty path segment in '{}'", k)));
        }
        out.push((key_path, val.to_string()));
    }
    Ok(out)
}

pub fn parse_value(src: &str) -> Value {
    if let Ok(v) = serde_json::from_str::<Value>(src) {
        return v;
    }
    if src.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if src.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if src.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(i) = src.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = src.parse::<f64>() {
        return json!(f);
    }
    Value::String(src.to_string())
}

fn step_mut<'a>(cur: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    match cur {
        Value::Object(map) => map.get_mut(key),
        Value::Array(arr) => key.parse::<usize>().ok().and_then(|i| arr.get_mut(i)),
        _ => None,
    }
}

fn lookup<'a>(root: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(root, |cur, key| match cur {
        Value::Object(map) => map.get(key),
        Value::Array(arr) => key.parse::<usize>().ok().and_then(|i| arr.get(i)),
        _ => None,
    })
}

/// Sets `path` inside `root`. Intermediate segments must exist; the last one
/// may create a new object key or replace an array element.
pub fn apply_set_path(root: &mut Value, path: &[String], new_val: Value) -> bool {
    let Some((last, parents)) = path.split_last() else {
        return false;
    };
    let mut cur = root;
    for key in parents {
        match step_mut(cur, key) {
            Some(next) => cur = next,
            None => return false,
        }
    }
    match cur {
        Value::Object(map) => {
            map.insert(last.clone(), new_val);
            true
        }
        Value::Array(arr) => match last.parse::<usize>().ok().and_then(|i| arr.get_mut(i)) {
            Some(slot) => {
                *slot = new_val;
                true
            }
            None => false,
        },
        _ => false,
    }
}

/// Returns a copy of `draft` with every override applied.
///
/// Values replacing an existing string are kept verbatim; anything else is
/// parsed leniently so `formatHeaders=true` or `audience=["a","b"]` work.
pub fn apply_overrides(draft: &Draft, sets: &[String]) -> AppResult<Draft> {
    if sets.is_empty() {
        return Ok(draft.clone());
    }
    let pairs = parse_set_pairs(sets)?;
    let mut root = serde_json::to_value(draft)?;
    let data = root
        .get_mut("data")
        .ok_or_else(|| AppError::InvalidOverride("draft has no data".to_string()))?;

    for (path, raw) in pairs {
        let new_val = match lookup(data, &path) {
            Some(Value::String(_)) => Value::String(raw),
            _ => parse_value(&raw),
        };
        if !apply_set_path(data, &path, new_val) {
            return Err(AppError::InvalidOverride(format!(
                "could not apply override to path: {}",
                path.join(".")
            )));
        }
    }

    serde_json::from_value(root)
        .map_err(|e| AppError::InvalidOverride(format!("override produced an invalid draft: {}", e)))
}
