//! Sentence builders, one per simple-mode field.
//!
//! Every builder is total: an empty or missing field yields an empty string,
//! which the composer drops.
use super::simple::Voice;

/// Role label that defers to the free-text custom role.
pub const ROLE_OTHER: &str = "Other";
/// Output format that carries a column list.
pub const FORMAT_TABLE: &str = "Table";

pub fn is_other_role(role: &str) -> bool {
    let role = role.trim();
    role.eq_ignore_ascii_case(ROLE_OTHER) || role.eq_ignore_ascii_case("Otro")
}

pub fn is_table_format(format: &str) -> bool {
    let format = format.trim();
    format.eq_ignore_ascii_case(FORMAT_TABLE) || format.eq_ignore_ascii_case("Tabla")
}

/// The role actually rendered: the custom text for "Other", otherwise the label.
pub fn resolve_role<'a>(role: &'a str, role_custom: &'a str) -> &'a str {
    if is_other_role(role) {
        role_custom.trim()
    } else {
        role.trim()
    }
}

pub fn make_role(role: &str, role_custom: &str) -> String {
    let resolved = resolve_role(role, role_custom);
    if resolved.is_empty() {
        return String::new();
    }
    format!("Actúa como {}.", resolved)
}

pub fn make_objective(objective: &str) -> String {
    let objective = objective.trim();
    if objective.is_empty() {
        return String::new();
    }
    format!("Tu objetivo es: {}.", objective)
}

pub fn make_audience(audience: &[String]) -> String {
    if audience.is_empty() {
        return String::new();
    }
    format!("Adapta la respuesta a la audiencia: {}.", audience.join(", "))
}

/// Format name plus column and header qualifiers, shared with the markup renderers.
pub fn format_phrase(format: &str, columns: &[String], headers: bool) -> String {
    let mut phrase = format.trim().to_string();
    if is_table_format(format) && !columns.is_empty() {
        phrase.push_str(" con columnas: ");
        phrase.push_str(&columns.join(", "));
    }
    if headers {
        phrase.push_str(" incluye titulares/encabezados");
    }
    phrase
}

pub fn make_format(format: &str, columns: &[String], headers: bool) -> String {
    if format.trim().is_empty() {
        return String::new();
    }
    format!("Entrega la salida en formato {}.", format_phrase(format, columns, headers))
}

pub fn make_constraints(constraints: &[String]) -> String {
    if constraints.is_empty() {
        return String::new();
    }
    format!("Cumple estas restricciones: {}.", constraints.join("; "))
}

pub fn make_tone(tone: &str, voice: Option<Voice>) -> String {
    let tone = tone.trim();
    if tone.is_empty() {
        return String::new();
    }
    let voice_suffix = voice
        .map(|v| format!(" y voz {}", v.label()))
        .unwrap_or_default();
    format!("Usa un tono {}{}.", tone, voice_suffix)
}

/// Criteria are joined with `>` to express descending priority.
pub fn make_criteria(criteria: &[String]) -> String {
    if criteria.is_empty() {
        return String::new();
    }
    format!("Evalúa tu respuesta con foco en: {}.", criteria.join(" > "))
}

pub fn make_context(context: &str) -> String {
    let context = context.trim();
    if context.is_empty() {
        return String::new();
    }
    format!("Contexto: {}.", context)
}

pub fn make_example(input: &str, output: &str) -> String {
    let (input, output) = (input.trim(), output.trim());
    if input.is_empty() || output.is_empty() {
        return String::new();
    }
    format!("Ejemplo: Entrada -> {}. Salida -> {}.", input, output)
}
