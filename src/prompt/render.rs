//! Markup and JSON renderings of both draft modes.
//!
//! Each rendering is derived from structured state, never from another rendering.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::advanced::{block_body, cot_instruction};
use super::blocks::{AdvancedPromptData, BlockType};
use super::fields;
use super::simple::SimplePromptData;
use super::variables::substitute;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptFormat {
    #[default]
    Text,
    Html,
    Json,
}

impl fmt::Display for PromptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PromptFormat::Text => "text",
            PromptFormat::Html => "html",
            PromptFormat::Json => "json",
        };
        f.write_str(name)
    }
}

impl FromStr for PromptFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" | "texto" => Ok(PromptFormat::Text),
            "html" | "xml" => Ok(PromptFormat::Html),
            "json" => Ok(PromptFormat::Json),
            other => Err(format!("unknown prompt format '{}'", other)),
        }
    }
}

/// Escapes angle brackets only; no other entities are touched.
pub fn escape_markup(s: &str) -> String {
    s.replace('<', "&lt;").replace('>', "&gt;")
}

fn tagged(tag: &str, value: &str) -> String {
    format!("<{tag}>{}</{tag}>", escape_markup(value))
}

pub fn simple_html(data: &SimplePromptData) -> String {
    let mut lines: Vec<String> = Vec::new();

    let role = data.resolved_role();
    if !role.is_empty() {
        lines.push(tagged("rol", role));
    }
    if !data.objective.trim().is_empty() {
        lines.push(tagged("objetivo", data.objective.trim()));
    }
    if !data.audience.is_empty() {
        lines.push(tagged("audiencia", &data.audience.join(", ")));
    }
    if !data.format.trim().is_empty() {
        let phrase = fields::format_phrase(&data.format, &data.format_columns, data.format_headers);
        lines.push(tagged("formato", &phrase));
    }
    if !data.constraints.is_empty() {
        lines.push(tagged("restricciones", &data.constraints.join("; ")));
    }
    if !data.tone.trim().is_empty() {
        let tone = match data.voice {
            Some(voice) => format!("{} y voz {}", data.tone.trim(), voice.label()),
            None => data.tone.trim().to_string(),
        };
        lines.push(tagged("tono", &tone));
    }
    if !data.criteria.is_empty() {
        lines.push(tagged("criterios", &data.criteria.join(" > ")));
    }
    if !data.context.trim().is_empty() {
        lines.push(tagged("contexto", data.context.trim()));
    }
    let (input, output) = (data.example_input.trim(), data.example_output.trim());
    if !input.is_empty() && !output.is_empty() {
        lines.push(format!(
            "<ejemplo>{}{}</ejemplo>",
            tagged("entrada", input),
            tagged("salida", output)
        ));
    }

    lines.join("\n")
}

#[derive(Debug, Serialize)]
struct SimpleFormatJson {
    tipo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    columnas: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    encabezados: Option<bool>,
}

#[derive(Debug, Serialize)]
struct SimpleToneJson {
    tono: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    voz: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct ExampleJson {
    entrada: String,
    salida: String,
}

#[derive(Debug, Default, Serialize)]
struct SimpleJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    rol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    objetivo: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    audiencia: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    formato: Option<SimpleFormatJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    restricciones: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tono: Option<SimpleToneJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    criterios: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contexto: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ejemplo: Option<ExampleJson>,
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

pub fn simple_json(data: &SimplePromptData) -> String {
    let formato = non_empty(&data.format).map(|tipo| SimpleFormatJson {
        columnas: (fields::is_table_format(&tipo) && !data.format_columns.is_empty())
            .then(|| data.format_columns.clone()),
        encabezados: data.format_headers.then_some(true),
        tipo,
    });
    let ejemplo = match (non_empty(&data.example_input), non_empty(&data.example_output)) {
        (Some(entrada), Some(salida)) => Some(ExampleJson { entrada, salida }),
        _ => None,
    };
    let doc = SimpleJson {
        rol: non_empty(data.resolved_role()),
        objetivo: non_empty(&data.objective),
        audiencia: data.audience.clone(),
        formato,
        restricciones: data.constraints.clone(),
        tono: non_empty(&data.tone).map(|tono| SimpleToneJson {
            tono,
            voz: data.voice.map(|v| v.label()),
        }),
        criterios: data.criteria.clone(),
        contexto: non_empty(&data.context),
        ejemplo,
    };
    to_pretty(&doc)
}

pub fn advanced_html(data: &AdvancedPromptData) -> String {
    let mut lines: Vec<String> = Vec::new();
    for block in data.renderable() {
        if block.block_type == BlockType::Output {
            if let Some(schema) = block.json_schema() {
                lines.push(tagged("esquema", schema));
            }
        }
        lines.push(tagged(block.block_type.tag(), &block_body(block, &data.variables)));
    }
    lines.join("\n")
}

#[derive(Debug, Serialize)]
struct MessageJson {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct CotJson {
    instruccion: String,
    lista_pasos: bool,
    preguntas_intermedias: bool,
    verificacion: bool,
}

#[derive(Debug, Serialize)]
struct StructureJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    esquema: Option<Value>,
    contenido: String,
}

#[derive(Debug, Serialize)]
struct AudienceJson {
    tecnico: u8,
    urgencia: u8,
    visual: u8,
}

#[derive(Debug, Default, Serialize)]
struct AdvancedJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    messages: Vec<MessageJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cot: Option<CotJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    react: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    estructura: Option<StructureJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audiencia_avanzada: Option<AudienceJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    restricciones: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    checklist: Vec<String>,
}

pub fn advanced_json(data: &AdvancedPromptData) -> String {
    let mut doc = AdvancedJson::default();
    for block in data.renderable() {
        let content = substitute(&block.content, &data.variables);
        match block.block_type {
            BlockType::System => doc.system = Some(content),
            BlockType::User => doc.messages.push(MessageJson {
                role: "user",
                content,
            }),
            BlockType::Assistant => doc.messages.push(MessageJson {
                role: "assistant",
                content,
            }),
            BlockType::ChainOfThought => {
                let options = block.cot();
                doc.cot = Some(CotJson {
                    instruccion: cot_instruction(block),
                    lista_pasos: options.step_list,
                    preguntas_intermedias: options.intermediate_questions,
                    verificacion: options.final_verification,
                });
            }
            BlockType::ReasoningTrace => doc.react = Some(content),
            BlockType::Output => {
                let esquema = block.json_schema().map(|schema| {
                    serde_json::from_str(schema).unwrap_or_else(|_| Value::String(schema.to_string()))
                });
                doc.estructura = Some(StructureJson {
                    esquema,
                    contenido: content,
                });
            }
            BlockType::AudienceProfile => {
                let profile = block.audience();
                doc.audiencia_avanzada = Some(AudienceJson {
                    tecnico: profile.technical(),
                    urgencia: profile.urgency(),
                    visual: profile.visual(),
                });
            }
            BlockType::Restrictions => doc.restricciones.push(content),
            BlockType::Rubric => doc.checklist.push(content),
            BlockType::Variables => {}
        }
    }
    // Compact; only simple mode is pretty-printed.
    serde_json::to_string(&doc).unwrap_or_default()
}

fn to_pretty<T: Serialize>(doc: &T) -> String {
    // Plain structs of strings, numbers and bools always serialize.
    serde_json::to_string_pretty(doc).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::advanced::{COT_INSTRUCTION, COT_VERIFICATION};
    use crate::prompt::blocks::{AudienceProfile, BlockConfig, BlockPatch, CotOptions};
    use crate::prompt::simple::Voice;
    use serde_json::json;

    fn parse(s: &str) -> Value {
        serde_json::from_str(s).unwrap()
    }

    fn block(data: &mut AdvancedPromptData, t: BlockType, content: &str) -> String {
        let id = data.add(t);
        data.update(&id, BlockPatch::content(content));
        id
    }

    #[test]
    fn escape_only_touches_angle_brackets() {
        assert_eq!(escape_markup("<b> & \"x\""), "&lt;b&gt; & \"x\"");
    }

    #[test]
    fn simple_html_tags_populated_fields() {
        let data = SimplePromptData {
            role: "Other".into(),
            role_custom: "Editor <senior>".into(),
            objective: "corregir".into(),
            criteria: vec!["a".into(), "b".into()],
            example_input: "in".into(),
            example_output: "out".into(),
            ..Default::default()
        };
        assert_eq!(
            simple_html(&data),
            "<rol>Editor &lt;senior&gt;</rol>\n<objetivo>corregir</objetivo>\n<criterios>a &gt; b</criterios>\n<ejemplo><entrada>in</entrada><salida>out</salida></ejemplo>"
        );
    }

    #[test]
    fn simple_json_only_has_populated_keys() {
        let data = SimplePromptData {
            role: "Analista".into(),
            objective: "resumir".into(),
            format: "Table".into(),
            format_columns: vec!["Tema".into()],
            format_headers: true,
            tone: "neutral".into(),
            voice: Some(Voice::Active),
            ..Default::default()
        };
        let rendered = simple_json(&data);
        assert!(rendered.contains("\n  \"rol\""));
        assert_eq!(
            parse(&rendered),
            json!({
                "rol": "Analista",
                "objetivo": "resumir",
                "formato": {"tipo": "Table", "columnas": ["Tema"], "encabezados": true},
                "tono": {"tono": "neutral", "voz": "active"}
            })
        );
    }

    #[test]
    fn simple_json_of_empty_draft_is_empty_object() {
        assert_eq!(parse(&simple_json(&SimplePromptData::default())), json!({}));
    }

    #[test]
    fn advanced_json_routes_blocks() {
        let mut data = AdvancedPromptData::new();
        block(&mut data, BlockType::System, "Eres útil");
        block(&mut data, BlockType::User, "Resume: ${texto}");
        data.set_variable("texto", "el informe").unwrap();
        assert_eq!(
            parse(&advanced_json(&data)),
            json!({
                "system": "Eres útil",
                "messages": [{"role": "user", "content": "Resume: el informe"}]
            })
        );
    }

    #[test]
    fn advanced_json_collects_lists_and_last_scalar_wins() {
        let mut data = AdvancedPromptData::new();
        block(&mut data, BlockType::System, "primero");
        block(&mut data, BlockType::Restrictions, "- sin jerga\n- breve");
        block(&mut data, BlockType::Rubric, "exactitud");
        block(&mut data, BlockType::Assistant, "vale");
        block(&mut data, BlockType::System, "segundo");
        let out = parse(&advanced_json(&data));
        assert_eq!(out["system"], "segundo");
        assert_eq!(out["restricciones"], json!(["- sin jerga\n- breve"]));
        assert_eq!(out["checklist"], json!(["exactitud"]));
        assert_eq!(out["messages"][0]["role"], "assistant");
    }

    #[test]
    fn advanced_json_parses_schema_when_valid() {
        let mut data = AdvancedPromptData::new();
        let id = block(&mut data, BlockType::Output, "Solo JSON");
        data.update(
            &id,
            BlockPatch {
                config: Some(BlockConfig {
                    json_schema: Some("{\"type\":\"object\"}".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let out = parse(&advanced_json(&data));
        assert_eq!(out["estructura"]["esquema"], json!({"type": "object"}));
        assert_eq!(out["estructura"]["contenido"], "Solo JSON");
    }

    #[test]
    fn advanced_html_uses_type_tags() {
        let mut data = AdvancedPromptData::new();
        block(&mut data, BlockType::ReasoningTrace, "Pensar <luego> actuar");
        block(&mut data, BlockType::Rubric, "ok");
        assert_eq!(
            advanced_html(&data),
            "<react>Pensar &lt;luego&gt; actuar</react>\n<checklist>ok</checklist>"
        );
    }

    #[test]
    fn advanced_json_keeps_list_block_content_verbatim() {
        let mut data = AdvancedPromptData::new();
        block(&mut data, BlockType::Restrictions, "*Nunca* inventes datos\n--verbose prohibido");
        block(&mut data, BlockType::Restrictions, "Cita ${fuente}");
        block(&mut data, BlockType::Rubric, "- exactitud");
        data.set_variable("fuente", "el anexo").unwrap();
        let out = parse(&advanced_json(&data));
        assert_eq!(
            out["restricciones"],
            json!(["*Nunca* inventes datos\n--verbose prohibido", "Cita el anexo"])
        );
        assert_eq!(out["checklist"], json!(["- exactitud"]));
    }

    #[test]
    fn advanced_json_is_compact() {
        let mut data = AdvancedPromptData::new();
        block(&mut data, BlockType::System, "Eres útil");
        block(&mut data, BlockType::User, "Hola");
        assert_eq!(
            advanced_json(&data),
            r#"{"system":"Eres útil","messages":[{"role":"user","content":"Hola"}]}"#
        );
    }

    #[test]
    fn advanced_json_describes_cot_and_audience() {
        let mut data = AdvancedPromptData::new();
        let cot = block(&mut data, BlockType::ChainOfThought, "razonar");
        data.update(
            &cot,
            BlockPatch {
                config: Some(BlockConfig {
                    cot: Some(CotOptions {
                        step_list: true,
                        intermediate_questions: false,
                        final_verification: true,
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let audience = block(&mut data, BlockType::AudienceProfile, "perfil");
        data.update(
            &audience,
            BlockPatch {
                config: Some(BlockConfig {
                    audience: Some(AudienceProfile {
                        technical: Some(5),
                        urgency: Some(1),
                        visual: None,
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let out = parse(&advanced_json(&data));
        assert_eq!(
            out["cot"],
            json!({
                "instruccion": format!("{} {}", COT_INSTRUCTION, COT_VERIFICATION),
                "lista_pasos": true,
                "preguntas_intermedias": false,
                "verificacion": true
            })
        );
        assert_eq!(
            out["audiencia_avanzada"],
            json!({"tecnico": 5, "urgencia": 1, "visual": 3})
        );
    }

    #[test]
    fn advanced_html_maps_every_special_tag() {
        let mut data = AdvancedPromptData::new();
        block(&mut data, BlockType::ChainOfThought, "razonar");
        let output = block(&mut data, BlockType::Output, "Devuelve <json>");
        data.update(
            &output,
            BlockPatch {
                config: Some(BlockConfig {
                    json_schema: Some("{\"type\":\"object\"}".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        block(&mut data, BlockType::AudienceProfile, "perfil");
        block(&mut data, BlockType::Restrictions, "sin jerga");
        assert_eq!(
            advanced_html(&data),
            format!(
                "<cot>{}</cot>\n<esquema>{{\"type\":\"object\"}}</esquema>\n<estructura>Devuelve &lt;json&gt;</estructura>\n<audiencia_avanzada>Audience profile: technical knowledge 3/5, urgency 3/5, visual preference 3/5.</audiencia_avanzada>\n<restricciones>sin jerga</restricciones>",
                COT_INSTRUCTION
            )
        );
    }

    #[test]
    fn simple_html_describes_format_and_tone() {
        let data = SimplePromptData {
            format: "Table".into(),
            format_columns: vec!["Tema".into(), "Fuente".into()],
            format_headers: true,
            tone: "formal".into(),
            voice: Some(Voice::Passive),
            ..Default::default()
        };
        assert_eq!(
            simple_html(&data),
            "<formato>Table con columnas: Tema, Fuente incluye titulares/encabezados</formato>\n<tono>formal y voz passive</tono>"
        );
    }

    #[test]
    fn disabled_blocks_never_render() {
        let mut data = AdvancedPromptData::new();
        let id = block(&mut data, BlockType::System, "oculto");
        data.toggle(&id);
        assert!(!advanced_html(&data).contains("oculto"));
        assert!(!advanced_json(&data).contains("oculto"));
    }

    #[test]
    fn format_parses_from_str() {
        assert_eq!("JSON".parse::<PromptFormat>(), Ok(PromptFormat::Json));
        assert_eq!("html".parse::<PromptFormat>(), Ok(PromptFormat::Html));
        assert!("yaml".parse::<PromptFormat>().is_err());
    }
}
