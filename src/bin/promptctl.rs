use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use prompt_composer::backend::{Difficulty, PromptStore, TagSource};
use prompt_composer::events::TracingReporter;
use prompt_composer::prompt::wizard::step_views;
use prompt_composer::prompt::{AdvancedPromptData, SimplePromptData, TemplateStore};
use prompt_composer::utils::draft_ops::apply_overrides;
use prompt_composer::{Config, Draft, DraftSession, PromptApiClient, PromptConstructor, PromptFormat};

#[derive(Parser, Debug)]
#[command(name = "promptctl", about = "CLI for the Prompt Composer", version)]
struct Cli {
    /// Override PROMPTS_API_URL
    #[arg(global = true, long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a draft file to text, html or json
    Render {
        /// Draft JSON: {"mode": "simple"|"advanced", "data": {...}}
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
        #[arg(long, default_value = "text")]
        format: PromptFormat,
        /// Overrides as key=value (repeatable), e.g. `objective=...`,
        /// `variables.texto=...` or `blocks.0.content=...`
        #[arg(long = "set", value_name = "KEY=VALUE")]
        sets: Vec<String>,
        /// Write the rendered prompt here instead of stdout
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Show wizard step status for a simple draft
    Wizard {
        /// Simple draft JSON (bare fields or wrapped with "mode")
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
        /// Index of the current step
        #[arg(long, default_value_t = 0)]
        current: usize,
    },
    /// Render a draft and save it to the prompt backend
    Save {
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
        #[arg(long)]
        title: String,
        /// facil, media or dificil
        #[arg(long)]
        difficulty: Difficulty,
        /// Tag name (repeatable)
        #[arg(long = "tag", value_name = "NAME")]
        tags: Vec<String>,
        #[arg(long, default_value = "text")]
        format: PromptFormat,
    },
    /// Look up tag suggestions
    Tags {
        query: String,
    },
    /// Named advanced templates under TEMPLATES_DIR
    Template {
        #[command(subcommand)]
        cmd: TemplateCmd,
    },
}

#[derive(Subcommand, Debug)]
enum TemplateCmd {
    /// Store an advanced draft under a name
    Save {
        name: String,
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
    },
    /// List stored template names
    List,
    /// Render a stored template
    Show {
        name: String,
        #[arg(long, default_value = "text")]
        format: PromptFormat,
    },
}

async fn read_draft(path: &Path) -> Result<Draft, Box<dyn std::error::Error>> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}

async fn read_simple(path: &Path) -> Result<SimplePromptData, Box<dyn std::error::Error>> {
    let raw = tokio::fs::read_to_string(path).await?;
    if let Ok(Draft::Simple(data)) = serde_json::from_str::<Draft>(&raw) {
        return Ok(data);
    }
    Ok(serde_json::from_str(&raw)?)
}

async fn read_advanced(path: &Path) -> Result<AdvancedPromptData, Box<dyn std::error::Error>> {
    let raw = tokio::fs::read_to_string(path).await?;
    if let Ok(Draft::Advanced(data)) = serde_json::from_str::<Draft>(&raw) {
        return Ok(data);
    }
    Ok(serde_json::from_str(&raw)?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // Load env and parse CLI
    Config::dotenv_load();
    let cli = Cli::parse();

    let mut conf = Config::new();
    if let Some(url) = cli.api_url {
        conf.prompts_api_url = url;
    }
    let client = || PromptApiClient::new(conf.prompts_api_url.clone()).with_token(conf.prompts_api_token.clone());

    match cli.command {
        Commands::Render { file, format, sets, out } => {
            let draft = apply_overrides(&read_draft(&file).await?, &sets)?;
            let rendered = PromptConstructor::new().construct(&draft, format);
            match out {
                Some(path) => {
                    tokio::fs::write(&path, &rendered.text).await?;
                    eprintln!("Saved {} ({} characters)", path.display(), rendered.char_count);
                }
                None => println!("{}", rendered.text),
            }
            Ok(())
        }
        Commands::Wizard { file, current } => {
            let data = read_simple(&file).await?;
            for view in step_views(&data, current) {
                println!(
                    "{} {:<14} {:<9} {}",
                    view.index,
                    view.step.name(),
                    format!("{:?}", view.status).to_lowercase(),
                    if view.required { "required" } else { "optional" }
                );
            }
            Ok(())
        }
        Commands::Save { file, title, difficulty, tags, format } => {
            let draft = read_draft(&file).await?;
            let mut session = DraftSession::from_config(draft, std::sync::Arc::new(TracingReporter), &conf);
            session.set_format(format);
            let store: &dyn PromptStore = &client();
            match session.submit(store, &title, difficulty, &tags).await {
                Ok(saved) => {
                    println!("{}", serde_json::to_string_pretty(&saved)?);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Tags { query } => {
            let tags = client().suggest_tags(&query).await?;
            if tags.is_empty() {
                eprintln!("No tags match '{}'", query);
            }
            for tag in tags {
                println!("{}", tag.name);
            }
            Ok(())
        }
        Commands::Template { cmd } => {
            let mut store = TemplateStore::load_dir(&conf.templates_dir).await?;
            match cmd {
                TemplateCmd::Save { name, file } => {
                    let data = read_advanced(&file).await?;
                    let path = store.save_persisted(&name, &data, &conf.templates_dir).await?;
                    println!("Saved {}", path.display());
                }
                TemplateCmd::List => {
                    for name in store.names() {
                        println!("{}", name);
                    }
                }
                TemplateCmd::Show { name, format } => {
                    let data = store.recall(&name)?;
                    let rendered = PromptConstructor::new().construct(&Draft::Advanced(data), format);
                    println!("{}", rendered.text);
                }
            }
            Ok(())
        }
    }
}
