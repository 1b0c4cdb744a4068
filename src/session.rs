//! Editing session for a single draft.
//!
//! Mutations schedule a debounced re-render; explicit actions (format switch,
//! submit) flush immediately. The latest rendering is published on a watch
//! channel. Remote lookups and saves never touch the draft itself.
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;

use crate::backend::{Difficulty, PromptRecord, PromptStore, TagSource, TagSuggestion};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::events::{Outcome, OutcomeReporter};
use crate::prompt::{
    AdvancedPromptData, Draft, PromptConstructor, PromptFormat, RenderedPrompt, SimplePromptData,
    TemplateStore, Wizard,
};
use crate::utils::debounce::Debouncer;

pub const DEFAULT_RENDER_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_TAG_DEBOUNCE: Duration = Duration::from_millis(250);

pub struct DraftSession {
    draft: Draft,
    format: PromptFormat,
    wizard: Wizard,
    templates: TemplateStore,
    constructor: PromptConstructor,
    reporter: Arc<dyn OutcomeReporter>,
    render_tx: Arc<watch::Sender<RenderedPrompt>>,
    render_debounce: Debouncer,
    tags_tx: Arc<watch::Sender<Vec<TagSuggestion>>>,
    tag_debounce: Debouncer,
}

impl DraftSession {
    pub fn new(draft: Draft, reporter: Arc<dyn OutcomeReporter>) -> Self {
        Self::with_delays(draft, reporter, DEFAULT_RENDER_DEBOUNCE, DEFAULT_TAG_DEBOUNCE)
    }

    /// Uses `RENDER_DEBOUNCE_MS` and `TAG_DEBOUNCE_MS` from `config`.
    pub fn from_config(draft: Draft, reporter: Arc<dyn OutcomeReporter>, config: &Config) -> Self {
        Self::with_delays(draft, reporter, config.render_debounce, config.tag_debounce)
    }

    pub fn with_delays(
        draft: Draft,
        reporter: Arc<dyn OutcomeReporter>,
        render_delay: Duration,
        tag_delay: Duration,
    ) -> Self {
        let constructor = PromptConstructor::new();
        let format = PromptFormat::default();
        let initial = constructor.construct(&draft, format);
        let (render_tx, _) = watch::channel(initial);
        let (tags_tx, _) = watch::channel(Vec::new());
        DraftSession {
            draft,
            format,
            wizard: Wizard::new(),
            templates: TemplateStore::new(),
            constructor,
            reporter,
            render_tx: Arc::new(render_tx),
            render_debounce: Debouncer::new(render_delay),
            tags_tx: Arc::new(tags_tx),
            tag_debounce: Debouncer::new(tag_delay),
        }
    }

    pub fn with_templates(mut self, templates: TemplateStore) -> Self {
        self.templates = templates;
        self
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn format(&self) -> PromptFormat {
        self.format
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    /// Last published rendering; may lag behind pending edits.
    pub fn latest(&self) -> RenderedPrompt {
        self.render_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RenderedPrompt> {
        self.render_tx.subscribe()
    }

    pub fn tag_suggestions(&self) -> watch::Receiver<Vec<TagSuggestion>> {
        self.tags_tx.subscribe()
    }

    pub fn render_pending(&self) -> bool {
        self.render_debounce.is_pending()
    }

    /// Applies `change` to the draft and schedules a re-render.
    pub fn edit<F>(&mut self, change: F)
    where
        F: FnOnce(&mut Draft),
    {
        change(&mut self.draft);
        self.schedule_render();
    }

    pub fn edit_simple<F>(&mut self, change: F) -> AppResult<()>
    where
        F: FnOnce(&mut SimplePromptData),
    {
        let applied = match &mut self.draft {
            Draft::Simple(data) => {
                change(data);
                true
            }
            Draft::Advanced(_) => false,
        };
        if !applied {
            return Err(self.wrong_mode("simple"));
        }
        self.schedule_render();
        Ok(())
    }

    pub fn edit_advanced<F, T>(&mut self, change: F) -> AppResult<T>
    where
        F: FnOnce(&mut AdvancedPromptData) -> T,
    {
        let out = match &mut self.draft {
            Draft::Advanced(data) => Some(change(data)),
            Draft::Simple(_) => None,
        };
        let Some(out) = out else {
            return Err(self.wrong_mode("advanced"));
        };
        self.schedule_render();
        Ok(out)
    }

    /// Switching format re-derives from the draft right away.
    pub fn set_format(&mut self, format: PromptFormat) -> RenderedPrompt {
        self.format = format;
        self.flush()
    }

    /// Cancels any pending render and publishes a fresh one now.
    pub fn flush(&mut self) -> RenderedPrompt {
        self.render_debounce.cancel();
        let rendered = self.constructor.construct(&self.draft, self.format);
        self.render_tx.send_replace(rendered.clone());
        rendered
    }

    pub fn set_variable(&mut self, name: &str, value: &str) -> AppResult<()> {
        let result = self.edit_advanced(|data| data.set_variable(name, value)).and_then(|r| r);
        if let Err(e) = &result {
            self.reporter.report(Outcome::Rejected { reason: e.to_string() });
        }
        result
    }

    pub fn go_to_step(&mut self, target: usize) -> AppResult<()> {
        let result = match &self.draft {
            Draft::Simple(data) => self.wizard.go_to(target, data),
            Draft::Advanced(_) => Err(AppError::InvalidRequest(
                "the step wizard only applies to simple drafts".to_string(),
            )),
        };
        if let Err(e) = &result {
            self.reporter.report(Outcome::Rejected { reason: e.to_string() });
        }
        result
    }

    pub fn save_template(&mut self, name: &str) -> AppResult<()> {
        let Draft::Advanced(data) = &self.draft else {
            return Err(self.wrong_mode("advanced"));
        };
        self.templates.save(name, data)?;
        self.reporter.report(Outcome::TemplateSaved { name: name.to_string() });
        Ok(())
    }

    pub fn load_template(&mut self, name: &str) -> AppResult<()> {
        let data = match self.templates.recall(name) {
            Ok(data) => data,
            Err(e) => {
                self.reporter.report(Outcome::Rejected { reason: e.to_string() });
                return Err(e);
            }
        };
        self.draft = Draft::Advanced(data);
        self.flush();
        self.reporter.report(Outcome::TemplateLoaded { name: name.to_string() });
        Ok(())
    }

    /// Discards the draft, keeping its mode.
    pub fn reset(&mut self) {
        self.draft = self.draft.emptied();
        self.wizard = Wizard::new();
        self.flush();
        self.reporter.report(Outcome::Reset);
    }

    /// Renders now and saves the result through `store`.
    pub async fn submit(
        &mut self,
        store: &dyn PromptStore,
        title: &str,
        difficulty: Difficulty,
        tags: &[String],
    ) -> AppResult<Value> {
        let rendered = self.flush();
        if title.trim().is_empty() {
            let err = AppError::InvalidRequest("a title is required".to_string());
            self.reporter.report(Outcome::Rejected { reason: err.to_string() });
            return Err(err);
        }
        let record = PromptRecord::new(title, difficulty, rendered.text, tags);
        match store.save_prompt(&record).await {
            Ok(saved) => {
                self.reporter.report(Outcome::Saved { title: record.title });
                Ok(saved)
            }
            Err(e) => {
                self.reporter.report(Outcome::SaveFailed { reason: e.to_string() });
                Err(e)
            }
        }
    }

    /// Debounced tag lookup; results land on [`Self::tag_suggestions`].
    pub fn suggest_tags(&mut self, source: Arc<dyn TagSource>, query: &str) {
        let query = query.to_string();
        let tx = Arc::clone(&self.tags_tx);
        self.tag_debounce.schedule(async move {
            match source.suggest_tags(&query).await {
                Ok(tags) => {
                    tx.send_replace(tags);
                }
                Err(e) => tracing::warn!("tag suggestions for '{}' failed: {}", query, e),
            }
        });
    }

    fn schedule_render(&mut self) {
        let snapshot = self.draft.clone();
        let format = self.format;
        let constructor = self.constructor;
        let tx = Arc::clone(&self.render_tx);
        self.render_debounce.schedule(async move {
            tx.send_replace(constructor.construct(&snapshot, format));
        });
    }

    fn wrong_mode(&self, expected: &str) -> AppError {
        AppError::InvalidRequest(format!(
            "expected a {} draft, session holds a {} draft",
            expected,
            self.draft.mode()
        ))
    }
}
