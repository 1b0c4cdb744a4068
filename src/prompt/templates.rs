//! Named snapshots of advanced drafts.
//!
//! Snapshots live in memory and can be mirrored to `<dir>/<name>.json`.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::fs;

use super::blocks::AdvancedPromptData;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: BTreeMap<String, AdvancedPromptData>,
}

/// Template names double as file stems: alphanumeric, underscore and hyphen only.
pub fn validate_name(name: &str) -> AppResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidRequest(format!("invalid template name '{}'", name)))
    }
}

fn template_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.json", name))
}

async fn write_template(dir: &Path, name: &str, data: &AdvancedPromptData) -> AppResult<PathBuf> {
    fs::create_dir_all(dir).await?;
    let path = template_path(dir, name);
    fs::write(&path, serde_json::to_string_pretty(data)?).await?;
    tracing::info!("saved template '{}' to {}", name, path.display());
    Ok(path)
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&mut self, name: &str, data: &AdvancedPromptData) -> AppResult<()> {
        validate_name(name)?;
        self.templates.insert(name.to_string(), data.clone());
        Ok(())
    }

    pub fn recall(&self, name: &str) -> AppResult<AdvancedPromptData> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::TemplateNotFound(name.to_string()))
    }

    pub fn delete(&mut self, name: &str) -> bool {
        self.templates.remove(name).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Writes `<dir>/<name>.json`, then stores in memory. A failed write
    /// leaves the store untouched.
    pub async fn save_persisted(
        &mut self,
        name: &str,
        data: &AdvancedPromptData,
        dir: &Path,
    ) -> AppResult<PathBuf> {
        validate_name(name)?;
        let path = write_template(dir, name, data).await?;
        self.templates.insert(name.to_string(), data.clone());
        Ok(path)
    }

    /// Loads every `*.json` file in `dir`. A missing directory yields an empty store.
    /// Files that fail to parse are skipped with a warning.
    pub async fn load_dir(dir: &Path) -> AppResult<Self> {
        let mut store = Self::new();
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(store),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(String::from) else {
                continue;
            };
            let raw = fs::read_to_string(&path).await?;
            match serde_json::from_str::<AdvancedPromptData>(&raw) {
                Ok(data) if validate_name(&name).is_ok() => {
                    store.templates.insert(name, data);
                }
                Ok(_) => tracing::warn!("skipping template with invalid name: {}", path.display()),
                Err(e) => tracing::warn!("skipping unreadable template {}: {}", path.display(), e),
            }
        }
        tracing::debug!("loaded {} templates from {}", store.len(), dir.display());
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::blocks::{BlockPatch, BlockType};

    fn sample() -> AdvancedPromptData {
        let mut data = AdvancedPromptData::new();
        let id = data.add(BlockType::System);
        data.update(&id, BlockPatch::content("Eres útil"));
        data.set_variable("tema", "clima").unwrap();
        data
    }

    #[test]
    fn save_and_recall_snapshot() {
        let mut store = TemplateStore::new();
        let mut data = sample();
        let snapshot = data.clone();
        store.save("resumen", &data).unwrap();

        data.variables.clear();
        assert_eq!(store.recall("resumen").unwrap(), snapshot);
        assert_eq!(store.names(), vec!["resumen"]);
        assert!(matches!(store.recall("otro"), Err(AppError::TemplateNotFound(_))));
    }

    #[test]
    fn rejects_path_like_names() {
        let mut store = TemplateStore::new();
        assert!(store.save("../etc", &sample()).is_err());
        assert!(store.save("", &sample()).is_err());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn persists_and_reloads_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TemplateStore::new();
        let data = sample();
        let path = store.save_persisted("base", &data, dir.path()).await.unwrap();
        assert!(path.ends_with("base.json"));
        assert_eq!(store.names(), vec!["base"]);

        tokio::fs::write(dir.path().join("broken.json"), "{not json").await.unwrap();
        tokio::fs::write(dir.path().join("notes.txt"), "ignored").await.unwrap();

        let loaded = TemplateStore::load_dir(dir.path()).await.unwrap();
        assert_eq!(loaded.names(), vec!["base"]);
        assert_eq!(loaded.recall("base").unwrap(), data);
    }

    #[tokio::test]
    async fn failed_write_does_not_store_template() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        tokio::fs::write(&blocker, "x").await.unwrap();

        let mut store = TemplateStore::new();
        let result = store.save_persisted("resumen", &sample(), &blocker.join("templates")).await;
        assert!(matches!(result, Err(AppError::Io(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn missing_directory_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = TemplateStore::load_dir(&dir.path().join("nope")).await.unwrap();
        assert!(loaded.is_empty());
    }
}
