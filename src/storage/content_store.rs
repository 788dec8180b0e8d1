//! CMS content store
//!
//! Holds content blocks, the CMS config and the template library in memory
//! and mirrors each of them to a [`KeyValueBackend`] under the browser
//! storage keys. A mutation only becomes visible after the backend write
//! succeeded. Concurrent writers are serialized; last writer wins. An import
//! touches all three keys and puts back the previous documents if any write
//! fails.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::backend::KeyValueBackend;
use super::models::{
    CmsConfig, CmsSnapshot, ContentBlock, ContentBlockInput, ContentMetadata, ContentTemplate,
    TemplateInput, keys,
};
use crate::errors::{PortfolioError, Result};
use crate::utils::is_valid_identifier;

#[derive(Default)]
struct CmsState {
    content: BTreeMap<String, ContentBlock>,
    config: CmsConfig,
    templates: BTreeMap<String, ContentTemplate>,
}

pub struct ContentStore {
    backend: Arc<dyn KeyValueBackend>,
    state: RwLock<CmsState>,
    write_lock: Mutex<()>,
}

impl ContentStore {
    /// Load all three documents from the backend
    ///
    /// Unreadable documents are logged and replaced by empty defaults so a
    /// corrupted file never keeps the site from starting.
    pub async fn open(backend: Arc<dyn KeyValueBackend>) -> Result<Self> {
        let content: BTreeMap<String, ContentBlock> =
            load_or_default(backend.as_ref(), keys::CMS_CONTENT).await?;
        let config: CmsConfig = load_or_default(backend.as_ref(), keys::CMS_CONFIG).await?;
        let templates: Vec<ContentTemplate> =
            load_or_default(backend.as_ref(), keys::TEMPLATES).await?;

        info!(
            "CMS store opened on {} backend: {} blocks, {} templates",
            backend.backend_name(),
            content.len(),
            templates.len()
        );

        Ok(Self {
            backend,
            state: RwLock::new(CmsState {
                content,
                config,
                templates: templates.into_iter().map(|t| (t.id.clone(), t)).collect(),
            }),
            write_lock: Mutex::new(()),
        })
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    pub fn len(&self) -> usize {
        self.state.read().content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<ContentBlock> {
        self.state.read().content.get(id).cloned()
    }

    /// All blocks ordered by id, optionally restricted to one type tag
    pub fn list(&self, kind: Option<&str>) -> Vec<ContentBlock> {
        self.state
            .read()
            .content
            .values()
            .filter(|b| kind.is_none_or(|k| b.kind == k))
            .cloned()
            .collect()
    }

    /// Create or replace a block; `createdAt` survives replacement
    pub async fn put(&self, id: &str, input: ContentBlockInput) -> Result<ContentBlock> {
        validate_id(id, "content id")?;
        if input.kind.trim().is_empty() {
            return Err(PortfolioError::validation("Content type must not be empty"));
        }

        let _guard = self.write_lock.lock().await;

        let now = Utc::now();
        let mut content = self.state.read().content.clone();
        let created_at = content
            .get(id)
            .map(|b| b.metadata.created_at)
            .unwrap_or(now);

        let block = ContentBlock {
            id: id.to_string(),
            kind: input.kind,
            content: input.content,
            metadata: ContentMetadata {
                created_at,
                updated_at: now,
                extra: input.metadata,
            },
        };
        content.insert(id.to_string(), block.clone());

        self.persist(keys::CMS_CONTENT, &content).await?;
        self.state.write().content = content;
        debug!("Content block '{}' saved", id);
        Ok(block)
    }

    pub async fn delete(&self, id: &str) -> Result<ContentBlock> {
        let _guard = self.write_lock.lock().await;

        let mut content = self.state.read().content.clone();
        let removed = content
            .remove(id)
            .ok_or_else(|| PortfolioError::not_found(format!("Content block '{}' not found", id)))?;

        self.persist(keys::CMS_CONTENT, &content).await?;
        self.state.write().content = content;
        debug!("Content block '{}' deleted", id);
        Ok(removed)
    }

    pub fn config(&self) -> CmsConfig {
        self.state.read().config.clone()
    }

    pub async fn update_config(&self, config: CmsConfig) -> Result<CmsConfig> {
        if config.site_title.trim().is_empty() {
            return Err(PortfolioError::validation("Site title must not be empty"));
        }

        let _guard = self.write_lock.lock().await;
        self.persist(keys::CMS_CONFIG, &config).await?;
        self.state.write().config = config.clone();
        Ok(config)
    }

    pub fn templates(&self) -> Vec<ContentTemplate> {
        self.state.read().templates.values().cloned().collect()
    }

    pub async fn save_template(&self, input: TemplateInput) -> Result<ContentTemplate> {
        validate_id(&input.id, "template id")?;
        if input.name.trim().is_empty() {
            return Err(PortfolioError::validation("Template name must not be empty"));
        }

        let _guard = self.write_lock.lock().await;

        let mut templates = self.state.read().templates.clone();
        let created_at = templates
            .get(&input.id)
            .map(|t| t.created_at)
            .unwrap_or_else(Utc::now);
        let template = ContentTemplate {
            id: input.id.clone(),
            name: input.name,
            kind: input.kind,
            default_content: input.default_content,
            created_at,
        };
        templates.insert(input.id, template.clone());

        self.persist_templates(&templates).await?;
        self.state.write().templates = templates;
        Ok(template)
    }

    pub async fn delete_template(&self, id: &str) -> Result<ContentTemplate> {
        let _guard = self.write_lock.lock().await;

        let mut templates = self.state.read().templates.clone();
        let removed = templates
            .remove(id)
            .ok_or_else(|| PortfolioError::not_found(format!("Template '{}' not found", id)))?;

        self.persist_templates(&templates).await?;
        self.state.write().templates = templates;
        Ok(removed)
    }

    pub fn export(&self) -> CmsSnapshot {
        let state = self.state.read();
        CmsSnapshot {
            content: state.content.values().cloned().collect(),
            config: state.config.clone(),
            templates: state.templates.values().cloned().collect(),
        }
    }

    /// Replace the whole store with a snapshot, returns the number of blocks
    pub async fn import(&self, snapshot: CmsSnapshot) -> Result<usize> {
        for block in &snapshot.content {
            validate_id(&block.id, "content id")?;
        }
        for template in &snapshot.templates {
            validate_id(&template.id, "template id")?;
        }

        let content: BTreeMap<String, ContentBlock> = snapshot
            .content
            .into_iter()
            .map(|b| (b.id.clone(), b))
            .collect();
        let templates: BTreeMap<String, ContentTemplate> = snapshot
            .templates
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect();

        let documents = [
            (keys::CMS_CONTENT, serde_json::to_string(&content)?),
            (keys::CMS_CONFIG, serde_json::to_string(&snapshot.config)?),
            (keys::TEMPLATES, templates_json(&templates)?),
        ];

        let _guard = self.write_lock.lock().await;

        let mut previous = Vec::with_capacity(documents.len());
        for (key, _) in &documents {
            previous.push((*key, self.backend.load(key).await?));
        }

        for (written, (key, json)) in documents.iter().enumerate() {
            if let Err(e) = self.backend.save(key, json).await {
                warn!("Import failed writing '{}': {}, restoring previous documents", key, e);
                self.restore(&previous[..written]).await;
                return Err(e);
            }
        }

        let count = content.len();
        {
            let mut state = self.state.write();
            state.content = content;
            state.config = snapshot.config;
            state.templates = templates;
        }
        info!("CMS snapshot imported: {} blocks", count);
        Ok(count)
    }

    async fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.backend.save(key, &json).await
    }

    async fn persist_templates(&self, templates: &BTreeMap<String, ContentTemplate>) -> Result<()> {
        let json = templates_json(templates)?;
        self.backend.save(keys::TEMPLATES, &json).await
    }

    /// 回滚导入：写回旧文档，原本不存在的 key 直接删除
    async fn restore(&self, previous: &[(&str, Option<String>)]) {
        for (key, raw) in previous.iter().rev() {
            let result = match raw {
                Some(raw) => self.backend.save(key, raw).await,
                None => self.backend.remove(key).await,
            };
            if let Err(e) = result {
                warn!("Failed to restore '{}' after import error: {}", key, e);
            }
        }
    }
}

/// 模板在存储中是数组而不是 map
fn templates_json(templates: &BTreeMap<String, ContentTemplate>) -> Result<String> {
    let list: Vec<&ContentTemplate> = templates.values().collect();
    Ok(serde_json::to_string(&list)?)
}

fn validate_id(id: &str, what: &str) -> Result<()> {
    if is_valid_identifier(id) {
        Ok(())
    } else {
        Err(PortfolioError::validation(format!(
            "Invalid {} '{}': use 1-128 characters from [A-Za-z0-9_-]",
            what, id
        )))
    }
}

async fn load_or_default<T: DeserializeOwned + Default>(
    backend: &dyn KeyValueBackend,
    key: &str,
) -> Result<T> {
    let Some(raw) = backend.load(key).await? else {
        return Ok(T::default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!("Stored document '{}' is unreadable ({}), starting empty", key, e);
            Ok(T::default())
        }
    }
}
