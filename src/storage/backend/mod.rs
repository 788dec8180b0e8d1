//! Key/value persistence backends
//!
//! The CMS mirrors its state under the same keys the browser uses for local
//! storage; a backend only has to store opaque JSON strings per key.

mod file;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{StorageBackendKind, StorageConfig};
use crate::errors::Result;

pub use file::FileBackend;
pub use memory::MemoryBackend;

#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// 读取 key 对应的原始 JSON，不存在时返回 None
    async fn load(&self, key: &str) -> Result<Option<String>>;
    async fn save(&self, key: &str, value: &str) -> Result<()>;
    /// Removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
    fn backend_name(&self) -> &'static str;
}

/// 根据配置创建存储后端
pub async fn create_backend(config: &StorageConfig) -> Result<Arc<dyn KeyValueBackend>> {
    let backend: Arc<dyn KeyValueBackend> = match config.backend {
        StorageBackendKind::File => Arc::new(FileBackend::new(&config.data_dir).await?),
        StorageBackendKind::Memory => Arc::new(MemoryBackend::new()),
    };
    Ok(backend)
}
