use crate::client::CatalogClient;
use crate::error::{SchemaError, SchemaResult};
use crate::inventory::{TableInventory, inventory_fingerprint, load_inventory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct InventoryCacheConfig {
    /// Directory to store cache files (default: `./.crudgen`).
    pub cache_dir: PathBuf,
    /// Cache file name inside `cache_dir` (default: `inventory.json`).
    pub cache_file_name: String,
    /// Which PostgreSQL schemas to enumerate (default: `["public"]`).
    pub schemas: Vec<String>,
}

impl Default for InventoryCacheConfig {
    fn default() -> Self {
        let cache_dir = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".crudgen");

        Self {
            cache_dir,
            cache_file_name: "inventory.json".to_string(),
            schemas: vec!["public".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryCacheLoad {
    /// Loaded from local cache (fingerprint unchanged).
    CacheHit,
    /// Loaded from database (cache missing/invalid or fingerprint changed).
    Refreshed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryCache {
    pub version: u32,
    pub retrieved_at: DateTime<Utc>,
    pub schemas: Vec<String>,
    pub fingerprint: String,
    pub inventory: TableInventory,
}

impl InventoryCache {
    pub fn cache_path(config: &InventoryCacheConfig) -> PathBuf {
        config.cache_dir.join(&config.cache_file_name)
    }

    pub async fn load_or_refresh<C: CatalogClient>(
        client: &C,
        config: &InventoryCacheConfig,
    ) -> SchemaResult<(Self, InventoryCacheLoad)> {
        let cache_path = Self::cache_path(config);

        if let Ok(cached) = read_cache_file(&cache_path) {
            if cached.schemas == config.schemas && cached.version == 1 {
                let current_fp = inventory_fingerprint(client, &config.schemas).await?;
                if current_fp == cached.fingerprint {
                    return Ok((cached, InventoryCacheLoad::CacheHit));
                }
            }
        }

        let refreshed = Self::refresh(client, config).await?;
        Ok((refreshed, InventoryCacheLoad::Refreshed))
    }

    pub async fn refresh<C: CatalogClient>(
        client: &C,
        config: &InventoryCacheConfig,
    ) -> SchemaResult<Self> {
        let fingerprint = inventory_fingerprint(client, &config.schemas).await?;
        let inventory = load_inventory(client, &config.schemas).await?;

        let cache = InventoryCache {
            version: 1,
            retrieved_at: Utc::now(),
            schemas: config.schemas.clone(),
            fingerprint,
            inventory,
        };

        write_cache_file(&Self::cache_path(config), &cache)?;
        Ok(cache)
    }
}

fn read_cache_file(path: &Path) -> SchemaResult<InventoryCache> {
    let data = std::fs::read(path).map_err(|e| SchemaError::Other(e.to_string()))?;

    serde_json::from_slice::<InventoryCache>(&data)
        .map_err(|e| SchemaError::Serialization(format!("Failed to parse inventory cache: {e}")))
}

fn write_cache_file(path: &Path, cache: &InventoryCache) -> SchemaResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SchemaError::Other(e.to_string()))?;
    }

    let tmp_path = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(cache).map_err(|e| {
        SchemaError::Serialization(format!("Failed to serialize inventory cache: {e}"))
    })?;

    std::fs::write(&tmp_path, data).map_err(|e| SchemaError::Other(e.to_string()))?;
    std::fs::rename(&tmp_path, path).map_err(|e| SchemaError::Other(e.to_string()))?;
    Ok(())
}
