use crate::cli::InventoryArgs;
use crate::config::{InventoryCacheMode, ProjectConfig};
use crudgen_schema::{InventoryCache, InventoryCacheConfig, InventoryCacheLoad};
use tokio_postgres::NoTls;

pub async fn run(args: InventoryArgs) -> anyhow::Result<()> {
    let (database_url, cache_cfg, schemas) = if args.config.exists() {
        let project = ProjectConfig::load(args.config.clone())?;

        let database_url = args
            .database
            .clone()
            .unwrap_or_else(|| project.file.database.url.clone());

        let schemas = args.schemas.clone().unwrap_or_else(|| project.schemas());
        let cache_cfg = to_cache_config(&project, &schemas);
        (database_url, cache_cfg, schemas)
    } else {
        let Some(database_url) = args.database.clone() else {
            anyhow::bail!(
                "failed to load config {}; provide --database or run `crudgen init` first",
                args.config.display()
            );
        };
        let schemas = args
            .schemas
            .clone()
            .unwrap_or_else(|| vec!["public".to_string()]);
        let cache_cfg = InventoryCacheConfig {
            schemas: schemas.clone(),
            ..InventoryCacheConfig::default()
        };
        (database_url, cache_cfg, schemas)
    };

    let client = connect_db(&database_url).await?;
    let cache = InventoryCache::refresh(&client, &cache_cfg).await?;

    println!(
        "inventory: {} tables/views (schemas: {})",
        cache.inventory.len(),
        schemas.join(",")
    );
    println!(
        "cache file: {}",
        InventoryCache::cache_path(&cache_cfg).display()
    );
    println!("fingerprint: {}", cache.fingerprint);

    Ok(())
}

pub async fn connect_db(database_url: &str) -> anyhow::Result<tokio_postgres::Client> {
    let (client, connection) = tokio_postgres::connect(database_url, NoTls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("postgres connection error: {e}");
        }
    });
    Ok(client)
}

pub fn to_cache_config(project: &ProjectConfig, schemas: &[String]) -> InventoryCacheConfig {
    let dir = project
        .file
        .inventory_cache
        .dir
        .as_deref()
        .unwrap_or(".crudgen");
    let file = project
        .file
        .inventory_cache
        .file
        .as_deref()
        .unwrap_or("inventory.json");

    InventoryCacheConfig {
        cache_dir: project.resolve_path(dir),
        cache_file_name: file.to_string(),
        schemas: schemas.to_vec(),
    }
}

/// Load the inventory for a generation run, honoring the configured cache
/// mode. A failure here is fatal: without an inventory, no resolution is
/// possible.
pub async fn load_run_inventory(
    client: &tokio_postgres::Client,
    cache_cfg: &InventoryCacheConfig,
    mode: InventoryCacheMode,
) -> anyhow::Result<(InventoryCache, InventoryCacheLoad)> {
    match mode {
        InventoryCacheMode::Auto => {
            let (cache, load) = InventoryCache::load_or_refresh(client, cache_cfg).await?;
            Ok((cache, load))
        }
        InventoryCacheMode::Refresh => {
            let cache = InventoryCache::refresh(client, cache_cfg).await?;
            Ok((cache, InventoryCacheLoad::Refreshed))
        }
        InventoryCacheMode::CacheOnly => {
            let cache_path = InventoryCache::cache_path(cache_cfg);
            let data = std::fs::read(&cache_path).map_err(|e| {
                anyhow::anyhow!("failed to read inventory cache {}: {e}", cache_path.display())
            })?;
            let cache: InventoryCache = serde_json::from_slice(&data).map_err(|e| {
                anyhow::anyhow!("failed to parse inventory cache {}: {e}", cache_path.display())
            })?;

            if cache.version != 1 {
                anyhow::bail!(
                    "unsupported inventory cache version {} in {}",
                    cache.version,
                    cache_path.display()
                );
            }
            if cache.schemas != cache_cfg.schemas {
                anyhow::bail!(
                    "inventory cache schemas mismatch (cache: {:?}, requested: {:?})",
                    cache.schemas,
                    cache_cfg.schemas
                );
            }

            Ok((cache, InventoryCacheLoad::CacheHit))
        }
    }
}
