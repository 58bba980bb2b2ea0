use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    #[allow(dead_code)]
    pub config_path: PathBuf,
    pub config_dir: PathBuf,
    pub file: ConfigFile,
}

impl ProjectConfig {
    pub fn load(config_path: PathBuf) -> anyhow::Result<Self> {
        let config_dir = config_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let raw = std::fs::read_to_string(&config_path).map_err(|e| {
            anyhow::anyhow!("failed to read config file {}: {e}", config_path.display())
        })?;

        let mut file: ConfigFile = toml::from_str(&raw).map_err(|e| {
            anyhow::anyhow!("failed to parse config file {}: {e}", config_path.display())
        })?;

        file.expand_env()?;
        file.validate()?;

        Ok(Self {
            config_path,
            config_dir,
            file,
        })
    }

    pub fn resolve_path(&self, p: impl AsRef<Path>) -> PathBuf {
        let p = p.as_ref();
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.config_dir.join(p)
        }
    }

    pub fn schemas(&self) -> Vec<String> {
        if self.file.database.schemas.is_empty() {
            vec!["public".to_string()]
        } else {
            self.file.database.schemas.clone()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    /// Provider identifier the model was reverse-engineered with, e.g.
    /// `Npgsql.EntityFrameworkCore.PostgreSQL`.
    pub provider: String,

    pub database: DatabaseConfig,
    pub model: ModelConfig,
    pub output: OutputConfig,

    #[serde(default)]
    pub inventory_cache: InventoryCacheSection,

    #[serde(default)]
    pub templates: TemplatesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default)]
    pub schemas: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the generated model source (the DbContext file).
    pub source: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dir: String,
    pub namespace: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryCacheMode {
    Auto,
    Refresh,
    CacheOnly,
}

impl Default for InventoryCacheMode {
    fn default() -> Self {
        Self::Auto
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InventoryCacheSection {
    pub dir: Option<String>,
    pub file: Option<String>,
    #[serde(default)]
    pub mode: InventoryCacheMode,
}

impl Default for InventoryCacheSection {
    fn default() -> Self {
        Self {
            dir: Some(".crudgen".to_string()),
            file: Some("inventory.json".to_string()),
            mode: InventoryCacheMode::Auto,
        }
    }
}

/// Optional per-artifact template override paths.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplatesConfig {
    pub controller: Option<String>,
    pub service_interface: Option<String>,
    pub service: Option<String>,
    pub dto: Option<String>,
    pub registration: Option<String>,
}

impl ConfigFile {
    fn expand_env(&mut self) -> anyhow::Result<()> {
        self.database.url = expand_env_vars(&self.database.url)?;

        for s in &mut self.database.schemas {
            *s = expand_env_vars(s)?;
        }

        self.model.source = expand_env_vars(&self.model.source)?;
        self.output.dir = expand_env_vars(&self.output.dir)?;

        if let Some(dir) = self.inventory_cache.dir.as_mut() {
            *dir = expand_env_vars(dir)?;
        }
        if let Some(file) = self.inventory_cache.file.as_mut() {
            *file = expand_env_vars(file)?;
        }

        for t in [
            &mut self.templates.controller,
            &mut self.templates.service_interface,
            &mut self.templates.service,
            &mut self.templates.dto,
            &mut self.templates.registration,
        ] {
            if let Some(path) = t.as_mut() {
                *path = expand_env_vars(path)?;
            }
        }

        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.version.trim() != "1" {
            anyhow::bail!("unsupported config version: {}", self.version);
        }
        if self.provider.trim().is_empty() {
            anyhow::bail!("provider must not be empty");
        }
        if self.database.url.trim().is_empty() {
            anyhow::bail!("database.url must not be empty");
        }
        if self.model.source.trim().is_empty() {
            anyhow::bail!("model.source must not be empty");
        }
        if self.output.dir.trim().is_empty() {
            anyhow::bail!("output.dir must not be empty");
        }
        if self.output.namespace.trim().is_empty() {
            anyhow::bail!("output.namespace must not be empty");
        }

        Ok(())
    }
}

fn expand_env_vars(input: &str) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut key = String::new();
            let mut closed = false;
            while let Some(&ch) = chars.peek() {
                chars.next();
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                anyhow::bail!("unterminated env var reference: ${{{key}}}");
            }
            if key.is_empty() {
                anyhow::bail!("invalid env var reference: ${{}}");
            }

            let v = std::env::var(&key)
                .map_err(|_| anyhow::anyhow!("missing env var for config expansion: {key}"))?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> anyhow::Result<ConfigFile> {
        let mut file: ConfigFile = toml::from_str(raw)?;
        file.expand_env()?;
        file.validate()?;
        Ok(file)
    }

    const MINIMAL: &str = r#"
version = "1"
provider = "Npgsql.EntityFrameworkCore.PostgreSQL"

[database]
url = "postgres://localhost/app"
schemas = ["public"]

[model]
source = "Models/AppDbContext.cs"

[output]
dir = "Generated"
namespace = "App.Generated"
"#;

    #[test]
    fn parses_minimal_config() {
        let file = parse(MINIMAL).unwrap();
        assert_eq!(file.provider, "Npgsql.EntityFrameworkCore.PostgreSQL");
        assert_eq!(file.output.namespace, "App.Generated");
        assert_eq!(file.inventory_cache.mode, InventoryCacheMode::Auto);
    }

    #[test]
    fn rejects_wrong_version() {
        let raw = MINIMAL.replace("version = \"1\"", "version = \"2\"");
        assert!(parse(&raw).is_err());
    }

    #[test]
    fn rejects_empty_namespace() {
        let raw = MINIMAL.replace("namespace = \"App.Generated\"", "namespace = \"\"");
        assert!(parse(&raw).is_err());
    }

    #[test]
    fn expands_env_vars() {
        // Safety: test-only env mutation, key is unique to this test.
        unsafe { std::env::set_var("CRUDGEN_TEST_DB", "postgres://db/expanded") };
        let raw = MINIMAL.replace("postgres://localhost/app", "${CRUDGEN_TEST_DB}");
        let file = parse(&raw).unwrap();
        assert_eq!(file.database.url, "postgres://db/expanded");
    }

    #[test]
    fn missing_env_var_fails() {
        let raw = MINIMAL.replace("postgres://localhost/app", "${CRUDGEN_TEST_MISSING}");
        assert!(parse(&raw).is_err());
    }
}
