use crate::cli::InitArgs;
use std::path::Path;

pub fn run(args: InitArgs) -> anyhow::Result<()> {
    write_template(&args.config)
}

fn write_template(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("refusing to overwrite existing file: {}", path.display());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("failed to create directory {}: {e}", parent.display())
            })?;
        }
    }

    let content = r#"
version = "1"

# Provider the model was reverse-engineered with. Matched by substring;
# only the PostgreSQL family is currently implemented.
provider = "Npgsql.EntityFrameworkCore.PostgreSQL"

[database]
url = "${DATABASE_URL}"
schemas = ["public"]

[model]
# The generated DbContext source to discover entities from.
source = "Models/AppDbContext.cs"

[output]
dir = "Generated"
namespace = "App.Generated"

[inventory_cache]
dir = ".crudgen"
file = "inventory.json"
mode = "auto" # auto | refresh | cache_only

# --- Optional: per-artifact template overrides ---
#
# [templates]
# controller = "templates/controller.cs.tmpl"
# service_interface = "templates/iservice.cs.tmpl"
# service = "templates/service.cs.tmpl"
# dto = "templates/dtos.cs.tmpl"
# registration = "templates/registration.cs.tmpl"
"#
    .trim_start_matches('\n');

    std::fs::write(path, content)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;

    println!("wrote {}", path.display());
    Ok(())
}
