//! The generation pipeline: discovery, resolution, loading, projection,
//! rendering, writing. Sequential over one connection; per-entity
//! failures reduce the output set, they never abort the run.

use crate::cli::GenArgs;
use crate::config::ProjectConfig;
use crate::discover::{ResolutionTarget, extract_context_class, extract_entity_names, resolve_targets};
use crate::inventory_cmd::{connect_db, load_run_inventory, to_cache_config};
use crate::project::{entity_context, project_entity, registration_context};
use crate::render::render;
use crate::report::ConsoleReporter;
use crate::templates::{Artifact, template_text};
use crate::write::{GeneratedFile, WriteOptions, apply_generated_files};
use crudgen_schema::{Reporter, TableInfo, detect_provider, load_table, require_postgres, resolve};

/// Views never reach the rendered output set, whether flagged in the
/// inventory or named by an explicit `ToView` directive.
fn excluded_as_view(table: &TableInfo, target: &ResolutionTarget) -> bool {
    table.is_view || target.view_hint
}

pub async fn run(args: GenArgs) -> anyhow::Result<()> {
    let project = ProjectConfig::load(args.config.clone())?;
    let reporter = ConsoleReporter;

    let family = detect_provider(&project.file.provider)?;
    require_postgres(family)?;

    let model_path = args
        .model
        .clone()
        .unwrap_or_else(|| project.resolve_path(&project.file.model.source));
    let source = std::fs::read_to_string(&model_path).map_err(|e| {
        anyhow::anyhow!("failed to read model source {}: {e}", model_path.display())
    })?;

    let entity_names = extract_entity_names(&source);
    if entity_names.is_empty() {
        anyhow::bail!(
            "no entity declarations found in {} (expected DbSet<...> properties)",
            model_path.display()
        );
    }
    let targets = resolve_targets(&source, &entity_names);
    let context_class = extract_context_class(&source).unwrap_or_else(|| "AppDbContext".to_string());

    let database_url = args
        .database
        .clone()
        .unwrap_or_else(|| project.file.database.url.clone());
    let client = connect_db(&database_url).await?;

    let schemas = project.schemas();
    let cache_cfg = to_cache_config(&project, &schemas);
    let (cache, _load) =
        load_run_inventory(&client, &cache_cfg, project.file.inventory_cache.mode).await?;
    let inventory = cache.inventory;

    let out_dir = project.resolve_path(&project.file.output.dir);
    let namespace = &project.file.output.namespace;

    // Resolve template overrides once, not per entity.
    let per_entity_templates: Vec<(Artifact, String)> = Artifact::PER_ENTITY
        .into_iter()
        .map(|a| template_text(&project, a).map(|t| (a, t)))
        .collect::<anyhow::Result<_>>()?;

    let mut generated_files: Vec<GeneratedFile> = Vec::new();
    let mut rendered_entities: Vec<String> = Vec::new();
    let mut skipped = 0usize;

    for target in &targets {
        let Some(table_ref) = resolve(&inventory, &target.schema_hint, &target.table_hint) else {
            reporter.warn(&format!(
                "table not found for entity {} (schema: {:?}, table hint: {:?}); skipping",
                target.entity, target.schema_hint, target.table_hint
            ));
            skipped += 1;
            continue;
        };

        let table = load_table(&client, &reporter, &target.entity, table_ref).await;

        if excluded_as_view(&table, target) {
            reporter.info(&format!(
                "skipping view {}.{} (entity {})",
                table.schema, table.name, target.entity
            ));
            skipped += 1;
            continue;
        }

        let model = project_entity(&table);
        let ctx = entity_context(&model, namespace, &context_class);

        for (artifact, template) in &per_entity_templates {
            let content = render(template, &ctx).map_err(|e| {
                anyhow::anyhow!(
                    "rendering {} for entity {}: {e}",
                    artifact.file_name(&model.entity),
                    model.entity
                )
            })?;
            generated_files.push(GeneratedFile {
                path: out_dir.join(artifact.file_name(&model.entity)),
                content,
            });
        }

        rendered_entities.push(model.entity);
    }

    if rendered_entities.is_empty() {
        reporter.warn("no entities could be resolved; nothing to generate");
        return Ok(());
    }

    let registration_template = template_text(&project, Artifact::Registration)?;
    let registration = render(
        &registration_template,
        &registration_context(&rendered_entities, namespace),
    )
    .map_err(|e| anyhow::anyhow!("rendering ServiceRegistration.cs: {e}"))?;
    generated_files.push(GeneratedFile {
        path: out_dir.join(Artifact::Registration.file_name("")),
        content: registration,
    });

    apply_generated_files(
        &generated_files,
        WriteOptions {
            dry_run: args.dry_run,
            check: args.check,
        },
        &reporter,
    )?;

    reporter.info(&format!(
        "generated {} entities ({} skipped) into {}",
        rendered_entities.len(),
        skipped,
        out_dir.display()
    ));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(view_hint: bool) -> ResolutionTarget {
        ResolutionTarget {
            entity: "LogEntry".to_string(),
            schema_hint: String::new(),
            table_hint: "vw_log_entries".to_string(),
            view_hint,
        }
    }

    fn resolved(is_view: bool) -> TableInfo {
        TableInfo {
            entity_name: "LogEntry".to_string(),
            name: "vw_log_entries".to_string(),
            schema: "public".to_string(),
            key_column: None,
            columns: Vec::new(),
            is_view,
        }
    }

    #[test]
    fn views_never_enter_the_output_set() {
        // Flagged as a view in the inventory.
        assert!(excluded_as_view(&resolved(true), &target(false)));
        // Named by a ToView directive, even if the inventory disagrees.
        assert!(excluded_as_view(&resolved(false), &target(true)));
        // Plain base table: rendered.
        assert!(!excluded_as_view(&resolved(false), &target(false)));
    }
}
