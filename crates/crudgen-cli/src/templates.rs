//! Default artifact templates.
//!
//! The template text is a pluggable rendering target: any of these can be
//! replaced per artifact through the `[templates]` config section. The
//! contract is the field set the renderer binds (see `project.rs`), not
//! the literal text.

use crate::config::{ProjectConfig, TemplatesConfig};

/// The four per-entity artifacts plus the shared registration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Controller,
    ServiceInterface,
    Service,
    Dto,
    Registration,
}

impl Artifact {
    pub const PER_ENTITY: [Artifact; 4] = [
        Artifact::Controller,
        Artifact::ServiceInterface,
        Artifact::Service,
        Artifact::Dto,
    ];

    /// Output file name for one entity (registration is shared).
    pub fn file_name(self, entity: &str) -> String {
        match self {
            Artifact::Controller => format!("{entity}Controller.cs"),
            Artifact::ServiceInterface => format!("I{entity}Service.cs"),
            Artifact::Service => format!("{entity}Service.cs"),
            Artifact::Dto => format!("{entity}Dtos.cs"),
            Artifact::Registration => "ServiceRegistration.cs".to_string(),
        }
    }

    fn default_text(self) -> &'static str {
        match self {
            Artifact::Controller => CONTROLLER,
            Artifact::ServiceInterface => SERVICE_INTERFACE,
            Artifact::Service => SERVICE,
            Artifact::Dto => DTO,
            Artifact::Registration => REGISTRATION,
        }
    }

    fn override_path(self, templates: &TemplatesConfig) -> Option<&str> {
        match self {
            Artifact::Controller => templates.controller.as_deref(),
            Artifact::ServiceInterface => templates.service_interface.as_deref(),
            Artifact::Service => templates.service.as_deref(),
            Artifact::Dto => templates.dto.as_deref(),
            Artifact::Registration => templates.registration.as_deref(),
        }
    }
}

/// Template text for an artifact: the configured override file, or the
/// built-in default.
pub fn template_text(project: &ProjectConfig, artifact: Artifact) -> anyhow::Result<String> {
    match artifact.override_path(&project.file.templates) {
        Some(rel) => {
            let path = project.resolve_path(rel);
            std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("failed to read template {}: {e}", path.display()))
        }
        None => Ok(artifact.default_text().to_string()),
    }
}

const CONTROLLER: &str = r#"// <auto-generated> by crudgen. Edits will be overwritten.
using Microsoft.AspNetCore.Mvc;

namespace {{Namespace}};

[ApiController]
[Route("api/{{EntityRoute}}")]
public class {{EntityName}}Controller : ControllerBase
{
    private readonly I{{EntityName}}Service _service;

    public {{EntityName}}Controller(I{{EntityName}}Service service)
    {
        _service = service;
    }

    [HttpGet]
    public async Task<ActionResult<IReadOnlyList<{{EntityName}}Dto>>> GetAll()
        => Ok(await _service.GetAllAsync());

    [HttpGet("{id}")]
    public async Task<ActionResult<{{EntityName}}Dto>> Get({{KeyType}} id)
    {
        var item = await _service.GetAsync(id);
        return item is null ? NotFound() : Ok(item);
    }

    [HttpPost]
    public async Task<ActionResult<{{EntityName}}Dto>> Create(Create{{EntityName}}Dto input)
    {
        var created = await _service.CreateAsync(input);
        return CreatedAtAction(nameof(Get), new { id = created.{{KeyProperty}} }, created);
    }

    [HttpPut("{id}")]
    public async Task<IActionResult> Update({{KeyType}} id, Update{{EntityName}}Dto input)
        => await _service.UpdateAsync(id, input) ? NoContent() : NotFound();

    [HttpDelete("{id}")]
    public async Task<IActionResult> Delete({{KeyType}} id)
        => await _service.DeleteAsync(id) ? NoContent() : NotFound();
}
"#;

const SERVICE_INTERFACE: &str = r#"// <auto-generated> by crudgen. Edits will be overwritten.
namespace {{Namespace}};

public interface I{{EntityName}}Service
{
    Task<IReadOnlyList<{{EntityName}}Dto>> GetAllAsync();
    Task<{{EntityName}}Dto?> GetAsync({{KeyType}} id);
    Task<{{EntityName}}Dto> CreateAsync(Create{{EntityName}}Dto input);
    Task<bool> UpdateAsync({{KeyType}} id, Update{{EntityName}}Dto input);
    Task<bool> DeleteAsync({{KeyType}} id);
}
"#;

const SERVICE: &str = r#"// <auto-generated> by crudgen. Edits will be overwritten.
using Microsoft.EntityFrameworkCore;

namespace {{Namespace}};

public class {{EntityName}}Service : I{{EntityName}}Service
{
    private readonly {{ContextClass}} _db;

    public {{EntityName}}Service({{ContextClass}} db)
    {
        _db = db;
    }

    public async Task<IReadOnlyList<{{EntityName}}Dto>> GetAllAsync()
        => await _db.Set<{{EntityName}}>().AsNoTracking().Select(e => ToDto(e)).ToListAsync();

    public async Task<{{EntityName}}Dto?> GetAsync({{KeyType}} id)
    {
        var entity = await _db.Set<{{EntityName}}>().FindAsync(id);
        return entity is null ? null : ToDto(entity);
    }

    public async Task<{{EntityName}}Dto> CreateAsync(Create{{EntityName}}Dto input)
    {
        var entity = new {{EntityName}}
        {
{{#NonKeyColumns}}            {{CsName}} = input.{{CsName}},
{{/NonKeyColumns}}        };
        _db.Set<{{EntityName}}>().Add(entity);
        await _db.SaveChangesAsync();
        return ToDto(entity);
    }

    public async Task<bool> UpdateAsync({{KeyType}} id, Update{{EntityName}}Dto input)
    {
        var entity = await _db.Set<{{EntityName}}>().FindAsync(id);
        if (entity is null)
        {
            return false;
        }
{{#NonKeyColumns}}        entity.{{CsName}} = input.{{CsName}};
{{/NonKeyColumns}}        await _db.SaveChangesAsync();
        return true;
    }

    public async Task<bool> DeleteAsync({{KeyType}} id)
    {
        var entity = await _db.Set<{{EntityName}}>().FindAsync(id);
        if (entity is null)
        {
            return false;
        }
        _db.Set<{{EntityName}}>().Remove(entity);
        await _db.SaveChangesAsync();
        return true;
    }

    private static {{EntityName}}Dto ToDto({{EntityName}} e) => new()
    {
{{#Columns}}        {{CsName}} = e.{{CsName}},
{{/Columns}}    };
}
"#;

const DTO: &str = r#"// <auto-generated> by crudgen. Edits will be overwritten.
namespace {{Namespace}};

public class {{EntityName}}Dto
{
{{#Columns}}    public {{ClrType}} {{CsName}} { get; set; }
{{/Columns}}}

public class Create{{EntityName}}Dto
{
{{#NonKeyColumns}}    public {{ClrType}} {{CsName}} { get; set; }
{{/NonKeyColumns}}}

public class Update{{EntityName}}Dto
{
{{#NonKeyColumns}}    public {{ClrType}} {{CsName}} { get; set; }
{{/NonKeyColumns}}}
"#;

const REGISTRATION: &str = r#"// <auto-generated> by crudgen. Edits will be overwritten.
using Microsoft.Extensions.DependencyInjection;

namespace {{Namespace}};

public static class ServiceRegistration
{
    public static IServiceCollection AddGeneratedServices(this IServiceCollection services)
    {
{{#Entities}}        services.AddScoped<I{{EntityName}}Service, {{EntityName}}Service>();
{{/Entities}}        return services;
    }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{entity_context, project_entity, registration_context};
    use crate::render::render;
    use crudgen_schema::{ColumnInfo, TableInfo};

    fn sample_context() -> crate::render::Context {
        let table = TableInfo {
            entity_name: "Product".to_string(),
            name: "Products".to_string(),
            schema: "public".to_string(),
            key_column: Some("id".to_string()),
            columns: vec![
                ColumnInfo {
                    name: "id".to_string(),
                    clr_type: "int".to_string(),
                    is_nullable: false,
                    cs_name: "id".to_string(),
                },
                ColumnInfo {
                    name: "display_name".to_string(),
                    clr_type: "string".to_string(),
                    is_nullable: true,
                    cs_name: "display_name".to_string(),
                },
            ],
            is_view: false,
        };
        entity_context(&project_entity(&table), "App.Generated", "AppDbContext")
    }

    #[test]
    fn default_templates_bind_the_projected_fields() {
        let ctx = sample_context();
        for artifact in Artifact::PER_ENTITY {
            let out = render(artifact.default_text(), &ctx).unwrap();
            assert!(out.contains("Product"), "{artifact:?} lost the entity name");
        }
    }

    #[test]
    fn controller_routes_and_keys() {
        let out = render(Artifact::Controller.default_text(), &sample_context()).unwrap();
        assert!(out.contains(r#"[Route("api/product")]"#));
        assert!(out.contains("Get(int id)"));
        assert!(out.contains("created.id"));
    }

    #[test]
    fn dto_excludes_key_from_create_and_update() {
        let out = render(Artifact::Dto.default_text(), &sample_context()).unwrap();
        assert!(out.contains("public class ProductDto"));
        let create = out.split("CreateProductDto").nth(1).unwrap();
        assert!(!create.contains("public int id"));
        assert!(create.contains("public string display_name"));
    }

    #[test]
    fn registration_lists_every_entity() {
        let ctx = registration_context(
            &["Product".to_string(), "Category".to_string()],
            "App.Generated",
        );
        let out = render(Artifact::Registration.default_text(), &ctx).unwrap();
        assert!(out.contains("AddScoped<IProductService, ProductService>"));
        assert!(out.contains("AddScoped<ICategoryService, CategoryService>"));
    }

    #[test]
    fn file_names_follow_the_artifact() {
        assert_eq!(Artifact::Controller.file_name("Product"), "ProductController.cs");
        assert_eq!(Artifact::ServiceInterface.file_name("Product"), "IProductService.cs");
        assert_eq!(Artifact::Registration.file_name(""), "ServiceRegistration.cs");
    }
}
