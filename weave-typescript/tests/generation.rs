//! End-to-end tests: resolve model types, generate, save.

use std::fs;

use tempfile::TempDir;
use tracing_subscriber::EnvFilter;
use tsweave_codegen::{
    GeneratorConfig,
    testing::FnGenerator,
    tree::SaveStrategy,
    types::{EnumInfo, EnumMember, EnumRepr, ModelKind, ModelType, Primitive},
};
use tsweave_typescript::Generator;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn status() -> ModelType {
    ModelType::enumeration(
        "Shop.Enums",
        "Status",
        EnumInfo::new(
            EnumRepr::I32,
            [EnumMember::new("Open", 1), EnumMember::new("Closed", 2)],
        ),
    )
}

fn order() -> ModelType {
    ModelType::class("Shop", "Order")
}

/// Writes `Order` with one field per standard type. The field types are
/// resolved while the work-queue is drained.
fn classes() -> FnGenerator {
    FnGenerator::new("classes").on_configure(|_, request| {
        if !matches!(request.model().kind(), ModelKind::Class) {
            return Ok(());
        }
        request.part_closer = Some("}\n".to_string());
        request.implement_with(|ctx, tref| {
            let fields = [
                ("Id", ctx.resolve(&ModelType::primitive(Primitive::Guid))?),
                ("Status", ctx.resolve(&status())?),
                ("Created", ctx.resolve(&ModelType::primitive(Primitive::DateTime))?),
                (
                    "Note",
                    ctx.resolve(&ModelType::primitive(Primitive::String))?
                        .nullable(),
                ),
            ];
            let name = ctx.type_name(tref);
            let part = ctx.ensure_type_part(tref)?;
            ctx.part(part).append("export class ").append(&name).append_line(" {");
            let body = ctx.part(part).create_part();
            for (field, tref) in fields {
                let field = ctx.to_identifier(field);
                let default = ctx.default_value(tref).unwrap_or_default();
                ctx.part(body).append("  ").append(&field).append(": ");
                ctx.append_type_name(body, tref)?;
                ctx.part(body).append(" = ").append(&default).append_line(";");
            }
            Ok(true)
        });
        Ok(())
    })
}

fn generator(config: GeneratorConfig) -> Generator {
    Generator::new(config).with_generator(classes())
}

#[test]
fn test_class_imports_every_dependency() {
    init_tracing();
    let files = generator(GeneratorConfig::default())
        .preview(&[order()])
        .unwrap();

    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, ["Shop/Enums/Status.ts", "Shop/Order.ts", "System/Guid.ts"]);
    insta::assert_snapshot!(files[1].content, @r"
import { Guid } from '../System/Guid';
import { Status } from './Enums/Status';
import { DateTime } from 'luxon';

export class Order {
  id: Guid = Guid.empty;
  status: Status = Status.Open;
  created: DateTime = DateTime.utc(1);
  note: string|undefined = undefined;
}
");
}

#[test]
fn test_pascal_case_identifiers() {
    let files = generator(GeneratorConfig::default().with_pascal_case(true))
        .preview(&[order()])
        .unwrap();

    let order = files.iter().find(|f| f.path == "Shop/Order.ts").unwrap();
    assert!(order.content.contains("  Id: Guid = Guid.empty;\n"));
}

#[test]
fn test_generate_saves_files_and_dependencies() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = GeneratorConfig::default().with_barrel("Shop");

    let outcome = generator(config)
        .generate(&[order()], &SaveStrategy::new(dir.path()))
        .unwrap();

    assert!(outcome.success);
    let summary = outcome.summary.unwrap();
    assert_eq!(summary.files, 4);
    assert_eq!(summary.written, 4);
    assert_eq!(
        fs::read_to_string(dir.path().join("Shop/index.ts")).unwrap(),
        "export * from './Order';\nexport * from './Enums/Status';\n"
    );
    assert!(dir.path().join("System/Guid.ts").is_file());
    assert!(!dir.path().join("System/index.ts").exists());
    assert_eq!(
        outcome.dependencies,
        serde_json::json!({
            "dependencies": { "luxon": "3.4.4" },
            "devDependencies": { "@types/luxon": "3.3.7" },
        })
    );
}

#[test]
fn test_regeneration_rewrites_nothing_and_removes_stale_files() {
    let dir = TempDir::new().unwrap();
    let strategy = SaveStrategy::new(dir.path()).with_cleanup(true);
    generator(GeneratorConfig::default())
        .generate(&[order()], &strategy)
        .unwrap();
    fs::create_dir_all(dir.path().join("Legacy")).unwrap();
    fs::write(dir.path().join("Legacy/Old.ts"), "export class Old {}\n").unwrap();

    let outcome = generator(GeneratorConfig::default())
        .generate(&[order()], &strategy)
        .unwrap();

    let summary = outcome.summary.unwrap();
    assert_eq!(summary.written, 0);
    assert_eq!(summary.removed, 1);
    assert!(!dir.path().join("Legacy").exists());
    assert!(dir.path().join("Shop/Order.ts").is_file());
}

#[test]
fn test_configured_library_version() {
    let dir = TempDir::new().unwrap();
    let config: GeneratorConfig = r#"
        barrels = [""]

        [library_versions]
        luxon = "3.5.0"
    "#
    .parse()
    .unwrap();

    let outcome = generator(config)
        .generate(&[order()], &SaveStrategy::new(dir.path()))
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.dependencies["dependencies"]["luxon"], "3.5.0");
    assert_eq!(outcome.context.diagnostics().warning_count(), 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("index.ts")).unwrap(),
        "export * from './Shop/Order';\n\
         export * from './Shop/Enums/Status';\n\
         export * from './System/Guid';\n"
    );
}

#[test]
fn test_failed_implementor_saves_nothing() {
    let dir = TempDir::new().unwrap();
    let broken = FnGenerator::new("broken").on_configure(|_, request| {
        if request.model().name() == "Broken" {
            request.implement_with(|_, _| Ok(false));
        }
        Ok(())
    });

    let outcome = Generator::new(GeneratorConfig::default())
        .with_generator(broken)
        .generate(
            &[ModelType::class("Shop", "Broken")],
            &SaveStrategy::new(dir.path()),
        )
        .unwrap();

    assert!(!outcome.success);
    assert!(outcome.summary.is_none());
    assert_eq!(outcome.context.diagnostics().error_count(), 1);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_unimplemented_type_is_reported() {
    let generator = Generator::new(GeneratorConfig::default());

    let ctx = generator.run(&[ModelType::class("Shop", "Lonely")]).unwrap();

    assert_eq!(ctx.missing_implementations().len(), 1);
    assert_eq!(ctx.diagnostics().warning_count(), 1);
    assert!(!ctx.diagnostics().has_errors());
}
