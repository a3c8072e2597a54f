use eyre::Result;
use tsweave_codegen::{
    TsGenerator, TypeScriptContext,
    parts::{CLASS_BODY, CONSTRUCTOR_BODY, PartId, PartWriter},
    types::{ModelKind, Primitive, ResolutionRequest, TsValue, TypeRef},
};

const EMPTY_GUID: &str = "00000000-0000-0000-0000-000000000000";

/// Maps `Guid` primitives to a generated immutable `Guid` class.
///
/// The constructor body is a keyed part ([`CONSTRUCTOR_BODY`]) so other
/// generators can add checks to it, see [`constructor_body`].
#[derive(Debug, Default, Clone, Copy)]
pub struct GuidGenerator;

impl TsGenerator for GuidGenerator {
    fn name(&self) -> &'static str {
        "guid"
    }

    fn configure_type(
        &self,
        _ctx: &mut TypeScriptContext,
        request: &mut ResolutionRequest,
    ) -> Result<()> {
        if !matches!(request.model().kind(), ModelKind::Primitive(Primitive::Guid)) {
            return Ok(());
        }
        request.type_name = "Guid".to_string();
        request.default_value = Some("Guid.empty".to_string());
        request.implement_with(write_guid).write_values_with(write_value);
        Ok(())
    }
}

/// `new Guid('...')`, the empty Guid being written as `Guid.empty`.
fn write_value(w: &mut PartWriter<'_>, name: &str, value: &TsValue) -> bool {
    let TsValue::Guid(guid) = value else {
        return false;
    };
    if guid == EMPTY_GUID {
        w.append(name).append(".empty");
    } else {
        w.append("new ")
            .append(name)
            .append("(")
            .append_source_string(guid)
            .append(")");
    }
    true
}

fn write_guid(ctx: &mut TypeScriptContext, tref: TypeRef) -> Result<bool> {
    let documentation = ctx.config().generate_documentation;
    let part = ctx.ensure_type_part(tref)?;

    let mut declaration = ctx.part(part);
    if documentation {
        declaration.append_documentation(&format!(
            "Immutable string wrapper. The value should be in the '{EMPTY_GUID}' format."
        ));
    }
    declaration.append("export class Guid ");
    let body = declaration.open_keyed_block(CLASS_BODY);

    let mut class = ctx.part(body);
    if documentation {
        class.append_documentation("The empty Guid, default value of the type.");
    }
    class
        .append("public static readonly empty = new Guid(")
        .append_source_string(EMPTY_GUID)
        .append_line(");")
        .new_line()
        .append("constructor(public readonly guid: string) ");
    class.open_keyed_block(CONSTRUCTOR_BODY);
    class
        .new_line()
        .append_line("toString(): string { return this.guid; }")
        .append_line("toJSON(): string { return this.guid; }");
    Ok(true)
}

/// Constructor body of the generated `Guid` class, once it has been written.
pub fn constructor_body(ctx: &mut TypeScriptContext, tref: TypeRef) -> Option<PartId> {
    let part = ctx.type_part(tref)?;
    let body = ctx.part(part).find_keyed_part(&CLASS_BODY)?;
    ctx.part(body).find_keyed_part(&CONSTRUCTOR_BODY)
}

#[cfg(test)]
mod tests {
    use tsweave_codegen::{GeneratorConfig, GenerationPass, types::ModelType};

    use super::*;

    fn context(documentation: bool) -> TypeScriptContext {
        GenerationPass::new(GeneratorConfig::default().with_documentation(documentation))
            .generator(GuidGenerator)
            .initialize()
            .unwrap()
    }

    #[test]
    fn test_guid_type() {
        let mut ctx = context(false);

        let guid = ctx.resolve(&ModelType::primitive(Primitive::Guid)).unwrap();

        assert_eq!(ctx.type_name(guid), "Guid");
        assert_eq!(ctx.default_value(guid).as_deref(), Some("Guid.empty"));
        let file = ctx.type_file(guid).unwrap();
        assert_eq!(ctx.tree().file_path(file), "System/Guid.ts");
    }

    #[test]
    fn test_guid_values() {
        let mut ctx = context(false);
        let guid = ctx.resolve(&ModelType::primitive(Primitive::Guid)).unwrap();
        let file = ctx.tree_mut().find_or_create_file("Sample/Ids.ts").unwrap();
        let body = ctx.tree().file(file).body();

        let value = TsValue::Guid("7c9e6679-7425-40de-944b-e07fc1f90ae7".to_string());
        assert!(ctx.try_write_value(body, guid, &value).unwrap());
        ctx.part(body).append_line(";");
        let empty = TsValue::Guid(EMPTY_GUID.to_string());
        assert!(ctx.try_write_value(body, guid, &empty).unwrap());
        ctx.part(body).append_line(";");
        assert!(!ctx.try_write_value(body, guid, &TsValue::String("x".into())).unwrap());

        assert_eq!(
            ctx.tree().render_file(file),
            "import { Guid } from '../System/Guid';\n\n\
             new Guid('7c9e6679-7425-40de-944b-e07fc1f90ae7');\n\
             Guid.empty;\n"
        );
    }

    #[test]
    fn test_guid_class() {
        let mut ctx = context(false);
        let guid = ctx.resolve(&ModelType::primitive(Primitive::Guid)).unwrap();

        assert!(ctx.generate_code().unwrap());

        let file = ctx.type_file(guid).unwrap();
        assert_eq!(
            ctx.tree().render_file(file),
            "export class Guid {\n\
             \x20 public static readonly empty = new Guid('00000000-0000-0000-0000-000000000000');\n\
             \n\
             \x20 constructor(public readonly guid: string) {\n\
             \x20 }\n\
             \n\
             \x20 toString(): string { return this.guid; }\n\
             \x20 toJSON(): string { return this.guid; }\n\
             }\n"
        );
    }

    #[test]
    fn test_constructor_body_is_open() {
        let mut ctx = context(false);
        let guid = ctx.resolve(&ModelType::primitive(Primitive::Guid)).unwrap();
        assert!(constructor_body(&mut ctx, guid).is_none());
        ctx.generate_code().unwrap();

        let ctor = constructor_body(&mut ctx, guid).unwrap();
        ctx.part(ctor).append_line("Object.freeze(this);");

        let file = ctx.type_file(guid).unwrap();
        assert!(
            ctx.tree()
                .render_file(file)
                .contains("  constructor(public readonly guid: string) {\n    Object.freeze(this);\n  }\n")
        );
    }

    #[test]
    fn test_guid_documentation() {
        let mut ctx = context(true);
        let guid = ctx.resolve(&ModelType::primitive(Primitive::Guid)).unwrap();
        ctx.generate_code().unwrap();

        let file = ctx.type_file(guid).unwrap();
        let content = ctx.tree().render_file(file);
        assert!(content.starts_with("/**\n"));
        assert!(content.contains("  /**\n   * The empty Guid, default value of the type.\n   */\n"));
    }
}
