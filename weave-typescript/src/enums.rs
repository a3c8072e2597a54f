use eyre::Result;
use tsweave_codegen::{
    TsGenerator, TypeScriptContext,
    parts::PartWriter,
    types::{EnumInfo, EnumMember, ModelKind, ResolutionRequest, TsValue, TypeRef},
};

const PHASE: &str = "enums";

/// Writes model enums as TypeScript `export enum` declarations.
///
/// The default value of an enum is its member with the smallest value read
/// as unsigned, so that `0` wins over negative values.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnumGenerator;

/// Member chosen as default value, first one on ties.
fn default_member(info: &EnumInfo) -> Option<&EnumMember> {
    info.members
        .iter()
        .min_by_key(|member| info.repr.unsigned_value(member.value))
}

impl TsGenerator for EnumGenerator {
    fn name(&self) -> &'static str {
        "enums"
    }

    fn configure_type(
        &self,
        ctx: &mut TypeScriptContext,
        request: &mut ResolutionRequest,
    ) -> Result<()> {
        let ModelKind::Enum(info) = request.model().kind() else {
            return Ok(());
        };
        let info = info.clone();
        let doc = request.model().doc().map(str::to_string);

        match default_member(&info) {
            Some(member) => {
                let member = member.name.clone();
                request.provide_default_with(move |ctx, tref| {
                    Ok(Some(format!("{}.{member}", ctx.type_name(tref))))
                });
            }
            None => ctx.diagnostics_mut().add_warning(
                PHASE,
                format!("Enum '{}' has no member, it has no default value.", request.model()),
            ),
        }
        let values = info.clone();
        request
            .implement_with(move |ctx, tref| write_enum(ctx, tref, &info, doc.as_deref()))
            .write_values_with(move |w, name, value| write_value(w, name, &values, value));
        Ok(())
    }
}

/// `Enum.Member`, from a member name or a member value.
fn write_value(w: &mut PartWriter<'_>, name: &str, info: &EnumInfo, value: &TsValue) -> bool {
    let member = match value {
        TsValue::EnumMember(member) => info.members.iter().find(|m| m.name == *member),
        TsValue::Integer(value) => info.members.iter().find(|m| m.value == *value),
        _ => None,
    };
    let Some(member) = member else {
        return false;
    };
    w.append(name).append(".").append(&member.name);
    true
}

fn write_enum(
    ctx: &mut TypeScriptContext,
    tref: TypeRef,
    info: &EnumInfo,
    doc: Option<&str>,
) -> Result<bool> {
    let documentation = ctx.config().generate_documentation;
    let name = ctx.type_name(tref);
    let part = ctx.ensure_type_part(tref)?;

    let mut declaration = ctx.part(part);
    if let Some(doc) = doc.filter(|_| documentation) {
        declaration.append_documentation(doc);
    }
    declaration.append("export enum ").append(&name).append(" ");
    let block = declaration.open_block();

    let mut members = ctx.part(block);
    for member in &info.members {
        if let Some(doc) = member.doc.as_deref().filter(|_| documentation) {
            members.append_documentation(doc);
        }
        members
            .append(&member.name)
            .append(" = ")
            .append(&info.repr.literal(member.value))
            .append_line(",");
    }
    Ok(true)
}
