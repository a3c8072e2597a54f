use eyre::Result;
use tsweave_codegen::{
    TsGenerator, TypeScriptContext,
    parts::PartWriter,
    types::{ModelKind, Primitive, ResolutionRequest, TsValue, number_literal},
};

type WriteFn = fn(&mut PartWriter<'_>, &str, &TsValue) -> bool;

/// Maps the primitives that exist in TypeScript to basic types.
///
/// | Model        | TypeScript | Default |
/// |--------------|------------|---------|
/// | `Boolean`    | `boolean`  | `false` |
/// | `Number`     | `number`   | `0`     |
/// | `BigInt`     | `bigint`   | `0n`    |
/// | `String`     | `string`   | `''`    |
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardTypes;

impl StandardTypes {
    fn basic(primitive: Primitive) -> Option<(&'static str, &'static str, WriteFn)> {
        match primitive {
            Primitive::Boolean => Some(("boolean", "false", write_boolean as WriteFn)),
            Primitive::Number => Some(("number", "0", write_number)),
            Primitive::BigInt => Some(("bigint", "0n", write_bigint)),
            Primitive::String => Some(("string", "''", write_string)),
            Primitive::DateTime | Primitive::Guid => None,
        }
    }
}

fn write_boolean(w: &mut PartWriter<'_>, _: &str, value: &TsValue) -> bool {
    let TsValue::Boolean(value) = value else {
        return false;
    };
    w.append(if *value { "true" } else { "false" });
    true
}

fn write_number(w: &mut PartWriter<'_>, _: &str, value: &TsValue) -> bool {
    let text = match value {
        TsValue::Integer(value) => value.to_string(),
        TsValue::Number(value) => number_literal(*value),
        _ => return false,
    };
    w.append(&text);
    true
}

fn write_bigint(w: &mut PartWriter<'_>, _: &str, value: &TsValue) -> bool {
    let text = match value {
        TsValue::Integer(value) => format!("{value}n"),
        TsValue::BigInt(value) => format!("{value}n"),
        _ => return false,
    };
    w.append(&text);
    true
}

fn write_string(w: &mut PartWriter<'_>, _: &str, value: &TsValue) -> bool {
    let TsValue::String(value) = value else {
        return false;
    };
    w.append_source_string(value);
    true
}

impl TsGenerator for StandardTypes {
    fn name(&self) -> &'static str {
        "standard-types"
    }

    fn configure_type(
        &self,
        ctx: &mut TypeScriptContext,
        request: &mut ResolutionRequest,
    ) -> Result<()> {
        let ModelKind::Primitive(primitive) = request.model().kind() else {
            return Ok(());
        };
        if let Some((name, default, writer)) = Self::basic(*primitive) {
            let tref = ctx.register_basic(name, Some(default))?;
            ctx.set_value_writer(tref, writer);
            request.resolved = Some(tref);
        }
        Ok(())
    }
}
