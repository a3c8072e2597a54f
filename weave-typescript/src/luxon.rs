use eyre::Result;
use tsweave_codegen::{
    TsGenerator, TypeScriptContext,
    libraries::DependencyKind,
    parts::PartWriter,
    types::{ModelKind, Primitive, ResolutionRequest, TsValue},
};

/// Version of `luxon` used when none is configured.
pub const LUXON_VERSION: &str = "3.4.4";
/// Version of `@types/luxon` used when none is configured.
pub const LUXON_TYPES_VERSION: &str = "3.3.7";

const LUXON: &str = "luxon";
const LUXON_TYPES: &str = "@types/luxon";

/// Maps date-times to the `DateTime` class of the `luxon` package.
///
/// Using `DateTime` imports it from `luxon`, which also brings `@types/luxon`
/// into the development dependencies.
#[derive(Debug, Default, Clone, Copy)]
pub struct LuxonGenerator;

impl TsGenerator for LuxonGenerator {
    fn name(&self) -> &'static str {
        "luxon"
    }

    fn initialize(&self, ctx: &mut TypeScriptContext) -> Result<()> {
        ctx.register_library(
            LUXON_TYPES,
            DependencyKind::DevDependency,
            Some(LUXON_TYPES_VERSION),
            &[],
        )?;
        ctx.register_library(
            LUXON,
            DependencyKind::Dependency,
            Some(LUXON_VERSION),
            &[LUXON_TYPES],
        )?;
        Ok(())
    }

    fn configure_type(
        &self,
        ctx: &mut TypeScriptContext,
        request: &mut ResolutionRequest,
    ) -> Result<()> {
        if matches!(
            request.model().kind(),
            ModelKind::Primitive(Primitive::DateTime)
        ) {
            let tref = ctx.register_library_type("DateTime", Some("DateTime.utc(1)"), LUXON)?;
            ctx.set_value_writer(tref, write_value);
            request.resolved = Some(tref);
        }
        Ok(())
    }
}

/// Date-times are parsed back from their ISO form, keeping their offset.
fn write_value(w: &mut PartWriter<'_>, name: &str, value: &TsValue) -> bool {
    let TsValue::DateTime(iso) = value else {
        return false;
    };
    w.append(name)
        .append(".fromISO(")
        .append_source_string(iso)
        .append(", { setZone: true })");
    true
}
