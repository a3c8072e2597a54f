//! Generator plugin trait.

use eyre::Result;

use super::TypeScriptContext;
use crate::{
    tree::{FileId, FolderId},
    types::{ObjectResolutionRequest, ResolutionRequest},
};

/// A plugin taking part in a generation pass.
///
/// Generators are called in registration order. For `configure_type` and
/// `resolve_object` the dispatch stops at the first generator that sets the
/// request's `resolved` field. Returning an error aborts the pass.
///
/// # Example
///
/// ```ignore
/// struct Strings;
///
/// impl TsGenerator for Strings {
///     fn name(&self) -> &'static str { "strings" }
///
///     fn configure_type(&self, ctx: &mut TypeScriptContext, request: &mut ResolutionRequest) -> Result<()> {
///         if matches!(request.model().kind(), ModelKind::Primitive(Primitive::String)) {
///             request.resolved = Some(ctx.register_basic("string", Some("''")));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait TsGenerator {
    /// The name of this generator (for debugging and logging).
    fn name(&self) -> &'static str;

    /// Called once when the context is created.
    #[allow(unused_variables)]
    fn initialize(&self, ctx: &mut TypeScriptContext) -> Result<()> {
        Ok(())
    }

    /// Called when a model type is resolved for the first time.
    ///
    /// The generator may rename the type, choose its placement, give it a
    /// default value and an implementor, or reroute it to another type.
    #[allow(unused_variables)]
    fn configure_type(
        &self,
        ctx: &mut TypeScriptContext,
        request: &mut ResolutionRequest,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when an object key is resolved for the first time.
    #[allow(unused_variables)]
    fn resolve_object(
        &self,
        ctx: &mut TypeScriptContext,
        request: &mut ObjectResolutionRequest,
    ) -> Result<()> {
        Ok(())
    }

    /// Called for every folder added to the tree, the root excepted.
    ///
    /// Folders created during the call are announced as well.
    #[allow(unused_variables)]
    fn on_folder_created(&self, ctx: &mut TypeScriptContext, folder: FolderId) -> Result<()> {
        Ok(())
    }

    /// Called for every file added to the tree, before any type is written
    /// into it when the file was created by a resolution.
    #[allow(unused_variables)]
    fn on_file_created(&self, ctx: &mut TypeScriptContext, file: FileId) -> Result<()> {
        Ok(())
    }

    /// Called once before the work-queue is drained.
    #[allow(unused_variables)]
    fn generate_code(&self, ctx: &mut TypeScriptContext) -> Result<()> {
        Ok(())
    }

    /// Called after a successful drain. New types can no longer be created.
    #[allow(unused_variables)]
    fn after_code_generation(&self, ctx: &mut TypeScriptContext) -> Result<()> {
        Ok(())
    }
}
