//! Test utilities for generators.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use eyre::Result;

use crate::{
    pipeline::{TsGenerator, TypeScriptContext},
    tree::{FileId, FolderId},
    types::{ObjectResolutionRequest, ResolutionRequest, TypeRef},
};

type ConfigureFn = Box<dyn Fn(&mut TypeScriptContext, &mut ResolutionRequest) -> Result<()>>;
type ObjectFn = Box<dyn Fn(&mut TypeScriptContext, &mut ObjectResolutionRequest) -> Result<()>>;
type HookFn = Box<dyn Fn(&mut TypeScriptContext) -> Result<()>>;
type FolderFn = Box<dyn Fn(&mut TypeScriptContext, FolderId) -> Result<()>>;
type FileFn = Box<dyn Fn(&mut TypeScriptContext, FileId) -> Result<()>>;

/// A generator assembled from closures.
pub struct FnGenerator {
    name: &'static str,
    initialize: Option<HookFn>,
    configure: Option<ConfigureFn>,
    object: Option<ObjectFn>,
    generate: Option<HookFn>,
    after: Option<HookFn>,
    folder_created: Option<FolderFn>,
    file_created: Option<FileFn>,
}

impl FnGenerator {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            initialize: None,
            configure: None,
            object: None,
            generate: None,
            after: None,
            folder_created: None,
            file_created: None,
        }
    }

    pub fn on_initialize(
        mut self,
        f: impl Fn(&mut TypeScriptContext) -> Result<()> + 'static,
    ) -> Self {
        self.initialize = Some(Box::new(f));
        self
    }

    pub fn on_configure(
        mut self,
        f: impl Fn(&mut TypeScriptContext, &mut ResolutionRequest) -> Result<()> + 'static,
    ) -> Self {
        self.configure = Some(Box::new(f));
        self
    }

    pub fn on_object(
        mut self,
        f: impl Fn(&mut TypeScriptContext, &mut ObjectResolutionRequest) -> Result<()> + 'static,
    ) -> Self {
        self.object = Some(Box::new(f));
        self
    }

    pub fn on_generate(mut self, f: impl Fn(&mut TypeScriptContext) -> Result<()> + 'static) -> Self {
        self.generate = Some(Box::new(f));
        self
    }

    pub fn on_after(mut self, f: impl Fn(&mut TypeScriptContext) -> Result<()> + 'static) -> Self {
        self.after = Some(Box::new(f));
        self
    }

    pub fn on_folder(
        mut self,
        f: impl Fn(&mut TypeScriptContext, FolderId) -> Result<()> + 'static,
    ) -> Self {
        self.folder_created = Some(Box::new(f));
        self
    }

    pub fn on_file(
        mut self,
        f: impl Fn(&mut TypeScriptContext, FileId) -> Result<()> + 'static,
    ) -> Self {
        self.file_created = Some(Box::new(f));
        self
    }
}

impl TsGenerator for FnGenerator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn initialize(&self, ctx: &mut TypeScriptContext) -> Result<()> {
        self.initialize.as_ref().map_or(Ok(()), |f| f(ctx))
    }

    fn configure_type(
        &self,
        ctx: &mut TypeScriptContext,
        request: &mut ResolutionRequest,
    ) -> Result<()> {
        self.configure.as_ref().map_or(Ok(()), |f| f(ctx, request))
    }

    fn resolve_object(
        &self,
        ctx: &mut TypeScriptContext,
        request: &mut ObjectResolutionRequest,
    ) -> Result<()> {
        self.object.as_ref().map_or(Ok(()), |f| f(ctx, request))
    }

    fn on_folder_created(&self, ctx: &mut TypeScriptContext, folder: FolderId) -> Result<()> {
        self.folder_created.as_ref().map_or(Ok(()), |f| f(ctx, folder))
    }

    fn on_file_created(&self, ctx: &mut TypeScriptContext, file: FileId) -> Result<()> {
        self.file_created.as_ref().map_or(Ok(()), |f| f(ctx, file))
    }

    fn generate_code(&self, ctx: &mut TypeScriptContext) -> Result<()> {
        self.generate.as_ref().map_or(Ok(()), |f| f(ctx))
    }

    fn after_code_generation(&self, ctx: &mut TypeScriptContext) -> Result<()> {
        self.after.as_ref().map_or(Ok(()), |f| f(ctx))
    }
}

/// Implementor writing `export class Name {` ... `}` in the type part.
pub fn empty_class(ctx: &mut TypeScriptContext, tref: TypeRef) -> Result<bool> {
    let name = ctx.type_name(tref);
    let part = ctx.ensure_type_part(tref)?;
    ctx.part(part)
        .append("export class ")
        .append(&name)
        .append_line(" {")
        .append_line("}");
    Ok(true)
}
