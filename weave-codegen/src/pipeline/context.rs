//! The state of one generation pass.

use std::rc::Rc;

use tracing::{debug, info};
use tsweave_core::to_identifier;

use super::TsGenerator;
use crate::{
    Error, GeneratorConfig, Result,
    diagnostic::Diagnostics,
    imports::ImportTarget,
    libraries::{DependencyKind, LibraryManager},
    parts::{PartId, PartKey, PartWriter},
    tree::{Created, FileId, FolderId, SaveStrategy, SaveSummary, SourceTree},
    types::{LibrarySymbol, TsValue, TypeKey, TypeRef, TypeRegistry},
};

const PHASE: &str = "generate";

/// Owner of everything a generation pass builds.
///
/// Created by [`GenerationPass::initialize`](super::GenerationPass::initialize).
/// [`generate_code`](Self::generate_code) can only run once.
pub struct TypeScriptContext {
    pub(super) config: GeneratorConfig,
    pub(super) tree: SourceTree,
    pub(super) types: TypeRegistry,
    pub(super) libraries: LibraryManager,
    pub(super) diagnostics: Diagnostics,
    pub(super) generators: Vec<Rc<dyn TsGenerator>>,
    done: bool,
    missing: Vec<TypeRef>,
}

impl TypeScriptContext {
    pub(super) fn new(config: GeneratorConfig, generators: Vec<Rc<dyn TsGenerator>>) -> Self {
        let libraries = LibraryManager::new(config.library_versions.clone());
        Self {
            config,
            tree: SourceTree::new(),
            types: TypeRegistry::new(),
            libraries,
            diagnostics: Diagnostics::new(),
            generators,
            done: false,
            missing: Vec::new(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn tree(&self) -> &SourceTree {
        &self.tree
    }

    /// Folders and files created through this handle are announced to the
    /// generators at the next resolution or generated type. Use
    /// [`find_or_create_file`](Self::find_or_create_file) to announce them
    /// immediately.
    pub fn tree_mut(&mut self) -> &mut SourceTree {
        &mut self.tree
    }

    /// Find or create a folder and run the creation hooks.
    pub fn find_or_create_folder(&mut self, path: &str) -> eyre::Result<FolderId> {
        let folder = self.tree.find_or_create_folder(path)?;
        self.notify_created()?;
        Ok(folder)
    }

    /// Find or create a file and run the creation hooks.
    pub fn find_or_create_file(&mut self, path: &str) -> eyre::Result<FileId> {
        let file = self.tree.find_or_create_file(path)?;
        self.notify_created()?;
        Ok(file)
    }

    /// Call the creation hooks of every generator for the folders and files
    /// added since the last call, including those the hooks add.
    pub(crate) fn notify_created(&mut self) -> eyre::Result<()> {
        loop {
            let created = self.tree.take_created();
            if created.is_empty() {
                return Ok(());
            }
            let generators = self.generators.clone();
            for item in created {
                for generator in &generators {
                    match item {
                        Created::Folder(folder) => generator.on_folder_created(self, folder)?,
                        Created::File(file) => generator.on_file_created(self, file)?,
                    }
                }
            }
        }
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn libraries(&self) -> &LibraryManager {
        &self.libraries
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Names of the registered generators, in call order.
    pub fn generator_names(&self) -> Vec<&'static str> {
        self.generators.iter().map(|g| g.name()).collect()
    }

    /// Whether [`generate_code`](Self::generate_code) has been called.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Apply the configured identifier casing.
    pub fn to_identifier(&self, name: &str) -> String {
        to_identifier(name, self.config.pascal_case)
    }

    /// Declare an external package. See [`LibraryManager::register`].
    pub fn register_library(
        &mut self,
        name: &str,
        kind: DependencyKind,
        version: Option<&str>,
        implied: &[&str],
    ) -> Result<()> {
        self.libraries
            .register(&mut self.diagnostics, name, kind, version, implied)
            .map(|_| ())
    }

    /// Import `symbols` from a library into `file` and mark the library as used.
    pub fn ensure_library_import(
        &mut self,
        file: FileId,
        library: &str,
        symbols: &[&str],
    ) -> Result<()> {
        self.libraries.mark_used(library)?;
        self.tree
            .ensure_import(file, ImportTarget::Library(library.to_string()), symbols);
        Ok(())
    }

    /// Register (or reuse by name) a type without file.
    pub fn register_basic(&mut self, name: &str, default_value: Option<&str>) -> Result<TypeRef> {
        self.types.register_basic(None, name, default_value, None)
    }

    /// Register a type without file and bind it to `key`.
    pub fn register_basic_for(
        &mut self,
        key: impl Into<TypeKey>,
        name: &str,
        default_value: Option<&str>,
    ) -> Result<TypeRef> {
        self.types
            .register_basic(Some(key.into()), name, default_value, None)
    }

    /// Register a type exported by a library. Using it imports it.
    pub fn register_library_type(
        &mut self,
        name: &str,
        default_value: Option<&str>,
        library: &str,
    ) -> Result<TypeRef> {
        if self.libraries.get(library).is_none() {
            return Err(Error::UnknownLibrary {
                name: library.to_string(),
            });
        }
        let symbol = name.split('<').next().unwrap_or(name).to_string();
        self.types.register_basic(
            None,
            name,
            default_value,
            Some(LibrarySymbol {
                library: library.to_string(),
                symbol,
            }),
        )
    }

    /// Cached type of a key, without resolving it.
    pub fn find(&self, key: &TypeKey) -> Option<TypeRef> {
        self.types.find(key)
    }

    pub fn type_name(&self, tref: TypeRef) -> String {
        self.types.type_name(tref)
    }

    pub fn default_value(&self, tref: TypeRef) -> Option<String> {
        self.types.default_value(tref)
    }

    pub fn type_file(&self, tref: TypeRef) -> Option<FileId> {
        self.types.get(tref.id()).file()
    }

    pub fn type_part(&self, tref: TypeRef) -> Option<PartId> {
        self.types.get(tref.id()).type_part()
    }

    /// Create the primary region of a type in its file, once.
    pub fn ensure_type_part(&mut self, tref: TypeRef) -> Result<PartId> {
        let ty = self.types.get(tref.id());
        if let Some(part) = ty.type_part() {
            return Ok(part);
        }
        let file = ty.file().ok_or_else(|| Error::TypeWithoutFile {
            name: ty.name().to_string(),
        })?;
        let closer = ty.part_closer.clone();
        let part = self
            .tree
            .body(file)
            .find_or_create_keyed_part(PartKey::Type(tref.id()), closer.as_deref());
        self.types.get_mut(tref.id()).type_part = Some(part);
        Ok(part)
    }

    /// Writer on a part of the tree.
    pub fn part(&mut self, id: PartId) -> PartWriter<'_> {
        self.tree.part(id)
    }

    /// Write the name of a type into a part and import what it needs.
    pub fn append_type_name(&mut self, part: PartId, tref: TypeRef) -> Result<()> {
        self.ensure_type_imports(part, tref)?;
        let name = self.types.type_name(tref);
        self.tree.part(part).append(&name);
        Ok(())
    }

    /// Replace the value writer of a type.
    pub fn set_value_writer(
        &mut self,
        tref: TypeRef,
        writer: impl Fn(&mut PartWriter<'_>, &str, &TsValue) -> bool + 'static,
    ) {
        self.types.get_mut(tref.id()).value_writer = Some(Rc::new(writer));
    }

    /// Write `value` as a literal of `tref` into a part and import what the
    /// literal needs.
    ///
    /// `Null` is written as `undefined` on a nullable type. Returns `false`,
    /// with nothing written, when the type cannot represent the value.
    pub fn try_write_value(
        &mut self,
        part: PartId,
        tref: TypeRef,
        value: &TsValue,
    ) -> Result<bool> {
        if matches!(value, TsValue::Null) {
            if !tref.is_nullable() {
                return Ok(false);
            }
            self.tree.part(part).append("undefined");
            return Ok(true);
        }
        let ty = self.types.get(tref.id());
        let Some(writer) = ty.value_writer.clone() else {
            return Ok(false);
        };
        let name = ty.name().to_string();
        if !writer(&mut self.tree.part(part), &name, value) {
            return Ok(false);
        }
        self.ensure_type_imports(part, tref)?;
        Ok(true)
    }

    fn ensure_type_imports(&mut self, part: PartId, tref: TypeRef) -> Result<()> {
        let owner = self.tree.part_file(part);
        let ty = self.types.get(tref.id());
        let file = ty.file();
        let symbol = ty.import_symbol().to_string();
        let library_imports = ty.library_imports().to_vec();
        if let Some(file) = file {
            self.tree
                .ensure_import(owner, ImportTarget::File(file), &[&symbol]);
        }
        for import in library_imports {
            self.ensure_library_import(owner, &import.library, &[&import.symbol])?;
        }
        Ok(())
    }

    /// Generate the body of every queued type.
    ///
    /// Calls every generator's `generate_code` hook, then drains the
    /// work-queue until no new type appears, closes the registry and, when
    /// no error was logged, runs the `after_code_generation` hooks.
    ///
    /// Returns whether the pass is free of logged errors. Hard failures
    /// (cycles, invalid names, generator errors) are returned as `Err`.
    pub fn generate_code(&mut self) -> eyre::Result<bool> {
        if self.done {
            return Err(Error::GenerationAlreadyRun.into());
        }
        self.done = true;
        info!(
            generators = self.generators.len(),
            pending = self.types.pending_count(),
            "starting code generation"
        );

        let generators = self.generators.clone();
        for generator in &generators {
            debug!(generator = generator.name(), "global code generation");
            generator.generate_code(self)?;
        }
        self.notify_created()?;
        self.drain()?;
        self.types.close();

        if !self.diagnostics.has_errors() {
            for generator in &generators {
                generator.after_code_generation(self)?;
            }
            self.notify_created()?;
        }

        let success = !self.diagnostics.has_errors();
        info!(
            success,
            types = self.types.len(),
            missing = self.missing.len(),
            "code generation done"
        );
        Ok(success)
    }

    /// Breadth-first fixpoint over the work-queue.
    ///
    /// Implementors may resolve new types; those are appended to the queue
    /// and visited by this same loop. Iterating over a snapshot of the queue
    /// would drop them.
    fn drain(&mut self) -> eyre::Result<()> {
        while let Some(id) = self.types.next_pending() {
            let tref = TypeRef::new(id);
            let name = self.types.get(id).name().to_string();
            if self.types.get(id).has_error() {
                self.diagnostics.add_error(
                    PHASE,
                    format!("Skipping code generation for '{name}' that is on error."),
                );
                continue;
            }
            let Some(implementor) = self.types.get_mut(id).implementor.take() else {
                self.diagnostics
                    .add_warning(PHASE, format!("Type '{name}' has no implementor."));
                self.missing.push(tref);
                continue;
            };
            debug!(type_name = %name, "generating type");
            let implemented = implementor(self, tref)?;
            self.notify_created()?;
            if !implemented {
                self.diagnostics
                    .add_error(PHASE, format!("Implementor of '{name}' failed."));
            } else if self.type_part(tref).is_none() {
                self.diagnostics.add_warning(
                    PHASE,
                    format!("Implementor of '{name}' did not create its type part."),
                );
                self.missing.push(tref);
            }
        }
        Ok(())
    }

    /// Types whose body was never generated.
    pub fn missing_implementations(&self) -> &[TypeRef] {
        &self.missing
    }

    /// Write the tree to disk. I/O errors are logged and yield `None`.
    pub fn save(&mut self, strategy: &SaveStrategy) -> Option<SaveSummary> {
        self.tree.save(&mut self.diagnostics, strategy)
    }

    /// `package.json` sections of the libraries that were imported.
    pub fn package_dependencies(&self) -> serde_json::Value {
        self.libraries.package_dependencies()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        pipeline::GenerationPass,
        testing::{FnGenerator, empty_class},
        types::ModelType,
    };

    fn context(generator: FnGenerator) -> TypeScriptContext {
        GenerationPass::new(GeneratorConfig::default())
            .generator(generator)
            .initialize()
            .unwrap()
    }

    #[test]
    fn test_drain_visits_types_discovered_while_generating() {
        let mut ctx = context(FnGenerator::new("chain").on_configure(|_, request| {
            let next = match request.model().name() {
                "A" => Some("B"),
                "B" => Some("C"),
                _ => None,
            };
            request.implement_with(move |ctx, tref| {
                if let Some(next) = next {
                    let next = ctx.resolve(&ModelType::class("S", next))?;
                    let part = ctx.ensure_type_part(tref)?;
                    ctx.part(part).append("export type Link = ");
                    ctx.append_type_name(part, next)?;
                    ctx.part(part).append_line(";");
                    Ok(true)
                } else {
                    empty_class(ctx, tref)
                }
            });
            Ok(())
        }));
        let a = ctx.resolve(&ModelType::class("S", "A")).unwrap();

        assert!(ctx.generate_code().unwrap());

        assert_eq!(ctx.types().len(), 3);
        assert_eq!(ctx.types().pending_count(), 0);
        assert!(ctx.missing_implementations().is_empty());
        let a_file = ctx.type_file(a).unwrap();
        assert_eq!(
            ctx.tree().render_file(a_file),
            "import { B } from './B';\n\nexport type Link = B;\n"
        );
    }

    #[test]
    fn test_soft_errors_are_collected() {
        let after_called = Rc::new(RefCell::new(false));
        let flag = after_called.clone();
        let mut ctx = context(
            FnGenerator::new("mixed")
                .on_configure(|_, request| {
                    let name = request.model().name().to_string();
                    match name.as_str() {
                        "Broken" => request.has_error = true,
                        "Failing" => {
                            request.implement_with(|_, _| Ok(false));
                        }
                        "Lazy" => {
                            request.implement_with(|_, _| Ok(true));
                        }
                        "Fine" => {
                            request.implement_with(empty_class);
                        }
                        _ => {}
                    }
                    Ok(())
                })
                .on_after(move |_| {
                    *flag.borrow_mut() = true;
                    Ok(())
                }),
        );
        for name in ["Broken", "Failing", "Lazy", "Fine", "Unimplemented"] {
            ctx.resolve(&ModelType::class("S", name)).unwrap();
        }

        let success = ctx.generate_code().unwrap();

        assert!(!success);
        assert!(!*after_called.borrow());
        assert_eq!(ctx.diagnostics().error_count(), 2);
        assert_eq!(ctx.diagnostics().warning_count(), 2);
        let missing: Vec<String> = ctx
            .missing_implementations()
            .iter()
            .map(|t| ctx.type_name(*t))
            .collect();
        assert_eq!(missing, ["Lazy", "Unimplemented"]);
    }

    #[test]
    fn test_missing_implementation_is_only_a_warning() {
        let mut ctx = context(FnGenerator::new("nothing"));
        ctx.resolve(&ModelType::class("S", "User")).unwrap();

        assert!(ctx.generate_code().unwrap());
        assert_eq!(ctx.missing_implementations().len(), 1);
    }

    #[test]
    fn test_generation_runs_once() {
        let mut ctx = context(FnGenerator::new("once"));
        assert!(ctx.generate_code().unwrap());
        assert!(ctx.is_done());

        let err = ctx.generate_code().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::GenerationAlreadyRun)
        ));
    }

    #[test]
    fn test_hook_order() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let (e1, e2, e3, e4) = (events.clone(), events.clone(), events.clone(), events.clone());
        let mut ctx = context(
            FnGenerator::new("hooks")
                .on_initialize(move |_| {
                    e1.borrow_mut().push("initialize");
                    Ok(())
                })
                .on_generate(move |ctx| {
                    e2.borrow_mut().push("generate");
                    ctx.resolve(&ModelType::class("S", "FromHook"))?;
                    Ok(())
                })
                .on_configure(move |_, request| {
                    let events = e3.clone();
                    request.implement_with(move |ctx, tref| {
                        events.borrow_mut().push("implement");
                        empty_class(ctx, tref)
                    });
                    Ok(())
                })
                .on_after(move |_| {
                    e4.borrow_mut().push("after");
                    Ok(())
                }),
        );

        assert!(ctx.generate_code().unwrap());
        assert_eq!(
            *events.borrow(),
            ["initialize", "generate", "implement", "after"]
        );
    }

    #[test]
    fn test_generator_error_aborts() {
        let mut ctx = context(FnGenerator::new("boom").on_generate(|_| Err(eyre::eyre!("boom"))));
        let err = ctx.generate_code().unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_append_type_name_imports() {
        let mut ctx = context(FnGenerator::new("lib").on_initialize(|ctx| {
            ctx.register_library("luxon", DependencyKind::Dependency, Some("3.4.4"), &[])?;
            Ok(())
        }));
        let date = ctx
            .register_library_type("DateTime", Some("DateTime.utc(1)"), "luxon")
            .unwrap();
        let user = ctx.resolve(&ModelType::class("S.Models", "User")).unwrap();
        let page = ctx.tree_mut().find_or_create_file("S/Pages/Page.ts").unwrap();
        let body = ctx.tree().file(page).body();

        ctx.part(body).append("let a: ");
        ctx.append_type_name(body, user.nullable()).unwrap();
        ctx.part(body).append(";\nlet b: ");
        ctx.append_type_name(body, date).unwrap();
        ctx.part(body).append_line(";");

        assert_eq!(
            ctx.tree().render_file(page),
            "import { User } from '../Models/User';\nimport { DateTime } from 'luxon';\n\nlet a: User|undefined;\nlet b: DateTime;\n"
        );
        assert!(ctx.libraries().get("luxon").unwrap().used);
        assert_eq!(
            ctx.package_dependencies(),
            serde_json::json!({ "dependencies": { "luxon": "3.4.4" } })
        );
    }

    #[test]
    fn test_try_write_value() {
        let mut ctx = context(FnGenerator::new("values").on_configure(|_, request| {
            request.write_values_with(|w, name, value| match value {
                TsValue::EnumMember(member) => {
                    w.append(name).append(".").append(member);
                    true
                }
                _ => false,
            });
            Ok(())
        }));
        let number = ctx.register_basic("number", Some("0")).unwrap();
        ctx.set_value_writer(number, |w, _, value| match value {
            TsValue::Integer(v) => {
                w.append(&v.to_string());
                true
            }
            _ => false,
        });
        let boolean = ctx.register_basic("boolean", Some("false")).unwrap();
        let color = ctx.resolve(&ModelType::class("S.Models", "Color")).unwrap();
        let page = ctx.tree_mut().find_or_create_file("S/Page.ts").unwrap();
        let body = ctx.tree().file(page).body();

        assert!(ctx.try_write_value(body, number, &TsValue::Integer(42)).unwrap());
        ctx.part(body).append(" ");
        assert!(ctx
            .try_write_value(body, color, &TsValue::EnumMember("Red".into()))
            .unwrap());
        ctx.part(body).append(" ");
        assert!(ctx.try_write_value(body, color.nullable(), &TsValue::Null).unwrap());
        assert!(!ctx.try_write_value(body, color, &TsValue::Null).unwrap());
        assert!(!ctx.try_write_value(body, number, &TsValue::Boolean(true)).unwrap());
        assert!(!ctx.try_write_value(body, boolean, &TsValue::Boolean(true)).unwrap());

        assert_eq!(
            ctx.tree().render_file(page),
            "import { Color } from './Models/Color';\n\n42 Color.Red undefined"
        );
        assert!(ctx.types().get(number.id()).writes_values());
        assert!(!ctx.types().get(boolean.id()).writes_values());
    }

    #[test]
    fn test_creation_hooks() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let (folders, files) = (events.clone(), events.clone());
        let mut ctx = GenerationPass::new(GeneratorConfig::default().with_barrel("Out"))
            .generator(
                FnGenerator::new("headers")
                    .on_configure(|_, request| {
                        request.implement_with(empty_class);
                        Ok(())
                    })
                    .on_folder(move |ctx, folder| {
                        let path = ctx.tree().folder_path(folder);
                        folders.borrow_mut().push(format!("folder {path}"));
                        Ok(())
                    })
                    .on_file(move |ctx, file| {
                        let path = ctx.tree().file_path(file);
                        files.borrow_mut().push(format!("file {path}"));
                        let body = ctx.tree().file(file).body();
                        ctx.part(body).append_line("// Generated file.");
                        Ok(())
                    }),
            )
            .initialize()
            .unwrap();
        assert_eq!(*events.borrow(), ["folder Out"]);

        let user = ctx.resolve(&ModelType::class("S.Models", "User")).unwrap();
        let extra = ctx.find_or_create_file("S/Extra.ts").unwrap();
        assert_eq!(ctx.find_or_create_file("S/Extra.ts").unwrap(), extra);
        assert!(ctx.generate_code().unwrap());

        assert_eq!(
            *events.borrow(),
            [
                "folder Out",
                "folder S",
                "folder S/Models",
                "file S/Models/User.ts",
                "file S/Extra.ts"
            ]
        );
        let file = ctx.type_file(user).unwrap();
        assert_eq!(
            ctx.tree().render_file(file),
            "// Generated file.\nexport class User {\n}\n"
        );
        assert_eq!(ctx.tree().render_file(extra), "// Generated file.\n");
    }

    #[test]
    fn test_creation_hook_error_aborts() {
        let mut ctx = context(
            FnGenerator::new("strict").on_file(|_, _| Err(eyre::eyre!("no files here"))),
        );
        let err = ctx.find_or_create_file("S/A.ts").unwrap_err();
        assert_eq!(err.to_string(), "no files here");
        assert!(ctx.tree().find_file("S/A.ts").is_some());
    }

    #[test]
    fn test_library_type_requires_library() {
        let mut ctx = context(FnGenerator::new("none"));
        assert!(matches!(
            ctx.register_library_type("DateTime", None, "luxon"),
            Err(Error::UnknownLibrary { .. })
        ));
    }

    #[test]
    fn test_type_part_needs_a_file() {
        let mut ctx = context(FnGenerator::new("none"));
        let number = ctx.register_basic("number", Some("0")).unwrap();
        assert!(matches!(
            ctx.ensure_type_part(number),
            Err(Error::TypeWithoutFile { .. })
        ));
    }

    #[test]
    fn test_type_part_uses_closer_once() {
        let mut ctx = context(FnGenerator::new("closer").on_configure(|_, request| {
            request.part_closer = Some("}\n".to_string());
            Ok(())
        }));
        let user = ctx.resolve(&ModelType::class("S", "User")).unwrap();

        let part = ctx.ensure_type_part(user).unwrap();
        assert_eq!(ctx.ensure_type_part(user).unwrap(), part);
        ctx.part(part).append_line("export class User {");

        let file = ctx.type_file(user).unwrap();
        assert_eq!(ctx.tree().render_file(file), "export class User {\n}\n");
        assert_eq!(ctx.type_part(user), Some(part));
    }

    #[test]
    fn test_pass_applies_configuration() {
        let config = GeneratorConfig::default()
            .with_barrel("Sample")
            .with_pascal_case(true)
            .with_library_version("luxon", "3.5.0");
        let ctx = GenerationPass::new(config)
            .generator(FnGenerator::new("first"))
            .generator(FnGenerator::new("second").on_initialize(|ctx| {
                ctx.register_library("luxon", DependencyKind::Dependency, Some("3.4.4"), &[])?;
                Ok(())
            }))
            .initialize()
            .unwrap();

        let sample = ctx.tree().find_folder("Sample").unwrap();
        assert!(ctx.tree().folder(sample).wants_barrel());
        assert_eq!(ctx.generator_names(), ["first", "second"]);
        assert_eq!(ctx.to_identifier("userName"), "UserName");
        assert_eq!(ctx.libraries().get("luxon").unwrap().version, "3.5.0");
        assert_eq!(ctx.diagnostics().warning_count(), 1);
    }
}
