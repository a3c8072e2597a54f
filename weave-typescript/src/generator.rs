//! Entry point running a full generation pass.

use std::rc::Rc;

use eyre::Result;
use tracing::{info, warn};
use tsweave_codegen::{
    GenerationPass, GeneratorConfig, TsGenerator, TypeScriptContext,
    tree::{INDEX_FILE, SaveStrategy, SaveSummary},
    types::ModelType,
};

use crate::{EnumGenerator, GuidGenerator, LuxonGenerator, StandardTypes};

/// A rendered file that has not been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFile {
    /// Path relative to the output folder.
    pub path: String,
    pub content: String,
}

/// Result of [`Generator::generate`].
pub struct GenerationOutcome {
    /// No error was logged and the files were saved.
    pub success: bool,
    /// `None` when nothing was saved.
    pub summary: Option<SaveSummary>,
    /// `package.json` sections of the libraries the files import.
    pub dependencies: serde_json::Value,
    /// The finished pass, for its diagnostics.
    pub context: TypeScriptContext,
}

/// Runs the standard generators, then any extra ones, over a set of model types.
pub struct Generator {
    config: GeneratorConfig,
    extra: Vec<Rc<dyn TsGenerator>>,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            extra: Vec::new(),
        }
    }

    /// Add a generator called after the standard ones.
    pub fn with_generator(mut self, generator: impl TsGenerator + 'static) -> Self {
        self.extra.push(Rc::new(generator));
        self
    }

    fn pass(&self) -> GenerationPass {
        let pass = GenerationPass::new(self.config.clone())
            .generator(StandardTypes)
            .generator(LuxonGenerator)
            .generator(GuidGenerator)
            .generator(EnumGenerator);
        self.extra
            .iter()
            .fold(pass, |pass, generator| pass.shared_generator(Rc::clone(generator)))
    }

    /// Resolve `types` and generate their code.
    pub fn run(&self, types: &[ModelType]) -> Result<TypeScriptContext> {
        let mut ctx = self.pass().initialize()?;
        for model in types {
            ctx.resolve(model)?;
        }
        ctx.generate_code()?;
        Ok(ctx)
    }

    /// Render every file without writing, generated barrels included.
    pub fn preview(&self, types: &[ModelType]) -> Result<Vec<PreviewFile>> {
        let ctx = self.run(types)?;
        let tree = ctx.tree();
        let mut files: Vec<PreviewFile> = tree
            .files()
            .map(|file| PreviewFile {
                path: tree.file_path(file),
                content: tree.render_file(file),
            })
            .collect();
        for folder in tree.folders().filter(|folder| tree.writes_barrel(*folder)) {
            let path = match tree.folder_path(folder) {
                dir if dir.is_empty() => INDEX_FILE.to_string(),
                dir => format!("{dir}/{INDEX_FILE}"),
            };
            files.push(PreviewFile {
                path,
                content: tree.barrel(folder),
            });
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Generate `types` and save the files when no error was logged.
    pub fn generate(&self, types: &[ModelType], strategy: &SaveStrategy) -> Result<GenerationOutcome> {
        let mut ctx = self.run(types)?;
        let summary = if ctx.diagnostics().has_errors() {
            warn!(
                errors = ctx.diagnostics().error_count(),
                "generation failed, nothing saved"
            );
            None
        } else {
            ctx.save(strategy)
        };
        let success = summary.is_some();
        info!(success, files = ctx.tree().files().count(), "generation done");
        Ok(GenerationOutcome {
            success,
            summary,
            dependencies: ctx.package_dependencies(),
            context: ctx,
        })
    }
}
