//! Generation pass builder.

use std::rc::Rc;

use eyre::Result;
use tracing::debug;

use super::{TsGenerator, TypeScriptContext};
use crate::GeneratorConfig;

/// Builder of a [`TypeScriptContext`].
///
/// Generators are called in the order they are added.
pub struct GenerationPass {
    config: GeneratorConfig,
    generators: Vec<Rc<dyn TsGenerator>>,
}

impl GenerationPass {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            generators: Vec::new(),
        }
    }

    /// Add a generator.
    pub fn generator(mut self, generator: impl TsGenerator + 'static) -> Self {
        self.generators.push(Rc::new(generator));
        self
    }

    /// Add a generator shared with the caller.
    pub fn shared_generator(mut self, generator: Rc<dyn TsGenerator>) -> Self {
        self.generators.push(generator);
        self
    }

    /// Create the context: configured barrels are enabled, then every
    /// generator is initialized. Folders created so far are announced once
    /// all generators are initialized.
    pub fn initialize(self) -> Result<TypeScriptContext> {
        let barrels = self.config.barrels.clone();
        let mut ctx = TypeScriptContext::new(self.config, self.generators);
        for path in &barrels {
            let folder = ctx.tree.find_or_create_folder(path)?;
            ctx.tree.enable_barrel(folder);
        }
        let generators = ctx.generators.clone();
        for generator in &generators {
            debug!(generator = generator.name(), "initializing generator");
            generator.initialize(&mut ctx)?;
        }
        ctx.notify_created()?;
        Ok(ctx)
    }
}
