//! Lazy type resolution.

use tracing::{debug, trace};

use super::TypeScriptContext;
use crate::{
    Error,
    tree::{FileId, FolderId},
    types::{
        CacheState, ModelType, ObjectKey, ObjectResolutionRequest, ResolutionRequest, TsType,
        TypeKey, TypeRef,
    },
};

const PHASE: &str = "resolve";

impl TypeScriptContext {
    /// Resolve a model type, asking the generators about it the first time.
    ///
    /// Resolving the same type again returns the same [`TypeRef`]. The type is
    /// cached and queued before its default value provider runs, so the
    /// provider may resolve the type itself. Resolving a type again from a
    /// generator that is still configuring it fails with
    /// [`Error::ReentrantResolution`].
    pub fn resolve(&mut self, model: &ModelType) -> eyre::Result<TypeRef> {
        let key = TypeKey::Model(model.clone());
        match self.types.state(&key) {
            CacheState::Resolved(tref) => return Ok(tref),
            CacheState::InProgress => return Err(self.types.reentrant_error(&key).into()),
            CacheState::Unresolved => {}
        }
        if model.is_inline_only() {
            return Err(Error::InlineOnlyType {
                name: model.full_name().to_string(),
            }
            .into());
        }
        if self.types.is_closed() {
            return Err(Error::RegistryClosed {
                name: model.full_name().to_string(),
            }
            .into());
        }

        self.types.begin(key.clone());
        let resolved = self.resolve_new(model, &key);
        if resolved.is_err() {
            self.types.abandon(&key);
        }
        resolved
    }

    fn resolve_new(&mut self, model: &ModelType, key: &TypeKey) -> eyre::Result<TypeRef> {
        let mut request = ResolutionRequest::new(model.clone());
        let generators = self.generators.clone();
        for generator in &generators {
            generator.configure_type(self, &mut request)?;
            if request.resolved.is_some() {
                trace!(model = %model, generator = generator.name(), "type rerouted");
                break;
            }
        }
        if let Some(tref) = request.resolved {
            self.types.finish(key, tref);
            return Ok(tref);
        }

        if request.type_name.trim().is_empty() {
            self.diagnostics.add_warning(
                PHASE,
                format!(
                    "Empty type name for '{model}', using '{}'.",
                    request.default_name()
                ),
            );
            request.type_name = request.default_name().to_string();
        }
        let file = self.place(model, &request)?;

        let id = self.types.add(TsType {
            name: request.type_name.clone(),
            key: Some(key.clone()),
            file: Some(file),
            default_value: request.default_value.take(),
            has_error: request.has_error,
            type_part: None,
            part_closer: request.part_closer.take(),
            implementor: request.implementor.take(),
            imports: Vec::new(),
            value_writer: request.value_writer.take(),
        });
        let tref = TypeRef::new(id);
        self.types.finish(key, tref);
        self.types.enqueue(id);
        debug!(
            model = %model,
            type_name = %request.type_name,
            file = %self.tree.file_path(file),
            "resolved type"
        );
        self.notify_created()?;

        if let Some(provider) = request.default_value_provider.take() {
            if let Some(value) = provider(self, tref)? {
                self.types.get_mut(id).default_value = Some(value);
            }
        }
        Ok(tref)
    }

    /// File of a new type, from its placement hints.
    fn place(&mut self, model: &ModelType, request: &ResolutionRequest) -> eyre::Result<FileId> {
        let placement = &request.placement;
        let mut folder: Option<FolderId> = None;

        if let Some(target) = &placement.same_file_as {
            if let Some(file) = self.placement_target(model, target)? {
                return Ok(file);
            }
        } else if let Some(target) = &placement.same_folder_as {
            if let Some(file) = self.placement_target(model, target)? {
                folder = Some(self.tree.file(file).folder());
            }
        }

        let folder = match folder {
            Some(folder) => folder,
            None => {
                let path = placement
                    .folder
                    .clone()
                    .unwrap_or_else(|| model.default_folder());
                self.tree.find_or_create_folder(&path)?
            }
        };
        let file_name = placement
            .file_name
            .clone()
            .unwrap_or_else(|| ModelType::default_file_name(&request.type_name));
        Ok(self.tree.find_or_create_file_in(folder, &file_name)?)
    }

    /// Resolve the type `model` is placed next to. `None` when it has no file.
    fn placement_target(
        &mut self,
        model: &ModelType,
        target: &ModelType,
    ) -> eyre::Result<Option<FileId>> {
        self.types.enter_placement(model, target)?;
        let resolved = self.resolve(target);
        self.types.leave_placement();

        let file = self.type_file(resolved?);
        if file.is_none() {
            self.diagnostics.add_warning(
                PHASE,
                format!(
                    "'{target}' has no file to share with '{model}', using the default placement."
                ),
            );
        }
        Ok(file)
    }

    /// Resolve a logical type standing behind an object key.
    ///
    /// The result is cached after the generators answered; a registration made
    /// meanwhile by a reentrant call for the same key is overwritten.
    pub fn resolve_object(&mut self, key: &ObjectKey) -> eyre::Result<TypeRef> {
        let type_key = TypeKey::Object(key.clone());
        if let Some(tref) = self.types.find(&type_key) {
            return Ok(tref);
        }
        if self.types.object_depth(key) >= 2 {
            return Err(Error::ReentrantResolution {
                name: key.to_string(),
                chain: format!("{key} => {key} => {key}"),
            }
            .into());
        }

        self.types.push_object(key.clone());
        let resolved = self.dispatch_object(key);
        self.types.pop_object();

        let tref = resolved?;
        self.types.insert_object(key.clone(), tref);
        Ok(tref)
    }

    fn dispatch_object(&mut self, key: &ObjectKey) -> eyre::Result<TypeRef> {
        let mut request = ObjectResolutionRequest::new(key.clone());
        let generators = self.generators.clone();
        for generator in &generators {
            generator.resolve_object(self, &mut request)?;
            if let Some(tref) = request.resolved {
                trace!(key = %key, generator = generator.name(), "object key resolved");
                return Ok(tref);
            }
        }
        Err(Error::UnresolvedObjectKey {
            key: key.to_string(),
        }
        .into())
    }
}
