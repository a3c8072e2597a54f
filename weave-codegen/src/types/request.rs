use std::rc::Rc;

use super::{ModelType, ObjectKey, TsValue, TypeRef, ValueWriter};
use crate::{parts::PartWriter, pipeline::TypeScriptContext};

/// Writes the body of a resolved type. Returns `false` on failure.
pub type Implementor = Box<dyn FnOnce(&mut TypeScriptContext, TypeRef) -> eyre::Result<bool>>;

/// Computes a default value once the type is cached.
pub type DefaultValueProvider =
    Box<dyn FnOnce(&mut TypeScriptContext, TypeRef) -> eyre::Result<Option<String>>>;

/// Placement hints of a type.
#[derive(Debug, Clone, Default)]
pub struct Placement {
    /// Folder path from the root. Defaults to the namespace.
    pub folder: Option<String>,
    /// File name in the folder. Defaults to the type name.
    pub file_name: Option<String>,
    /// Put the type in the file of another type.
    pub same_file_as: Option<ModelType>,
    /// Put the type in the folder of another type.
    pub same_folder_as: Option<ModelType>,
}

/// Mutable proposal handed to generators when a model type is first resolved.
pub struct ResolutionRequest {
    model: ModelType,
    default_name: String,
    /// Final TypeScript name.
    pub type_name: String,
    pub placement: Placement,
    pub default_value: Option<String>,
    /// Overrides `default_value` when it returns a value.
    pub default_value_provider: Option<DefaultValueProvider>,
    pub implementor: Option<Implementor>,
    /// Writes literal values of the type.
    pub value_writer: Option<ValueWriter>,
    /// Closer of the type part, typically `}\n`.
    pub part_closer: Option<String>,
    /// Marks the type as broken: its body will not be generated.
    pub has_error: bool,
    /// Set to reuse an existing type instead of creating a new one.
    pub resolved: Option<TypeRef>,
}

impl ResolutionRequest {
    pub(crate) fn new(model: ModelType) -> Self {
        let default_name = model.default_type_name();
        Self {
            model,
            type_name: default_name.clone(),
            default_name,
            placement: Placement::default(),
            default_value: None,
            default_value_provider: None,
            implementor: None,
            value_writer: None,
            part_closer: None,
            has_error: false,
            resolved: None,
        }
    }

    pub fn model(&self) -> &ModelType {
        &self.model
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn implement_with(
        &mut self,
        implementor: impl FnOnce(&mut TypeScriptContext, TypeRef) -> eyre::Result<bool> + 'static,
    ) -> &mut Self {
        self.implementor = Some(Box::new(implementor));
        self
    }

    pub fn provide_default_with(
        &mut self,
        provider: impl FnOnce(&mut TypeScriptContext, TypeRef) -> eyre::Result<Option<String>>
        + 'static,
    ) -> &mut Self {
        self.default_value_provider = Some(Box::new(provider));
        self
    }

    pub fn write_values_with(
        &mut self,
        writer: impl Fn(&mut PartWriter<'_>, &str, &TsValue) -> bool + 'static,
    ) -> &mut Self {
        self.value_writer = Some(Rc::new(writer));
        self
    }
}

/// Request for a type standing behind an [`ObjectKey`].
#[derive(Debug)]
pub struct ObjectResolutionRequest {
    key: ObjectKey,
    pub resolved: Option<TypeRef>,
}

impl ObjectResolutionRequest {
    pub(crate) fn new(key: ObjectKey) -> Self {
        Self {
            key,
            resolved: None,
        }
    }

    pub fn key(&self) -> &ObjectKey {
        &self.key
    }
}
