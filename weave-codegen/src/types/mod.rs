//! Resolved TypeScript types and the registry that caches them.

mod model;
mod registry;
mod request;
mod value;

use std::{fmt, sync::Arc};

pub use model::{EnumInfo, EnumMember, EnumRepr, ModelKind, ModelType, ModelTypeInfo, Primitive};
pub use registry::{CacheState, TypeRegistry};
pub use request::{
    DefaultValueProvider, Implementor, ObjectResolutionRequest, Placement, ResolutionRequest,
};
pub use value::{TsValue, ValueWriter, number_literal};

use crate::{parts::PartId, tree::FileId};

/// Index of a resolved type in its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) usize);

/// Handle on a resolved type, optionally seen through its nullable wrapper.
///
/// The wrapper shares everything with the type except its name, suffixed by
/// `|undefined`, and its default value, `undefined`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeRef {
    id: TypeId,
    nullable: bool,
}

impl TypeRef {
    pub(crate) fn new(id: TypeId) -> Self {
        Self {
            id,
            nullable: false,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// The nullable wrapper of this type.
    pub fn nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }

    /// The type itself, without its wrapper.
    pub fn non_nullable(self) -> Self {
        Self {
            nullable: false,
            ..self
        }
    }
}

/// Identity token standing for a logical type that has no model descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(Arc<str>);

impl ObjectKey {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Model(ModelType),
    Object(ObjectKey),
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(model) => write!(f, "{model}"),
            Self::Object(key) => write!(f, "{key}"),
        }
    }
}

impl From<ModelType> for TypeKey {
    fn from(model: ModelType) -> Self {
        Self::Model(model)
    }
}

impl From<ObjectKey> for TypeKey {
    fn from(key: ObjectKey) -> Self {
        Self::Object(key)
    }
}

/// A symbol that must be imported from a library wherever a type is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySymbol {
    pub library: String,
    pub symbol: String,
}

/// A resolved TypeScript type.
pub struct TsType {
    pub(crate) name: String,
    pub(crate) key: Option<TypeKey>,
    pub(crate) file: Option<FileId>,
    pub(crate) default_value: Option<String>,
    pub(crate) has_error: bool,
    pub(crate) type_part: Option<PartId>,
    pub(crate) part_closer: Option<String>,
    pub(crate) implementor: Option<Implementor>,
    pub(crate) imports: Vec<LibrarySymbol>,
    pub(crate) value_writer: Option<ValueWriter>,
}

impl TsType {
    /// A pure signature without a file, such as `number`.
    pub(crate) fn basic(name: &str, default_value: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            key: None,
            file: None,
            default_value: default_value.map(str::to_string),
            has_error: false,
            type_part: None,
            part_closer: None,
            implementor: None,
            imports: Vec::new(),
            value_writer: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key this type was resolved from, `None` for basic types.
    pub fn key(&self) -> Option<&TypeKey> {
        self.key.as_ref()
    }

    pub fn file(&self) -> Option<FileId> {
        self.file
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    /// Primary region of the type in its file, once created.
    pub fn type_part(&self) -> Option<PartId> {
        self.type_part
    }

    pub fn library_imports(&self) -> &[LibrarySymbol] {
        &self.imports
    }

    /// Whether values of this type can be written as literals.
    pub fn writes_values(&self) -> bool {
        self.value_writer.is_some()
    }

    /// Symbol to import: the name without generic arguments.
    pub fn import_symbol(&self) -> &str {
        self.name.split('<').next().unwrap_or(&self.name)
    }
}

impl fmt::Debug for TsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TsType")
            .field("name", &self.name)
            .field("file", &self.file)
            .field("default_value", &self.default_value)
            .field("has_error", &self.has_error)
            .field("type_part", &self.type_part)
            .finish_non_exhaustive()
    }
}
