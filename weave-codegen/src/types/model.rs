//! Descriptors of the input model types.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use tsweave_core::{safe_file_stem, strip_generic_arity};

/// Built-in scalar types of the input model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Number,
    BigInt,
    String,
    DateTime,
    Guid,
}

impl Primitive {
    fn model_name(&self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Number => "Double",
            Self::BigInt => "BigInteger",
            Self::String => "String",
            Self::DateTime => "DateTime",
            Self::Guid => "Guid",
        }
    }
}

/// Underlying integer type of an enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumRepr {
    I8,
    U8,
    I16,
    U16,
    #[default]
    I32,
    U32,
    I64,
    U64,
}

impl EnumRepr {
    pub fn bits(&self) -> u32 {
        match self {
            Self::I8 | Self::U8 => 8,
            Self::I16 | Self::U16 => 16,
            Self::I32 | Self::U32 => 32,
            Self::I64 | Self::U64 => 64,
        }
    }

    /// Binary value of `value` read as an unsigned integer of this width.
    ///
    /// `-1` on an `I32` enum is `0xFFFF_FFFF`.
    pub fn unsigned_value(&self, value: i64) -> u64 {
        let bits = self.bits();
        if bits == 64 {
            value as u64
        } else {
            (value as u64) & ((1u64 << bits) - 1)
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Source text of a member value. Unsigned enums store values above
    /// `i64::MAX` as negative numbers, they are written back unsigned.
    pub fn literal(&self, value: i64) -> String {
        if self.is_signed() {
            value.to_string()
        } else {
            self.unsigned_value(value).to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
    pub doc: Option<String>,
}

impl EnumMember {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
            doc: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumInfo {
    pub repr: EnumRepr,
    pub members: Vec<EnumMember>,
}

impl EnumInfo {
    pub fn new(repr: EnumRepr, members: impl IntoIterator<Item = EnumMember>) -> Self {
        Self {
            repr,
            members: members.into_iter().collect(),
        }
    }
}

/// Shape of a model type.
#[derive(Debug, Clone)]
pub enum ModelKind {
    Primitive(Primitive),
    Enum(EnumInfo),
    Class,
    Interface,
    Record,
    Array(ModelType),
    Nullable(ModelType),
    List(ModelType),
    Set(ModelType),
    Map(ModelType, ModelType),
    Tuple(Vec<ModelType>),
    Object,
    Void,
}

#[derive(Debug, Clone)]
pub struct ModelTypeInfo {
    pub namespace: String,
    pub name: String,
    pub external_name: Option<String>,
    pub kind: ModelKind,
    pub generic_args: Vec<ModelType>,
    pub doc: Option<String>,
    full_name: String,
}

/// A type of the input model, used as a registry key.
///
/// Cheap to clone. Two descriptors are equal when their full names are.
#[derive(Clone)]
pub struct ModelType(Arc<ModelTypeInfo>);

impl ModelType {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, kind: ModelKind) -> Self {
        Self::from_info(ModelTypeInfo {
            namespace: namespace.into(),
            name: name.into(),
            external_name: None,
            kind,
            generic_args: Vec::new(),
            doc: None,
            full_name: String::new(),
        })
    }

    fn from_info(mut info: ModelTypeInfo) -> Self {
        let mut full_name = if info.namespace.is_empty() {
            info.name.clone()
        } else {
            format!("{}.{}", info.namespace, info.name)
        };
        if !info.generic_args.is_empty() {
            let args: Vec<&str> = info.generic_args.iter().map(|a| a.full_name()).collect();
            full_name.push_str(&format!("[{}]", args.join(",")));
        }
        info.full_name = full_name;
        Self(Arc::new(info))
    }

    fn rebuild(&self, edit: impl FnOnce(&mut ModelTypeInfo)) -> Self {
        let mut info = (*self.0).clone();
        edit(&mut info);
        Self::from_info(info)
    }

    pub fn class(namespace: &str, name: &str) -> Self {
        Self::new(namespace, name, ModelKind::Class)
    }

    pub fn interface(namespace: &str, name: &str) -> Self {
        Self::new(namespace, name, ModelKind::Interface)
    }

    pub fn record(namespace: &str, name: &str) -> Self {
        Self::new(namespace, name, ModelKind::Record)
    }

    pub fn enumeration(namespace: &str, name: &str, info: EnumInfo) -> Self {
        Self::new(namespace, name, ModelKind::Enum(info))
    }

    pub fn primitive(primitive: Primitive) -> Self {
        Self::new("System", primitive.model_name(), ModelKind::Primitive(primitive))
    }

    pub fn array(element: ModelType) -> Self {
        let name = format!("{}[]", element.full_name());
        Self::new("", name, ModelKind::Array(element))
    }

    pub fn nullable(inner: ModelType) -> Self {
        let name = format!("{}?", inner.full_name());
        Self::new("", name, ModelKind::Nullable(inner))
    }

    pub fn list(element: ModelType) -> Self {
        Self::new("", "List`1", ModelKind::List(element.clone())).with_generic_args([element])
    }

    pub fn set(element: ModelType) -> Self {
        Self::new("", "Set`1", ModelKind::Set(element.clone())).with_generic_args([element])
    }

    pub fn map(key: ModelType, value: ModelType) -> Self {
        Self::new("", "Map`2", ModelKind::Map(key.clone(), value.clone()))
            .with_generic_args([key, value])
    }

    pub fn tuple(items: impl IntoIterator<Item = ModelType>) -> Self {
        let items: Vec<ModelType> = items.into_iter().collect();
        let name = format!("Tuple`{}", items.len());
        Self::new("", name, ModelKind::Tuple(items.clone())).with_generic_args(items)
    }

    pub fn object() -> Self {
        Self::new("System", "Object", ModelKind::Object)
    }

    pub fn void() -> Self {
        Self::new("System", "Void", ModelKind::Void)
    }

    /// Name to use instead of the model name in generated code.
    pub fn with_external_name(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.rebuild(|info| info.external_name = Some(name))
    }

    pub fn with_generic_args(&self, args: impl IntoIterator<Item = ModelType>) -> Self {
        let args: Vec<ModelType> = args.into_iter().collect();
        self.rebuild(|info| info.generic_args = args)
    }

    pub fn with_doc(&self, doc: impl Into<String>) -> Self {
        let doc = doc.into();
        self.rebuild(|info| info.doc = Some(doc))
    }

    pub fn info(&self) -> &ModelTypeInfo {
        &self.0
    }

    pub fn kind(&self) -> &ModelKind {
        &self.0.kind
    }

    pub fn namespace(&self) -> &str {
        &self.0.namespace
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Unique name, including namespace and generic arguments.
    pub fn full_name(&self) -> &str {
        &self.0.full_name
    }

    pub fn doc(&self) -> Option<&str> {
        self.0.doc.as_deref()
    }

    /// Inline-only types are spelled out where they are used and never get a file.
    pub fn is_inline_only(&self) -> bool {
        matches!(
            self.0.kind,
            ModelKind::Array(_)
                | ModelKind::Nullable(_)
                | ModelKind::List(_)
                | ModelKind::Set(_)
                | ModelKind::Map(..)
                | ModelKind::Tuple(_)
                | ModelKind::Object
                | ModelKind::Void
        )
    }

    /// Proposed TypeScript name: the external name, or the model name
    /// without generic arity followed by its generic arguments.
    pub fn default_type_name(&self) -> String {
        if let Some(external) = &self.0.external_name {
            return external.clone();
        }
        let mut name = strip_generic_arity(&self.0.name).to_string();
        if !self.0.generic_args.is_empty() {
            let args: Vec<String> = self
                .0
                .generic_args
                .iter()
                .map(ModelType::default_type_name)
                .collect();
            name.push('<');
            name.push_str(&args.join(","));
            name.push('>');
        }
        name
    }

    /// Folder derived from the namespace: `Sample.Models` lands in `Sample/Models`.
    pub fn default_folder(&self) -> String {
        self.0.namespace.replace('.', "/")
    }

    /// File name derived from a TypeScript type name.
    pub fn default_file_name(type_name: &str) -> String {
        format!("{}.ts", safe_file_stem(type_name))
    }
}

impl PartialEq for ModelType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.full_name() == other.full_name()
    }
}

impl Eq for ModelType {}

impl Hash for ModelType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full_name().hash(state);
    }
}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelType({})", self.full_name())
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_by_full_name() {
        let a = ModelType::class("Sample.Models", "User");
        let b = ModelType::class("Sample.Models", "User");
        let c = ModelType::class("Sample", "User");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.full_name(), "Sample.Models.User");
    }

    #[test]
    fn test_default_names() {
        let user = ModelType::class("Sample.Models", "User");
        let result = ModelType::class("Sample", "Result`1").with_generic_args([user.clone()]);

        assert_eq!(user.default_type_name(), "User");
        assert_eq!(user.default_folder(), "Sample/Models");
        assert_eq!(result.default_type_name(), "Result<User>");
        assert_eq!(
            ModelType::default_file_name(&result.default_type_name()),
            "Result{User}.ts"
        );
        assert_eq!(
            user.with_external_name("Person").default_type_name(),
            "Person"
        );
    }

    #[test]
    fn test_generic_args_are_part_of_identity() {
        let user = ModelType::class("S", "User");
        let role = ModelType::class("S", "Role");
        let a = ModelType::class("S", "Result`1").with_generic_args([user]);
        let b = ModelType::class("S", "Result`1").with_generic_args([role]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_inline_only() {
        let user = ModelType::class("S", "User");
        assert!(!user.is_inline_only());
        assert!(ModelType::array(user.clone()).is_inline_only());
        assert!(ModelType::nullable(user.clone()).is_inline_only());
        assert!(ModelType::map(ModelType::primitive(Primitive::String), user.clone()).is_inline_only());
        assert!(ModelType::tuple([user.clone(), user]).is_inline_only());
        assert!(ModelType::void().is_inline_only());
        assert!(!ModelType::primitive(Primitive::Guid).is_inline_only());
    }

    #[test]
    fn test_unsigned_value() {
        assert_eq!(EnumRepr::I32.unsigned_value(-1), 0xFFFF_FFFF);
        assert_eq!(EnumRepr::I8.unsigned_value(-2), 0xFE);
        assert_eq!(EnumRepr::I64.unsigned_value(-1), u64::MAX);
        assert_eq!(EnumRepr::U16.unsigned_value(78), 78);
    }

    #[test]
    fn test_literal() {
        assert_eq!(EnumRepr::I32.literal(-2), "-2");
        assert_eq!(EnumRepr::I64.literal(i64::MIN), "-9223372036854775808");
        assert_eq!(EnumRepr::U64.literal(-1), "18446744073709551615");
        assert_eq!(EnumRepr::U64.literal(i64::MIN), "9223372036854775808");
        assert_eq!(EnumRepr::U8.literal(200), "200");
    }
}
