use miette::Diagnostic;
use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Hard failures of the emission engine.
///
/// These are caller mistakes or placement/resolution cycles. Data conditions
/// such as a generator failing to write a body are reported through
/// [`Diagnostics`](crate::Diagnostics) instead.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("invalid name '{name}': {reason}")]
    #[diagnostic(code(tsweave::invalid_name))]
    InvalidName { name: String, reason: String },

    #[error("the root folder cannot contain a '{name}' file")]
    #[diagnostic(
        code(tsweave::root_index),
        help("enable the barrel on the root folder to get a generated index.ts")
    )]
    RootIndexFile { name: String },

    #[error("type '{name}' is inline-only and has no dedicated file")]
    #[diagnostic(
        code(tsweave::inline_only),
        help("arrays, nullables, collections and tuples must be destructured before resolution")
    )]
    InlineOnlyType { name: String },

    #[error("same file/folder placement cycle detected: {chain}")]
    #[diagnostic(code(tsweave::placement_cycle))]
    SameLocationCycle { chain: String },

    #[error("reentrant resolution of '{name}': {chain}")]
    #[diagnostic(
        code(tsweave::resolution_cycle),
        help("use a default value provider to compute values that depend on the type itself")
    )]
    ReentrantResolution { name: String, chain: String },

    #[error("no generator resolved the object key '{key}'")]
    #[diagnostic(code(tsweave::unresolved_object))]
    UnresolvedObjectKey { key: String },

    #[error("type key '{key}' is already registered")]
    #[diagnostic(code(tsweave::duplicate_key))]
    DuplicateTypeKey { key: String },

    #[error("type '{name}' has no file")]
    #[diagnostic(code(tsweave::no_file))]
    TypeWithoutFile { name: String },

    #[error("invalid library '{name}': {reason}")]
    #[diagnostic(code(tsweave::invalid_library))]
    InvalidLibrary { name: String, reason: String },

    #[error("no version available for library '{name}'")]
    #[diagnostic(
        code(tsweave::missing_version),
        help("set a version under [library_versions] in the generator configuration")
    )]
    MissingLibraryVersion { name: String },

    #[error("library '{name}' is not registered")]
    #[diagnostic(code(tsweave::unknown_library))]
    UnknownLibrary { name: String },

    #[error("code generation has already run on this context")]
    #[diagnostic(code(tsweave::already_run))]
    GenerationAlreadyRun,

    #[error("cannot register '{name}': code generation is over")]
    #[diagnostic(code(tsweave::registry_closed))]
    RegistryClosed { name: String },
}

impl Error {
    pub(crate) fn invalid_name(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
