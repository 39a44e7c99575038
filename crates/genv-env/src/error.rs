use miette::Diagnostic;
use thiserror::Error;

/// Contract violations detected by a generic environment.
///
/// None of these is a user error: each one means an earlier compiler stage
/// handed the environment inconsistent input. Only the `try_*` entry points
/// return them; everything else aborts through [`abort`].
#[derive(Debug, Error, Diagnostic, Clone, Hash, PartialEq, Eq)]
pub enum EnvironmentError {
    /// A supplied list does not have the length the signature dictates.
    #[error("Shape mismatch: expected {expected} {what}, found {found}")]
    #[diagnostic(code(genv_env::shape_mismatch))]
    ShapeMismatch {
        /// What was counted.
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// The parameter-to-contextual-type mapping was empty.
    #[error("Empty mapping: a generic environment needs at least one parameter")]
    #[diagnostic(code(genv_env::empty_mapping))]
    EmptyMapping,

    /// Two mapping keys canonicalize to the same parameter.
    #[error("Duplicate key: generic parameter `{param}` is mapped more than once")]
    #[diagnostic(code(genv_env::duplicate_key))]
    DuplicateKey { param: String },

    /// Archetypes survived mapping a type out of context.
    #[error("Foreign type: `{ty}` still contains archetypes after mapping out of context")]
    #[diagnostic(
        code(genv_env::foreign_type),
        help("the type mentions archetypes of a different generic environment")
    )]
    ForeignType { ty: String },

    /// Type parameters survived mapping a type into context.
    #[error("Unresolved type parameter: `{ty}` still contains type parameters after mapping into context")]
    #[diagnostic(
        code(genv_env::unresolved_type_parameter),
        help("the type mentions parameters of a different generic signature")
    )]
    UnresolvedTypeParameter { ty: String },

    /// A parameter that is not one of this environment's own.
    #[error("Foreign parameter: `{param}` is not a parameter of this environment's signature")]
    #[diagnostic(code(genv_env::foreign_parameter))]
    ForeignParameter { param: String },

    /// The declared parameter list has no parameter matching the query.
    #[error("Missing parameter: no declared generic parameter matches `{param}`")]
    #[diagnostic(code(genv_env::missing_parameter))]
    MissingParameter { param: String },

    /// A dependent type mapped into context to something other than an archetype.
    #[error("Not contextual: dependent type `{ty}` does not map to an archetype")]
    #[diagnostic(code(genv_env::not_contextual))]
    NotContextual { ty: String },

    /// Malformed environment configuration.
    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(genv_env::config))]
    Config { message: String },
}

/// Result type for fallible environment operations.
pub type EnvResult<T> = Result<T, EnvironmentError>;

/// Aborts the current compilation on a broken invariant.
///
/// The error is logged before panicking so it is not lost when the panic
/// is caught further up.
#[track_caller]
pub fn abort(err: EnvironmentError) -> ! {
    log::error!("generic environment invariant violated: {}", err);
    panic!("{}", err)
}
