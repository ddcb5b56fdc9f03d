//! Error types for tag resolution and coercion

use crate::describe::FieldDescriptor;
use crate::value::Value;

/// Boxed error produced by a parser function.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure reported by a parser function.
///
/// Besides the underlying cause, a parser may hand back the zero or partially
/// parsed value it was working with. That value travels with the error all the
/// way to the caller of [`PatchPanel::coerce`](crate::PatchPanel::coerce) and
/// [`PatchPanel::get_field_tag`](crate::PatchPanel::get_field_tag).
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct ParseError {
    partial: Option<Value>,
    source: BoxError,
}

impl ParseError {
    /// Wrap a parser's own error.
    pub fn new(source: impl Into<BoxError>) -> Self {
        Self {
            partial: None,
            source: source.into(),
        }
    }

    /// Attach the value the parser produced before failing.
    pub fn with_partial<T: std::any::Any + Send + Sync>(mut self, value: T) -> Self {
        self.partial = Some(Value::new(value));
        self
    }

    /// The zero or partial value, if the parser supplied one.
    pub fn partial(&self) -> Option<&Value> {
        self.partial.as_ref()
    }

    /// The parser's original error.
    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }

    /// Split into the partial value and the original error.
    pub fn into_parts(self) -> (Option<Value>, BoxError) {
        (self.partial, self.source)
    }
}

/// Errors that can occur while resolving a field tag and coercing its value.
///
/// The first three variants let a caller tell setup gaps and absent data
/// apart from malformed input:
/// - [`NoField`](Self::NoField): the struct has no field of that name
/// - [`NoValue`](Self::NoValue): the field has no default configured
/// - [`UnhandledType`](Self::UnhandledType): nothing is registered for the
///   field's declared type
///
/// Everything a parser itself rejects arrives as [`Parse`](Self::Parse).
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// Requested field name is absent from the struct description.
    #[error("no such field name: {field}")]
    NoField {
        /// Name that was looked up
        field: String,
    },

    /// The resolved `default` tag is absent or empty.
    #[error("no value for field: {field}")]
    NoValue {
        /// Name of the field without a value
        field: String,
    },

    /// No parser function is registered for the requested type.
    #[error("unknown type for parser: {type_name}")]
    UnhandledType {
        /// Name of the type that has no parser
        type_name: &'static str,
    },

    /// No struct description was supplied.
    #[error("nil type provided")]
    NilType,

    /// The type description is not struct-shaped.
    #[error("expected struct type, got {kind}")]
    NotStruct {
        /// Name of the type that was supplied instead
        kind: &'static str,
    },

    /// A parser produced a value of a different type than the caller asked for.
    #[error("expected value of type {expected}, parser produced {found}")]
    ValueType {
        /// Type requested by the caller
        expected: &'static str,
        /// Type the parser actually returned
        found: &'static str,
    },

    /// The registered parser rejected the raw string.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl PanelError {
    /// Create a missing field error
    pub fn no_field(field: impl Into<String>) -> Self {
        Self::NoField {
            field: field.into(),
        }
    }

    /// Create a missing value error
    pub fn no_value(field: impl Into<String>) -> Self {
        Self::NoValue {
            field: field.into(),
        }
    }

    /// The partial value a failing parser handed back, if any.
    pub fn partial_value(&self) -> Option<&Value> {
        match self {
            Self::Parse(err) => err.partial(),
            _ => None,
        }
    }
}

/// Failure of [`PatchPanel::get_field_tag`](crate::PatchPanel::get_field_tag).
///
/// Whenever the field itself was found, its descriptor is kept alongside the
/// error so callers can report which field and tag blob were involved.
#[derive(Debug)]
pub struct FieldTagError {
    field: Option<FieldDescriptor>,
    error: PanelError,
}

impl FieldTagError {
    pub(crate) fn unresolved(error: PanelError) -> Self {
        Self { field: None, error }
    }

    pub(crate) fn for_field(field: &FieldDescriptor, error: PanelError) -> Self {
        Self {
            field: Some(field.clone()),
            error,
        }
    }

    /// Descriptor of the field, present whenever the field was resolved.
    pub fn field(&self) -> Option<&FieldDescriptor> {
        self.field.as_ref()
    }

    /// The underlying error.
    pub fn error(&self) -> &PanelError {
        &self.error
    }

    /// The partial value a failing parser handed back, if any.
    pub fn partial_value(&self) -> Option<&Value> {
        self.error.partial_value()
    }

    /// Discard the descriptor and keep the error.
    pub fn into_error(self) -> PanelError {
        self.error
    }
}

impl std::fmt::Display for FieldTagError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for FieldTagError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.error)
    }
}

impl From<FieldTagError> for PanelError {
    fn from(err: FieldTagError) -> Self {
        err.error
    }
}
