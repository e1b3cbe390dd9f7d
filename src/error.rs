use std::fmt;

use thiserror::Error;

use crate::codec::Format;

/// Raw input could not be turned into the value type a parameter declares.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    #[error("{0:?} is not numeric")]
    NotNumeric(String),
    #[error("{0:?} is not a boolean")]
    NotBoolean(String),
    #[error("{0} is not a finite number")]
    NotFinite(f64),
    #[error("{value:?} is not one of {}", .expected.join(", "))]
    InvalidEnum {
        value: String,
        expected: &'static [&'static str],
    },
    #[error("expected {expected}, found {found}")]
    Unsupported {
        expected: &'static str,
        found: &'static str,
    },
}

/// Failure of a single parameter setter or codec hook.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("{param}: {source}")]
    Coercion {
        param: &'static str,
        #[source]
        source: CoercionError,
    },
    #[error("{param} is required")]
    Required { param: &'static str },
    #[error("scaling_factor is required{}", cause_suffix(.source))]
    ScalingFactorRequired { source: Option<CoercionError> },
}

fn cause_suffix(source: &Option<CoercionError>) -> String {
    match source {
        Some(e) => format!(" ({})", e),
        None => String::new(),
    }
}

impl ParamError {
    pub fn coercion(param: &'static str, source: CoercionError) -> Self {
        Self::Coercion { param, source }
    }
    /// The wire key of the offending parameter.
    pub fn param(&self) -> &'static str {
        match self {
            Self::Coercion { param, .. } | Self::Required { param } => param,
            Self::ScalingFactorRequired { .. } => "scaling_factor",
        }
    }
}

/// One entry of a [`BuildErrors`] aggregate.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}: {error}")]
pub struct BuildIssue {
    pub kind: &'static str,
    pub error: ParamError,
}

impl BuildIssue {
    pub fn param(&self) -> &'static str {
        self.error.param()
    }
}

/// Every setter failure collected while building one envelope.
///
/// Always allocated; an empty aggregate means the build succeeded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildErrors {
    issues: Vec<BuildIssue>,
}

impl BuildErrors {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn push(&mut self, kind: &'static str, error: ParamError) {
        self.issues.push(BuildIssue { kind, error });
    }
    /// Records the error half of a setter result, if any.
    pub fn collect(&mut self, kind: &'static str, result: std::result::Result<(), ParamError>) {
        if let Err(error) = result {
            self.push(kind, error);
        }
    }
    pub fn has_errors(&self) -> bool {
        !self.issues.is_empty()
    }
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
    pub fn len(&self) -> usize {
        self.issues.len()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, BuildIssue> {
        self.issues.iter()
    }
    pub fn into_result<T>(self, value: T) -> std::result::Result<T, BuildErrors> {
        if self.issues.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for BuildErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for issue in &self.issues {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}", issue)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for BuildErrors {}

impl IntoIterator for BuildErrors {
    type Item = BuildIssue;
    type IntoIter = std::vec::IntoIter<BuildIssue>;
    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

#[derive(Error, Debug)]
pub enum SearchdocError {
    #[error("Invalid {kind} `{name}`: {errors}")]
    Build {
        name: String,
        kind: &'static str,
        errors: BuildErrors,
    },
    #[error("Field `{name}` already exists ({kind})")]
    FieldExists { name: String, kind: &'static str },
    #[error("A name is required ({kind})")]
    NameRequired { kind: &'static str },
    #[error("Unknown kind {tag:?} for `{name}`")]
    UnknownKind { name: String, tag: String },
    #[error("No kind given for `{name}`")]
    MissingKind { name: String },
    #[error("Entry `{name}` is a {found}, expected an object")]
    NotAnObject { name: String, found: &'static str },
    #[error("Kind mismatch for `{name}`: schema says {expected}, document says {found}")]
    KindMismatch {
        name: String,
        expected: String,
        found: String,
    },
    #[error("Unknown parameter {key:?} on {kind} `{name}`")]
    UnknownParam {
        name: String,
        kind: &'static str,
        key: String,
    },
    #[error("Invalid {kind} `{name}`: {source}")]
    Param {
        name: String,
        kind: &'static str,
        #[source]
        source: ParamError,
    },
    #[error("Decode error ({format}): {message}")]
    Decode { format: Format, message: String },
    #[error("Encode error ({format}): {message}")]
    Encode { format: Format, message: String },
    #[error("{kind} does not support {operation} yet")]
    Unimplemented {
        kind: &'static str,
        operation: &'static str,
    },
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SearchdocError>;

// Helper conversions
impl From<serde_json::Error> for SearchdocError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode { format: Format::Json, message: e.to_string() }
    }
}
impl From<serde_cbor::Error> for SearchdocError {
    fn from(e: serde_cbor::Error) -> Self {
        Self::Decode { format: Format::Binary, message: e.to_string() }
    }
}
impl From<config::ConfigError> for SearchdocError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
