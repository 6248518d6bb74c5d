use thiserror::Error;

use crate::types::{AttributeId, NodeTypeId};

#[derive(Error, Debug)]
pub enum StretchError {
    #[error("stretch distance must be positive, got {0}")]
    InvalidDivisor(f64),
    #[error("negative stretch {stretch} raised to fractional exponent {exponent}")]
    DomainError { stretch: f64, exponent: f64 },
    #[error("attribute {0:?} is not finite")]
    NonFiniteInput(AttributeId),
    #[error("zero stretch raised to positive exponent {0} (root and end coincide)")]
    SingularVolume(f64),
    #[error("attribute {attribute:?} expected {expected}")]
    TypeMismatch {
        attribute: AttributeId,
        expected: &'static str,
    },
    #[error("attribute {0:?} is not writable")]
    ReadOnlyAttribute(AttributeId),
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),
    #[error("cannot compute plug {0:?}")]
    UnknownPlug(AttributeId),
    #[error("node already registered: {name} ({id:?})")]
    AlreadyRegistered { name: String, id: NodeTypeId },
    #[error("node not registered: {0}")]
    NotRegistered(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StretchError>;
