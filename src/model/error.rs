use crate::model::ModelPath;
use thiserror::Error;

/// Failures of model realization. All variants are fatal to the current
/// configuration pass and are never retried.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model element not available: {path}")]
    ElementNotAvailable { path: ModelPath },

    #[error("model element already exists: {path}")]
    DuplicateElement { path: ModelPath },

    #[error("model element {path} is not a {expected}")]
    TypeMismatch {
        path: ModelPath,
        expected: &'static str,
    },

    #[error("component {component} references unknown target platform: {platform}")]
    UnknownPlatform { component: String, platform: String },

    #[error("no default implementation registered for element type: {element_type}")]
    NoDefaultImplementation { element_type: String },

    #[error("rule dependency cycle involving: {rules:?}")]
    RuleCycle { rules: Vec<String> },

    #[error("model has already been realized for this configuration pass")]
    AlreadyRealized,
}

pub type Result<T> = std::result::Result<T, ModelError>;
