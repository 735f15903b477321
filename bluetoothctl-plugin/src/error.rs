use thiserror::Error;

/// Programming or configuration errors detected while routing a request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("action `{0}` already registered")]
    DuplicateAction(String),

    #[error("unrecognised action `{0}`")]
    UnknownAction(String),

    #[error("missing required parameter `{0}`")]
    MissingParam(&'static str),

    #[error("invalid value {value:?} for parameter `{name}`")]
    InvalidParam { name: &'static str, value: String },
}
