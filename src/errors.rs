use thiserror::Error;

/// Errors that can occur while building trees, extracting functions or running the pipeline.
#[derive(Error, Debug)]
pub enum MinerError {
    #[error("file error: {message} (path: {path})")]
    File { message: String, path: String },

    #[error("parse error: {message} (path: {path})")]
    Parse { message: String, path: String },

    #[error("malformed tree: {message} (label: {label})")]
    MalformedTree { message: String, label: String },

    #[error("node '{label}' is not a leaf and has no token")]
    NotALeaf { label: String },

    #[error("required node '{expected}' not found under '{parent}'")]
    MissingNode { expected: String, parent: String },

    #[error("parameter name was not found (parameter node: {label})")]
    MissingParameterName { label: String },

    #[error("type token missing: {message}")]
    MissingTypeToken { message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("storage error: {message} (path: {path})")]
    Storage { message: String, path: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `MinerError`.
pub type Result<T> = std::result::Result<T, MinerError>;
