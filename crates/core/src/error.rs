use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Access denied: user '{user_id}' is not on the allow-list")]
    AccessDenied { user_id: String },

    #[error("Corpus file missing: {path}")]
    MissingCorpus { path: PathBuf },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
