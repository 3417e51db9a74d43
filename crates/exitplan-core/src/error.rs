use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("unknown option {value:?} for {field}, expected one of: {expected}")]
    UnknownOption {
        field: &'static str,
        value: String,
        expected: String,
    },

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("step {0} is out of range")]
    StepOutOfRange(u8),

    #[error("no analysis result available")]
    MissingAnalysis,

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
