use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("the text must contain at least one word")]
    NoWords,

    #[error("unsupported time budget of {secs} seconds (expected one of: {options})")]
    UnsupportedBudget { secs: u32, options: String },
}

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("sample set '{0}' not found")]
    Missing(String),

    #[error("sample set '{0}' is not valid utf-8")]
    NotUtf8(String),

    #[error("unable to parse sample set: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sample set '{0}' has no usable text")]
    Empty(String),
}
