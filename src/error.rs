use inspection_common::FormError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InspectionError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported image: {0}")]
    ImageLoad(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Schedule feed error: {0}")]
    Feed(#[from] crate::feed::FeedError),

    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Common(#[from] inspection_common::Error),
}

pub type Result<T> = std::result::Result<T, InspectionError>;
