use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiaryError {
    #[error("Geolocation is not available")]
    GeolocationUnavailable,

    #[error("Failed to acquire location: {0}")]
    GeolocationFailed(String),

    #[error("Image could not be processed: {0}")]
    ImageDecodeFailed(String),

    #[error("Failed to read stored state: {0}")]
    StorageReadFailed(String),

    #[error("Failed to write stored state: {0}")]
    StorageWriteFailed(String),

    #[error("Invalid import: {0}")]
    ImportValidationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, DiaryError>;
