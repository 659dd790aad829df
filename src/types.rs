// Error taxonomy shared by the client, intake and the UI

/// Every failure the dashboard can surface.
///
/// The `Display` text is exactly what the user sees in the results area,
/// so variants carry the already-formatted detail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    /// Upload submitted with nothing selected
    #[error("Please select or drop a CSV file to upload.")]
    NoFileSelected,

    /// Network failure or a response body that could not be decoded
    #[error("An error occurred: {0}")]
    Transport(String),

    /// Server reported a logical error (2xx with `error`, or non-2xx)
    #[error("Error: {0}")]
    Server(String),

    /// Sample data asset could not be retrieved
    #[error("An error occurred: {0}")]
    SampleUnavailable(String),

    /// Local file could not be read
    #[error("An error occurred: {0}")]
    Io(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
