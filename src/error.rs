use thiserror::Error;

/// Everything that can go wrong between opening the dataset and showing a picture.
///
/// None of these ever reach the user as an error dialog: the dataset loader
/// logs them and the image resolver turns them into a placeholder.
#[derive(Error, Debug)]
pub enum Error {
    #[error("dataset error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("dataset not found: {0}")]
    DatasetMissing(String),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
