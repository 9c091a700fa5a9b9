//! Media pipeline errors

use canvas_common::AppError;

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The upload is not an image the decoder understands
    #[error("Unreadable image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode watermarked image: {0}")]
    Encode(#[source] image::ImageError),

    /// Bytes that do not start with a known, decodable image signature
    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Decode(_) | MediaError::Encode(_) => {
                AppError::Processing("Failed to apply watermark to the image.".to_string())
            }
            MediaError::UnsupportedFormat => {
                AppError::Validation("Please upload a PNG, JPEG, GIF, WebP or BMP image.".to_string())
            }
            MediaError::Io(e) => AppError::Storage(e.to_string()),
            MediaError::Task(e) => AppError::internal(e),
        }
    }
}
