//! Error types for promptreel

use thiserror::Error;

/// Result type alias for promptreel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for promptreel operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Encoding error
    #[error("Encoding error: {0}")]
    Encode(String),

    /// Decoding error
    #[error("Decoding error: {0}")]
    Decode(String),

    /// FFmpeg process error
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// Text-to-speech engine error
    #[error("Speech error: {0}")]
    Speech(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert!(Error::InvalidInput("x".into())
            .to_string()
            .starts_with("Invalid input:"));
        assert!(Error::Ffmpeg("x".into())
            .to_string()
            .starts_with("FFmpeg error:"));
        assert!(Error::Speech("x".into())
            .to_string()
            .starts_with("Speech error:"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
