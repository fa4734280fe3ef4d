//! Error types for deck construction and serialization.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or writing a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read an asset or write the output file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Image bytes are not in a format a slide can embed.
    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML writing or reading error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),

    /// A package is missing a part or relationship we rely on.
    #[error("Invalid package: {0}")]
    InvalidPackage(String),
}
