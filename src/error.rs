//! Error types for qrbatch operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using qrbatch's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for qrbatch operations
#[derive(Error, Debug)]
pub enum Error {
    /// QR code encoding failed
    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),

    /// QR code decoding failed
    #[error("Failed to decode QR code: {0}")]
    QrDecode(String),

    /// No QR code found in image
    #[error("No QR code found in image")]
    NoQrCodeFound,

    /// Request parameters out of range
    #[error("Invalid QR request: {0}")]
    InvalidRequest(String),

    /// A written image decoded to something other than its payload
    #[error("Payload mismatch in {}: expected {expected:?}, decoded {found:?}", path.display())]
    PayloadMismatch {
        /// File that was decoded
        path: PathBuf,
        /// Literal payload the file was generated from
        expected: String,
        /// What the decoder returned
        found: String,
    },

    /// The encode/render/decode stack failed its startup probe
    #[error("QR capability unavailable ({stage}): {reason}. {hint}", hint = CAPABILITY_HINT)]
    CapabilityUnavailable {
        /// Which probe step failed
        stage: &'static str,
        /// Underlying failure
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

const CAPABILITY_HINT: &str = "Rebuild qrbatch with the `qrcode`, `rqrr` and `image` (png feature) \
     dependencies enabled; qrbatch does not install anything at runtime";

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Other(format!("JSON error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_error_tells_operator_what_to_do() {
        let err = Error::CapabilityUnavailable {
            stage: "png",
            reason: "codec missing".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("png"));
        assert!(message.contains("codec missing"));
        assert!(message.contains("Rebuild qrbatch"));
    }

    #[test]
    fn mismatch_names_file_and_payloads() {
        let err = Error::PayloadMismatch {
            path: PathBuf::from("out/qr-test.png"),
            expected: "TEST123".to_string(),
            found: "TEST124".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("out/qr-test.png"));
        assert!(message.contains("\"TEST123\""));
        assert!(message.contains("\"TEST124\""));
    }
}
