//! QR code requests, encoding and decoding
//!
//! Encoding and module placement are delegated to the `qrcode` crate, decoding
//! to `rqrr`. This module owns the request model, the pixel layout of the
//! rendered raster, and the helpers used to probe error-correction tolerance.

pub mod damage;
mod decoder;
mod encoder;

pub use decoder::QrDecoder;
pub use encoder::QrEncoder;

use crate::error::{Error, Result};
use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest standard QR version
pub const MAX_VERSION: u8 = 40;

/// Pixels per module used by quick requests
pub const DEFAULT_BOX_SIZE: u32 = 10;

/// Quiet-zone width in modules used by quick requests
pub const DEFAULT_BORDER: u32 = 4;

/// Largest image side, in pixels, a request may produce
pub const MAX_SIDE_PIXELS: u32 = 16_384;

/// Modules per side of a version 40 symbol
const MAX_MODULES: u32 = 177;

/// A decoded QR code payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    /// The raw decoded data
    pub data: Vec<u8>,
    /// String representation if valid UTF-8
    pub text: Option<String>,
}

impl QrPayload {
    /// Create a new QR payload from raw bytes
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let text = String::from_utf8(data.clone()).ok();
        Self { data, text }
    }

    /// Create a new QR payload from a string
    pub fn from_string(s: String) -> Self {
        Self {
            data: s.as_bytes().to_vec(),
            text: Some(s),
        }
    }

    /// Get the payload as a string, if valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Error-correction level of a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorrectionLevel {
    /// Recovers roughly 7% of codewords
    L,
    /// Recovers roughly 15% of codewords
    M,
    /// Recovers roughly 25% of codewords
    Q,
    /// Recovers roughly 30% of codewords
    H,
}

impl From<CorrectionLevel> for qrcode::EcLevel {
    fn from(level: CorrectionLevel) -> Self {
        match level {
            CorrectionLevel::L => qrcode::EcLevel::L,
            CorrectionLevel::M => qrcode::EcLevel::M,
            CorrectionLevel::Q => qrcode::EcLevel::Q,
            CorrectionLevel::H => qrcode::EcLevel::H,
        }
    }
}

impl fmt::Display for CorrectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        };
        f.write_str(label)
    }
}

impl FromStr for CorrectionLevel {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "L" | "LOW" => Ok(Self::L),
            "M" | "MEDIUM" => Ok(Self::M),
            "Q" | "QUARTILE" => Ok(Self::Q),
            "H" | "HIGH" => Ok(Self::H),
            _ => Err(format!(
                "Unknown error-correction level '{value}', expected L, M, Q or H"
            )),
        }
    }
}

/// Size class selection for a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeVersion {
    /// Smallest version that holds the payload
    Auto,
    /// Start at the given version and grow until the payload fits
    AtLeast(u8),
}

impl SizeVersion {
    /// Version the fitting search starts from
    pub fn minimum(self) -> u8 {
        match self {
            Self::Auto => 1,
            Self::AtLeast(version) => version,
        }
    }
}

/// Parameters for one encode-and-render call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RequestFields")]
pub struct QrRequest {
    payload: String,
    version: SizeVersion,
    correction: CorrectionLevel,
    box_size: u32,
    border: u32,
}

impl QrRequest {
    /// Build a validated request.
    pub fn new(
        payload: impl Into<String>,
        version: SizeVersion,
        correction: CorrectionLevel,
        box_size: u32,
        border: u32,
    ) -> Result<Self> {
        if let SizeVersion::AtLeast(v) = version {
            if !(1..=MAX_VERSION).contains(&v) {
                return Err(Error::InvalidRequest(format!(
                    "version {v} outside 1..={MAX_VERSION}"
                )));
            }
        }
        if box_size == 0 {
            return Err(Error::InvalidRequest(
                "box size must be at least one pixel".to_string(),
            ));
        }
        // Bound against the largest symbol so rendering arithmetic cannot overflow.
        let side = border
            .checked_mul(2)
            .and_then(|quiet| quiet.checked_add(MAX_MODULES))
            .and_then(|modules| modules.checked_mul(box_size))
            .filter(|side| *side <= MAX_SIDE_PIXELS);
        if side.is_none() {
            return Err(Error::InvalidRequest(format!(
                "box size {box_size} with border {border} exceeds {MAX_SIDE_PIXELS}px per side"
            )));
        }

        Ok(Self {
            payload: payload.into(),
            version,
            correction,
            box_size,
            border,
        })
    }

    /// Request with default settings: auto version, level M, 10px modules, 4-module border.
    pub fn quick(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            version: SizeVersion::Auto,
            correction: CorrectionLevel::M,
            box_size: DEFAULT_BOX_SIZE,
            border: DEFAULT_BORDER,
        }
    }

    /// Text to encode
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Requested size class
    pub fn version(&self) -> SizeVersion {
        self.version
    }

    /// Requested error-correction level
    pub fn correction(&self) -> CorrectionLevel {
        self.correction
    }

    /// Pixels per module
    pub fn box_size(&self) -> u32 {
        self.box_size
    }

    /// Quiet-zone width in modules
    pub fn border(&self) -> u32 {
        self.border
    }
}

#[derive(Deserialize)]
struct RequestFields {
    payload: String,
    version: SizeVersion,
    correction: CorrectionLevel,
    box_size: u32,
    border: u32,
}

impl TryFrom<RequestFields> for QrRequest {
    type Error = Error;

    fn try_from(fields: RequestFields) -> Result<Self> {
        Self::new(
            fields.payload,
            fields.version,
            fields.correction,
            fields.box_size,
            fields.border,
        )
    }
}

/// A rendered symbol together with the geometry it was drawn with
#[derive(Debug, Clone)]
pub struct RenderedQr {
    /// Grayscale raster, dark modules 0 and light modules 255
    pub image: GrayImage,
    /// Version the encoder settled on
    pub version: u8,
    /// Modules per side of the symbol, excluding the quiet zone
    pub modules: u32,
    /// Pixels per module
    pub box_size: u32,
    /// Quiet-zone width in modules
    pub border: u32,
    /// Error-correction level of the symbol
    pub correction: CorrectionLevel,
}

impl RenderedQr {
    /// Side length of the image in pixels
    pub fn side_pixels(&self) -> u32 {
        (self.modules + 2 * self.border) * self.box_size
    }

    /// Pixel offset of the symbol's top-left module
    pub fn symbol_origin(&self) -> u32 {
        self.border * self.box_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_payload_from_string() {
        let payload = QrPayload::from_string("F1-Jacket-25-001".to_string());
        assert_eq!(payload.as_str(), Some("F1-Jacket-25-001"));
        assert_eq!(payload.as_bytes(), b"F1-Jacket-25-001");
    }

    #[test]
    fn test_qr_payload_from_bytes() {
        let payload = QrPayload::from_bytes(vec![0xFF, 0xFE]);
        assert!(payload.as_str().is_none()); // Invalid UTF-8
        assert_eq!(payload.as_bytes(), &[0xFF, 0xFE]);
    }

    #[test]
    fn correction_level_parses_letters_and_names() {
        assert_eq!("h".parse::<CorrectionLevel>(), Ok(CorrectionLevel::H));
        assert_eq!("Medium".parse::<CorrectionLevel>(), Ok(CorrectionLevel::M));
        assert!("X".parse::<CorrectionLevel>().is_err());
        assert_eq!(CorrectionLevel::Q.to_string(), "Q");
    }

    #[test]
    fn quick_request_uses_defaults() {
        let request = QrRequest::quick("TEST123");
        assert_eq!(request.version(), SizeVersion::Auto);
        assert_eq!(request.correction(), CorrectionLevel::M);
        assert_eq!(request.box_size(), 10);
        assert_eq!(request.border(), 4);
    }

    #[test]
    fn request_rejects_out_of_range_version() {
        for version in [0, 41] {
            let result = QrRequest::new(
                "x",
                SizeVersion::AtLeast(version),
                CorrectionLevel::L,
                10,
                4,
            );
            assert!(matches!(result, Err(Error::InvalidRequest(_))));
        }
    }

    #[test]
    fn request_rejects_zero_box_size() {
        let result = QrRequest::new("x", SizeVersion::Auto, CorrectionLevel::L, 0, 4);
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn request_rejects_oversized_canvas() {
        let result = QrRequest::new("x", SizeVersion::Auto, CorrectionLevel::L, 1 << 12, 1 << 20);
        assert!(matches!(result, Err(Error::InvalidRequest(_))));

        let result = QrRequest::new("x", SizeVersion::Auto, CorrectionLevel::L, u32::MAX, 0);
        assert!(matches!(result, Err(Error::InvalidRequest(_))));

        let result = QrRequest::new("x", SizeVersion::Auto, CorrectionLevel::L, 1, u32::MAX);
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn request_accepts_largest_fitting_canvas() {
        // (177 + 2 * 3) * 89 = 16287
        let result = QrRequest::new("x", SizeVersion::AtLeast(40), CorrectionLevel::H, 89, 3);
        assert!(result.is_ok());
    }

    #[test]
    fn deserialized_request_is_validated() {
        let valid = r#"{"payload":"TEST123","version":"auto","correction":"M","box_size":10,"border":4}"#;
        let request: QrRequest = serde_json::from_str(valid).unwrap();
        assert_eq!(request, QrRequest::quick("TEST123"));

        for invalid in [
            r#"{"payload":"x","version":"auto","correction":"L","box_size":0,"border":4}"#,
            r#"{"payload":"x","version":{"at_least":0},"correction":"L","box_size":10,"border":4}"#,
            r#"{"payload":"x","version":{"at_least":200},"correction":"L","box_size":10,"border":4}"#,
        ] {
            let result = serde_json::from_str::<QrRequest>(invalid);
            assert!(result.is_err(), "accepted {invalid}");
        }
    }

    #[test]
    fn zero_border_is_allowed() {
        let request = QrRequest::new("x", SizeVersion::AtLeast(40), CorrectionLevel::H, 1, 0);
        assert!(request.is_ok());
    }
}
