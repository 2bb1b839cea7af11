//! QR code decoder using rqrr

use crate::error::{Error, Result};
use crate::qr::QrPayload;
use image::{DynamicImage, GrayImage};
use std::path::Path;

/// QR code decoder
#[derive(Debug, Default)]
pub struct QrDecoder;

impl QrDecoder {
    /// Create a new QR decoder with default settings
    pub fn new() -> Self {
        Self
    }

    /// Decode a QR code from an image
    pub fn decode(&self, img: &DynamicImage) -> Result<QrPayload> {
        let gray = img.to_luma8();

        self.decode_gray(&gray)
    }

    /// Open an image file and decode the QR code it contains
    pub fn decode_file(&self, path: &Path) -> Result<QrPayload> {
        let img = image::open(path)?;
        self.decode(&img)
    }

    /// Decode a QR code from a grayscale image
    pub fn decode_gray(&self, img: &GrayImage) -> Result<QrPayload> {
        let mut prepared = rqrr::PreparedImage::prepare(img.clone());

        let grids = prepared.detect_grids();

        if grids.is_empty() {
            return Err(Error::NoQrCodeFound);
        }

        // Take the first grid that decodes
        let mut last_error = None;
        for grid in &grids {
            match grid.decode() {
                Ok((meta, content)) => {
                    tracing::debug!(
                        "Decoded QR: version={:?}, ecc_level={:?}, length={}",
                        meta.version,
                        meta.ecc_level,
                        content.len()
                    );

                    return Ok(QrPayload::from_bytes(content.into_bytes()));
                }
                Err(e) => last_error = Some(e),
            }
        }

        Err(Error::QrDecode(format!("Decode failed: {:?}", last_error)))
    }

    /// Decode multiple QR codes from an image
    pub fn decode_all(&self, img: &DynamicImage) -> Result<Vec<QrPayload>> {
        let gray = img.to_luma8();
        let mut prepared = rqrr::PreparedImage::prepare(gray);

        let grids = prepared.detect_grids();

        if grids.is_empty() {
            return Err(Error::NoQrCodeFound);
        }

        let mut payloads = Vec::new();

        for grid in grids {
            match grid.decode() {
                Ok((_meta, content)) => {
                    payloads.push(QrPayload::from_bytes(content.into_bytes()));
                }
                Err(e) => {
                    tracing::warn!("Failed to decode one QR code: {:?}", e);
                }
            }
        }

        if payloads.is_empty() {
            return Err(Error::QrDecode("No QR codes could be decoded".to_string()));
        }

        Ok(payloads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::QrEncoder;
    use image::Luma;

    #[test]
    fn blank_image_has_no_code() {
        let blank = GrayImage::from_pixel(200, 200, Luma([255]));
        let result = QrDecoder::new().decode_gray(&blank);
        assert!(matches!(result, Err(Error::NoQrCodeFound)));
    }

    #[test]
    fn decode_all_finds_single_code() {
        let rendered = QrEncoder::new().encode_string("TEST123").unwrap();
        let payloads = QrDecoder::new()
            .decode_all(&DynamicImage::ImageLuma8(rendered.image))
            .unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].as_str(), Some("TEST123"));
    }

    #[test]
    fn decode_file_reads_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.png");
        let rendered = QrEncoder::new().encode_string("F1-Jacket-25-001").unwrap();
        rendered.image.save(&path).unwrap();

        let payload = QrDecoder::new().decode_file(&path).unwrap();
        assert_eq!(payload.as_str(), Some("F1-Jacket-25-001"));
    }

    #[test]
    fn decode_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = QrDecoder::new().decode_file(&dir.path().join("absent.png"));
        assert!(result.is_err());
    }
}
