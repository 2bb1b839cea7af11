//! QR code encoder

use crate::error::{Error, Result};
use crate::qr::{CorrectionLevel, MAX_VERSION, QrRequest, RenderedQr, SizeVersion};
use image::{GrayImage, Luma, imageops};
use qrcode::types::QrError;
use qrcode::{QrCode, Version};

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// QR code encoder
#[derive(Debug, Default)]
pub struct QrEncoder;

impl QrEncoder {
    /// Create a new QR encoder
    pub fn new() -> Self {
        Self
    }

    /// Encode and render a request into a grayscale raster
    pub fn encode(&self, request: &QrRequest) -> Result<RenderedQr> {
        let code = self.build_code(request)?;
        let version = match code.version() {
            Version::Normal(v) => v as u8,
            Version::Micro(v) => {
                return Err(Error::QrEncode(format!(
                    "unexpected Micro QR version {v}"
                )));
            }
        };
        let modules = code.width() as u32;

        let symbol = code
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .dark_color(DARK)
            .light_color(LIGHT)
            .module_dimensions(request.box_size(), request.box_size())
            .build();

        // The renderer's own quiet zone is fixed at 4 modules, so pad by hand.
        let origin = request.border() * request.box_size();
        let side = symbol.width() + 2 * origin;
        let mut canvas = GrayImage::from_pixel(side, side, LIGHT);
        imageops::overlay(&mut canvas, &symbol, i64::from(origin), i64::from(origin));

        tracing::debug!(
            version,
            modules,
            ecc = %request.correction(),
            side,
            "Encoded {} byte payload",
            request.payload().len()
        );

        Ok(RenderedQr {
            image: canvas,
            version,
            modules,
            box_size: request.box_size(),
            border: request.border(),
            correction: request.correction(),
        })
    }

    /// Encode a string with default settings
    pub fn encode_string(&self, data: &str) -> Result<RenderedQr> {
        self.encode(&QrRequest::quick(data))
    }

    fn build_code(&self, request: &QrRequest) -> Result<QrCode> {
        let data = request.payload().as_bytes();
        let level: qrcode::EcLevel = request.correction().into();

        if request.version() == SizeVersion::Auto {
            return QrCode::with_error_correction_level(data, level)
                .map_err(|e| too_long_or(e, data.len(), request.correction()));
        }

        for version in request.version().minimum()..=MAX_VERSION {
            match QrCode::with_version(data, Version::Normal(i16::from(version)), level) {
                Ok(code) => return Ok(code),
                Err(QrError::DataTooLong) => continue,
                Err(e) => return Err(too_long_or(e, data.len(), request.correction())),
            }
        }

        Err(too_long_or(
            QrError::DataTooLong,
            data.len(),
            request.correction(),
        ))
    }
}

fn too_long_or(err: QrError, len: usize, level: CorrectionLevel) -> Error {
    match err {
        QrError::DataTooLong => Error::QrEncode(format!(
            "{len} byte payload does not fit any version at level {level}"
        )),
        other => Error::QrEncode(format!("Failed to create QR code: {other}")),
    }
}
