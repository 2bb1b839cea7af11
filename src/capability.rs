//! Startup probe for the encode, PNG and decode stack
//!
//! Everything qrbatch needs is linked at build time. Before any file is
//! written, a probe payload is pushed through the same path the batch uses
//! (encode, PNG encode, PNG decode, QR decode) so a broken build fails fast
//! with an actionable message instead of leaving a half-written batch behind.

use crate::error::{Error, Result};
use crate::qr::{QrDecoder, QrEncoder};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

const PROBE_PAYLOAD: &str = "qrbatch-probe";

/// Verify the QR and imaging dependencies work end to end.
pub fn ensure_available() -> Result<()> {
    let rendered = QrEncoder::new()
        .encode_string(PROBE_PAYLOAD)
        .map_err(|e| unavailable("encode", e))?;

    let mut png = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(rendered.image)
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| unavailable("png-write", e))?;

    png_round_trip(png.get_ref(), PROBE_PAYLOAD)?;

    tracing::debug!(png_bytes = png.get_ref().len(), "QR capability probe passed");
    Ok(())
}

/// Read a PNG back and check it decodes to `expected`.
fn png_round_trip(png: &[u8], expected: &str) -> Result<()> {
    let reloaded = image::load_from_memory_with_format(png, ImageFormat::Png)
        .map_err(|e| unavailable("png-read", e))?;

    let decoded = QrDecoder::new()
        .decode(&reloaded)
        .map_err(|e| unavailable("decode", e))?;

    if decoded.as_str() != Some(expected) {
        return Err(Error::CapabilityUnavailable {
            stage: "decode",
            reason: format!("probe decoded as {:?}", decoded.as_str()),
        });
    }

    Ok(())
}

fn unavailable(stage: &'static str, err: impl std::fmt::Display) -> Error {
    Error::CapabilityUnavailable {
        stage,
        reason: err.to_string(),
    }
}
