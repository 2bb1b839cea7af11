//! Induced-corruption probes for rendered symbols
//!
//! A light square is painted over the centre of the symbol and grown one module
//! at a time until the decoder stops returning the original payload. Finder
//! patterns (7 modules plus a 1-module separator in three corners) are never
//! touched, so the failure is always a data/ECC failure rather than a
//! detection failure.

use crate::qr::{QrDecoder, RenderedQr};
use image::{GrayImage, Luma};
use serde::Serialize;

const FINDER_FOOTPRINT: u32 = 8;

/// How much centred occlusion a symbol survived
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DamageTolerance {
    /// Largest occluded square side, in modules, that still decoded correctly
    pub max_side: u32,
    /// Share of the symbol's modules covered by that square
    pub fraction: f64,
}

/// Largest centred square that stays clear of the finder patterns.
pub fn max_occlusion_side(modules: u32) -> u32 {
    modules.saturating_sub(2 * FINDER_FOOTPRINT)
}

/// Paint a centred `side x side` module square light and return the damaged copy.
pub fn occlude_center(rendered: &RenderedQr, side: u32) -> GrayImage {
    let mut damaged = rendered.image.clone();
    let side = side.min(rendered.modules);
    let start_module = (rendered.modules - side) / 2;
    let start = rendered.symbol_origin() + start_module * rendered.box_size;
    let end = start + side * rendered.box_size;

    for y in start..end {
        for x in start..end {
            damaged.put_pixel(x, y, Luma([255]));
        }
    }

    damaged
}

/// Grow the occlusion until `expected` no longer decodes.
pub fn damage_tolerance(rendered: &RenderedQr, decoder: &QrDecoder, expected: &str) -> DamageTolerance {
    let limit = max_occlusion_side(rendered.modules);
    let mut survived = 0;

    for side in 1..=limit {
        let damaged = occlude_center(rendered, side);
        let intact = matches!(
            decoder.decode_gray(&damaged),
            Ok(payload) if payload.as_str() == Some(expected)
        );
        if !intact {
            tracing::debug!(side, version = rendered.version, "Symbol failed under occlusion");
            break;
        }
        survived = side;
    }

    let area = f64::from(rendered.modules) * f64::from(rendered.modules);
    DamageTolerance {
        max_side: survived,
        fraction: f64::from(survived * survived) / area,
    }
}
