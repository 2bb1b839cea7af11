//! qrbatch - generate a fixed batch of product QR-code images
//!
//! Five scenarios are encoded with different versions, error-correction
//! levels, module sizes and quiet zones, and written as PNG files. QR encoding
//! is delegated to `qrcode`, rasterisation and PNG output to `image`, and
//! decoding (for verification) to `rqrr`.
//!
//! # Example
//!
//! ```no_run
//! use qrbatch::{BatchGenerator, capability};
//!
//! fn main() -> anyhow::Result<()> {
//!     capability::ensure_available()?;
//!
//!     let generator = BatchGenerator::new(".");
//!     let files = generator.run(|file| {
//!         println!("Created {}", file.path.display());
//!         Ok(())
//!     })?;
//!
//!     generator.verify(&files)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod batch;
pub mod capability;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod qr;

// Re-exports for convenience
pub use error::{Error, Result};

pub use batch::{BatchGenerator, GeneratedFile, Scenario, Verification};
pub use config::{LogRotation, LoggingOptions, OutputOptions, QrBatchConfig};
pub use qr::{CorrectionLevel, QrDecoder, QrEncoder, QrPayload, QrRequest, RenderedQr, SizeVersion};
