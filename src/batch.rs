//! The fixed five-file product QR batch

use crate::error::{Error, Result};
use crate::qr::{CorrectionLevel, QrDecoder, QrEncoder, QrPayload, QrRequest, SizeVersion};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Product identifier used by most scenarios
pub const PRODUCT_ID: &str = "F1-Jacket-25-001";

/// Product page URL used by the URL scenario
pub const PRODUCT_URL: &str = "https://example.com/product/F1-Jacket-25-001";

/// One entry of the batch: where to write and what to encode
#[derive(Debug, Clone)]
pub struct Scenario {
    /// File name inside the output directory
    pub file_name: &'static str,
    /// Short label shown in the closing summary
    pub description: &'static str,
    /// Encode parameters
    pub request: QrRequest,
}

/// The five scenarios in the order they are generated.
pub fn scenarios() -> Result<Vec<Scenario>> {
    Ok(vec![
        Scenario {
            file_name: "qr-simple.png",
            description: "product ID",
            request: QrRequest::new(PRODUCT_ID, SizeVersion::AtLeast(1), CorrectionLevel::L, 10, 4)?,
        },
        Scenario {
            file_name: "qr-test.png",
            description: "default settings",
            request: QrRequest::quick("TEST123"),
        },
        Scenario {
            file_name: "qr-url.png",
            description: "URL format",
            request: QrRequest::quick(PRODUCT_URL),
        },
        Scenario {
            file_name: "qr-high-ec.png",
            description: "high error correction",
            request: QrRequest::new(PRODUCT_ID, SizeVersion::AtLeast(1), CorrectionLevel::H, 10, 4)?,
        },
        Scenario {
            file_name: "qr-large.png",
            description: "larger size",
            request: QrRequest::new(PRODUCT_ID, SizeVersion::AtLeast(5), CorrectionLevel::M, 8, 2)?,
        },
    ])
}

/// Record of one written image
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedFile {
    /// Where the PNG was written
    pub path: PathBuf,
    /// Literal payload encoded in it
    pub payload: String,
    /// Scenario label
    pub description: String,
    /// Version the encoder settled on
    pub version: u8,
    /// Modules per side, excluding the quiet zone
    pub modules: u32,
    /// Pixels per module
    pub box_size: u32,
    /// Quiet-zone width in modules
    pub border: u32,
    /// Error-correction level
    pub correction: CorrectionLevel,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl GeneratedFile {
    /// File name component of `path`
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Result of decoding a written image back
#[derive(Debug, Clone, Serialize)]
pub struct Verification {
    /// File that was decoded
    pub path: PathBuf,
    /// Payload recovered from the image
    pub decoded: String,
}

/// Runs the scenarios against an output directory
#[derive(Debug)]
pub struct BatchGenerator {
    output_dir: PathBuf,
    encoder: QrEncoder,
    decoder: QrDecoder,
}

impl BatchGenerator {
    /// Create a generator writing into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            encoder: QrEncoder::new(),
            decoder: QrDecoder::new(),
        }
    }

    /// Directory the batch writes into
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Generate every scenario in order, calling `on_created` after each file lands.
    ///
    /// The first failure aborts the batch; files already written stay on disk.
    pub fn run<F>(&self, mut on_created: F) -> Result<Vec<GeneratedFile>>
    where
        F: FnMut(&GeneratedFile) -> Result<()>,
    {
        fs::create_dir_all(&self.output_dir)?;

        let mut generated = Vec::new();
        for scenario in scenarios()? {
            let file = self.generate(&scenario)?;
            on_created(&file)?;
            generated.push(file);
        }

        Ok(generated)
    }

    /// Run `check` once, then the batch; a failed check writes nothing and is not retried.
    pub fn run_checked<C, F>(&self, check: C, on_created: F) -> Result<Vec<GeneratedFile>>
    where
        C: FnOnce() -> Result<()>,
        F: FnMut(&GeneratedFile) -> Result<()>,
    {
        check()?;
        self.run(on_created)
    }

    /// Encode one scenario and write it, overwriting any previous file.
    pub fn generate(&self, scenario: &Scenario) -> Result<GeneratedFile> {
        let rendered = self.encoder.encode(&scenario.request)?;
        let path = self.output_dir.join(scenario.file_name);
        rendered.image.save(&path)?;

        info!(
            path = %path.display(),
            version = rendered.version,
            ecc = %rendered.correction,
            "Wrote QR image"
        );

        Ok(GeneratedFile {
            path,
            payload: scenario.request.payload().to_string(),
            description: scenario.description.to_string(),
            version: rendered.version,
            modules: rendered.modules,
            box_size: rendered.box_size,
            border: rendered.border,
            correction: rendered.correction,
            width: rendered.image.width(),
            height: rendered.image.height(),
        })
    }

    /// Reopen each written file and check it decodes to its payload.
    pub fn verify(&self, files: &[GeneratedFile]) -> Result<Vec<Verification>> {
        files
            .iter()
            .map(|file| {
                let decoded = self.decoder.decode_file(&file.path)?;
                let text = decoded_text(&decoded);
                if text != file.payload {
                    return Err(Error::PayloadMismatch {
                        path: file.path.clone(),
                        expected: file.payload.clone(),
                        found: text,
                    });
                }
                Ok(Verification {
                    path: file.path.clone(),
                    decoded: text,
                })
            })
            .collect()
    }
}

fn decoded_text(payload: &QrPayload) -> String {
    String::from_utf8_lossy(payload.as_bytes()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenarios_are_fixed_and_ordered() {
        let list = scenarios().unwrap();
        let names: Vec<_> = list.iter().map(|s| s.file_name).collect();
        assert_eq!(
            names,
            [
                "qr-simple.png",
                "qr-test.png",
                "qr-url.png",
                "qr-high-ec.png",
                "qr-large.png"
            ]
        );

        let payloads: Vec<_> = list.iter().map(|s| s.request.payload()).collect();
        assert_eq!(
            payloads,
            [PRODUCT_ID, "TEST123", PRODUCT_URL, PRODUCT_ID, PRODUCT_ID]
        );
    }

    #[test]
    fn scenario_parameters_match_their_purpose() {
        let list = scenarios().unwrap();
        assert_eq!(list[0].request.correction(), CorrectionLevel::L);
        assert_eq!(list[3].request.correction(), CorrectionLevel::H);
        assert_eq!(list[4].request.version(), SizeVersion::AtLeast(5));
        assert_eq!(list[4].request.box_size(), 8);
        assert_eq!(list[4].request.border(), 2);
    }

    #[test]
    fn run_reports_each_file_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let generator = BatchGenerator::new(dir.path());

        let mut seen = Vec::new();
        let files = generator
            .run(|file| {
                seen.push(file.file_name());
                Ok(())
            })
            .unwrap();

        assert_eq!(files.len(), 5);
        assert_eq!(seen[0], "qr-simple.png");
        assert_eq!(seen[4], "qr-large.png");
        assert!(files.iter().all(|f| f.path.exists()));
    }

    #[test]
    fn run_creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("qr");
        BatchGenerator::new(&nested).run(|_| Ok(())).unwrap();
        assert!(nested.join("qr-high-ec.png").exists());
    }

    #[test]
    fn callback_failure_stops_batch_but_keeps_earlier_files() {
        let dir = tempfile::tempdir().unwrap();
        let generator = BatchGenerator::new(dir.path());

        let mut count = 0;
        let result = generator.run(|_| {
            count += 1;
            if count == 3 {
                Err(Error::Other("stop".to_string()))
            } else {
                Ok(())
            }
        });

        assert!(result.is_err());
        assert!(dir.path().join("qr-simple.png").exists());
        assert!(dir.path().join("qr-test.png").exists());
        assert!(!dir.path().join("qr-high-ec.png").exists());
    }

    #[test]
    fn verify_detects_swapped_file() {
        let dir = tempfile::tempdir().unwrap();
        let generator = BatchGenerator::new(dir.path());
        let files = generator.run(|_| Ok(())).unwrap();

        fs::copy(&files[1].path, &files[0].path).unwrap();

        let err = generator.verify(&files).unwrap_err();
        assert!(matches!(err, Error::PayloadMismatch { ref found, .. } if found == "TEST123"));
    }

    #[test]
    fn failed_check_writes_nothing_and_runs_once() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let generator = BatchGenerator::new(&out);

        let mut checks = 0;
        let mut created = 0;
        let result = generator.run_checked(
            || {
                checks += 1;
                Err(Error::CapabilityUnavailable {
                    stage: "png-write",
                    reason: "no encoder".to_string(),
                })
            },
            |_| {
                created += 1;
                Ok(())
            },
        );

        assert!(matches!(result, Err(Error::CapabilityUnavailable { .. })));
        assert_eq!(checks, 1);
        assert_eq!(created, 0);
        assert!(!out.exists());
    }

    #[test]
    fn passing_check_runs_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let files = BatchGenerator::new(dir.path())
            .run_checked(crate::capability::ensure_available, |_| Ok(()))
            .unwrap();
        assert_eq!(files.len(), 5);
    }

    #[test]
    fn mismatch_text_keeps_invalid_utf8_evidence() {
        let payload = QrPayload::from_bytes(vec![0xFF, b'A', b'B']);
        assert_eq!(decoded_text(&payload), "\u{FFFD}AB");
    }

    #[test]
    fn write_into_a_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();

        let result = BatchGenerator::new(&blocker).run(|_| Ok(()));
        assert!(result.is_err());
    }
}
