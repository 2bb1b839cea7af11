//! Helpers for rendering batch status output

use crate::batch::{GeneratedFile, Verification};
use serde_json::{Value, json};

/// Combined structured and human-readable representation of a status event
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Structured JSON representation suitable for downstream consumers
    pub json: Value,
    /// Human-readable lines for terminal presentation
    pub human: Vec<String>,
}

/// Status line for one written image.
pub fn render_generated(file: &GeneratedFile) -> Rendered {
    let human = vec![format!(
        "✓ Created {} with: {}",
        file.file_name(),
        file.payload
    )];

    let json = json!({
        "event": "created",
        "file": file.file_name(),
        "path": file.path.display().to_string(),
        "payload": file.payload,
        "description": file.description,
        "version": file.version,
        "ecc_level": file.correction.to_string(),
        "box_size": file.box_size,
        "border": file.border,
        "width": file.width,
        "height": file.height,
    });

    Rendered { json, human }
}

/// Status line for one file decoded back successfully.
pub fn render_verification(check: &Verification) -> Rendered {
    let file = check
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Rendered {
        human: vec![format!("✓ Verified {file} decodes to: {}", check.decoded)],
        json: json!({
            "event": "verified",
            "file": file,
            "decoded": check.decoded,
        }),
    }
}

/// Closing report listing every file of the batch.
pub fn render_summary(files: &[GeneratedFile]) -> Rendered {
    let mut human = vec![
        String::new(),
        format!("✅ All {} QR codes created!", files.len()),
        String::new(),
        "Try scanning these files:".to_string(),
    ];
    human.extend(
        files
            .iter()
            .map(|file| format!("  - {} ({})", file.file_name(), file.description)),
    );

    let json = json!({
        "event": "summary",
        "count": files.len(),
        "files": files.iter().map(GeneratedFile::file_name).collect::<Vec<_>>(),
    });

    Rendered { json, human }
}
