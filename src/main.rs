//! qrbatch entrypoint

use anyhow::Context;
use clap::Parser;
use qrbatch::output::{Rendered, render_generated, render_summary, render_verification};
use qrbatch::{BatchGenerator, QrBatchConfig, capability, logging};
use std::path::PathBuf;
use tracing::info;

const OUTPUT_FILES_HELP: &str = "Writes (overwriting) into the output directory:\n  \
    qr-simple.png, qr-test.png, qr-url.png, qr-high-ec.png, qr-large.png";

#[derive(Parser, Debug)]
#[command(
    name = "qrbatch",
    version,
    about = "Generate the product QR-code image batch",
    after_help = OUTPUT_FILES_HELP
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to qrbatch.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory to write the images into (takes precedence over config file)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Print status events as JSON lines instead of human-readable text
    #[arg(long)]
    json: bool,

    /// Decode every written image and check it matches its payload
    #[arg(long)]
    verify: bool,
}

fn emit(rendered: &Rendered, json: bool) -> qrbatch::Result<()> {
    if json {
        println!("{}", serde_json::to_string(&rendered.json)?);
    } else {
        for line in &rendered.human {
            println!("{line}");
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = QrBatchConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.output_dir {
        config.output.directory = dir;
    }

    logging::init(&config.logging)?;

    let generator = BatchGenerator::new(&config.output.directory);
    info!(dir = %generator.output_dir().display(), "Generating QR batch");

    if !cli.json {
        println!("Generating QR codes...");
    }

    let files = generator
        .run_checked(capability::ensure_available, |file| {
            emit(&render_generated(file), cli.json)
        })
        .with_context(|| {
            format!(
                "QR batch into {} failed",
                generator.output_dir().display()
            )
        })?;

    if cli.verify {
        for check in generator.verify(&files)? {
            emit(&render_verification(&check), cli.json)?;
        }
    }

    emit(&render_summary(&files), cli.json)?;
    Ok(())
}
