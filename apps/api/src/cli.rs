//! Command-line entry points: run the service, fill locally, or submit to a server.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use reqwest::multipart::{Form, Part};
use tracing::info;

use crate::filler::handlers::DOCX_MIME;
use crate::filler::{fill_template_bytes, layout::TemplateLayout};
use crate::models::cv::{validate_record, CvRecord};

#[derive(Parser)]
#[command(name = "cvfill", version, about = "Fills the DOCX CV template with JSON résumé data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP fill service.
    Serve {
        /// Overrides HOST.
        #[arg(long)]
        host: Option<String>,
        /// Overrides PORT.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Fill a template from a JSON file without starting the service.
    Fill {
        #[arg(long)]
        template: PathBuf,
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Upload a template and JSON file to a running service and save the result.
    Submit {
        #[arg(long, default_value = "http://localhost:8000")]
        url: String,
        #[arg(long)]
        template: PathBuf,
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Cannot read {}", path.display()))
}

fn load_record(path: &Path) -> Result<CvRecord> {
    let raw = read_file(path)?;
    let record: CvRecord = serde_json::from_slice(&raw)
        .with_context(|| format!("Invalid CV data in {}", path.display()))?;
    validate_record(&record).map_err(anyhow::Error::msg)?;
    Ok(record)
}

/// Writes through a temp file in the destination directory, then renames into place.
fn write_atomically(output: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Cannot create temp file in {}", dir.display()))?;
    tmp.write_all(bytes)?;
    tmp.persist(output)
        .with_context(|| format!("Cannot write {}", output.display()))?;
    Ok(())
}

/// Fills `template` with the record in `data` and writes the DOCX to `output`.
pub fn run_fill(layout: &TemplateLayout, template: &Path, data: &Path, output: &Path) -> Result<()> {
    info!("Loading CV data from {}", data.display());
    let record = load_record(data)?;

    info!("Filling CV template {}", template.display());
    let filled = fill_template_bytes(&read_file(template)?, &record, layout)
        .with_context(|| format!("Cannot fill template {}", template.display()))?;

    write_atomically(output, &filled)?;
    info!("Filled CV saved to {}", output.display());
    Ok(())
}

/// Sends the files to `POST {url}/fill-cv/` after checking the service answers on `/`.
pub async fn run_submit(url: &str, template: &Path, data: &Path, output: &Path) -> Result<()> {
    let base = url.trim_end_matches('/');
    let client = reqwest::Client::new();

    let probe = client
        .get(format!("{base}/"))
        .send()
        .await
        .with_context(|| format!("CV Filler API is not reachable at {base}"))?;
    if !probe.status().is_success() {
        bail!("CV Filler API at {base} answered {}", probe.status());
    }

    let form = Form::new()
        .part(
            "template",
            Part::bytes(read_file(template)?)
                .file_name("template.docx")
                .mime_str(DOCX_MIME)?,
        )
        .part(
            "cv_data_json",
            Part::bytes(read_file(data)?)
                .file_name("data.json")
                .mime_str("application/json")?,
        );

    let response = client
        .post(format!("{base}/fill-cv/"))
        .multipart(form)
        .send()
        .await
        .context("Fill request failed")?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("Fill request rejected ({status}): {body}");
    }

    let bytes = response.bytes().await?;
    write_atomically(output, &bytes)?;
    info!("Filled CV saved to {}", output.display());
    Ok(())
}
