use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use refscores::convert::{ConvertConfig, Converter};
use refscores::table::LoaderConfig;
use refscores::{FieldRole, SchemaId};

#[derive(Parser)]
#[command(
    name = "refscores",
    about = "Convert citation database exports into scores and corpus files",
    version,
    long_about = None
)]
struct Cli {
    /// Export files, or directories whose files are all included.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Export format: wos, scopus, proquest or ris. Detected when omitted.
    #[arg(long)]
    schema: Option<SchemaId>,

    /// Field to score: so (source), pu (publisher) or py (year).
    #[arg(long, default_value = "so")]
    field: FieldRole,

    /// Group publication years into intervals of this width (requires --field py).
    #[arg(long)]
    buckets: Option<i64>,

    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Prefix of the output file names.
    #[arg(long, default_value = "refscores")]
    name: String,

    /// Only write the scores file.
    #[arg(long)]
    skip_corpus: bool,

    /// Build everything but write no files.
    #[arg(long)]
    dry_run: bool,

    /// Read input files one after another instead of in parallel.
    #[arg(long)]
    sequential: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("refscores=info")),
        )
        .init();

    let cli = Cli::parse();
    let files = expand_inputs(&cli.inputs)?;
    info!(files = files.len(), "input files selected");

    let config = ConvertConfig {
        schema: cli.schema,
        scoring: cli.field,
        buckets: cli.buckets,
        skip_corpus: cli.skip_corpus,
        dry_run: cli.dry_run,
        output_dir: cli.output_dir,
        output_name: cli.name,
        loader: LoaderConfig {
            run_in_parallel: !cli.sequential,
        },
    };

    let summary = Converter::new(config)
        .run(&files)
        .context("conversion failed")?;
    println!("File creation successful.\n\n{summary}");
    Ok(())
}

/// Replaces each directory with its regular files, sorted by name.
fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.exists() {
            bail!("input path not found: {}", input.display());
        }
        if input.is_dir() {
            let mut entries = fs::read_dir(input)
                .with_context(|| format!("reading directory {}", input.display()))?
                .map(|entry| entry.map(|e| e.path()))
                .collect::<std::io::Result<Vec<_>>>()
                .with_context(|| format!("reading directory {}", input.display()))?;
            entries.retain(|path| path.is_file());
            entries.sort();
            debug!(dir = %input.display(), files = entries.len(), "expanded directory");
            files.extend(entries);
        } else {
            files.push(input.clone());
        }
    }
    if files.is_empty() {
        bail!(refscores::ConvertError::NoInputFiles);
    }
    Ok(files)
}
