//! # tabula-cli
//!
//! Command-line interface for declaring superset/subset schemas and
//! validating CSV data through them.

mod demo;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tabula_adapter_csv::{CsvReader, CsvWriter};
use tabula_schema::CatalogLoader;
use tabula_validation::{Error as ValidationError, ExtraColumns, ValidationConfig, ValidationEngine};
use tracing_subscriber::EnvFilter;

/// Exit status for data that fails validation
const EXIT_INVALID_DATA: u8 = 1;
/// Exit status for catalog, declaration and I/O errors
const EXIT_FAILURE: u8 = 2;

#[derive(Parser)]
#[command(name = "tabula")]
#[command(about = "Superset/subset schema declaration and validation for tabular data")]
#[command(version)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Declare every schema in a catalog and print them
    Check {
        /// Catalog file path (YAML or JSON)
        catalog: PathBuf,
    },

    /// Validate a CSV file against a declared schema
    Validate {
        /// Input CSV file path
        input: PathBuf,

        /// Catalog file path (YAML or JSON)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Name of the schema to validate with
        #[arg(short, long)]
        schema: String,

        /// Output CSV file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Handling of columns the schema does not declare
        #[arg(long, value_enum, default_value_t = ExtraPolicy::Filter)]
        extra: ExtraPolicy,

        /// Drop rows with row-level failures instead of failing
        #[arg(long)]
        drop_invalid_rows: bool,
    },

    /// Run the built-in user and product walkthrough
    Demo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ExtraPolicy {
    Filter,
    Reject,
    Keep,
}

impl From<ExtraPolicy> for ExtraColumns {
    fn from(policy: ExtraPolicy) -> Self {
        match policy {
            ExtraPolicy::Filter => ExtraColumns::Filter,
            ExtraPolicy::Reject => ExtraColumns::Reject,
            ExtraPolicy::Keep => ExtraColumns::Keep,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Check { catalog } => check(&catalog),
        Commands::Validate {
            input,
            catalog,
            schema,
            output,
            extra,
            drop_invalid_rows,
        } => {
            let config = ValidationConfig::new()
                .extra_columns(extra.into())
                .drop_invalid_rows(drop_invalid_rows);
            validate(&input, &catalog, &schema, output.as_deref(), config)
        }
        Commands::Demo => demo::run(),
    };

    result.unwrap_or_else(|err| {
        eprintln!("error: {err:#}");
        ExitCode::from(EXIT_FAILURE)
    })
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn check(catalog: &Path) -> anyhow::Result<ExitCode> {
    tracing::info!("Checking catalog {}", catalog.display());
    let loader = CatalogLoader::new();
    let schemas = loader
        .load_from_file(catalog)
        .with_context(|| format!("catalog {} rejected", catalog.display()))?;

    for schema in &schemas {
        println!("{schema}");
    }
    println!("{} schema(s) declared", schemas.len());
    Ok(ExitCode::SUCCESS)
}

fn validate(
    input: &Path,
    catalog: &Path,
    schema_name: &str,
    output: Option<&Path>,
    config: ValidationConfig,
) -> anyhow::Result<ExitCode> {
    tracing::info!("Validating {} with {}", input.display(), schema_name);

    // declarations are checked before any data is read
    let loader = CatalogLoader::new();
    loader
        .load_from_file(catalog)
        .with_context(|| format!("catalog {} rejected", catalog.display()))?;
    let schema = loader
        .registry()
        .get(schema_name)
        .with_context(|| format!("schema '{schema_name}' is not declared in {}", catalog.display()))?;

    let frame = CsvReader::new()
        .read_path(input, Some(schema.as_ref()))
        .with_context(|| format!("failed to read {}", input.display()))?;

    let filtered = match ValidationEngine::with_config(config).validate(&schema, &frame) {
        Ok(filtered) => filtered,
        Err(ValidationError::Data(err)) => {
            eprintln!(
                "Validation failed for '{}': {} failure(s)",
                err.schema,
                err.failures.len()
            );
            for failure in &err.failures {
                eprintln!("  - {failure}");
            }
            return Ok(ExitCode::from(EXIT_INVALID_DATA));
        }
        Err(err) => return Err(err.into()),
    };

    eprintln!("Columns: {}", filtered.column_names().join(", "));
    let (rows, columns) = filtered.shape();
    eprintln!("Shape: ({rows}, {columns})");
    if filtered.height() < frame.height() {
        eprintln!("Dropped rows: {}", frame.height() - filtered.height());
    }

    let writer = CsvWriter::new();
    match output {
        Some(path) => writer
            .write_path(path, &filtered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => writer.write(io::stdout().lock(), &filtered)?,
    }
    Ok(ExitCode::SUCCESS)
}
