//! CLI entry point for the EDA helpers.

use anyhow::{Result, anyhow};
use clap::Parser;
use lex_eda::{EdaConfig, EdaFrame, MissingValueCount, NoopDisplay};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Exploratory data analysis for tabular datasets",
    long_about = "Summarizes a dataset and renders its charts into a tabbed HTML report.\n\n\
                  EXAMPLES:\n  \
                  # Full report with column kinds inferred from dtypes\n  \
                  lex-eda -i titanic.csv -t Survived --infer-columns\n\n  \
                  # Declare columns explicitly and inspect outliers\n  \
                  lex-eda -i titanic.csv -t Survived --cat Sex,Pclass --num Age,Fare \\\n    \
                  --detect-outliers Fare\n\n  \
                  # Drop rows outside (0, 300) in Fare before plotting\n  \
                  lex-eda -i titanic.csv -t Survived --infer-columns \\\n    \
                  --remove-outliers Fare --lower 0 --upper 300\n\n  \
                  # Machine-readable output\n  \
                  lex-eda -i titanic.csv -t Survived --infer-columns --json"
)]
struct Args {
    /// Path to the CSV (or Parquet) file to analyze
    #[arg(short, long)]
    input: String,

    /// Target column used to color and split charts
    #[arg(short, long)]
    target: String,

    /// Categorical columns, comma separated
    #[arg(long = "cat", value_delimiter = ',')]
    categorical: Vec<String>,

    /// Numerical columns, comma separated
    #[arg(long = "num", value_delimiter = ',')]
    numerical: Vec<String>,

    /// Fill the categorical and numerical lists from column dtypes
    ///
    /// Explicit --cat / --num lists take precedence.
    #[arg(long)]
    infer_columns: bool,

    /// Report z-score outliers of this column
    #[arg(long, value_name = "COLUMN")]
    detect_outliers: Option<String>,

    /// Keep only rows strictly between --lower and --upper in this column
    #[arg(long, value_name = "COLUMN", requires_all = ["lower", "upper"])]
    remove_outliers: Option<String>,

    /// Lower bound (exclusive) for --remove-outliers
    #[arg(long, allow_hyphen_values = true)]
    lower: Option<f64>,

    /// Upper bound (exclusive) for --remove-outliers
    #[arg(long, allow_hyphen_values = true)]
    upper: Option<f64>,

    /// Output directory for the report (overrides the config file)
    #[arg(short, long)]
    output: Option<String>,

    /// JSON file with EDA settings
    #[arg(short, long)]
    config: Option<String>,

    /// Output JSON to stdout instead of writing files
    ///
    /// Disables all logs; only the final JSON document is printed.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading settings from: {}", path);
            EdaConfig::from_json_file(path)?
        }
        None => EdaConfig::default(),
    };
    if let Some(output) = &args.output {
        config.output_dir = PathBuf::from(output);
    }

    info!("Loading dataset from: {}", args.input);
    let data = load_dataset(&args.input)?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    let original_shape = data.shape();
    let output_dir = config.output_dir.clone();

    let mut eda = EdaFrame::builder(data, args.target.clone())
        .config(config)
        .display(Arc::new(NoopDisplay))
        .build()?;

    if args.infer_columns {
        eda.infer_column_kinds();
    }
    if !args.categorical.is_empty() {
        eda.set_categorical(args.categorical.clone());
    }
    if !args.numerical.is_empty() {
        eda.set_numerical(args.numerical.clone());
    }

    let missing = eda.missing_values();

    let outliers = match &args.detect_outliers {
        Some(column) => Some((column.clone(), eda.detect_outliers(column)?)),
        None => None,
    };

    if let Some(column) = &args.remove_outliers {
        let (Some(lower), Some(upper)) = (args.lower, args.upper) else {
            return Err(anyhow!("--remove-outliers needs both --lower and --upper"));
        };
        eda.remove_outliers(column, lower, upper)?;
    }

    let report = match eda.full_eda() {
        Ok(report) => report,
        Err(e) => {
            error!("Report failed [{}]: {}", e.error_code(), e);
            return Err(anyhow!("Report failed: {}", e));
        }
    };

    if args.json {
        let output = json!({
            "input_file": args.input,
            "missing_values": missing,
            "outliers": outliers.as_ref().map(|(column, values)| json!({
                "column": column,
                "values": values,
            })),
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let stem = extract_file_stem(&args.input);
    let (html_path, json_path) = report.write_to_dir(&output_dir, &stem)?;

    print_summary(
        &args,
        original_shape,
        eda.data().shape(),
        &missing,
        outliers.as_ref(),
    );
    println!("Report: {}", html_path.display());
    println!("Data:   {}", json_path.display());

    Ok(())
}

/// Print a human-readable summary of the run.
fn print_summary(
    args: &Args,
    original_shape: (usize, usize),
    final_shape: (usize, usize),
    missing: &[MissingValueCount],
    outliers: Option<&(String, Vec<f64>)>,
) {
    println!();
    println!("{}", "=".repeat(60));
    println!("EDA COMPLETE");
    println!("{}", "=".repeat(60));
    println!(
        "Input:  {} ({} rows x {} columns)",
        args.input, original_shape.0, original_shape.1
    );
    println!("Target: {}", args.target);
    if final_shape.0 != original_shape.0 {
        println!(
            "Rows after outlier removal: {} ({} removed)",
            final_shape.0,
            original_shape.0 - final_shape.0
        );
    }
    println!();

    let with_nulls: Vec<&MissingValueCount> =
        missing.iter().filter(|m| m.null_count > 0).collect();
    if with_nulls.is_empty() {
        println!("Missing values: none");
    } else {
        println!("Missing values:");
        for entry in with_nulls {
            println!(
                "  {:<24} {:>8} ({:.1}%)",
                entry.column, entry.null_count, entry.null_percentage
            );
        }
    }

    if let Some((column, values)) = outliers {
        println!();
        println!("Outliers in '{}': {}", column, values.len());
        for value in values.iter().take(10) {
            println!("  {}", value);
        }
        if values.len() > 10 {
            println!("  ... and {} more", values.len() - 10);
        }
    }
    println!();
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string()
}

/// Load a Parquet file directly, anything else as CSV.
fn load_dataset(path: &str) -> Result<DataFrame> {
    let is_parquet = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));

    if is_parquet {
        let file = std::fs::File::open(path)?;
        return ParquetReader::new(file)
            .finish()
            .map_err(|e| anyhow!("Failed to read parquet file: {}", e));
    }

    load_csv_with_fallbacks(path)
}

/// Load CSV with multiple fallback strategies
fn load_csv_with_fallbacks(path: &str) -> Result<DataFrame> {
    // Strategy 1: Standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    // Strategy 2: Scan the whole file for the schema
    match CsvReadOptions::default()
        .with_infer_schema_length(None)
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Full schema inference failed: {}", e);
        }
    }

    // Strategy 3: Pre-clean content
    let content = std::fs::read_to_string(path).map_err(|e| {
        error!("Could not read file: {}", e);
        e
    })?;
    let cursor = std::io::Cursor::new(clean_csv_content(&content));

    CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .into_reader_with_file_handle(cursor)
        .finish()
        .map_err(|e| e.into())
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
