//! Command-line interface for eabra
//! This binary extracts linguistic complexity features from a column of a CSV file, or from a
//! single text given on the command line.
//!
//! Usage:
//!   eabra `<input.csv>` [--text-column `<name>`] [--output `<path>`] [--format csv|json]
//!   eabra --text `<raw text>`      - Print one feature record as JSON
//!   eabra --list-features          - List every feature the configured pipeline emits
//!
//! Settings come from the built-in defaults, then `eabra.toml` in the working directory (or the
//! file given with `--config`), then the flags.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::builder::PossibleValuesParser;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use eabra_config::{EabraConfig, Loader, OutputFormat};
use eabra_core::annotation::AVAILABLE_ANNOTATORS;
use eabra_core::extractors::DEFAULT_FAMILIES;
use eabra_core::{EabraError, Pipeline, Table};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const LOCAL_CONFIG: &str = "eabra.toml";

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Eabra(#[from] EabraError),
    #[error("cannot write output: {0}")]
    Io(#[from] io::Error),
    #[error("cannot serialise output: {0}")]
    Json(#[from] serde_json::Error),
}

fn cli() -> Command {
    Command::new("eabra")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract linguistic complexity features from text")
        .arg_required_else_help(true)
        .arg(
            Arg::new("input")
                .help("CSV file with a header row")
                .value_parser(value_parser!(PathBuf))
                .required_unless_present_any(["text", "list-features"])
                .index(1),
        )
        .arg(
            Arg::new("text-column")
                .long("text-column")
                .short('t')
                .help("Column holding the text to analyse")
                .default_value("text"),
        )
        .arg(
            Arg::new("text")
                .long("text")
                .help("Analyse a single text and print its features as JSON")
                .conflicts_with_all(["input", "list-features"]),
        )
        .arg(
            Arg::new("list-features")
                .long("list-features")
                .help("List every feature name with its family")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Write results to this file instead of stdout")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format for batch results (default from config: csv)")
                .value_parser(["csv", "json"]),
        )
        .arg(
            Arg::new("missing")
                .long("missing")
                .help("Cell text for features a row does not have (CSV output)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("annotator")
                .long("annotator")
                .short('a')
                .help("Annotation provider")
                .value_parser(PossibleValuesParser::new(AVAILABLE_ANNOTATORS.iter().copied())),
        )
        .arg(
            Arg::new("families")
                .long("families")
                .help("Comma-separated extractor families, in output order")
                .value_delimiter(',')
                .action(ArgAction::Append)
                .value_parser(PossibleValuesParser::new(DEFAULT_FAMILIES.iter().copied())),
        )
        .arg(
            Arg::new("sequential")
                .long("sequential")
                .help("Process families and rows one at a time")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase logging verbosity (-v info, -vv debug, -vvv trace)")
                .action(ArgAction::Count),
        )
}

fn main() {
    let matches = cli().get_matches();

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    init_tracing(matches.get_count("verbose"), &config.logging.filter);

    if let Err(e) = run(&matches, &config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Defaults, then the config file, then flags.
fn load_config(matches: &ArgMatches) -> Result<EabraConfig, CliError> {
    let mut loader = match matches.get_one::<PathBuf>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };
    if let Some(name) = matches.get_one::<String>("annotator") {
        loader = loader.set_override("annotation.provider", name.as_str())?;
    }
    if let Some(families) = matches.get_many::<String>("families") {
        let families: Vec<String> = families.cloned().collect();
        loader = loader.set_override("pipeline.families", families)?;
    }
    if matches.get_flag("sequential") {
        loader = loader.set_override("pipeline.parallel", false)?;
    }
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader.set_override("output.format", format.as_str())?;
    }
    if let Some(missing) = matches.get_one::<String>("missing") {
        loader = loader.set_override("output.missing_value", missing.as_str())?;
    }
    Ok(loader.build()?)
}

/// `-v` flags win over `RUST_LOG`, which wins over the configured filter.
fn init_tracing(verbose: u8, configured: &str) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured)),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(matches: &ArgMatches, config: &EabraConfig) -> Result<(), CliError> {
    let pipeline = config.build_pipeline()?;

    if matches.get_flag("list-features") {
        handle_list_features(&pipeline)?;
    } else if let Some(text) = matches.get_one::<String>("text") {
        handle_text(&pipeline, text)?;
    } else if let Some(input) = matches.get_one::<PathBuf>("input") {
        let column = matches
            .get_one::<String>("text-column")
            .map(String::as_str)
            .unwrap_or("text");
        let output = matches.get_one::<PathBuf>("output").map(PathBuf::as_path);
        handle_batch(&pipeline, config, input, column, output)?;
    }

    pipeline.close();
    Ok(())
}

/// Handle --list-features: one `name<TAB>family` line per feature
fn handle_list_features(pipeline: &Pipeline) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    for family in pipeline.registry().iter() {
        for name in family.feature_names() {
            writeln!(out, "{}\t{}", name, family.name())?;
        }
    }
    Ok(())
}

/// Handle --text
fn handle_text(pipeline: &Pipeline, text: &str) -> Result<(), CliError> {
    let record = pipeline.process_text(text)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

/// Handle the batch command
fn handle_batch(
    pipeline: &Pipeline,
    config: &EabraConfig,
    input: &Path,
    column: &str,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let table = Table::from_csv_path(input)?;
    info!(path = %input.display(), rows = table.len(), "read input");
    let results = pipeline.process_batch(&table, column)?;

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    match config.output.format {
        OutputFormat::Csv => results.write_csv(&mut writer, &config.output.missing_value)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &results.to_json())?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;

    if let Some(path) = output {
        info!(path = %path.display(), rows = results.len(), "wrote results");
    }
    Ok(())
}
