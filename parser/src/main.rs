//! @ai:module:intent CLI entry point for marker extraction and argument parsing
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on extractor, config, dispatch, output

use clap::{Parser, Subcommand, ValueEnum};
use markers::{
    check_bounds, classify, dispatch, extractor, output, ExtractOptions, MarkersConfig,
    OutputFormat, Registry, TypeShape, Value,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "markers")]
#[command(author, version, about = "Extract typed markers from source comments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract markers from a file or directory
    Extract {
        /// Path to file or directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// TOML file with marker definitions
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,

        /// Exit with code 1 if any marker failed to parse
        #[arg(long, default_value = "false")]
        strict: bool,

        /// Stop at the first marker that fails to parse
        #[arg(long, default_value = "false")]
        fail_fast: bool,
    },

    /// Parse an argument literal into a value of the given type
    Parse {
        /// Destination type, e.g. `Vec<i32>` or `map[string]any`
        #[arg(long = "type", short, default_value = "any")]
        type_name: String,

        /// Literal to parse
        literal: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show the argument descriptor for a type
    Classify {
        /// Type description
        type_name: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("markers=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_registry(config: Option<&Path>) -> markers::Result<Registry> {
    match config {
        Some(path) => MarkersConfig::load(path)?.into_registry(),
        None => Ok(Registry::default()),
    }
}

fn run_extract(
    path: &Path,
    config: Option<&Path>,
    format: OutputFormat,
    options: ExtractOptions,
) -> markers::Result<bool> {
    let registry = load_registry(config)?;

    if path.is_file() {
        let parsed = extractor::extract_file_with(path, &registry, options)?;
        println!("{}", output::format_parsed_file(&parsed, format));
        Ok(parsed.diagnostics.is_empty())
    } else {
        let project = extractor::extract_directory(path, &registry, options)?;
        println!("{}", output::format_project(&project, format));
        Ok(project.is_clean())
    }
}

fn run_parse(type_name: &str, literal: &str, format: OutputFormat) -> markers::Result<()> {
    let shape: TypeShape = type_name.parse()?;
    let info = classify(&shape)?;
    let mut value = Value::Null;
    dispatch::parse(&info, literal, &mut value)?;
    check_bounds(&shape, &value, 0)?;
    println!("{}", output::format_value(&value, format));
    Ok(())
}

fn run_classify(type_name: &str, format: OutputFormat) -> markers::Result<()> {
    let shape: TypeShape = type_name.parse()?;
    let info = classify(&shape)?;
    print!("{}", output::format_type_info(&info, format));
    if format != OutputFormat::Text {
        println!();
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            path,
            config,
            format,
            strict,
            fail_fast,
        } => run_extract(&path, config.as_deref(), format.into(), ExtractOptions { fail_fast })
            .map(|clean| clean || !strict),

        Commands::Parse {
            type_name,
            literal,
            format,
        } => run_parse(&type_name, &literal, format.into()).map(|_| true),

        Commands::Classify { type_name, format } => {
            run_classify(&type_name, format.into()).map(|_| true)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
