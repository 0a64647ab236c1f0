#[cfg(feature = "cli")]
use clap::Parser;

/// Lay out a database schema and print the export document
#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "schemaflow", version, about)]
struct Args {
    /// Schema JSON file
    #[arg(required_unless_present = "sample", conflicts_with = "sample")]
    schema: Option<std::path::PathBuf>,

    /// Use the bundled sample database instead of a file
    #[arg(long)]
    sample: bool,

    /// Layout direction: LR or TB (overrides SCHEMAFLOW_DIRECTION)
    #[arg(long, short)]
    direction: Option<schemaflow::Direction>,

    /// Horizontal spacing (overrides SCHEMAFLOW_X_SPACING)
    #[arg(long, value_parser = spacing_arg)]
    x_spacing: Option<f64>,

    /// Vertical spacing (overrides SCHEMAFLOW_Y_SPACING)
    #[arg(long, value_parser = spacing_arg)]
    y_spacing: Option<f64>,

    /// Write the export document here instead of stdout; a directory gets a
    /// dated `schemaflow-<source>-<date>.json` file
    #[arg(long, short)]
    output: Option<std::path::PathBuf>,

    /// Only validate the schema
    #[arg(long)]
    validate_only: bool,
}

#[cfg(feature = "cli")]
fn spacing_arg(raw: &str) -> Result<f64, String> {
    schemaflow::core::parse_spacing(raw)
        .ok_or_else(|| format!("'{}' is not a finite, non-negative number", raw))
}

#[cfg(feature = "cli")]
fn run(args: Args) -> schemaflow::Result<bool> {
    use schemaflow::core::{
        Config, Error, ExportDocument, Schema, build_diagram, export_path, sample_schema,
    };

    let mut config = Config::from_env();
    if let Some(direction) = args.direction {
        config.direction = direction;
    }
    if let Some(x) = args.x_spacing {
        config.layout.x_spacing = x;
    }
    if let Some(y) = args.y_spacing {
        config.layout.y_spacing = y;
    }

    let schema = match &args.schema {
        Some(path) => {
            tracing::info!("Loading schema from {}", path.display());
            Schema::from_json(&std::fs::read_to_string(path)?)?
        }
        None => sample_schema(),
    };

    if args.validate_only {
        let validation = schemaflow::validate_schema(&schema);
        for error in &validation.errors {
            eprintln!("error: {}", error);
        }
        if validation.is_valid() {
            println!("schema '{}' is valid", schema.metadata.name);
        }
        return Ok(validation.is_valid());
    }

    let graph = match build_diagram(&schema, config.direction, &config.layout) {
        Ok(graph) => graph,
        Err(Error::InvalidSchema(errors)) => {
            for error in &errors {
                eprintln!("error: {}", error);
            }
            return Ok(false);
        }
        Err(e) => return Err(e),
    };

    let source_id = match &args.schema {
        Some(path) => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| schema.metadata.name.clone()),
        None => "sample".to_string(),
    };
    let json = ExportDocument::new(schema, &graph.nodes).to_json_pretty()?;

    match &args.output {
        Some(output) => {
            let path = export_path(output, &source_id, chrono::Local::now().date_naive());
            std::fs::write(&path, json)?;
            tracing::info!("Export written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(true)
}

#[cfg(feature = "cli")]
fn main() -> std::process::ExitCode {
    use std::process::ExitCode;

    // Load .env file (if exists)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "cli"))]
pub fn main() {
    // no binary without the cli feature; the library is the product
}
