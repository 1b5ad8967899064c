//! Renders saved model responses into HTML wireframes and checks them for errors.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use wireframe_gen::export::{file_name, to_json_pretty, DEFAULT_PREFIX};
use wireframe_gen::{
    assemble, parse_response, CoordinateConvention, ViewMode, WireframeConfig, WireframeError,
};

#[derive(Parser)]
#[command(name = "wireframe-render")]
#[command(about = "Render model responses into HTML wireframes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one response file into an HTML document
    Render {
        /// File holding the raw model response
        file: PathBuf,

        /// Output path (defaults to a timestamped name in the current directory)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Also write the parsed model as pretty JSON next to the HTML
        #[arg(long)]
        json: bool,

        /// Coordinate convention: pixel-y (a) or percent-grid (b)
        #[arg(long, value_parser = parse_convention)]
        convention: Option<CoordinateConvention>,

        /// Page shown first
        #[arg(short, long)]
        page: Option<String>,

        /// Start in the stacked mobile view
        #[arg(long)]
        mobile: bool,
    },

    /// Check response files without rendering
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn parse_convention(value: &str) -> Result<CoordinateConvention, String> {
    match value.to_ascii_lowercase().as_str() {
        "pixel-y" | "a" => Ok(CoordinateConvention::PixelY),
        "percent-grid" | "b" => Ok(CoordinateConvention::PercentGrid),
        other => Err(format!(
            "unknown convention '{}', expected pixel-y or percent-grid",
            other
        )),
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };
    process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let mut config = match &cli.config {
        Some(path) => WireframeConfig::load(path)?,
        None => WireframeConfig::default(),
    };

    match cli.command {
        Commands::Render {
            file,
            out,
            json,
            convention,
            page,
            mobile,
        } => {
            if let Some(convention) = convention {
                config.convention = convention;
            }
            if mobile {
                config.view_mode = ViewMode::Mobile;
            }
            render_file(&file, out, json, page.as_deref(), &config)
        }
        Commands::Validate { files } => Ok(validate_files(&files, &config)),
    }
}

fn render_file(
    file: &Path,
    out: Option<PathBuf>,
    json: bool,
    page: Option<&str>,
    config: &WireframeConfig,
) -> Result<i32> {
    let raw = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let parsed = match parse_response(&raw, config.convention) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("✗ {} could not be rendered:", file.display());
            print_error(&e);
            return Ok(1);
        }
    };

    let mut document = assemble(&parsed.website, config);
    if let Some(page_id) = page {
        if !document.switch_to(page_id) {
            eprintln!("  Unknown page '{}', showing the first page", page_id);
        }
    }

    let now = Utc::now();
    let out = out.unwrap_or_else(|| PathBuf::from(file_name(DEFAULT_PREFIX, "html", &now)));
    fs::write(&out, document.to_html())
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!("✓ {} -> {}", file.display(), out.display());

    if json {
        let json_path = out.with_extension("json");
        fs::write(&json_path, to_json_pretty(&parsed.website)?)
            .with_context(|| format!("Failed to write {}", json_path.display()))?;
        println!("✓ model -> {}", json_path.display());
    }

    Ok(0)
}

fn validate_files(files: &[PathBuf], config: &WireframeConfig) -> i32 {
    let mut exit_code = 0;

    for path in files {
        let result = fs::read_to_string(path)
            .map_err(|e| WireframeError::Config(format!("Failed to read file: {}", e)))
            .and_then(|raw| parse_response(&raw, config.convention));

        match result {
            Ok(parsed) => {
                println!(
                    "✓ {} is valid ({} page{})",
                    path.display(),
                    parsed.website.pages.len(),
                    if parsed.website.pages.len() == 1 { "" } else { "s" }
                );
            }
            Err(e) => {
                eprintln!("✗ {} has errors:", path.display());
                print_error(&e);
                exit_code = 1;
            }
        }
    }

    exit_code
}

fn print_error(error: &WireframeError) {
    eprintln!("  {}", error.user_message());
    match error {
        WireframeError::InvalidJson {
            line,
            column,
            message,
            ..
        } => {
            eprintln!("  Parse error at line {}, column {}:", line, column);
            eprintln!("    {}", message);
        }
        WireframeError::SchemaViolation { path, reason, .. } => {
            eprintln!("  Invalid structure at '{}':", path);
            eprintln!("    {}", reason);
        }
        _ => {}
    }
    if let Some(raw) = error.raw_text() {
        eprintln!("  Raw response:");
        for line in raw.lines() {
            eprintln!("    | {}", line);
        }
    }
}
