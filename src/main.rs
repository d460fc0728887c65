//! Microservice entry point.
//!
//! Parses the command line, loads configuration from TOML, initializes
//! tracing, then either serves the HTTP API or converts markdown
//! documentation to PDF.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use microservice::config::{
    AppConfig, HttpOverrides, LogFormat, PageSize, PdfOverrides, DEFAULT_CONFIG_PATH,
    DEFAULT_LOG_FILTER,
};
use microservice::http::start_server;
use microservice::pdf::{self, PdfOptions};
use microservice::{create_router, AppState};

/// A minimal JSON microservice with a markdown to PDF converter
#[derive(Parser, Debug)]
#[command(name = "microservice", version, about)]
struct Cli {
    /// Path to configuration file (defaults are used if the default path is absent)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log level filter (e.g., "microservice=debug,tower_http=info")
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default)
    Serve(ServeArgs),
    /// Convert a markdown document to PDF
    ConvertPdf(ConvertArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Address to bind, overriding http.host
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overriding http.port
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Markdown file to convert, overriding pdf.input
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// PDF file to write, overriding pdf.output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Paper size, overriding pdf.page_size
    #[arg(long, value_enum)]
    page_size: Option<PageSize>,

    /// Document title, overriding pdf.title
    #[arg(long)]
    title: Option<String>,
}

impl From<ServeArgs> for HttpOverrides {
    fn from(args: ServeArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
        }
    }
}

impl From<ConvertArgs> for PdfOverrides {
    fn from(args: ConvertArgs) -> Self {
        Self {
            input: args.input.map(|p| p.to_string_lossy().into_owned()),
            output: args.output.map(|p| p.to_string_lossy().into_owned()),
            page_size: args.page_size,
            title: args.title,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // An explicit --config must exist; the default path is optional
    let (mut config, loaded_from) = match cli.config.as_deref() {
        Some(path) => (AppConfig::load(path)?, Some(path)),
        None => match AppConfig::load_if_exists(DEFAULT_CONFIG_PATH)? {
            Some(config) => (config, Some(DEFAULT_CONFIG_PATH)),
            None => (AppConfig::default(), None),
        },
    };

    // Initialize tracing with priority: CLI > env > default
    let log_filter = cli
        .log_level
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, config.logging.format);

    match loaded_from {
        Some(path) => tracing::info!(path, "Loaded configuration"),
        None => tracing::info!(
            path = DEFAULT_CONFIG_PATH,
            "Config file not found, using defaults"
        ),
    }

    match cli.command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::Serve(args) => {
            config.apply_http_overrides(args.into())?;

            let http = config.http.clone();
            let app = create_router(AppState::new(config));
            start_server(app, &http).await?;
        }
        Command::ConvertPdf(args) => {
            config.apply_pdf_overrides(args.into())?;

            let options = PdfOptions::from(&config.pdf);
            let input = PathBuf::from(&config.pdf.input);
            let output = PathBuf::from(&config.pdf.output);
            if let Err(e) = pdf::convert(&input, &output, options) {
                tracing::error!(error = %e, "PDF conversion failed");
                return Err(e.into());
            }
        }
    }

    Ok(())
}

fn init_tracing(filter: &str, format: LogFormat) {
    let registry = tracing_subscriber::registry().with(EnvFilter::new(filter));
    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}
