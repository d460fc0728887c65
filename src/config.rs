//! Configuration loading and constants.
//!
//! Loads application configuration from TOML files and defines constants for
//! the HTTP listener, response headers, logging and PDF conversion defaults.
//! `AppConfig` is the root configuration struct containing all settings.

use const_format::formatcp;
use serde::{Deserialize, Serialize};
use std::path::Path;

// =============================================================================
// HTTP Server Defaults
// =============================================================================

/// Default bind address for the HTTP listener
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Default maximum accepted request body (1 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Seconds to wait for in-flight requests after a shutdown signal
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// HTTP Response Headers and Bodies
// =============================================================================

/// Health responses must never be served from an intermediate cache
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

/// Response header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Status reported by the liveness check
pub const HEALTH_STATUS: &str = "healthy";

/// Result message wrapped around echoed `/data` payloads
pub const DATA_PROCESSED_MESSAGE: &str = "Data processed successfully";

// =============================================================================
// Logging
// =============================================================================

const CRATE_NAME: &str = env!("CARGO_CRATE_NAME");

/// Default log filter when neither `--log-level` nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = formatcp!("{}=info,tower_http=info", CRATE_NAME);

// =============================================================================
// PDF Conversion Defaults
// =============================================================================

/// Markdown document converted when no input is given
pub const DEFAULT_PDF_INPUT: &str = "PROJECT_DOCUMENTATION.md";

/// PDF written when no output is given
pub const DEFAULT_PDF_OUTPUT: &str = "Microservice_CI_CD_Pipeline_Documentation.pdf";

/// Page margin on every side, in millimetres
pub const DEFAULT_PDF_MARGIN_MM: f32 = 20.0;

/// Body text size, in points
pub const DEFAULT_PDF_FONT_SIZE: f32 = 11.0;

/// Smallest and largest accepted body text size, in points
pub const PDF_FONT_SIZE_RANGE: (f32, f32) = (6.0, 36.0);

// =============================================================================
// Default Paths
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Markdown to PDF conversion settings
    #[serde(default)]
    pub pdf: PdfConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    /// Requests with larger bodies are rejected with 413
    #[serde(default = "HttpServerConfig::default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Connection draining window on SIGTERM/SIGINT
    #[serde(default = "HttpServerConfig::default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            max_body_bytes: Self::default_max_body_bytes(),
            shutdown_timeout_seconds: Self::default_shutdown_timeout(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }

    fn default_max_body_bytes() -> usize {
        DEFAULT_MAX_BODY_BYTES
    }

    fn default_shutdown_timeout() -> u64 {
        DEFAULT_SHUTDOWN_TIMEOUT_SECS
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default)]
    pub format: LogFormat,
}

/// Paper sizes supported by the PDF converter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// Page width and height in millimetres
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
        }
    }
}

/// Markdown to PDF conversion settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PdfConfig {
    #[serde(default = "PdfConfig::default_input")]
    pub input: String,
    #[serde(default = "PdfConfig::default_output")]
    pub output: String,
    #[serde(default)]
    pub page_size: PageSize,
    #[serde(default = "PdfConfig::default_margin")]
    pub margin_mm: f32,
    #[serde(default = "PdfConfig::default_font_size")]
    pub font_size: f32,
    /// Document title metadata. Defaults to the input file stem.
    pub title: Option<String>,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            input: Self::default_input(),
            output: Self::default_output(),
            page_size: PageSize::default(),
            margin_mm: Self::default_margin(),
            font_size: Self::default_font_size(),
            title: None,
        }
    }
}

impl PdfConfig {
    fn default_input() -> String {
        DEFAULT_PDF_INPUT.to_string()
    }

    fn default_output() -> String {
        DEFAULT_PDF_OUTPUT.to_string()
    }

    fn default_margin() -> f32 {
        DEFAULT_PDF_MARGIN_MM
    }

    fn default_font_size() -> f32 {
        DEFAULT_PDF_FONT_SIZE
    }
}

/// `serve` flags; `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct HttpOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// `convert-pdf` flags; `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct PdfOverrides {
    pub input: Option<String>,
    pub output: Option<String>,
    pub page_size: Option<PageSize>,
    pub title: Option<String>,
}

impl AppConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Load configuration if the file exists, `None` when it is absent.
    ///
    /// Only used for the default path: a path the operator named explicitly
    /// must exist and goes through [`AppConfig::load`].
    pub fn load_if_exists<P: AsRef<Path>>(path: P) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Apply `serve` command-line flags on top of the file values, then revalidate.
    pub fn apply_http_overrides(&mut self, overrides: HttpOverrides) -> Result<(), ConfigError> {
        if let Some(host) = overrides.host {
            self.http.host = host;
        }
        if let Some(port) = overrides.port {
            self.http.port = port;
        }
        self.validate()
    }

    /// Apply `convert-pdf` command-line flags on top of the file values, then revalidate.
    pub fn apply_pdf_overrides(&mut self, overrides: PdfOverrides) -> Result<(), ConfigError> {
        if let Some(input) = overrides.input {
            self.pdf.input = input;
        }
        if let Some(output) = overrides.output {
            self.pdf.output = output;
        }
        if let Some(page_size) = overrides.page_size {
            self.pdf.page_size = page_size;
        }
        if overrides.title.is_some() {
            self.pdf.title = overrides.title;
        }
        self.validate()
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation(
                "http.port must be between 1 and 65535".to_string(),
            ));
        }
        if self.http.max_body_bytes == 0 {
            return Err(ConfigError::Validation(
                "http.max_body_bytes must be greater than zero".to_string(),
            ));
        }
        if self.http.shutdown_timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "http.shutdown_timeout_seconds must be greater than zero".to_string(),
            ));
        }

        let (width, height) = self.pdf.page_size.dimensions_mm();
        if !self.pdf.margin_mm.is_finite()
            || self.pdf.margin_mm < 0.0
            || self.pdf.margin_mm * 2.0 >= width.min(height)
        {
            return Err(ConfigError::Validation(format!(
                "pdf.margin_mm must leave a printable area (got {})",
                self.pdf.margin_mm
            )));
        }
        let (min_size, max_size) = PDF_FONT_SIZE_RANGE;
        if !(min_size..=max_size).contains(&self.pdf.font_size) {
            return Err(ConfigError::Validation(format!(
                "pdf.font_size must be between {} and {} (got {})",
                min_size, max_size, self.pdf.font_size
            )));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_listen_address_and_paths() {
        let config = AppConfig::default();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 5000);
        assert_eq!(config.logging.format, LogFormat::Text);
        assert_eq!(config.pdf.input, "PROJECT_DOCUMENTATION.md");
        assert_eq!(
            config.pdf.output,
            "Microservice_CI_CD_Pipeline_Documentation.pdf"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.http.port, DEFAULT_HTTP_PORT);
        assert_eq!(config.http.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [http]
            host = "127.0.0.1"
            port = 8080
            max_body_bytes = 4096
            shutdown_timeout_seconds = 5

            [logging]
            format = "json"

            [pdf]
            input = "docs/README.md"
            output = "out.pdf"
            page_size = "letter"
            margin_mm = 15.0
            font_size = 10.0
            title = "Runbook"
        "#;
        let config = AppConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.http.max_body_bytes, 4096);
        assert_eq!(config.http.shutdown_timeout_seconds, 5);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.pdf.page_size, PageSize::Letter);
        assert_eq!(config.pdf.title.as_deref(), Some("Runbook"));
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let err = AppConfig::from_toml_str("[logging]\nformat = \"xml\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = AppConfig::from_toml_str("[http]\nprot = 80").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_port_rejected() {
        let err = AppConfig::from_toml_str("[http]\nport = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_zero_body_limit_rejected() {
        let err = AppConfig::from_toml_str("[http]\nmax_body_bytes = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_oversized_margin_rejected() {
        let err = AppConfig::from_toml_str("[pdf]\nmargin_mm = 150.0").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_nan_margin_rejected() {
        let err = AppConfig::from_toml_str("[pdf]\nmargin_mm = nan").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        let err = AppConfig::from_toml_str("[pdf]\nmargin_mm = inf").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_nan_font_size_rejected() {
        let err = AppConfig::from_toml_str("[pdf]\nfont_size = nan").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_font_size_out_of_range_rejected() {
        let err = AppConfig::from_toml_str("[pdf]\nfont_size = 2.0").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_missing_explicit_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_if_exists_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_if_exists(dir.path().join("missing.toml")).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn test_load_if_exists_reads_present_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pdf]\npage_size = \"letter\"").unwrap();
        let config = AppConfig::load_if_exists(file.path()).unwrap().unwrap();
        assert_eq!(config.pdf.page_size, PageSize::Letter);
    }

    #[test]
    fn test_pdf_flags_override_file_values() {
        let mut config = AppConfig::from_toml_str(
            "[pdf]\ninput = \"docs/a.md\"\noutput = \"a.pdf\"\ntitle = \"From file\"",
        )
        .unwrap();
        config
            .apply_pdf_overrides(PdfOverrides {
                input: Some("docs/b.md".to_string()),
                output: None,
                page_size: Some(PageSize::Letter),
                title: Some("From flag".to_string()),
            })
            .unwrap();

        assert_eq!(config.pdf.input, "docs/b.md");
        assert_eq!(config.pdf.output, "a.pdf");
        assert_eq!(config.pdf.page_size, PageSize::Letter);
        assert_eq!(config.pdf.title.as_deref(), Some("From flag"));
    }

    #[test]
    fn test_absent_pdf_flags_keep_file_values() {
        let mut config =
            AppConfig::from_toml_str("[pdf]\npage_size = \"letter\"\ntitle = \"Runbook\"")
                .unwrap();
        config.apply_pdf_overrides(PdfOverrides::default()).unwrap();
        assert_eq!(config.pdf.page_size, PageSize::Letter);
        assert_eq!(config.pdf.title.as_deref(), Some("Runbook"));
        assert_eq!(config.pdf.input, DEFAULT_PDF_INPUT);
    }

    #[test]
    fn test_http_flags_override_file_values() {
        let mut config =
            AppConfig::from_toml_str("[http]\nhost = \"127.0.0.1\"\nport = 8080").unwrap();
        config
            .apply_http_overrides(HttpOverrides {
                host: None,
                port: Some(9090),
            })
            .unwrap();
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.http.port, 9090);
    }

    #[test]
    fn test_zero_port_flag_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_http_overrides(HttpOverrides {
                host: None,
                port: Some(0),
            })
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nport = 9000").unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.http.port, 9000);
    }

    #[test]
    fn test_default_log_filter_names_crate() {
        assert!(DEFAULT_LOG_FILTER.starts_with("microservice="));
    }

    #[test]
    fn test_page_dimensions() {
        assert_eq!(PageSize::A4.dimensions_mm(), (210.0, 297.0));
        let (w, h) = PageSize::Letter.dimensions_mm();
        assert!(w > 215.0 && h < 280.0);
    }
}
