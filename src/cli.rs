//! CLI interface module
//!
//! Provides command-line interface using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

#[cfg(feature = "web")]
use crate::config::CliOverrides;

/// Exit codes for the CLI
///
/// These codes follow standard Unix conventions and provide
/// specific error categories for scripting and automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Normal termination
    Success = 0,
    /// Unclassified failure
    GeneralError = 1,
    /// Invalid arguments or configuration
    InvalidArgs = 2,
    /// Input file not found
    InputNotFound = 3,
    /// Output could not be written
    OutputError = 4,
    /// An image or color could not be analyzed
    AnalysisError = 5,
}

impl ExitCode {
    /// Convert to process exit code
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Get human-readable description
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::GeneralError => "General error",
            ExitCode::InvalidArgs => "Invalid arguments",
            ExitCode::InputNotFound => "Input file not found",
            ExitCode::OutputError => "Output error (serialization, broken pipe, etc.)",
            ExitCode::AnalysisError => "Analysis error (undecodable image, malformed color)",
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.code() as u8)
    }
}

/// Command failure carrying the exit code category
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    InputNotFound(String),

    #[error("{0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Analysis(String),

    #[error("{0}")]
    Output(String),

    #[error("{0}")]
    General(String),
}

impl CliError {
    /// Exit code reported for this failure
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::InputNotFound(_) => ExitCode::InputNotFound,
            CliError::InvalidArgs(_) => ExitCode::InvalidArgs,
            CliError::Analysis(_) => ExitCode::AnalysisError,
            CliError::Output(_) => ExitCode::OutputError,
            CliError::General(_) => ExitCode::GeneralError,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(format!("Failed to serialize output: {}", e))
    }
}

/// Undertone labels accepted on the command line
pub const UNDERTONE_CHOICES: [&str; 3] = ["Warm", "Cool", "Neutral"];

/// Fashion color analysis: garment scanning, skin tone profiling, outfit matching
#[derive(Parser, Debug)]
#[command(name = "lokafit")]
#[command(author = "LokaFit Contributors")]
#[command(version)]
#[command(about = "Fashion color analysis engine and API server", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./lokafit.toml, then the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter selected by `-v`/`-q`, if any
    pub fn log_directive(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("warn");
        }
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    #[cfg(feature = "web")]
    Serve(ServeArgs),
    /// Extract color, shape and type from garment images
    Scan(ScanArgs),
    /// Classify skin tone and undertone from a face photo
    Profile(ProfileArgs),
    /// Recommend matching colors for an item color
    Match(MatchArgs),
    /// Show build and configuration information
    Info,
}

/// Arguments for the serve command
#[cfg(feature = "web")]
#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on (default: 8000)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind to (default: 0.0.0.0)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Maximum upload size in MB (default: 10)
    #[arg(long)]
    pub upload_limit: Option<usize>,

    /// Allowed CORS origin, repeatable; `https://*.example.com` wildcards accepted
    #[arg(long = "cors-origin")]
    pub cors_origins: Vec<String>,

    /// Disable CORS handling
    #[arg(long)]
    pub no_cors: bool,
}

#[cfg(feature = "web")]
impl ServeArgs {
    /// Convert to config overrides (upload limit converted to bytes)
    pub fn to_overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides::new().with_no_cors(self.no_cors);
        if let Some(port) = self.port {
            overrides = overrides.with_port(port);
        }
        if let Some(bind) = &self.bind {
            overrides = overrides.with_bind(bind.clone());
        }
        if let Some(mb) = self.upload_limit {
            overrides = overrides.with_upload_limit(mb.saturating_mul(1024 * 1024));
        }
        if !self.cors_origins.is_empty() {
            overrides = overrides.with_cors_origins(self.cors_origins.clone());
        }
        overrides
    }
}

/// Arguments for the scan command
#[derive(clap::Args, Debug)]
pub struct ScanArgs {
    /// Garment image files (JPEG, PNG, WebP)
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Only extract the dominant color
    #[arg(long)]
    pub quick: bool,

    /// Print JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the profile command
#[derive(clap::Args, Debug)]
pub struct ProfileArgs {
    /// Face photo (JPEG, PNG, WebP)
    pub image: PathBuf,

    /// Print JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the match command
#[derive(clap::Args, Debug)]
pub struct MatchArgs {
    /// Item color as `#RRGGBB`
    pub color: String,

    /// Wearer undertone
    #[arg(short, long, default_value = "Neutral", value_parser = UNDERTONE_CHOICES)]
    pub undertone: String,

    /// Print JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        // Verify CLI can be built
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_display() {
        let mut cmd = Cli::command();
        let help = cmd.render_help().to_string();
        assert!(help.contains("lokafit"));
        assert!(help.contains("scan"));
        assert!(help.contains("match"));
    }

    #[test]
    fn test_version_display() {
        let cmd = Cli::command();
        let version = cmd.get_version().unwrap_or("unknown");
        assert!(!version.is_empty());
    }

    #[test]
    fn test_scan_missing_input_error() {
        let result = Cli::try_parse_from(["lokafit", "scan"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("required"));
    }

    #[test]
    fn test_scan_parsing() {
        let cli = Cli::try_parse_from(["lokafit", "scan", "a.jpg", "b.png", "--quick", "--json"])
            .unwrap();

        if let Commands::Scan(args) = cli.command {
            assert_eq!(args.images.len(), 2);
            assert!(args.quick);
            assert!(args.json);
        } else {
            panic!("Expected Scan command");
        }
    }

    #[test]
    fn test_match_default_undertone() {
        let cli = Cli::try_parse_from(["lokafit", "match", "#FF0000"]).unwrap();

        if let Commands::Match(args) = cli.command {
            assert_eq!(args.color, "#FF0000");
            assert_eq!(args.undertone, "Neutral");
            assert!(!args.json);
        } else {
            panic!("Expected Match command");
        }
    }

    #[test]
    fn test_match_invalid_undertone() {
        let result = Cli::try_parse_from(["lokafit", "match", "#FF0000", "-u", "Olive"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["lokafit", "match", "#FF0000", "-u", "Cool"]).unwrap();
        assert!(matches!(cli.command, Commands::Match(ref a) if a.undertone == "Cool"));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["lokafit", "profile", "face.jpg", "-vv", "-c", "x.toml"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert_eq!(cli.log_directive(), Some("trace"));

        let cli = Cli::try_parse_from(["lokafit", "-q", "info"]).unwrap();
        assert_eq!(cli.log_directive(), Some("warn"));

        let cli = Cli::try_parse_from(["lokafit", "info"]).unwrap();
        assert_eq!(cli.log_directive(), None);
        assert!(matches!(cli.command, Commands::Info));
    }

    #[cfg(feature = "web")]
    #[test]
    fn test_serve_overrides() {
        let cli = Cli::try_parse_from([
            "lokafit",
            "serve",
            "--port",
            "9000",
            "--upload-limit",
            "5",
            "--cors-origin",
            "https://a.example",
            "--cors-origin",
            "https://*.b.example",
        ])
        .unwrap();

        if let Commands::Serve(args) = cli.command {
            let overrides = args.to_overrides();
            assert_eq!(overrides.port, Some(9000));
            assert_eq!(overrides.bind, None);
            assert_eq!(overrides.upload_limit, Some(5 * 1024 * 1024));
            assert_eq!(overrides.cors_origins.map(|o| o.len()), Some(2));
            assert!(!overrides.no_cors);
        } else {
            panic!("Expected Serve command");
        }
    }

    // Exit code tests
    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::GeneralError.code(), 1);
        assert_eq!(ExitCode::InvalidArgs.code(), 2);
        assert_eq!(ExitCode::InputNotFound.code(), 3);
        assert_eq!(ExitCode::OutputError.code(), 4);
        assert_eq!(ExitCode::AnalysisError.code(), 5);
    }

    #[test]
    fn test_exit_code_descriptions() {
        assert_eq!(ExitCode::Success.description(), "Success");
        assert!(!ExitCode::GeneralError.description().is_empty());
        assert!(!ExitCode::InvalidArgs.description().is_empty());
        assert!(!ExitCode::InputNotFound.description().is_empty());
        assert!(!ExitCode::OutputError.description().is_empty());
        assert!(!ExitCode::AnalysisError.description().is_empty());
    }

    #[test]
    fn test_cli_error_exit_code() {
        let err = CliError::InputNotFound("File not found: a.jpg".to_string());
        assert_eq!(err.exit_code(), ExitCode::InputNotFound);
        assert_eq!(err.to_string(), "File not found: a.jpg");
        assert_eq!(
            CliError::Analysis(String::new()).exit_code(),
            ExitCode::AnalysisError
        );
    }

    #[test]
    fn test_exit_code_into_process_exit_code() {
        for code in [ExitCode::Success, ExitCode::InputNotFound, ExitCode::AnalysisError] {
            let _: std::process::ExitCode = code.into();
            assert!((0..=5).contains(&code.code()));
        }
        assert_eq!(ExitCode::AnalysisError.code(), 5);
    }
}
