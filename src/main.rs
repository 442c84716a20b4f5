//! lokafit - Fashion color analysis engine
//!
//! CLI entry point

use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lokafit::{
    format_duration, util, Cli, CliError, Commands, Config, ExitCode,
    GarmentProcessor, GarmentReport, MatchArgs, MixMatchRecommender, Outcome, ProfileAnalyzer,
    ProfileArgs, ScanArgs,
};

#[cfg(feature = "web")]
use lokafit::{format_file_size, ServeArgs, WebServer};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).apply_env();
    init_logging(&cli, &config);

    let result = match &cli.command {
        #[cfg(feature = "web")]
        Commands::Serve(args) => run_serve(args, &config),
        Commands::Scan(args) => run_scan(args),
        Commands::Profile(args) => run_profile(args),
        Commands::Match(args) => run_match(args),
        Commands::Info => run_info(&cli, &config),
    };

    let code = match result {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };
    tracing::debug!(code = code.code(), "exit: {}", code.description());
    code.into()
}

/// Load the explicit config file, else search the default locations
fn load_config(path: Option<&Path>) -> Config {
    let loaded = match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    loaded.unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config file: {}", e);
        Config::default()
    })
}

/// `RUST_LOG` wins, then `-v`/`-q`, then the config file and environment
fn init_logging(cli: &Cli, config: &Config) {
    let fallback = cli
        .log_directive()
        .map(str::to_string)
        .unwrap_or_else(|| config.log_filter());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_input(path: &Path) -> Result<Vec<u8>, CliError> {
    if !path.exists() {
        return Err(CliError::InputNotFound(format!(
            "Input file not found: {}",
            path.display()
        )));
    }
    util::read_file_bytes(path).map_err(CliError::General)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============ Scan Command ============

/// Per-file scan result
#[derive(Debug, Serialize)]
struct ScanEntry {
    file: PathBuf,
    #[serde(flatten)]
    outcome: Outcome<GarmentReport>,
}

/// Color-only payload of a quick scan
#[derive(Debug, Serialize)]
struct QuickColor {
    color_hex: String,
    color_name: lokafit::ColorName,
}

/// Per-file quick scan result
#[derive(Debug, Serialize)]
struct QuickScan {
    file: PathBuf,
    #[serde(flatten)]
    outcome: Outcome<QuickColor>,
}

fn run_scan(args: &ScanArgs) -> Result<(), CliError> {
    let start_time = Instant::now();

    for path in &args.images {
        if !path.exists() {
            return Err(CliError::InputNotFound(format!(
                "Input file not found: {}",
                path.display()
            )));
        }
    }

    let processor = GarmentProcessor::new();
    let entries: Vec<ScanEntry> = args
        .images
        .par_iter()
        .map(|path| {
            let outcome = match util::read_file_bytes(path) {
                Ok(bytes) => processor.process_garment(&bytes),
                Err(e) => Outcome::failure(e),
            };
            ScanEntry {
                file: path.clone(),
                outcome,
            }
        })
        .collect();

    let failed = entries.iter().filter(|e| !e.outcome.is_success()).count();
    tracing::debug!(
        files = entries.len(),
        failed,
        elapsed = %format_duration(start_time.elapsed()),
        "scan finished"
    );

    if args.json {
        if args.quick {
            let quick: Vec<_> = entries.iter().map(quick_view).collect();
            print_json(&quick)?;
        } else {
            print_json(&entries)?;
        }
    } else {
        for entry in &entries {
            print_scan_entry(entry, args.quick);
        }
    }

    if failed > 0 {
        return Err(CliError::Analysis(format!(
            "{} of {} images could not be analyzed",
            failed,
            entries.len()
        )));
    }
    Ok(())
}

fn quick_view(entry: &ScanEntry) -> QuickScan {
    let outcome = &entry.outcome;
    QuickScan {
        file: entry.file.clone(),
        outcome: Outcome {
            status: outcome.status,
            message: outcome.message.clone(),
            data: outcome.data.as_ref().map(|report| QuickColor {
                color_hex: report.color_hex.clone(),
                color_name: report.color_name,
            }),
            confidence: outcome.confidence,
        },
    }
}

fn print_scan_entry(entry: &ScanEntry, quick: bool) {
    println!("{}", entry.file.display());
    match (&entry.outcome.data, &entry.outcome.message) {
        (Some(report), _) => {
            println!("  Color:      {} ({})", report.color_hex, report.color_name);
            if !quick {
                let m = &report.measurements;
                println!("  Type:       {}", report.garment_type);
                println!(
                    "  Size:       {}x{} px (area {} px, image {}x{})",
                    m.width_px, m.height_px, m.area_px, m.image_width, m.image_height
                );
            }
            println!("  Confidence: {:.2}", entry.outcome.confidence);
        }
        (None, message) => {
            println!(
                "  Failed:     {}",
                message.as_deref().unwrap_or("Unknown error")
            );
        }
    }
}

// ============ Profile Command ============

fn run_profile(args: &ProfileArgs) -> Result<(), CliError> {
    let bytes = read_input(&args.image)?;
    let outcome = ProfileAnalyzer::new().analyze_skin_tone(&bytes);

    if args.json {
        print_json(&outcome)?;
    }

    let (report, confidence) = outcome.into_result().map_err(CliError::Analysis)?;
    if !args.json {
        println!("Skin tone:  {}", report.skin_tone);
        println!("Undertone:  {}", report.undertone);
        println!("Confidence: {:.2}", confidence);
        println!("Recommended colors:");
        for color in &report.recommended_colors {
            println!("  {} {}", color.hex, color.name);
        }
    }
    Ok(())
}

// ============ Match Command ============

fn run_match(args: &MatchArgs) -> Result<(), CliError> {
    let outcome = MixMatchRecommender::new().get_instant_match(&args.color, &args.undertone);

    if args.json {
        print_json(&outcome)?;
    }

    let (report, confidence) = outcome.into_result().map_err(CliError::Analysis)?;
    if !args.json {
        println!(
            "Matches for {} ({} undertone, confidence {:.2}):",
            report.item_color, args.undertone, confidence
        );
        for rec in &report.recommendations {
            println!(
                "  {}  {:.3}  {}",
                rec.color_hex, rec.match_score, rec.theory
            );
        }
    }
    Ok(())
}

// ============ Info Command ============

fn run_info(cli: &Cli, config: &Config) -> Result<(), CliError> {
    println!("lokafit v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("System Information:");
    println!("  Platform: {}", std::env::consts::OS);
    println!("  Arch: {}", std::env::consts::ARCH);
    println!("  Threads: {}", rayon::current_num_threads());

    println!();
    println!("Configuration:");
    match &cli.config {
        Some(path) => println!("  File: {}", path.display()),
        None => {
            let found = Config::search_paths().into_iter().find(|p| p.exists());
            match found {
                Some(path) => println!("  File: {}", path.display()),
                None => println!("  File: (none, using defaults)"),
            }
        }
    }
    println!("  Environment: {}", config.environment());
    println!("  Log filter: {}", config.log_filter());

    #[cfg(feature = "web")]
    {
        let server = config.to_server_config();
        println!();
        println!("Server:");
        println!("  Address: {}:{}", server.bind, server.port);
        println!("  Upload limit: {}", format_file_size(server.upload_limit as u64));
        if server.cors.enabled {
            match &server.cors.allowed_origins {
                Some(origins) => println!("  CORS origins: {}", origins.join(", ")),
                None => println!("  CORS origins: any"),
            }
        } else {
            println!("  CORS: disabled");
        }
    }

    Ok(())
}

// ============ Serve Command ============

#[cfg(feature = "web")]
fn run_serve(args: &ServeArgs, config: &Config) -> Result<(), CliError> {
    let server_config = config.merge_with_cli(&args.to_overrides());
    server_config
        .socket_addr()
        .map_err(|e| CliError::InvalidArgs(format!("Invalid bind address: {}", e)))?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::General(format!("Failed to start runtime: {}", e)))?;
    rt.block_on(async {
        let server = WebServer::with_config(server_config);
        server.run().await
    })
    .map_err(|e| CliError::General(e.to_string()))
}
