//! Migraine-Map - migraine episode analytics CLI
//!
//! Reads an exported episode snapshot, computes trigger correlations,
//! temporal patterns and a risk assessment, and writes a report.
//!
//! Exit codes:
//!   0 - Success (risk below threshold, or no --fail-on set)
//!   1 - Runtime error (unreadable snapshot, invalid config, etc.)
//!   2 - Predicted risk at or above the --fail-on level

use anyhow::{Context, Result};
use chrono::Local;
use migraine_map::cli::{Args, OutputFormat};
use migraine_map::config::{Config, DEFAULT_CONFIG_FILE};
use migraine_map::models::RiskLevel;
use migraine_map::{report, store};
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is resolved before logging so `[general] verbose` applies
    let (mut config, config_source) = match Config::resolve(args.config.as_deref()) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, &config);

    info!("Migraine-Map v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    match config_source {
        Some(path) => info!("Loaded config from: {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }

    match run(args, config) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .migraine-map.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to tune the trigger threshold, risk weights and cut points.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level(config.general.verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the analysis and write the report. Returns the exit code (0 or 2).
fn run(args: Args, config: Config) -> Result<i32> {
    config
        .analysis
        .validate()
        .context("Invalid analysis settings")?;

    let episodes_path = args
        .episodes
        .clone()
        .context("An episodes file is required (--episodes)")?;
    let episodes = store::load_episodes(&episodes_path)?;

    let current_context = match args.context {
        Some(ref path) => {
            info!("Using current context from: {}", path.display());
            Some(store::load_context(path)?)
        }
        None => None,
    };

    let now = args.now.unwrap_or_else(|| Local::now().fixed_offset());
    debug!("Reference time: {}", now.to_rfc3339());

    let report = report::build_report(
        &episodes,
        now,
        &episodes_path.display().to_string(),
        &config.analysis,
        current_context.as_ref(),
    );

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    if args.writes_to_stdout() {
        println!("{}", output);
    } else {
        let path = args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.general.output));
        std::fs::write(&path, &output)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;

        if !args.quiet {
            print_summary(&report);
            println!("\n✅ Report saved to: {}", path.display());
        }
    }

    // Check --fail-on threshold
    if let (Some(fail_on), Some(prediction)) = (args.fail_on, report.prediction.as_ref()) {
        let threshold = RiskLevel::from(fail_on);
        if prediction.risk_level >= threshold {
            eprintln!(
                "\n⛔ Risk is {} (threshold {}). Failing (exit code 2).",
                prediction.risk_level, threshold
            );
            return Ok(2);
        }
    }

    Ok(0)
}

/// Print a short console summary.
fn print_summary(report: &migraine_map::models::Report) {
    let summary = &report.summary;

    println!("\n📊 Summary:");
    println!("   Episodes: {}", summary.total_episodes);
    println!(
        "   This month: {} | Last month: {}",
        summary.episodes_this_month, summary.episodes_last_month
    );
    println!("   Avg pain: {:.1}/10", summary.average_pain_intensity);
    println!("   Triggers reported: {}", summary.most_common_triggers.len());

    match report.prediction {
        Some(ref prediction) => println!(
            "   Risk: {} {} ({}%)",
            prediction.risk_level.emoji(),
            prediction.risk_level,
            prediction.probability
        ),
        None => println!("   Risk: N/A"),
    }
}
