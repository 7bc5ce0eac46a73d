use clap::{Parser, Subcommand};
use colored::Colorize;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use normdispatch_core::{Config, DestinationDefinition, Report, Severity};
use normdispatch_resolver::{build_runner_reference, mappings, resolve, DefinitionCheck};

/// normdispatch - Normalization image dispatch for destination connectors
#[derive(Parser)]
#[command(name = "normdispatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: normdispatch.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the normalization image and dialect for a connector
    Resolve {
        /// Connector image, with or without tag
        connector: String,
    },

    /// Compose the normalization reference a runner would execute
    Runner {
        /// Connector image, with or without tag
        connector: String,

        /// Normalization version (default: from config)
        #[arg(long)]
        normalization_version: Option<String>,

        /// Normalization image named by the definition, checked for drift
        #[arg(short, long)]
        image: Option<String>,

        /// Print the reference as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every mapped connector
    Mappings,

    /// Write a config file with default normalization settings
    Init {
        /// Where to write the config
        #[arg(default_value = "normdispatch.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Check destination definitions against the mapping table
    Check {
        /// JSON file with destination definitions
        #[arg(short, long)]
        definitions: Option<PathBuf>,

        /// Output file for report.json
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Also output markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Load config if specified
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("normdispatch.toml").exists() {
        Config::from_file(Path::new("normdispatch.toml"))?
    } else {
        tracing::debug!("no config file found, using defaults");
        Config::default()
    };

    tracing::debug!(version = %config.normalization.version, "using normalization version");

    match cli.command {
        Commands::Resolve { connector } => resolve_command(&connector),
        Commands::Runner { connector, normalization_version, image, json } => {
            runner_command(&config, &connector, normalization_version.as_deref(), image.as_deref(), json)
        }
        Commands::Mappings => mappings_command(),
        Commands::Init { path, force } => init_command(&path, force),
        Commands::Check { definitions, output, markdown } => {
            check_command(&config, definitions.as_deref(), &output, markdown.as_deref(), cli.verbose)
        }
    }
}

/// Log to stderr, honoring RUST_LOG; `--verbose` lowers the default level to debug
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Resolve command - print the mapping for one connector
fn resolve_command(connector: &str) -> Result<()> {
    let mapping = resolve(connector)?;

    println!("{} {}", "Connector:".bold(), connector);
    println!("{} {}", "Normalization image:".bold(), mapping.image.green());
    println!("{} {}", "Destination type:".bold(), mapping.destination_type.to_string().cyan());

    Ok(())
}

/// Runner command - compose the authoritative reference
fn runner_command(
    config: &Config,
    connector: &str,
    version: Option<&str>,
    image: Option<&str>,
    json: bool,
) -> Result<()> {
    let version = version.unwrap_or(&config.normalization.version);
    let image = image.or(config.normalization.image.as_deref());

    let reference = build_runner_reference(connector, version, image)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reference)?);
        return Ok(());
    }

    println!("{} {}", "Image:".bold(), reference.image.green());
    println!("{} {}", "Destination type:".bold(), reference.destination_type.to_string().cyan());

    if let Some(warning) = &reference.warning {
        println!();
        println!("{}", "Definition image differs from the mapped image:".yellow().bold());
        println!("    Definition: {}", warning.definition_image);
        println!("    Mapped:     {}", warning.factory_image);
        println!("{}", "The mapped image will be used.".yellow());
    }

    Ok(())
}

/// Mappings command - list the mapping table
fn mappings_command() -> Result<()> {
    let entries = mappings();
    let width = entries.iter().map(|(connector, _)| connector.len()).max().unwrap_or(0);

    for (connector, mapping) in &entries {
        println!(
            "{:width$}  {:12} {}",
            connector,
            mapping.destination_type.to_string().cyan(),
            mapping.image,
            width = width
        );
    }

    println!();
    println!("{} connectors mapped", entries.len());

    Ok(())
}

/// Init command - write a default config
fn init_command(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(anyhow::anyhow!(
            "{} already exists. Pass --force to overwrite it.",
            path.display()
        ));
    }

    Config::default().save_to_file(path)?;
    println!("{} {}", "Wrote".green(), path.display());

    Ok(())
}

/// Check command - validate destination definitions against the mapping table
fn check_command(
    config: &Config,
    definitions_path: Option<&Path>,
    output: &Path,
    markdown: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let mut definitions: Vec<DestinationDefinition> = config.destinations.clone();

    if let Some(path) = definitions_path {
        if verbose {
            eprintln!("{} {}", "Loading definitions from:".cyan(), path.display());
        }
        definitions.extend(DestinationDefinition::load_all(path)?);
    }

    if definitions.is_empty() {
        return Err(anyhow::anyhow!(
            "No destination definitions to check. Pass --definitions or add [[destinations]] to the config."
        ));
    }

    if verbose {
        eprintln!(
            "{} {} definitions against normalization {}",
            "Checking".cyan(),
            definitions.len(),
            config.normalization.version
        );
    }

    let report = DefinitionCheck::run(&definitions, &config.normalization.version).into_report();

    // Save JSON report
    report.save_to_file(output)?;

    if verbose {
        eprintln!("{} {}", "Report saved to:".green(), output.display());
    }

    // Save markdown report if requested
    if let Some(md_path) = markdown {
        std::fs::write(md_path, generate_markdown_report(&report))?;
        if verbose {
            eprintln!("{} {}", "Markdown report saved to:".green(), md_path.display());
        }
    }

    print_report_summary(&report);

    // Exit with error code if there are errors
    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Print report summary to stdout
fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Normalization Definition Check Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!();

    println!("{}", "Summary:".bold());
    println!("  Definitions checked: {}", report.summary.definitions_checked);
    println!("  Total diagnostics:   {}", report.summary.total);

    if report.summary.errors > 0 {
        println!("  Errors:   {}", format!("{}", report.summary.errors).red().bold());
    } else {
        println!("  Errors:   {}", format!("{}", report.summary.errors).green());
    }

    if report.summary.warnings > 0 {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).yellow());
    } else {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).green());
    }
    println!();

    if report.diagnostics.is_empty() {
        println!("{}", "✓ No issues found!".green().bold());
    } else {
        println!("{}", "Diagnostics:".bold());
        for diag in &report.diagnostics {
            let severity_str = match diag.severity {
                Severity::Error => "ERROR".red().bold(),
                Severity::Warn => "WARN".yellow().bold(),
            };

            println!("  [{}] {}: {}", severity_str, diag.code, diag.message);

            if let Some(exp) = &diag.expected {
                println!("    Expected: {}", exp);
            }
            if let Some(act) = &diag.actual {
                println!("    Actual:   {}", act);
            }
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

/// Generate markdown report
fn generate_markdown_report(report: &Report) -> String {
    let mut md = String::new();

    md.push_str("# Normalization Definition Check Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    md.push_str(&format!("**Timestamp:** {}\n\n", report.timestamp));

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Definitions checked: {}\n", report.summary.definitions_checked));
    md.push_str(&format!("- Errors: {}\n", report.summary.errors));
    md.push_str(&format!("- Warnings: {}\n", report.summary.warnings));
    md.push('\n');

    if report.diagnostics.is_empty() {
        md.push_str("✅ **No issues found!**\n");
        return md;
    }

    md.push_str("## Diagnostics\n\n");

    for diag in &report.diagnostics {
        let severity_emoji = match diag.severity {
            Severity::Error => "❌",
            Severity::Warn => "⚠️",
        };

        md.push_str(&format!("### {} {} - {}\n\n", severity_emoji, diag.severity, diag.code));
        md.push_str(&format!("{}\n\n", diag.message));

        if let Some(connector) = &diag.connector {
            md.push_str(&format!("**Connector:** `{}`\n\n", connector));
        }
        if let Some(exp) = &diag.expected {
            md.push_str(&format!("**Expected:** `{}`\n\n", exp));
        }
        if let Some(act) = &diag.actual {
            md.push_str(&format!("**Actual:** `{}`\n\n", act));
        }
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use normdispatch_core::{Diagnostic, DiagnosticCode};

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_runner_args() {
        let cli = Cli::parse_from([
            "normdispatch",
            "runner",
            "airbyte/destination-mysql",
            "--normalization-version",
            "0.2.24",
            "--image",
            "foo:1.0",
        ]);

        match cli.command {
            Commands::Runner { connector, normalization_version, image, json } => {
                assert_eq!(connector, "airbyte/destination-mysql");
                assert_eq!(normalization_version.as_deref(), Some("0.2.24"));
                assert_eq!(image.as_deref(), Some("foo:1.0"));
                assert!(!json);
            }
            _ => panic!("expected runner command"),
        }
    }

    #[test]
    fn unmapped_connector_is_returned_as_error() {
        let err = resolve_command("airbyte/destination-unknown").unwrap_err();
        assert!(err.to_string().contains("airbyte/destination-unknown"));

        let err = runner_command(&Config::default(), "airbyte/destination-unknown:1.0", None, None, false)
            .unwrap_err();
        assert!(err.to_string().contains("airbyte/destination-unknown:1.0"));
    }

    #[test]
    fn init_writes_default_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("normdispatch.toml");

        init_command(&path, false).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), Config::default());

        assert!(init_command(&path, false).is_err());
        init_command(&path, true).unwrap();
    }

    #[test]
    fn markdown_report_lists_diagnostics() {
        let report = Report::from_diagnostics(
            vec![Diagnostic::new(DiagnosticCode::UnmappedConnector, Severity::Error, "not mapped")
                .with_connector("airbyte/destination-unknown")],
            1,
        );

        let md = generate_markdown_report(&report);
        assert!(md.contains("UNMAPPED_CONNECTOR"));
        assert!(md.contains("`airbyte/destination-unknown`"));
        assert!(md.contains("- Errors: 1"));
    }

    #[test]
    fn markdown_report_without_issues() {
        let md = generate_markdown_report(&Report::from_diagnostics(Vec::new(), 3));
        assert!(md.contains("No issues found"));
        assert!(md.contains("- Definitions checked: 3"));
    }
}
