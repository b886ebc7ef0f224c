use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use retnonnilerr_check::SuppressionMode;
use retnonnilerr_core::config::{self, CONFIG_FILE_NAME, DEFAULT_CONFIG_TOML};
use retnonnilerr_core::orchestrator::{self, AnalysisOutput};
use retnonnilerr_diagnostics::{human, rules, sarif};

#[derive(Parser)]
#[command(name = "retnonnilerr")]
#[command(about = "Finds `if err != nil` branches that return without the error")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check bridge output (SSA IR as JSON) for dropped errors
    Check {
        /// Bridge JSON file
        input: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Human)]
        format: Format,
        /// Severity threshold: info, warning, error, critical
        #[arg(long)]
        severity: Option<String>,
        /// Max diagnostics to report (0 = unlimited)
        #[arg(long)]
        max_diagnostics: Option<usize>,
        /// What a `//lint:ignore retnonnilerr` return does to the rest of its block
        #[arg(long, value_parser = parse_suppression)]
        suppression: Option<SuppressionMode>,
        /// Skip functions declared in generated files
        #[arg(long)]
        skip_generated: bool,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Explain a rule in detail
    Explain {
        /// Rule code (e.g., RET001) or name
        rule: String,
    },
    /// Write a default retnonnilerr.toml in the current directory
    Init,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Human,
    Json,
    Sarif,
    Text,
}

fn parse_suppression(s: &str) -> Result<SuppressionMode, String> {
    s.parse()
}

struct CheckArgs {
    input: PathBuf,
    format: Format,
    severity_override: Option<String>,
    max_diagnostics: Option<usize>,
    suppression: Option<SuppressionMode>,
    skip_generated: bool,
    no_color: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Log to stderr so stdout stays clean for machine output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    match cli.command {
        Commands::Check {
            input,
            format,
            severity,
            max_diagnostics,
            suppression,
            skip_generated,
            no_color,
        } => run_check(CheckArgs {
            input,
            format,
            severity_override: severity,
            max_diagnostics,
            suppression,
            skip_generated,
            no_color,
        }),
        Commands::Explain { rule } => run_explain(&rule),
        Commands::Init => run_init(),
    }
}

fn run_check(args: CheckArgs) -> ExitCode {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut config = config::load_config(&cwd);

    if let Some(sev) = args.severity_override {
        if let Err(e) = sev.parse::<retnonnilerr_diagnostics::Severity>() {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
        config.retnonnilerr.severity_threshold = sev;
    }
    if let Some(max) = args.max_diagnostics {
        config.retnonnilerr.max_diagnostics = max;
    }
    if let Some(mode) = args.suppression {
        config.rules.retnonnilerr.suppression = mode;
    }
    if args.skip_generated {
        config.retnonnilerr.skip_generated = true;
    }

    tracing::debug!(
        input = %args.input.display(),
        format = ?args.format,
        severity = %config.retnonnilerr.severity_threshold,
        "running check"
    );
    match orchestrator::analyze_file(&args.input, &config) {
        Ok(output) => {
            if let Err(e) = print_output(&output, args.format, !args.no_color) {
                eprintln!("error: {e}");
                return ExitCode::from(2);
            }
            // Truncation notice on stderr for every format
            if output.summary.truncated > 0 {
                eprintln!(
                    "warning: {} more diagnostic(s) not shown, raise max_diagnostics to see them",
                    output.summary.truncated
                );
            }
            // Exit code: 0 clean, 1 issues found
            if output.summary.total > 0 {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

fn print_output(
    output: &AnalysisOutput,
    format: Format,
    use_color: bool,
) -> Result<(), serde_json::Error> {
    match format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(&output.diagnostics)?);
        }
        Format::Sarif => {
            let version = env!("CARGO_PKG_VERSION");
            println!("{}", sarif::to_sarif(&output.diagnostics, version)?);
        }
        Format::Text => {
            print!("{}", human::format_text(&output.diagnostics));
        }
        Format::Human => {
            print!("{}", human::format_human(&output.diagnostics, use_color));
        }
    }
    Ok(())
}

fn run_explain(rule: &str) -> ExitCode {
    match rules::get_rule(rule) {
        Some(info) => {
            print!("{}", info.explain());
            ExitCode::SUCCESS
        }
        None => {
            let known: Vec<String> = rules::get_all_rules().into_iter().map(|r| r.code).collect();
            eprintln!("Unknown rule: {rule}. Known rules: {}", known.join(", "));
            ExitCode::from(2)
        }
    }
}

fn run_init() -> ExitCode {
    let config_path = Path::new(CONFIG_FILE_NAME);
    if config_path.exists() {
        eprintln!("{CONFIG_FILE_NAME} already exists");
        return ExitCode::from(2);
    }

    match std::fs::write(config_path, DEFAULT_CONFIG_TOML) {
        Ok(()) => {
            println!("Created {CONFIG_FILE_NAME}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}
