use crate::contract::{group_operations, parse_contract, DefinitionIndex, DEFAULT_VERBS};
use crate::logging::{init_logging_with_config, LogConfig};
use crate::pipeline::{ContractDocument, FsSink, Generator, WriteReport};
use crate::render::HelperSet;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

/// Command-line interface for the contract code generator
#[derive(Parser, Debug)]
#[command(name = "stencil-gen")]
#[command(about = "Render code from Swagger contracts through templates", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate artifacts from one or more contracts
    Generate {
        /// Contract document (YAML or JSON); repeat for several
        #[arg(short, long, required = true, num_args = 1..)]
        spec: Vec<PathBuf>,

        /// Template configuration file; template paths resolve relative to it
        #[arg(short, long)]
        config: PathBuf,

        /// Output root for generated files
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Overwrite existing files
        #[arg(short, long, default_value_t = false)]
        force: bool,

        /// Perform a dry run: show what would be written without writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Print the definition index and route groups of a contract
    Inspect {
        /// Contract document (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Field holding the grouping value
        #[arg(long, default_value = "x-swagger-router-controller")]
        group_by: String,

        /// Verbs to include, in order (comma-separated)
        #[arg(long, value_delimiter = ',')]
        operations: Option<Vec<String>>,
    },
}

/// Parse arguments, set up logging and execute the command.
///
/// # Errors
///
/// Returns an error if logging cannot be initialized or the command fails.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging_with_config(&LogConfig::from_env().verbose(cli.verbose))?;
    run(&cli)
}

/// Execute an already parsed command.
///
/// # Errors
///
/// Returns an error if:
/// - A contract cannot be read or parsed
/// - The configuration or a template cannot be loaded
/// - Rendering or grouping fails
/// - Writing an artifact fails
pub fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Generate {
            spec,
            config,
            output,
            force,
            dry_run,
        } => {
            let mut generator = Generator::from_config_file(config, &HelperSet::builtin())
                .with_context(|| format!("failed to load configuration {}", config.display()))?;
            let documents = spec
                .iter()
                .map(|path| ContractDocument::from_path(path))
                .collect::<Result<Vec<_>, _>>()?;
            let mut sink = FsSink::new(output).force(*force).dry_run(*dry_run);
            let total = generator.generate_all(documents, &mut sink)?;
            let report = sink.report();
            info!(artifacts = total, written = report.written.len(), skipped = report.skipped.len(), "generation complete");
            for line in generate_summary(report, output, *dry_run) {
                println!("{line}");
            }
            Ok(())
        }
        Commands::Inspect {
            spec,
            group_by,
            operations,
        } => {
            let text = std::fs::read_to_string(spec)
                .with_context(|| format!("failed to read {}", spec.display()))?;
            let verbs = operations
                .clone()
                .unwrap_or_else(|| DEFAULT_VERBS.iter().map(|v| v.to_string()).collect());
            let report = inspect_report(&text, group_by, &verbs)
                .with_context(|| format!("failed to inspect {}", spec.display()))?;
            print!("{report}");
            Ok(())
        }
    }
}

/// Closing lines of a `generate` run. Skipped files are listed by name since
/// they keep their previous contents and may no longer match the contract.
#[must_use]
pub fn generate_summary(report: &WriteReport, output: &Path, dry_run: bool) -> Vec<String> {
    let verb = if dry_run { "Would generate" } else { "Generated" };
    let mut lines = vec![format!(
        "✅ {verb} {} file(s) in {}",
        report.written.len(),
        output.display()
    )];
    if !report.skipped.is_empty() {
        lines.push(format!(
            "⚠️  Kept {} existing file(s) unchanged; they may be stale. Re-run with --force to regenerate:",
            report.skipped.len()
        ));
        lines.extend(report.skipped.iter().map(|p| format!("   {}", p.display())));
    }
    lines
}

/// Human readable listing of a contract's definitions and route groups.
///
/// # Errors
///
/// Returns the parse or grouping error of the contract.
pub fn inspect_report(text: &str, group_by: &str, verbs: &[String]) -> crate::error::Result<String> {
    let model = parse_contract(text)?;
    let index = DefinitionIndex::build(&model);
    let groups = group_operations(&model, group_by, verbs)?;

    let mut lines = vec![format!("definitions ({}):", index.len())];
    lines.extend(index.keys().map(|key| format!("  {key}")));
    lines.push(format!("groups by {group_by} ({}):", groups.len()));
    for group in groups.iter() {
        lines.push(format!("  {}", group.key));
        for member in &group.members {
            lines.push(format!("    {} {}", member.verb, member.path.path));
        }
    }
    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}
