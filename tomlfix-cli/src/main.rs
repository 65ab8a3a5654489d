mod config;
mod explain;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use config::{ApplyOverrides, ConfigMerger};
use std::process::ExitCode;
use tomlfix_core::adapters::{FsDocumentStore, FsLedgerSource, FsWritePort};
use tomlfix_core::ports::LedgerSource;
use tomlfix_core::{Transformer, collect_matches, write_artifacts};
use tomlfix_fixers::FixerRegistry;
use tomlfix_render::render_summary_line;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Exit code when the pass ran but at least one document failed.
const EXIT_DOCUMENT_FAILED: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "tomlfix",
    version,
    about = "Format-preserving autocorrection for TOML documents, driven by lint match ledgers."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply fixes for every match in the ledger (default: dry-run).
    Apply(ApplyArgs),
    /// Explain what a rule's fix does.
    Explain(ExplainArgs),
    /// List all rules that have a fixer.
    ListFixers(ListFixersArgs),
}

#[derive(Debug, Parser)]
struct ApplyArgs {
    /// Match ledger: a `matches.json` file, or a directory of `*/matches.json`.
    #[arg(long)]
    ledger: Utf8PathBuf,

    /// Root that document paths in the ledger are relative to (default: current directory).
    #[arg(long, default_value = ".")]
    root: Utf8PathBuf,

    /// Write changed documents back. If omitted, runs a dry-run.
    #[arg(long, default_value_t = false)]
    write: bool,

    /// Directory for report.json, report.md and patch.diff.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Worker threads (default: one per core).
    #[arg(long)]
    jobs: Option<usize>,

    /// Allowlist patterns for rule ids.
    #[arg(long)]
    allow: Vec<String>,

    /// Denylist patterns for rule ids.
    #[arg(long)]
    deny: Vec<String>,

    /// Config file (default: <root>/tomlfix.toml when present).
    #[arg(long)]
    config: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Rule id to explain (e.g., "toml.string-style" or "string-style").
    rule: String,
}

#[derive(Debug, Parser)]
struct ListFixersArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Explain(args) => cmd_explain(args).map(|()| ExitCode::SUCCESS),
        Command::ListFixers(args) => cmd_list_fixers(args).map(|()| ExitCode::SUCCESS),
    }
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<ExitCode> {
    let file_config = config::load_or_default(&args.root, args.config.as_deref())
        .context("load tomlfix.toml config")?;
    let settings = ConfigMerger::new(file_config).merge_apply_args(&ApplyOverrides {
        allow: args.allow,
        deny: args.deny,
        jobs: args.jobs,
        write: args.write,
    });
    debug!(
        "merged config: allow={:?}, deny={:?}, jobs={}, dry_run={}",
        settings.allow, settings.deny, settings.jobs, settings.dry_run
    );

    anyhow::ensure!(args.ledger.exists(), "ledger {} does not exist", args.ledger);
    let loaded = FsLedgerSource::new(args.ledger.clone())
        .load_ledgers()
        .with_context(|| format!("load ledgers from {}", args.ledger))?;
    for ledger in &loaded {
        if let Err(e) = &ledger.ledger {
            warn!(path = %ledger.path, error = %e, "skipping ledger");
        }
    }
    let matches = collect_matches(&loaded);

    let registry = FixerRegistry::builtin();
    let store = FsDocumentStore::new(args.root);
    let dry_run = settings.dry_run;
    let outcome = Transformer::new(&registry, &store, settings)
        .run(&matches)
        .context("transform pass")?;

    if let Some(out_dir) = &args.out_dir {
        write_artifacts(&outcome, out_dir, &FsWritePort).context("write artifacts")?;
        info!("wrote artifacts to {}", out_dir);
    }

    let mode = if dry_run { "dry-run: " } else { "" };
    println!("{mode}{}", render_summary_line(&outcome.report.summary));
    for result in outcome.report.results.iter().filter(|r| r.is_failed()) {
        if let Some(err) = &result.error {
            eprintln!("error: {}: {}", result.document, err.message);
        }
    }

    if outcome.has_failures() {
        Ok(ExitCode::from(EXIT_DOCUMENT_FAILED))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<()> {
    let registry = FixerRegistry::builtin();
    let Some(meta) = explain::lookup_rule(&registry, &args.rule) else {
        let available = registry.rule_ids().collect::<Vec<_>>().join(", ");
        anyhow::bail!(
            "Unknown rule: '{}'\n\nRules with fixers: {}",
            args.rule,
            available
        );
    };
    print!("{}", explain::render_explanation(&meta));
    Ok(())
}

fn cmd_list_fixers(args: ListFixersArgs) -> anyhow::Result<()> {
    let metas = FixerRegistry::builtin().metas();

    match args.format {
        OutputFormat::Text => {
            println!("Available fixers:\n");
            println!("  {:<28} TITLE", "RULE");
            println!("  {:<28} -----", "----");
            for meta in &metas {
                println!("  {:<28} {}", meta.rule_id, meta.title);
            }
            println!();
            println!("Use 'tomlfix explain <rule>' for details.");
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&metas)?);
        }
    }
    Ok(())
}
