use anyhow::Context;
use clap::{Parser, Subcommand};
use fs_err as fs;
use std::process::Command as ProcessCommand;
use tomlfix_types::{MatchLedger, ToolInfo};

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print schema identifiers used by tomlfix.
    PrintSchemas,
    /// Create an empty ledger layout (<dir>/<engine>/matches.json).
    InitLedgers {
        #[arg(long, default_value = "ledgers")]
        dir: String,
        /// Rule engine names to create empty ledgers for.
        #[arg(long, default_value = "local")]
        engine: Vec<String>,
    },
    /// Bless golden fixtures (overwrite expected outputs).
    BlessFixtures,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::PrintSchemas => {
            println!("{}", tomlfix_types::schema::TOMLFIX_MATCHES_V1);
            println!("{}", tomlfix_types::schema::TOMLFIX_REPORT_V1);
        }
        Command::InitLedgers { dir, engine } => {
            for name in &engine {
                let engine_dir = format!("{dir}/{name}");
                fs::create_dir_all(&engine_dir).with_context(|| format!("create {engine_dir}"))?;
                let ledger = MatchLedger::new(ToolInfo {
                    name: name.clone(),
                    version: None,
                    repo: None,
                    commit: None,
                });
                let json = serde_json::to_string_pretty(&ledger).context("serialize ledger")?;
                fs::write(format!("{engine_dir}/matches.json"), json)?;
            }
            println!("initialized {dir}/{{{}}}", engine.join(","));
        }
        Command::BlessFixtures => {
            let status = ProcessCommand::new("cargo")
                .args(["test", "-p", "tomlfix-core", "--test", "golden_fixtures"])
                .env("TOMLFIX_BLESS", "1")
                .status()
                .context("run golden fixture blessing")?;
            if !status.success() {
                anyhow::bail!("bless-fixtures failed");
            }
        }
    }
    Ok(())
}
