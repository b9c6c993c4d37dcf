//! Frontmatter Migrate - Main Entry Point
//!
//! Command-line front end for the `frontmatter_migrate` library.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use frontmatter_migrate::{Document, MigrationConfig, Migrator, SkillStore, format_report};
use std::fs;
use std::path::{Path, PathBuf};

/// Moves top-level frontmatter fields under a nested metadata block
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Migrate every <namespace>/<skill>/SKILL.md under a skills directory
    Migrate {
        /// Root of the skills tree
        root: PathBuf,

        /// Report what would change without writing anything
        #[arg(long)]
        dry_run: bool,

        /// TOML file overriding the default field configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Source coordinate written into missing source fields
        #[arg(long)]
        source_repo: Option<String>,
    },
    /// Print the flattened frontmatter of one document
    Show {
        /// Document to read
        file: PathBuf,

        /// TOML file overriding the default field configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<MigrationConfig> {
    match path {
        Some(path) => MigrationConfig::load(path),
        None => Ok(MigrationConfig::default()),
    }
}

fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Migrate {
            root,
            dry_run,
            config,
            source_repo,
        } => {
            let migrator = Migrator::new(load_config(config.as_deref())?)?;
            let store = SkillStore::new(&root);
            let report = store.migrate_all(&migrator, dry_run, source_repo.as_deref())?;
            print!("{}", format_report(&report));
        }
        Command::Show { file, config } => {
            let config = load_config(config.as_deref())?;
            let text = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let flat = Document::parse(&text)
                .and_then(|doc| doc.flattened(&config.nesting_key))
                .with_context(|| format!("Failed to read frontmatter of {}", file.display()))?;
            print!("{}", serde_yaml::to_string(&flat)?);
        }
    }
    Ok(())
}
