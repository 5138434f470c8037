//! # treeconf
//!
//! Operator tool for the game-server plugin configuration.
//!
//! - `treeconf check <FILE>` loads the configuration and prints a summary
//! - `treeconf init <FILE>` writes the default configuration
//! - `treeconf normalize <FILE>` rewrites the file in canonical layout
//! - `treeconf export <FILE> --format json|toml` converts it through serde

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use treeconf::{ConfigEnum, Object, Processor};

use crate::{
    config::PluginConfig,
    export::{ExportFormat, render},
};

mod config;
mod export;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the configuration and print a summary
    Check {
        file: PathBuf,
    },
    /// Write the default configuration
    Init {
        file: PathBuf,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Load the configuration and write it back in canonical layout
    Normalize {
        file: PathBuf,
        /// Keep a timestamped copy of the previous file
        #[arg(short, long)]
        backup: bool,
    },
    /// Convert the configuration to JSON or TOML
    Export {
        file: PathBuf,
        #[arg(short, long, value_enum)]
        format: ExportFormat,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    cli.command.run()
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

impl Command {
    fn run(self) -> Result<()> {
        let processor = Processor::<PluginConfig>::new()?;
        match self {
            Command::Check { file } => {
                let config = load(&processor, &file)?;
                print_summary(&file, &config);
            }
            Command::Init { file, force } => init(&processor, &file, force)?,
            Command::Normalize { file, backup } => normalize(&processor, &file, backup)?,
            Command::Export {
                file,
                format,
                output,
            } => {
                let config = load(&processor, &file)?;
                let s = render(&config, format)?;
                match output {
                    Some(path) => {
                        fs::write(&path, s)
                            .with_context(|| format!("failed to write {}", path.display()))?;
                        info!("exported {} to {}", file.display(), path.display());
                    }
                    None => print!("{s}"),
                }
            }
        }
        Ok(())
    }
}

fn load(processor: &Processor<PluginConfig>, file: &Path) -> Result<PluginConfig> {
    processor
        .load_file(file)
        .with_context(|| format!("failed to load {}", file.display()))
}

fn init(processor: &Processor<PluginConfig>, file: &Path, force: bool) -> Result<()> {
    if file.exists() && !force {
        bail!(
            "{} already exists, pass --force to overwrite it",
            file.display()
        );
    }
    processor
        .save_file(&PluginConfig::empty(), file)
        .with_context(|| format!("failed to write {}", file.display()))?;
    info!("wrote default configuration to {}", file.display());
    Ok(())
}

fn normalize(processor: &Processor<PluginConfig>, file: &Path, backup: bool) -> Result<()> {
    let config = load(processor, file)?;
    if backup {
        let saved = processor
            .save_file_with_backup(&config, file)
            .with_context(|| format!("failed to write {}", file.display()))?;
        if let Some(bk) = saved {
            info!("previous version kept at {}", bk.display());
        }
    } else {
        processor
            .save_file(&config, file)
            .with_context(|| format!("failed to write {}", file.display()))?;
    }
    info!("normalized {}", file.display());
    Ok(())
}

fn print_summary(file: &Path, config: &PluginConfig) {
    println!("{} {}", "ok".green().bold(), file.display());
    println!(
        "  {:<10} {} (max {} players, tick {} ms)",
        "server".cyan(),
        config.server.listen_addr,
        config.server.max_players,
        config.server.tick_rate
    );
    println!(
        "  {:<10} {} [{}]",
        "plugins".cyan(),
        config.plugins.directory,
        config.plugins.auto_load.join(", ")
    );
    let ranks: Vec<String> = config
        .ranks
        .iter()
        .map(|(name, weight)| format!("{name}={weight}"))
        .collect();
    println!("  {:<10} {}", "ranks".cyan(), ranks.join(", "));
    match &config.logging {
        Some(logging) => println!(
            "  {:<10} {}{}",
            "logging".cyan(),
            logging.level.name(),
            if logging.json_format { " (json)" } else { "" }
        ),
        None => println!("  {:<10} {}", "logging".cyan(), "default".dimmed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("treeconf").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_args() {
        let cli = parse(&["-v", "export", "host.xml", "--format", "toml"]);
        assert!(cli.verbose);
        match cli.command {
            Command::Export {
                file,
                format,
                output,
            } => {
                assert_eq!(file, PathBuf::from("host.xml"));
                assert_eq!(format, ExportFormat::Toml);
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let args = ["treeconf", "export", "host.xml", "--format", "yaml"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("host.xml");

        parse(&["init", file.to_str().unwrap()]).command.run().unwrap();
        assert!(file.exists());
        assert!(parse(&["init", file.to_str().unwrap()]).command.run().is_err());
        parse(&["init", "--force", file.to_str().unwrap()])
            .command
            .run()
            .unwrap();
        parse(&["check", file.to_str().unwrap()]).command.run().unwrap();
    }

    #[test]
    fn test_normalize_with_backup() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("host.xml");
        fs::write(
            &file,
            concat!(
                r#"<plugin-config xmlns="urn:treeconf:plugin-config">"#,
                "<server><listen-addr>0.0.0.0:25565</listen-addr></server>",
                "</plugin-config>",
            ),
        )
        .unwrap();

        parse(&["normalize", "--backup", file.to_str().unwrap()])
            .command
            .run()
            .unwrap();

        let normalized = fs::read_to_string(&file).unwrap();
        assert!(normalized.starts_with("<?xml"));
        assert!(normalized.contains("<!-- Address to bind to, IP:PORT -->"));
        assert!(normalized.contains("<listen-addr>0.0.0.0:25565</listen-addr>"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("host.xml");
        let out = dir.path().join("host.json");

        parse(&["init", file.to_str().unwrap()]).command.run().unwrap();
        parse(&[
            "export",
            file.to_str().unwrap(),
            "-f",
            "json",
            "-o",
            out.to_str().unwrap(),
        ])
        .command
        .run()
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["server"]["listen_addr"], "127.0.0.1:8080");
    }

    #[test]
    fn test_check_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("missing.xml");
        let err = parse(&["check", file.to_str().unwrap()]).command.run().unwrap_err();
        assert!(err.to_string().contains("failed to load"));
    }
}
