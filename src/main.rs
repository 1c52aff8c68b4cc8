#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use cup::Selector;

#[derive(Debug, Parser)]
#[command(name = "cup", version, about = "Cup (Custom Unpacker-Packer), an uncompressed archiver")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Pack files and directories into a .cup archive.
    Pack {
        /// Files or directories to pack.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Output archive file.
        #[arg(long, default_value = "archive.cup")]
        archive: PathBuf,
    },

    /// List the members of an archive, sorted by path.
    List {
        archive: PathBuf,
    },

    /// Unpack an archive into a destination directory.
    Unpack {
        archive: PathBuf,
        /// Destination directory, created if absent.
        #[arg(long, default_value = ".")]
        into: PathBuf,
        /// Rename a member on the way out, as SELECTOR=NEW_PATH.
        /// SELECTOR is a member path or a 1-based index from `cup list`.
        #[arg(long, value_parser = parse_renaming)]
        rename: Vec<(Selector, String)>,
    },
}

fn parse_renaming(s: &str) -> Result<(Selector, String), String> {
    let (selector, new_path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected SELECTOR=NEW_PATH, got {s:?}"))?;
    if new_path.is_empty() {
        return Err("new path is empty".to_string());
    }
    let selector = match selector.parse::<usize>() {
        Ok(index) => Selector::Index(index),
        Err(_) => Selector::Path(selector.to_string()),
    };
    Ok((selector, new_path.to_string()))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let res = match cli.cmd {
        Command::Pack { paths, archive } => cup::pack(&paths, &archive),
        Command::List { archive } => cup::list(&archive),
        Command::Unpack {
            archive,
            into,
            rename,
        } => cup::unpack(&rename, &archive, &into),
    };

    if let Err(e) = res {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
