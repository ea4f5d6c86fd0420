//! Keytab reconciliation CLI — `ktr` command.
//!
//! Administers keytab stores: list entries sorted by principal, merge
//! new or missing entries between keytabs, clone a keytab wholesale,
//! expunge obsolete rotation leftovers, and remove principals outright.
//!
//! Exit codes: 0 on success, 1 when arguments are invalid, 2 when a
//! requested operation failed.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use keytab_recon::{
    copy, enctype_name, expunge, format_timestamp, list_sorted, remove_principals, update,
    FileKeytab, Keytab, KeytabEntry,
};

/// Keytab consulted by `list` when no file is named.
const SYSTEM_KEYTAB: &str = "/etc/krb5.keytab";

// ── CLI structure ─────────────────────────────────────────────────────────────

/// Keytab reconciliation CLI — merge, deduplicate, and prune keytab
/// entries across machines and key rotations.
#[derive(Parser, Debug)]
#[command(
    name = "ktr",
    about = "Keytab reconciliation CLI",
    version,
    long_about = "ktr — keytab reconciliation CLI\n\nList, merge, copy, expunge, and remove keytab entries."
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all entries of the given keytabs, sorted by principal
    List {
        /// Keytab files to list (default: /etc/krb5.keytab)
        keytabs: Vec<PathBuf>,

        /// Show the entry format tag as a leading column
        #[arg(long)]
        show_magic: bool,

        /// Use abbreviated encryption type names
        #[arg(long)]
        short: bool,

        /// Expunge each listed keytab afterwards
        #[arg(short = 'E', long)]
        expunge: bool,
    },

    /// Copy new or missing entries from the source keytab to the destination
    Update {
        /// Source keytab file
        source: PathBuf,

        /// Destination keytab file (created if absent)
        dest: PathBuf,

        /// Expunge the destination afterwards
        #[arg(short = 'E', long)]
        expunge: bool,
    },

    /// Copy all entries from the source keytab to the destination
    Copy {
        /// Source keytab file
        source: PathBuf,

        /// Destination keytab file (created if absent)
        dest: PathBuf,

        /// Expunge the destination afterwards
        #[arg(short = 'E', long)]
        expunge: bool,
    },

    /// Remove all duplicated or obsolete entries from the given keytabs
    Expunge {
        /// Keytab files to expunge
        #[arg(required = true)]
        keytabs: Vec<PathBuf>,
    },

    /// Remove all entries with matching principals from the keytab
    Remove {
        /// Keytab file to remove entries from
        keytab: PathBuf,

        /// Principals whose entries are removed
        #[arg(required = true)]
        principals: Vec<String>,
    },
}

// ── Entry formatting ──────────────────────────────────────────────────────────

/// Render one entry as a listing row.
fn format_entry(entry: &KeytabEntry, show_magic: bool, short: bool) -> String {
    let mut columns = Vec::new();
    if show_magic {
        columns.push(format!("{:#x}", entry.magic));
    }
    columns.push(entry.principal.to_string());
    columns.push(entry.kvno.to_string());
    columns.push(enctype_name(entry.enctype, short));
    columns.push(format_timestamp(entry.timestamp));
    columns.join(", ")
}

// ── Command handlers ──────────────────────────────────────────────────────────

fn cmd_list(keytabs: &[PathBuf], show_magic: bool, short: bool) -> Result<()> {
    for path in keytabs {
        let kt = FileKeytab::open(path)?;
        println!("Keytab name: {}", kt.name());
        list_sorted(&kt, |entry| {
            println!("{}", format_entry(entry, show_magic, short));
        })?;
    }
    Ok(())
}

fn cmd_update(source: &Path, dest: &Path) -> Result<()> {
    let src = FileKeytab::open(source)?;
    let mut dst = FileKeytab::create_or_open(dest)?;
    update(&mut dst, &src)?;
    Ok(())
}

fn cmd_copy(source: &Path, dest: &Path) -> Result<()> {
    let src = FileKeytab::open(source)?;
    let mut dst = FileKeytab::create_or_open(dest)?;
    copy(&mut dst, &src)?;
    Ok(())
}

fn cmd_expunge(keytabs: &[PathBuf]) -> Result<()> {
    for path in keytabs {
        log::info!("expunging {}", path.display());
        let mut kt = FileKeytab::open(path)?;
        expunge(&mut kt)?;
    }
    Ok(())
}

fn cmd_remove(keytab: &Path, principals: &[String]) -> Result<()> {
    let mut kt = FileKeytab::open(keytab)?;
    remove_principals(&mut kt, principals)?;
    Ok(())
}

/// The keytabs `list` operates on: the user-supplied ones, or the
/// system keytab when none were named.
fn effective_list_keytabs(keytabs: &[PathBuf]) -> Vec<PathBuf> {
    if keytabs.is_empty() {
        vec![PathBuf::from(SYSTEM_KEYTAB)]
    } else {
        keytabs.to_vec()
    }
}

/// Argument validation, checked before any store is opened. Failures
/// here are usage errors (exit code 1), not operation failures.
fn validate_args(command: &Commands) -> Result<()> {
    match command {
        Commands::Update { source, dest, .. } | Commands::Copy { source, dest, .. } => {
            validate_source_dest(source, dest)
        }
        _ => Ok(()),
    }
}

/// The engine assumes distinct stores; reject reconciling a keytab
/// against itself up front.
fn validate_source_dest(source: &Path, dest: &Path) -> Result<()> {
    if source.as_os_str().is_empty() {
        bail!("no source keytab file given");
    }
    if dest.as_os_str().is_empty() {
        bail!("no destination keytab file given");
    }
    if source == dest {
        bail!(
            "source and destination keytab file ({}) are identical",
            source.display()
        );
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn run(cli: &Cli) -> Result<()> {
    // Keytabs that still need an expunge pass after the main command.
    let mut expunge_after: Vec<PathBuf> = Vec::new();

    match &cli.command {
        Commands::List {
            keytabs,
            show_magic,
            short,
            expunge,
        } => {
            // Default to the system keytab before the expunge bookkeeping,
            // so that `list -E` with no arguments expunges what it listed.
            let keytabs = effective_list_keytabs(keytabs);
            cmd_list(&keytabs, *show_magic, *short)?;
            if *expunge {
                expunge_after.extend(keytabs);
            }
        }
        Commands::Update {
            source,
            dest,
            expunge,
        } => {
            cmd_update(source, dest)?;
            if *expunge {
                expunge_after.push(dest.clone());
            }
        }
        Commands::Copy {
            source,
            dest,
            expunge,
        } => {
            cmd_copy(source, dest)?;
            if *expunge {
                expunge_after.push(dest.clone());
            }
        }
        Commands::Expunge { keytabs } => cmd_expunge(keytabs)?,
        Commands::Remove { keytab, principals } => cmd_remove(keytab, principals)?,
    }

    cmd_expunge(&expunge_after)
}

fn main() {
    // Map clap parse failures to the usage exit code; help and version
    // displays stay successful.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let mut builder = env_logger::Builder::from_default_env();
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    if let Err(e) = validate_args(&cli.command) {
        eprintln!("ERROR: {e:#}");
        std::process::exit(1);
    }

    if let Err(e) = run(&cli) {
        eprintln!("ERROR: {e:#}");
        std::process::exit(2);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
