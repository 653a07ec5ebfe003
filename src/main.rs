//! FileDeck — local file browser and file manager.
//!
//! Thin binary entry point. All logic lives in the `filedeck-core` and
//! `filedeck-session` crates; this file only parses arguments, asks for
//! confirmation where a desktop frontend would show a dialog, and prints.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use filedeck_core::model::{format_count, format_size};
use filedeck_core::scanner::entry_sizes;
use filedeck_core::{export, go_to_parent, ListingOrder};
use filedeck_session::{Session, StatusLevel};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "filedeck", version, about = "FileDeck - browse and manage local files")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List navigable volumes (drives or mount points)
    Volumes,
    /// List a directory (defaults to the first volume)
    Ls {
        path: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
        /// Keep the order the OS returned instead of directories-first
        #[arg(long)]
        native_order: bool,
        /// Show the recursive size of every entry
        #[arg(long)]
        sizes: bool,
    },
    /// Compute the total size of a file or directory
    Size { path: PathBuf },
    /// Show name, type, size, location, and modification time
    Props { path: PathBuf },
    /// Copy a file or directory into a destination directory
    Cp { source: PathBuf, dest_dir: PathBuf },
    /// Move or rename a path; refuses to overwrite
    Mv { from: PathBuf, to: PathBuf },
    /// Rename a path within its own directory
    Rename { path: PathBuf, new_name: String },
    /// Move a path to the trash
    Trash {
        path: PathBuf,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Create a directory and any missing parents
    Mkdir { path: PathBuf },
    /// Open a file with the default application
    Open { path: PathBuf },
    /// Print the parent of a path
    Up { path: PathBuf },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Interval between job polls while waiting in the foreground.
const JOB_POLL_INTERVAL: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(io::stderr)
        .init();

    let mut session = Session::new();
    let result = run(&mut session, cli.command);
    print_messages(&mut session);
    result
}

fn run(session: &mut Session, command: Commands) -> Result<()> {
    match command {
        Commands::Volumes => {
            if session.volumes.is_empty() {
                println!("{}", session.default_location().display());
            }
            for volume in &session.volumes {
                println!("{}", volume.label());
            }
        }
        Commands::Ls {
            path,
            format,
            native_order,
            sizes,
        } => {
            if native_order {
                session.list_options.order = ListingOrder::Native;
            }
            match path {
                Some(p) => session.load_directory(&p)?,
                None => session.open_default()?,
            }
            print_listing(session, format, sizes)?;
        }
        Commands::Size { path } => {
            session.start_size_job(path)?;
            session.wait_for_job(JOB_POLL_INTERVAL);
            if let Some((path, bytes)) = session.last_size.take() {
                println!("{}\t{}", format_size(bytes), path.display());
            }
        }
        Commands::Props { path } => {
            let props = session.properties(&path)?;
            println!("Name:          {}", props.name);
            println!("Type:          {}", props.kind.label());
            println!("Size:          {}", format_size(props.total_size_bytes));
            println!("Location:      {}", props.absolute_location.display());
            match props.last_modified {
                Some(t) => println!("Last modified: {}", t.format("%a %b %e %H:%M:%S %Y")),
                None => println!("Last modified: unknown"),
            }
        }
        Commands::Cp { source, dest_dir } => {
            session.copy_to_clipboard(&source);
            session.load_directory(&dest_dir)?;
            if session.start_paste_job()? {
                session.wait_for_job(JOB_POLL_INTERVAL);
            }
        }
        Commands::Mv { from, to } => {
            filedeck_core::rename_path(&from, &to)?;
        }
        Commands::Rename { path, new_name } => {
            let new_path = session.rename(&path, &new_name)?;
            println!("{}", new_path.display());
        }
        Commands::Trash { path, yes } => {
            if !yes && !confirm(&format!("Move {} to the trash?", path.display()))? {
                return Ok(());
            }
            session.delete(&path)?;
        }
        Commands::Mkdir { path } => {
            filedeck_core::create_directory(&path)?;
        }
        Commands::Open { path } => {
            filedeck_core::platform::open_with_default_app(&path)?;
        }
        Commands::Up { path } => match go_to_parent(&path) {
            Some(parent) => println!("{}", parent.display()),
            None => println!("{}", path.display()),
        },
    }
    Ok(())
}

fn print_listing(session: &Session, format: OutputFormat, sizes: bool) -> Result<()> {
    let stdout = io::stdout();
    match format {
        OutputFormat::Json => export::write_json(&session.entries, stdout.lock())?,
        OutputFormat::Csv => export::write_csv(&session.entries, stdout.lock())?,
        OutputFormat::Table => {
            let entry_bytes = if sizes {
                entry_sizes(&session.entries)
            } else {
                Vec::new()
            };
            let mut out = stdout.lock();
            for (i, entry) in session.entries.iter().enumerate() {
                let marker = if entry.is_dir() { "<DIR>" } else { "" };
                match entry_bytes.get(i) {
                    Some(&bytes) => {
                        writeln!(out, "{marker:<6}{:>12}  {}", format_size(bytes), entry.name)?
                    }
                    None => writeln!(out, "{marker:<6}{}", entry.name)?,
                }
            }
            let dirs = session.entries.iter().filter(|e| e.is_dir()).count() as u64;
            let files = session.entries.len() as u64 - dirs;
            writeln!(
                out,
                "{} director{}, {} file{}",
                format_count(dirs),
                if dirs == 1 { "y" } else { "ies" },
                format_count(files),
                if files == 1 { "" } else { "s" }
            )?;
        }
    }
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    eprint!("{question} [y/N] ");
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_messages(session: &mut Session) {
    for msg in session.drain_messages() {
        let tag = match msg.level {
            StatusLevel::Info => "info",
            StatusLevel::Warning => "warning",
            StatusLevel::Error => "error",
        };
        eprintln!("[{tag}] {}: {}", msg.title, msg.text);
    }
}
