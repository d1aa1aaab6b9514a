mod control;
mod prompt;

use clap::{Parser, Subcommand, ValueEnum};
use control::LibraryControl;
use shelf_core::*;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Library catalog of books, magazines and readers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Storage format (csv or json)
    #[arg(long, global = true)]
    format: Option<FileFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive menu (default)
    Run,

    /// Print the catalog and exit
    List {
        /// Which records to print
        #[arg(long, value_enum, default_value_t = ListKind::All)]
        kind: ListKind,
    },

    /// Look up a publication by exact title
    Find {
        title: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ListKind {
    All,
    Books,
    Magazines,
    Users,
}

fn main() -> Result<()> {
    // Initialize logging
    shelf_core::logging::init();

    let cli = Cli::parse();

    // Determine store location
    let mut data = Config::load()?.data;
    if let Some(data_dir) = cli.data_dir {
        data.data_dir = data_dir;
    }
    if let Some(format) = cli.format {
        data.format = format;
    }
    let store = open_store(data.format, data.data_file());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut output = ConsoleOutput::new(stdout.lock());

    match cli.command {
        Some(Commands::List { kind }) => cmd_list(store.as_ref(), &mut output, kind),
        Some(Commands::Find { title }) => cmd_find(store.as_ref(), &mut output, &title),
        Some(Commands::Run) | None => {
            let input = ConsoleInput::new(stdin.lock());
            let mut control = LibraryControl::new(input, output, store)?;
            control.control_loop()?;
            tracing::debug!("Session closed with {} records", control.library().len());
            Ok(())
        }
    }
}

fn cmd_list<O: OutputSink>(store: &dyn CatalogStore, output: &mut O, kind: ListKind) -> Result<()> {
    let library = control::load_or_fresh(store, output)?;

    if matches!(kind, ListKind::All | ListKind::Books) {
        output.write_line("Books:")?;
        control::print_books(output, &library)?;
    }
    if matches!(kind, ListKind::All | ListKind::Magazines) {
        output.write_line("Magazines:")?;
        control::print_magazines(output, &library)?;
    }
    if matches!(kind, ListKind::All | ListKind::Users) {
        output.write_line("Readers:")?;
        control::print_users(output, &library)?;
    }
    Ok(())
}

fn cmd_find<O: OutputSink>(store: &dyn CatalogStore, output: &mut O, title: &str) -> Result<()> {
    let library = control::load_or_fresh(store, output)?;
    control::print_find_result(output, &library, title)
}
