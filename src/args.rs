//! These structs provide the CLI interface for the costing CLI.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// costing: A command-line tool for building multi-year software license costings.
///
/// The costing sheet lives in a JSON file. You create one with `costing new`,
/// fill it by pasting spreadsheet rows with `costing paste`, inspect the
/// per-line figures and the deal summary with `costing show`, and produce a
/// CSV deliverable with `costing export`.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a new costing sheet file.
    New(NewArgs),
    /// Print the calculated line items and the deal summary.
    Show(ShowArgs),
    /// Import spreadsheet rows copied to a file (or piped to stdin) into the sheet.
    ///
    /// The pasted text is the tab-separated form a spreadsheet application
    /// puts on the clipboard. Rows are inserted at the targeted line item:
    /// a single row overwrites it, several rows replace it. Category
    /// headings inside the paste assign the rows that follow them.
    Paste(PasteArgs),
    /// Append a blank line item.
    Add(AddArgs),
    /// Delete a line item.
    Delete(DeleteArgs),
    /// Copy the Year 1 line items onto later years of a Ramped deal.
    CopyYear(CopyYearArgs),
    /// Export the costing sheet and its reconciliation as CSV.
    Export(ExportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// none, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The costing sheet JSON file to operate on.
    #[arg(long, env = "COSTING_SHEET", default_value = "costing.json")]
    sheet: PathBuf,
}

impl Common {
    pub fn new(log_level: LevelFilter, sheet: PathBuf) -> Self {
        Self { log_level, sheet }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn sheet(&self) -> &Path {
        &self.sheet
    }
}

#[derive(Debug, Parser, Clone)]
pub struct NewArgs {
    /// Populate the sheet with demonstration data instead of a blank deal.
    #[arg(long)]
    sample: bool,
}

impl NewArgs {
    pub fn new(sample: bool) -> Self {
        Self { sample }
    }

    pub fn sample(&self) -> bool {
        self.sample
    }
}

#[derive(Debug, Parser, Clone)]
pub struct ShowArgs {
    /// The deal year to show (1, 2 or 3). Years 2 and 3 only differ on a
    /// Ramped deal.
    #[arg(long, default_value_t = 1)]
    year: u8,
}

impl ShowArgs {
    pub fn new(year: u8) -> Self {
        Self { year }
    }

    pub fn year(&self) -> u8 {
        self.year
    }
}

#[derive(Debug, Parser, Clone)]
pub struct PasteArgs {
    /// The id of the line item where the pasted rows land.
    #[arg(long)]
    item: u64,

    /// The deal year to paste into (1, 2 or 3).
    #[arg(long, default_value_t = 1)]
    year: u8,

    /// Read the pasted text from this file instead of stdin.
    #[arg(long)]
    input: Option<PathBuf>,
}

impl PasteArgs {
    pub fn new(item: u64, year: u8, input: Option<PathBuf>) -> Self {
        Self { item, year, input }
    }

    pub fn item(&self) -> u64 {
        self.item
    }

    pub fn year(&self) -> u8 {
        self.year
    }

    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }
}

#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The deal year to add the row to (1, 2 or 3).
    #[arg(long, default_value_t = 1)]
    year: u8,
}

impl AddArgs {
    pub fn new(year: u8) -> Self {
        Self { year }
    }

    pub fn year(&self) -> u8 {
        self.year
    }
}

#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The id of the line item to delete.
    #[arg(long)]
    id: u64,

    /// The deal year to delete from (1, 2 or 3).
    #[arg(long, default_value_t = 1)]
    year: u8,
}

impl DeleteArgs {
    pub fn new(id: u64, year: u8) -> Self {
        Self { id, year }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn year(&self) -> u8 {
        self.year
    }
}

#[derive(Debug, Parser, Clone)]
pub struct CopyYearArgs {
    /// The years to copy Year 1 onto. Defaults to both later years.
    #[arg(long, value_delimiter = ',', default_values_t = [2u8, 3])]
    targets: Vec<u8>,
}

impl CopyYearArgs {
    pub fn new(targets: Vec<u8>) -> Self {
        Self { targets }
    }

    pub fn targets(&self) -> &[u8] {
        &self.targets
    }
}

#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// The path of the CSV file to write.
    #[arg(long)]
    output: PathBuf,
}

impl ExportArgs {
    pub fn new(output: PathBuf) -> Self {
        Self { output }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}
