use clap::Parser;
use costing_sheet::args::{Args, Command};
use costing_sheet::{commands, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let sheet = args.common().sheet();

    let _: () = match args.command() {
        Command::New(new_args) => commands::new(sheet, new_args.sample()).await?.print(),

        Command::Show(show_args) => commands::show(sheet, show_args.year()).await?.print(),

        Command::Paste(paste_args) => commands::paste(
            sheet,
            paste_args.year(),
            paste_args.item(),
            paste_args.input(),
        )
        .await?
        .print(),

        Command::Add(add_args) => commands::add(sheet, add_args.year()).await?.print(),

        Command::Delete(delete_args) => commands::delete(sheet, delete_args.year(), delete_args.id())
            .await?
            .print(),

        Command::CopyYear(copy_args) => commands::copy_year(sheet, copy_args.targets())
            .await?
            .print(),

        Command::Export(export_args) => commands::export(sheet, export_args.output())
            .await?
            .print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
