use clap::{Parser, Subcommand};

mod cmd;
mod diagnostics;
mod export;
mod inspect;
mod load;
mod merge;
mod record;
mod schema;
mod summary;

/// Capital Gain Calculator: merge AIS capital gains statements into one report
#[derive(Parser, Debug)]
#[command(name = "cgc", version, about)]
struct Cli {
    /// Show debug output, including values that could not be converted
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge statements into a single table
    Merge(cmd::merge::MergeCommand),
    /// Show row and column counts of one statement
    Inspect(cmd::inspect::InspectCommand),
    /// Gains totals before and after 31 July 2024
    Summary(cmd::summary::SummaryCommand),
    /// Print the expected input and output columns
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match &cli.command {
        Command::Merge(merge) => merge.exec(),
        Command::Inspect(inspect) => inspect.exec(),
        Command::Summary(summary) => summary.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}

/// Info by default so skipped files and row counts are visible, `RUST_LOG` wins.
fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}
