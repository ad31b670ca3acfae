#![deny(unused_crate_dependencies)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod batch;
mod compare;
mod config;
mod convert;
mod error;
mod feed;
mod fetch;
mod parse;
mod tools;
mod update;

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use url::Url;

use crate::{convert::Source, parse::MissingName};

pub use error::{Error, Result};

/// Converts canteen plan pages into OpenMensa v2 feeds.
#[derive(Debug, Parser)]
#[command(name = "mensa2openmensa", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert a Studentenwerk Frankfurt plan page
    Fra {
        #[command(flatten)]
        args: ConvertArgs,
        /// Year of the plan, the page only shows day and month [default: current year]
        #[arg(long)]
        year: Option<i32>,
    },
    /// Convert a Studierendenwerk Bielefeld plan page
    Unibi {
        #[command(flatten)]
        args: ConvertArgs,
    },
    /// Fetch, normalize, convert, validate and publish one feed
    Update(update::UpdateArgs),
    /// Run `update` for every canteen of a table
    Batch(batch::BatchArgs),
    /// Convert a saved page and diff it against a reference feed
    Compare(compare::CompareArgs),
}

#[derive(Debug, clap::Args)]
struct ConvertArgs {
    /// Output feed XML file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,
    /// Read the page from a local file instead of fetching it
    #[arg(short, long, value_name = "FILE", conflicts_with = "url")]
    input: Option<PathBuf>,
    /// Plan page to fetch [default: the canteen's page]
    #[arg(long)]
    url: Option<Url>,
    /// Sleep a random time with this mean before starting
    #[arg(
        long,
        value_name = "SECONDS",
        num_args = 0..=1,
        default_missing_value = config::DEFAULT_WAIT
    )]
    wait: Option<f64>,
    #[arg(long, default_value = config::CONVERTER_AGENT)]
    agent: String,
    /// What to do with a meal row without a name [default: abort for fra, skip for unibi]
    #[arg(long, value_enum)]
    missing_name: Option<MissingName>,
}

/// Runs one converter: fetch or read the page, convert it and write the feed.
async fn convert_page(source: Source, year: Option<i32>, args: &ConvertArgs) -> Result<()> {
    if let Some(scale) = args.wait {
        fetch::wait(scale).await;
    }
    let converter = source.converter(year, args.missing_name);
    if let Some(input) = &args.input {
        return converter.convert_file(input, &args.output).await;
    }
    let url = match &args.url {
        Some(url) => url.clone(),
        None => Url::parse(source.default_url())
            .map_err(|e| Error::Config(format!("default url of {}: {e}", source.as_str())))?,
    };
    let client = fetch::make_client(&args.agent)?;
    let html = fetch::plan_page(&client, &url).await?;
    converter.write_feed(&html, &args.output).await
}

async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Fra { args, year } => convert_page(Source::Fra, year, &args).await?,
        Command::Unibi { args } => convert_page(Source::Unibi, None, &args).await?,
        Command::Update(args) => update::run(&args).await?,
        Command::Batch(args) => {
            if batch::run(&args).await? > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Compare(args) => compare::run(&args).await?,
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    pretty_env_logger::init();
    let cli = Cli::parse();
    log::debug!("{cli:?}");
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Fail: {e}");
            ExitCode::FAILURE
        }
    }
}
