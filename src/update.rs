//! One scheduled feed refresh: fetch, normalize, convert, validate, publish.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{instrument, Level};
use url::Url;

use crate::{
    config,
    convert::Source,
    fetch, tools,
};

const XMLLINT: &str = "xmllint";
const REPORT_FILE: &str = "xmllint.log";

/// How the fetched HTML is repaired before conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Normalizer {
    Tidy,
    Xmllint,
    None,
}

impl Normalizer {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tidy => "tidy",
            Self::Xmllint => "xmllint",
            Self::None => "none",
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct UpdateArgs {
    /// Plan page to fetch
    #[arg(long)]
    pub url: Url,
    /// Publish directory the finished feed is copied into
    #[arg(long, value_name = "DIR")]
    pub output: PathBuf,
    /// Directory for the intermediate files
    #[arg(long, value_name = "DIR")]
    pub work: PathBuf,
    /// Base name of the intermediate files and of the feed
    #[arg(long)]
    pub name: String,
    #[arg(long, value_enum, default_value_t = Source::Fra)]
    pub source: Source,
    /// Year of the plan (Frankfurt only)
    #[arg(long)]
    pub year: Option<i32>,
    /// Schema file; relative paths are looked up in `--path`
    #[arg(long, default_value = config::SCHEMA_FILE)]
    pub xsd: PathBuf,
    #[arg(long, value_name = "DIR", default_value = config::SHARE_DIR)]
    pub path: PathBuf,
    /// Mean of the random delay before fetching, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 0.1)]
    pub wait: f64,
    #[arg(long, default_value = config::CONVERTER_AGENT)]
    pub agent: String,
    #[arg(long, value_enum, default_value_t = Normalizer::Tidy)]
    pub html2xml: Normalizer,
    /// Extra flag passed to tidy (repeatable)
    #[arg(long = "tf", value_name = "FLAG", allow_hyphen_values = true)]
    pub tidy_flags: Vec<String>,
}

impl UpdateArgs {
    pub fn schema(&self) -> PathBuf {
        if self.xsd.is_absolute() {
            self.xsd.clone()
        } else {
            self.path.join(&self.xsd)
        }
    }

    fn files(&self) -> WorkFiles {
        WorkFiles::new(&self.work, &self.name)
    }
}

/// The files one update leaves in the work directory.
#[derive(Debug, PartialEq, Eq)]
struct WorkFiles {
    html: PathBuf,
    xml: PathBuf,
    feed: PathBuf,
    report: PathBuf,
}

impl WorkFiles {
    fn new(work: &Path, name: &str) -> Self {
        Self {
            html: work.join(format!("{name}_inp.html")),
            xml: work.join(format!("{name}_inp.xml")),
            feed: work.join(format!("{name}.xml")),
            report: work.join(REPORT_FILE),
        }
    }
}

#[instrument(skip_all, fields(name = %args.name), level = Level::DEBUG)]
pub async fn run(args: &UpdateArgs) -> crate::Result<()> {
    fetch::wait(args.wait).await;
    let files = args.files();
    fs::create_dir_all(&args.work).await?;

    let client = fetch::make_client(&args.agent)?;
    let page = fetch::plan_page(&client, &args.url).await?;
    fs::write(&files.html, page).await?;

    let input = normalize(args, &files).await?;
    let converter = args.source.converter(args.year, None);
    converter.convert_file(input, &files.feed).await?;

    validate(&args.schema(), &files).await?;
    publish(&files.feed, &args.output).await?;
    Ok(())
}

async fn normalize<'a>(args: &UpdateArgs, files: &'a WorkFiles) -> crate::Result<&'a Path> {
    match args.html2xml {
        Normalizer::Tidy => tools::tidy(&files.html, &files.xml, &args.tidy_flags).await?,
        Normalizer::Xmllint => tools::xmllint_html(XMLLINT, &files.html, &files.xml).await?,
        Normalizer::None => return Ok(files.html.as_path()),
    }
    Ok(files.xml.as_path())
}

/// Validates the feed and keeps xmllint's report next to it, whatever the outcome.
async fn validate(schema: &Path, files: &WorkFiles) -> crate::Result<()> {
    let result = tools::validate(XMLLINT, schema, &files.feed).await;
    let report = match &result {
        Ok(report) => report.as_str(),
        Err(failure) => failure.output.as_str(),
    };
    fs::write(&files.report, report).await?;
    result?;
    Ok(())
}

async fn publish(feed: &Path, dir: &Path) -> crate::Result<()> {
    let file_name = feed
        .file_name()
        .ok_or_else(|| crate::Error::Config(format!("{} is not a file", feed.display())))?;
    let target = dir.join(file_name);
    fs::copy(feed, &target).await?;
    log::info!("published {}", target.display());
    Ok(())
}
