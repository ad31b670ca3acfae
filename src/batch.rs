//! Refreshes every canteen of a table, one `update` child process per canteen.
//!
//! A failing update is reported on stderr and the loop moves on to the next canteen.

use std::path::{Path, PathBuf};

use tokio::{fs, process::Command};
use url::Url;

use crate::{
    config::{self, CanteenEntry},
    convert::Source,
    tools,
    update::Normalizer,
};

#[derive(Debug, clap::Args)]
pub struct BatchArgs {
    /// JSON array of `{"name": .., "path": ..}` replacing the built-in canteen table
    #[arg(long, value_name = "FILE")]
    pub canteens: Option<PathBuf>,
    /// Work directory [default: $HOME/work/openmensa]
    #[arg(long, value_name = "DIR")]
    pub work: Option<PathBuf>,
    #[arg(long, value_name = "DIR", default_value = config::PUBLISH_DIR)]
    pub output: PathBuf,
    /// The table's paths are relative to this
    #[arg(long, default_value = config::BATCH_BASE_URL)]
    pub base_url: Url,
    #[arg(long, default_value = config::BATCH_AGENT)]
    pub agent: String,
    #[arg(long, default_value = config::BATCH_XSD)]
    pub xsd: PathBuf,
    #[arg(long, value_name = "SECONDS", default_value = config::BATCH_WAIT)]
    pub wait: f64,
    #[arg(long, value_enum, default_value_t = Source::Fra)]
    pub source: Source,
    #[arg(long, value_enum, default_value_t = Normalizer::Xmllint)]
    pub html2xml: Normalizer,
}

/// Runs all updates and returns how many of them failed.
pub async fn run(args: &BatchArgs) -> crate::Result<usize> {
    let canteens = match &args.canteens {
        Some(path) => config::load_canteens(&fs::read_to_string(path).await?)?,
        None => config::default_canteens(),
    };
    let work = match &args.work {
        Some(work) => work.clone(),
        None => config::default_work_dir()?,
    };
    let exe = std::env::current_exe()?;

    let mut failed = 0;
    for entry in &canteens {
        let mut command = update_command(&exe, &work, entry, args)?;
        match tools::run(&mut command, &[]).await {
            Ok(_) => log::info!("updated {}", entry.name),
            Err(failure) => {
                log::warn!("update of {} failed", entry.name);
                eprintln!("{failure}");
                failed += 1;
            }
        }
    }
    log::info!("{} of {} updates failed", failed, canteens.len());
    Ok(failed)
}

fn update_command(
    exe: &Path,
    work: &Path,
    entry: &CanteenEntry,
    args: &BatchArgs,
) -> crate::Result<Command> {
    let url = entry.url(&args.base_url)?;
    let mut command = Command::new(exe);
    command
        .arg("update")
        .args(["--url", url.as_str()])
        .arg("--output")
        .arg(&args.output)
        .arg("--work")
        .arg(work)
        .args(["--name", entry.name.as_str()])
        .args(["--wait", args.wait.to_string().as_str()])
        .args(["--agent", args.agent.as_str()])
        .arg("--xsd")
        .arg(&args.xsd)
        .args(["--html2xml", args.html2xml.as_str()])
        .args(["--source", args.source.as_str()]);
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use temp_dir::TempDir;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        batch: BatchArgs,
    }

    fn parse(args: &[&str]) -> BatchArgs {
        Cli::try_parse_from(std::iter::once(&"batch").chain(args))
            .unwrap()
            .batch
    }

    fn level() -> CanteenEntry {
        CanteenEntry {
            name: "fra_level".into(),
            path: "cafeteria-level".into(),
        }
    }

    #[test]
    fn test_update_command() {
        let args = parse(&[]);
        let command =
            update_command(Path::new("/bin/m2o"), Path::new("/w"), &level(), &args).unwrap();
        assert_eq!(
            tools::command_line(&command),
            format!(
                "/bin/m2o update \
                 --url http://www.studentenwerkfrankfurt.de/essen-trinken/speiseplaene/cafeteria-level/ \
                 --output /srv/mensa/feed --work /w --name fra_level --wait 60 --agent {} \
                 --xsd /usr/local/share/mensa/open-mensa-v2.xsd --html2xml xmllint --source fra",
                config::BATCH_AGENT
            )
        );
    }

    #[test]
    fn test_overrides() {
        let args = parse(&[
            "--base-url",
            "http://localhost:8080/plans/",
            "--output",
            "/tmp/feed",
            "--wait",
            "0",
            "--html2xml",
            "tidy",
        ]);
        let line = tools::command_line(
            &update_command(Path::new("m2o"), Path::new("/w"), &level(), &args).unwrap(),
        );
        assert!(line.contains("--url http://localhost:8080/plans/cafeteria-level/ "));
        assert!(line.contains("--output /tmp/feed "));
        assert!(line.contains("--wait 0 "));
        assert!(line.contains("--html2xml tidy "));
    }

    #[tokio::test]
    async fn test_bad_table() {
        let dir = TempDir::new().unwrap();
        let table = dir.child("canteens.json");
        std::fs::write(&table, "[]").unwrap();
        let args = parse(&[
            "--canteens",
            table.to_str().unwrap(),
            "--work",
            dir.path().to_str().unwrap(),
        ]);
        assert!(matches!(run(&args).await, Err(crate::Error::Config(_))));
    }
}
