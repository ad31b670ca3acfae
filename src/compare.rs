//! Golden-file check of a converter: convert a saved page and diff the result against a reference
//! feed.

use std::path::{Path, PathBuf};

use temp_dir::TempDir;
use tokio::fs;

use crate::{config, convert::Source, parse::MissingName, tools};

#[derive(Debug, clap::Args)]
pub struct CompareArgs {
    /// Saved plan page
    #[arg(long, value_name = "FILE")]
    pub inp: PathBuf,
    /// Where the converted feed is written
    #[arg(long, value_name = "FILE")]
    pub out: PathBuf,
    /// Expected feed
    #[arg(long = "ref", value_name = "FILE")]
    pub reference: PathBuf,
    #[arg(long, value_enum, default_value_t = Source::Fra)]
    pub source: Source,
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long, value_enum)]
    pub missing_name: Option<MissingName>,
    #[arg(long, default_value = "xmllint")]
    pub xmllint: String,
    #[arg(long, default_value = config::SCHEMA_FILE)]
    pub schema: PathBuf,
    #[arg(long, default_value = "diff")]
    pub diff: String,
}

pub async fn run(args: &CompareArgs) -> crate::Result<()> {
    prepare_output(&args.out).await?;
    args.source
        .converter(args.year, args.missing_name)
        .convert_file(&args.inp, &args.out)
        .await?;

    for feed in [&args.reference, &args.out] {
        let report = tools::validate(&args.xmllint, &args.schema, feed).await?;
        log::debug!("{}: {}", feed.display(), report.trim_end());
    }

    let scratch = TempDir::new()?;
    let expected = scratch.child("ref.xml");
    let actual = scratch.child("out.xml");
    tools::format(&args.xmllint, &args.reference, &expected).await?;
    tools::format(&args.xmllint, &args.out, &actual).await?;
    tools::diff(&args.diff, &expected, &actual).await?;
    log::info!("{} matches {}", args.out.display(), args.reference.display());
    Ok(())
}

/// Creates the parent directory of `out` and removes what an earlier run left there.
async fn prepare_output(out: &Path) -> crate::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    match fs::remove_file(out).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    const FIXTURE: &str = "./src/parse/html_examples/bielefeld/mensa_x.html";

    /// Stands in for xmllint: validation always passes, formatting copies.
    fn fake_xmllint(dir: &TempDir) -> String {
        let script = dir.child("xmllint");
        std::fs::write(
            &script,
            "#!/bin/sh\nif [ \"$1\" = \"--format\" ]; then cp \"$2\" \"$4\"; fi\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script.to_str().unwrap().to_owned()
    }

    fn args(dir: &TempDir, reference: PathBuf) -> CompareArgs {
        CompareArgs {
            inp: FIXTURE.into(),
            out: dir.child("out/unibi_x.xml"),
            reference,
            source: Source::Unibi,
            year: None,
            missing_name: None,
            xmllint: fake_xmllint(dir),
            schema: config::SCHEMA_FILE.into(),
            diff: "diff".into(),
        }
    }

    fn reference(dir: &TempDir, edit: impl Fn(String) -> String) -> PathBuf {
        let html = std::fs::read_to_string(FIXTURE).unwrap();
        let feed = Source::Unibi.converter(None, None).convert(&html).unwrap();
        let path = dir.child("ref.xml");
        std::fs::write(&path, edit(String::from_utf8(feed).unwrap())).unwrap();
        path
    }

    #[tokio::test]
    async fn test_matching_reference() {
        let dir = TempDir::new().unwrap();
        let args = args(&dir, reference(&dir, |feed| feed));
        std::fs::create_dir_all(dir.child("out")).unwrap();
        std::fs::write(&args.out, "stale").unwrap();
        run(&args).await.unwrap();
        assert_ne!(std::fs::read_to_string(&args.out).unwrap(), "stale");
    }

    #[tokio::test]
    async fn test_changed_reference() {
        let dir = TempDir::new().unwrap();
        let reference = reference(&dir, |feed| feed.replace("Pasta Arrabiata", "Pasta Carbonara"));
        let err = run(&args(&dir, reference)).await.unwrap_err();
        let failure = match err {
            crate::Error::Tool(failure) => failure,
            other => panic!("expected the diff to fail, got {other}"),
        };
        assert_eq!(failure.status, Some(1));
        assert!(failure.output.contains("Pasta Carbonara"));
    }

    #[tokio::test]
    async fn test_prepare_output() {
        let dir = TempDir::new().unwrap();
        let out = dir.child("a/b/feed.xml");
        prepare_output(&out).await.unwrap();
        assert!(out.parent().unwrap().is_dir());
        assert!(!out.exists());
    }
}
