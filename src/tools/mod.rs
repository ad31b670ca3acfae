//! External programs: the HTML normalizers, the schema validator and `diff`.
//!
//! Every call runs to completion with its output captured; a non-accepted exit status becomes a
//! [`Failure`] carrying the command line and whatever the program printed.

use std::{
    ffi::OsStr,
    fmt::{self, Display, Formatter},
    path::Path,
    process::Output,
};

use tokio::process::Command;

/// tidy exits with 1 if it only had warnings to report.
const TIDY_WARNINGS: i32 = 1;

#[derive(Debug)]
pub struct Failure {
    pub command: String,
    /// `None` if the program could not be started or was killed by a signal.
    pub status: Option<i32>,
    pub output: String,
}

impl Display for Failure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "Command {} failed with exit status {code}:", self.command)?,
            None => write!(f, "Command {} failed:", self.command)?,
        }
        if !self.output.is_empty() {
            write!(f, "\n{}", self.output.trim_end())?;
        }
        Ok(())
    }
}

impl std::error::Error for Failure {}

/// The command line of `command` as one printable string.
pub fn command_line(command: &Command) -> String {
    let std = command.as_std();
    std::iter::once(std.get_program())
        .chain(std.get_args())
        .map(OsStr::to_string_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs `command` and accepts exit status 0 plus everything in `accepted`.
pub async fn run(command: &mut Command, accepted: &[i32]) -> Result<Output, Failure> {
    let line = command_line(command);
    log::debug!("running {line}");
    let output = command.output().await.map_err(|e| Failure {
        command: line.clone(),
        status: None,
        output: e.to_string(),
    })?;
    match output.status.code() {
        Some(0) => Ok(output),
        Some(code) if accepted.contains(&code) => {
            log::warn!("{line} exited with {code}");
            Ok(output)
        }
        status => Err(Failure {
            command: line,
            status,
            output: captured(&output),
        }),
    }
}

/// stdout followed by stderr.
pub fn captured(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

/// Repairs `html` into XHTML at `xml` with tidy.
pub async fn tidy(html: &Path, xml: &Path, extra_flags: &[String]) -> Result<(), Failure> {
    let mut command = Command::new("tidy");
    command
        .arg("-o")
        .arg(xml)
        .args(extra_flags)
        .args([
            "-bare",
            "-clean",
            "-indent",
            "--show-warnings",
            "no",
            "--hide-comments",
            "yes",
            "-numeric",
            "-q",
            "-asxml",
        ])
        .arg(html);
    run(&mut command, &[TIDY_WARNINGS]).await.map(drop)
}

/// Converts `html` into well-formed XML at `xml` with xmllint's HTML parser.
pub async fn xmllint_html(xmllint: &str, html: &Path, xml: &Path) -> Result<(), Failure> {
    let mut command = Command::new(xmllint);
    command
        .args(["--html", "--xmlout", "--noblanks", "--output"])
        .arg(xml)
        .arg(html);
    run(&mut command, &[]).await.map(drop)
}

/// Validates `document` against the XSD at `schema`. Returns xmllint's report.
pub async fn validate(xmllint: &str, schema: &Path, document: &Path) -> Result<String, Failure> {
    let mut command = Command::new(xmllint);
    command.args(["--noout", "--schema"]).arg(schema).arg(document);
    let output = run(&mut command, &[]).await?;
    Ok(String::from_utf8_lossy(&output.stderr).into_owned())
}

/// Pretty prints `input` into `output`.
pub async fn format(xmllint: &str, input: &Path, output: &Path) -> Result<(), Failure> {
    let mut command = Command::new(xmllint);
    command.arg("--format").arg(input).arg("--output").arg(output);
    run(&mut command, &[]).await.map(drop)
}

/// Unified, whitespace-insensitive diff; any difference is a failure.
pub async fn diff(diff: &str, expected: &Path, actual: &Path) -> Result<(), Failure> {
    let mut command = Command::new(diff);
    command.args(["-u", "-w"]).arg(expected).arg(actual);
    run(&mut command, &[]).await.map(drop)
}
