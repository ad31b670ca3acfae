//! HTML text in, OpenMensa XML out.

use std::path::Path;

use chrono::Datelike;
use scraper::Html;
use tokio::fs;

use crate::{
    config,
    feed::{self, Canteen},
    parse::{Bielefeld, Frankfurt, MissingName},
};

/// The sites a converter exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Source {
    /// Studentenwerk Frankfurt
    Fra,
    /// Studierendenwerk Bielefeld
    Unibi,
}

impl Source {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fra => "fra",
            Self::Unibi => "unibi",
        }
    }

    pub const fn default_url(self) -> &'static str {
        match self {
            Self::Fra => config::FRANKFURT_URL,
            Self::Unibi => config::BIELEFELD_URL,
        }
    }

    /// `year` only matters for Frankfurt and defaults to the current one. Without an explicit
    /// `missing_name` each site keeps its own policy.
    pub fn converter(self, year: Option<i32>, missing_name: Option<MissingName>) -> Converter {
        match self {
            Self::Fra => {
                let mut frankfurt = Frankfurt::new(year.unwrap_or_else(current_year));
                if let Some(policy) = missing_name {
                    frankfurt.missing_name = policy;
                }
                Converter::Frankfurt(frankfurt)
            }
            Self::Unibi => {
                let mut bielefeld = Bielefeld::default();
                if let Some(policy) = missing_name {
                    bielefeld.missing_name = policy;
                }
                Converter::Bielefeld(bielefeld)
            }
        }
    }
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[derive(Debug, Clone, Copy)]
pub enum Converter {
    Frankfurt(Frankfurt),
    Bielefeld(Bielefeld),
}

impl Converter {
    pub fn extract(&self, html: &str) -> crate::Result<Canteen> {
        let document = Html::parse_document(html);
        let canteen = match self {
            Self::Frankfurt(f) => f.extract(&document)?,
            Self::Bielefeld(b) => b.extract(&document)?,
        };
        log::info!("extracted {} days", canteen.days().len());
        Ok(canteen)
    }

    /// The complete feed document for `html`.
    pub fn convert(&self, html: &str) -> crate::Result<Vec<u8>> {
        let canteen = self.extract(html)?;
        let mut out = Vec::new();
        feed::write_feed(&canteen, &mut out)?;
        Ok(out)
    }

    /// Converts the file at `input` into a feed at `output`.
    ///
    /// `output` is only written once the conversion succeeded.
    pub async fn convert_file(&self, input: &Path, output: &Path) -> crate::Result<()> {
        let html = fs::read_to_string(input).await?;
        self.write_feed(&html, output).await
    }

    pub async fn write_feed(&self, html: &str, output: &Path) -> crate::Result<()> {
        let document = self.convert(html)?;
        fs::write(output, document).await?;
        log::info!("wrote {}", output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use temp_dir::TempDir;

    fn fixture(path: &str) -> String {
        fs::read_to_string(format!("./src/parse/html_examples/{path}")).unwrap()
    }

    fn convert(converter: Converter, path: &str) -> String {
        String::from_utf8(converter.convert(&fixture(path)).unwrap()).unwrap()
    }

    #[test]
    fn test_bielefeld_end_to_end() {
        let xml = convert(Source::Unibi.converter(None, None), "bielefeld/suppe.html");
        assert_eq!(xml.matches("<day ").count(), 1);
        assert_eq!(xml.matches("<category ").count(), 1);
        assert_eq!(xml.matches("<meal>").count(), 1);
        assert!(xml.contains(r#"<day date="2025-12-01">"#));
        assert!(xml.contains(r#"<category name="Suppe">"#));
        assert!(xml.contains("<name>Linsensuppe</name>"));
        assert!(xml.contains(r#"<price role="student">2.50</price>"#));
    }

    #[test]
    fn test_frankfurt_end_to_end() {
        let xml = convert(
            Source::Fra.converter(Some(2025), None),
            "frankfurt/cafeteria_level.html",
        );
        assert!(xml.contains("<openmensa "));
        assert!(xml.contains(r#"xmlns="http://openmensa.org/open-mensa-v2""#));
        assert!(xml.contains(r#"<day date="2025-11-24">"#));
        assert!(xml.contains(r#"<category name="Essen 3">"#));
        assert!(xml.contains(r#"<price role="other">5.10</price>"#));
        assert!(xml.contains("<note>Enthält Gluten</note>"));
    }

    #[test]
    fn test_year_override() {
        let xml = convert(
            Source::Fra.converter(Some(2031), None),
            "frankfurt/cafeteria_level.html",
        );
        assert!(xml.contains(r#"<day date="2031-11-24">"#));
    }

    #[test]
    fn test_site_policies() {
        assert!(matches!(
            Source::Fra.converter(Some(2025), None),
            Converter::Frankfurt(Frankfurt {
                missing_name: MissingName::Abort,
                ..
            })
        ));
        assert!(matches!(
            Source::Unibi.converter(None, None),
            Converter::Bielefeld(Bielefeld {
                missing_name: MissingName::Skip
            })
        ));
        assert!(matches!(
            Source::Unibi.converter(None, Some(MissingName::Abort)),
            Converter::Bielefeld(Bielefeld {
                missing_name: MissingName::Abort
            })
        ));
    }

    #[test]
    fn test_same_input_same_output() {
        let converter = Source::Unibi.converter(None, None);
        let html = fixture("bielefeld/mensa_x.html");
        assert_eq!(
            converter.convert(&html).unwrap(),
            converter.convert(&html).unwrap()
        );
    }

    #[tokio::test]
    async fn test_missing_name_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.child("fra.xml");
        let err = Source::Fra
            .converter(Some(2025), None)
            .convert_file(
                Path::new("./src/parse/html_examples/frankfurt/missing_name.html"),
                &output,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::Parse(_)));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_convert_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.child("unibi.xml");
        Source::Unibi
            .converter(None, None)
            .convert_file(
                Path::new("./src/parse/html_examples/bielefeld/mensa_x.html"),
                &output,
            )
            .await
            .unwrap();
        let xml = fs::read_to_string(&output).unwrap();
        assert!(xml.contains(r#"<day date="2025-12-02">"#));
    }
}
