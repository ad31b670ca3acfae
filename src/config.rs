//! Defaults of the command line and the canteen table of the batch run.

use std::{env, path::PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

pub const FRANKFURT_URL: &str =
    "https://www.studentenwerkfrankfurt.de/essen-trinken/speiseplaene/cafeteria-level";
pub const BIELEFELD_URL: &str = "http://www.studierendenwerk-bielefeld.de/essen-trinken/essen-und-trinken-in-mensen/bielefeld/mensa-gebaeude-x.html";

pub const CONVERTER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/59.0.3071.115 Safari/537.36";
pub const BATCH_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:34.0) Gecko/20100101 Firefox/34.0";

/// Mean delay in seconds when `--wait` is given without a value.
pub const DEFAULT_WAIT: &str = "60";

pub const SCHEMA_FILE: &str = "open-mensa-v2.xsd";
pub const SHARE_DIR: &str = "/usr/local/share/mensa";
pub const PUBLISH_DIR: &str = "/srv/mensa/feed";
pub const BATCH_BASE_URL: &str = "http://www.studentenwerkfrankfurt.de/essen-trinken/speiseplaene/";
pub const BATCH_WAIT: &str = "60";
pub const BATCH_XSD: &str = "/usr/local/share/mensa/open-mensa-v2.xsd";

/// One entry of the batch table: the local feed name and the page below the base url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanteenEntry {
    pub name: String,
    pub path: String,
}

impl CanteenEntry {
    pub fn url(&self, base: &Url) -> crate::Result<Url> {
        base.join(&format!("{}/", self.path.trim_matches('/')))
            .map_err(|e| crate::Error::Config(format!("bad path {:?}: {e}", self.path)))
    }
}

const FRANKFURT_CANTEENS: [(&str, &str); 14] = [
    ("fhrus", "mensa-ruesselsheim"),
    ("wiesbaden_accent", "mensa-accent"),
    ("fra_pi", "mensa-pi-x-gaumen"),
    ("fra_casino", "cafeteria-casino"),
    ("fra_level", "cafeteria-level"),
    ("fra_darwins", "cafeteria-darwins"),
    ("fra_casino_anbau", "mensa-anbau-casino"),
    ("fra_dasein", "dasein"),
    ("fra_bockenheim", "cafeteria-bockenheim"),
    ("fra_hochform", "cafe-hochform"),
    ("fra_esswerk", "mensa-esswerk"),
    ("fra_hfmdk", "hochschule-fuer-musik-und-darstellende-kunst"),
    ("fra_offenbach", "cafeteria-offenbach"),
    ("fra_point", "mensa-point"),
];

pub fn default_canteens() -> Vec<CanteenEntry> {
    FRANKFURT_CANTEENS
        .iter()
        .map(|(name, path)| CanteenEntry {
            name: (*name).to_owned(),
            path: (*path).to_owned(),
        })
        .collect()
}

/// Reads a JSON array of `{"name": .., "path": ..}` objects.
pub fn load_canteens(json: &str) -> crate::Result<Vec<CanteenEntry>> {
    let entries: Vec<CanteenEntry> = serde_json::from_str(json)?;
    if entries.is_empty() {
        return Err(crate::Error::Config("canteen table is empty".into()));
    }
    Ok(entries)
}

/// `$HOME/work/openmensa`
pub fn default_work_dir() -> crate::Result<PathBuf> {
    let home = env::var_os("HOME")
        .ok_or_else(|| crate::Error::Config("env var HOME not set".into()))?;
    Ok(PathBuf::from(home).join("work").join("openmensa"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let canteens = default_canteens();
        assert_eq!(canteens.len(), 14);
        assert_eq!(canteens[4].name, "fra_level");
        let base: Url = BATCH_BASE_URL.parse().unwrap();
        assert_eq!(
            canteens[4].url(&base).unwrap().as_str(),
            "http://www.studentenwerkfrankfurt.de/essen-trinken/speiseplaene/cafeteria-level/"
        );
    }

    #[test]
    fn test_load_canteens() {
        let json = r#"[{"name": "unibi_x", "path": "mensa-gebaeude-x"}]"#;
        let entries = load_canteens(json).unwrap();
        assert_eq!(
            entries,
            [CanteenEntry {
                name: "unibi_x".into(),
                path: "mensa-gebaeude-x".into()
            }]
        );
        assert!(matches!(load_canteens("[]"), Err(crate::Error::Config(_))));
        assert!(matches!(load_canteens("{"), Err(crate::Error::Json(_))));
    }

    #[test]
    fn test_default_urls_parse() {
        assert!(FRANKFURT_URL.parse::<Url>().is_ok());
        assert!(BIELEFELD_URL.parse::<Url>().is_ok());
    }
}
