mod bielefeld;
mod date;
mod error;
mod frankfurt;
mod price;
mod remove_excess_whitespace;
pub mod static_selector;
mod text_from_selection;

use scraper::ElementRef;

pub use bielefeld::Bielefeld;
pub use date::{parse_dotted_heading, parse_month_name_heading};
pub use error::{Error, Result};
pub use frankfurt::Frankfurt;
pub use price::{normalize_price, normalize_prices, Euro, FRANKFURT_MARKUP};
pub use remove_excess_whitespace::{remove_excess_whitespace, truncate_chars};

/// What an extractor does with a meal row it cannot find a name for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MissingName {
    /// The whole conversion fails.
    Abort,
    /// The row is dropped and extraction goes on.
    Skip,
}

impl MissingName {
    /// Applies the policy: `Ok(None)` means skip the row.
    fn resolve<T>(self, found: Option<T>, context: &str) -> Result<Option<T>> {
        match (found, self) {
            (Some(v), _) => Ok(Some(v)),
            (None, Self::Skip) => {
                log::debug!("skipping row: {context}");
                Ok(None)
            }
            (None, Self::Abort) => Err(Error::HtmlParse(format!("Couldn't find {context}"))),
        }
    }
}

/// Direct element children of `element` with the given tag name.
fn child_elements<'a>(
    element: ElementRef<'a>,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |e| e.value().name() == tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_policy() {
        assert_eq!(MissingName::Abort.resolve(Some(1), "x").unwrap(), Some(1));
        assert_eq!(MissingName::Skip.resolve::<u8>(None, "meal name").unwrap(), None);
        let err = MissingName::Abort.resolve::<u8>(None, "meal name").unwrap_err();
        assert_eq!(err.to_string(), "HTML Parse Error: Couldn't find meal name");
    }

    #[test]
    fn test_child_elements() {
        let html = Html::parse_fragment("<div><p>a</p><span><p>nested</p></span><p>b</p></div>");
        let div = html.root_element().children().find_map(ElementRef::wrap).unwrap();
        assert_eq!(child_elements(div, "p").count(), 2);
    }
}
