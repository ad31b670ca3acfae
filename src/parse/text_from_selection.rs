use super::{remove_excess_whitespace, Error};
use scraper::{ElementRef, Selector};

/// Whitespace-collapsed text of the first element matching `selector`.
///
/// Fails if nothing matches or if the match holds no visible text.
pub fn text_from_selection(
    selector: &Selector,
    element: ElementRef<'_>,
    parent_label: &str,
    child_label: &str,
) -> Result<String, Error> {
    let child = element.select(selector).next().ok_or_else(|| {
        Error::HtmlParse(format!(
            "Every {parent_label} element should have a {child_label}."
        ))
    })?;
    get_inner_text(child, child_label)
}

/// Whitespace-collapsed text of every text node below `element`.
pub fn get_inner_text(element: ElementRef<'_>, text_label: &str) -> Result<String, Error> {
    let text = joined_text(element);
    if text.is_empty() {
        let mut text_label = text_label.to_string();
        if let Some(first) = text_label.get_mut(..1) {
            first.make_ascii_uppercase();
        }
        return Err(Error::TextNodeParse(format!(
            "{text_label} element should have text inside."
        )));
    }
    Ok(text)
}

/// Like [`get_inner_text`] but an empty element gives an empty string.
pub fn joined_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    remove_excess_whitespace(&raw).into_owned()
}

/// Non-empty, whitespace-collapsed text fragments below `element`, one per text node.
pub fn text_fragments<'a>(element: ElementRef<'a>) -> impl Iterator<Item = String> + 'a {
    element
        .text()
        .map(|t| remove_excess_whitespace(t).into_owned())
        .filter(|t| !t.is_empty())
}
