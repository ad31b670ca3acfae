//! Plan pages of the Studierendenwerk Bielefeld.
//!
//! Each `<h2>` heading (`Montag 01.12.2025`) is followed by a `div.mensa.plan` holding the table of that
//! day. A row's first cell has the category in an `<h3>` and name plus notes in `<p>` elements, the
//! second cell the `|`-separated prices for students, employees and guests. Neighbouring rows of the
//! same category are grouped.

use scraper::{ElementRef, Html};

use super::{
    child_elements, normalize_prices, parse_dotted_heading,
    remove_excess_whitespace,
    text_from_selection::{joined_text, text_fragments},
    Error, MissingName,
};
use crate::{
    feed::{Canteen, Day, Meal},
    static_selector,
};

/// Fragments containing this are links to the allergen popup, not part of the meal text.
const DETAILS_LINK: &str = "Details";

#[derive(Debug, Clone, Copy)]
pub struct Bielefeld {
    pub missing_name: MissingName,
}

impl Default for Bielefeld {
    fn default() -> Self {
        Self {
            missing_name: MissingName::Skip,
        }
    }
}

impl Bielefeld {
    pub fn extract(&self, document: &Html) -> Result<Canteen, Error> {
        static_selector!(PLAN_SELECTOR <- "h2, div.mensa.plan");
        let mut canteen = Canteen::default();
        let mut heading: Option<ElementRef> = None;
        for element in document.select(&PLAN_SELECTOR) {
            if element.value().name() == "h2" {
                heading = Some(element);
                continue;
            }
            let heading = heading
                .ok_or_else(|| Error::html_parse_error("meal plan without a date heading"))?;
            let table = child_elements(element, "div")
                .next()
                .and_then(|div| child_elements(div, "table").next())
                .ok_or_else(|| Error::html_parse_error("meal plan without a table"))?;

            let heading_text = joined_text(heading);
            let Some(date) = parse_dotted_heading(&heading_text) else {
                log::debug!("not a date heading: {heading_text:?}");
                continue;
            };
            canteen.push_day(self.day_from_table(Day::new(date), table)?);
        }
        Ok(canteen)
    }

    fn day_from_table(&self, mut day: Day, table: ElementRef<'_>) -> Result<Day, Error> {
        static_selector!(ROW_SELECTOR <- "tr");
        let rows = child_elements(table, "tbody").flat_map(|body| body.select(&ROW_SELECTOR));
        for row in rows {
            if let Some((category, meal)) = self.meal_from_row(row)? {
                day.push_grouped(&category, meal);
            }
        }
        Ok(day)
    }

    fn meal_from_row(&self, row: ElementRef<'_>) -> Result<Option<(String, Meal)>, Error> {
        let mut cells = child_elements(row, "td");
        let Some(description) = self.missing_name.resolve(cells.next(), "meal cell")? else {
            return Ok(None);
        };

        let category = child_elements(description, "h3")
            .next()
            .map(joined_text)
            .filter(|name| !name.is_empty());
        let Some(category) = self.missing_name.resolve(category, "category name")? else {
            return Ok(None);
        };

        let mut fragments = child_elements(description, "p")
            .flat_map(text_fragments)
            .filter(|t| !t.contains(DETAILS_LINK));
        let name = fragments.next().and_then(|name| Meal::new(&name));
        let Some(mut meal) = self.missing_name.resolve(name, "meal name")? else {
            return Ok(None);
        };
        // capped at the feed's text limit by `add_note`
        meal.add_note(&fragments.collect::<Vec<_>>().join(" "));

        if let Some(price_cell) = cells.next() {
            let price_text = price_cell.text().collect::<Vec<_>>().join(" ");
            meal.set_prices(normalize_prices(&remove_excess_whitespace(&price_text))?);
        }
        Ok(Some((category, meal)))
    }
}
