//! Plan pages of the Studentenwerk Frankfurt.
//!
//! Every day is a bootstrap panel: a `div.panel-heading` with the date in a `<strong>`, followed by a
//! `div.panel-body` whose table has one row per meal. Rows carry no category, so categories are numbered
//! `Essen 1`, `Essen 2`, … per day.

use scraper::{ElementRef, Html};

use super::{
    child_elements, normalize_price, parse_month_name_heading,
    text_from_selection::{joined_text, text_from_selection},
    Error, MissingName, FRANKFURT_MARKUP,
};
use crate::{
    feed::{Canteen, Day, Meal},
    static_selector,
};

#[derive(Debug, Clone, Copy)]
pub struct Frankfurt {
    /// The headings omit the year.
    pub year: i32,
    pub missing_name: MissingName,
}

impl Frankfurt {
    pub const fn new(year: i32) -> Self {
        Self {
            year,
            missing_name: MissingName::Abort,
        }
    }

    pub fn extract(&self, document: &Html) -> Result<Canteen, Error> {
        static_selector!(HEADING_SELECTOR <- "div.panel-heading");
        let mut canteen = Canteen::default();
        for heading in document.select(&HEADING_SELECTOR) {
            let Some(panel) = heading.parent().and_then(ElementRef::wrap) else {
                continue;
            };
            if let Some(day) = self.day_from_panel(heading, panel)? {
                canteen.push_day(day);
            }
        }
        Ok(canteen)
    }

    fn day_from_panel(
        &self,
        heading: ElementRef<'_>,
        panel: ElementRef<'_>,
    ) -> Result<Option<Day>, Error> {
        let Some(heading_text) = child_elements(heading, "strong").next().map(joined_text) else {
            return Ok(None);
        };
        let Some(date) = parse_month_name_heading(&heading_text, self.year) else {
            log::debug!("not a date heading: {heading_text:?}");
            return Ok(None);
        };

        static_selector!(ROW_SELECTOR <- "div.panel-body > table > * > tr");
        let mut day = Day::new(date);
        let mut number = 1;
        for row in panel.select(&ROW_SELECTOR) {
            if let Some(meal) = self.meal_from_row(row)? {
                day.push_category(&format!("Essen {number}"), meal);
                number += 1;
            }
        }
        Ok(Some(day))
    }

    fn meal_from_row(&self, row: ElementRef<'_>) -> Result<Option<Meal>, Error> {
        static_selector!(BOLD_SELECTOR <- "td strong");
        static_selector!(NOTE_SELECTOR <- "p");
        static_selector!(TAG_SELECTOR <- "img[title]");

        let name = text_from_selection(&BOLD_SELECTOR, row, "meal row", "meal name")
            .ok()
            .and_then(|name| Meal::new(&name));
        let Some(mut meal) = self.missing_name.resolve(name, "meal name")? else {
            return Ok(None);
        };

        // the price cell has paragraphs too, only the first cell describes the meal
        if let Some(cell) = child_elements(row, "td").next() {
            let note = cell
                .select(&NOTE_SELECTOR)
                .map(joined_text)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            meal.add_note(&note);
        }

        for tag in row.select(&TAG_SELECTOR) {
            meal.add_note(tag.value().attr("title").unwrap_or_default());
        }

        if let Some(student) = row.select(&BOLD_SELECTOR).nth(1).map(joined_text) {
            if let Some(student) = normalize_price(&student)? {
                let others = student.checked_add(FRANKFURT_MARKUP)?;
                meal.set_prices([student, others, others]);
            }
        }
        Ok(Some(meal))
    }
}
