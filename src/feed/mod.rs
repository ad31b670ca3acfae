//! The OpenMensa record tree: canteen → day → category → meal → price.
mod writer;

use chrono::NaiveDate;

use crate::parse::{remove_excess_whitespace, truncate_chars, Euro};

pub use writer::write_feed;

/// Longest name or note the feed schema accepts.
pub const MAX_TEXT_LEN: usize = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Employee,
    Other,
}

impl Role {
    pub const ALL: [Self; 3] = [Self::Student, Self::Employee, Self::Other];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Employee => "employee",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    pub role: Role,
    pub amount: Euro,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meal {
    name: String,
    notes: Vec<String>,
    prices: Vec<Price>,
}

impl Meal {
    /// Returns `None` if `name` is blank.
    pub fn new(name: &str) -> Option<Self> {
        let name = clean_text(name)?;
        Some(Self {
            name,
            notes: Vec::new(),
            prices: Vec::new(),
        })
    }

    /// Adds a note; blank notes are dropped.
    pub fn add_note(&mut self, note: &str) {
        if let Some(note) = clean_text(note) {
            self.notes.push(note);
        }
    }

    /// Pairs `amounts` positionally with student, employee and other. Extra amounts are ignored.
    pub fn set_prices(&mut self, amounts: impl IntoIterator<Item = Euro>) {
        self.prices = Role::ALL
            .into_iter()
            .zip(amounts)
            .map(|(role, amount)| Price { role, amount })
            .collect();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn prices(&self) -> &[Price] {
        &self.prices
    }

    #[cfg(test)]
    pub fn price(&self, role: Role) -> Option<Euro> {
        self.prices.iter().find(|p| p.role == role).map(|p| p.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    meals: Vec<Meal>,
}

impl Category {
    /// `name` is cleaned and capped like meal names.
    pub fn new(name: &str, first: Meal) -> Self {
        Self {
            name: capped_text(name),
            meals: vec![first],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    date: NaiveDate,
    categories: Vec<Category>,
}

impl Day {
    pub const fn new(date: NaiveDate) -> Self {
        Self {
            date,
            categories: Vec::new(),
        }
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Appends a category holding only `meal`.
    pub fn push_category(&mut self, name: &str, meal: Meal) {
        self.categories.push(Category::new(name, meal));
    }

    /// Appends `meal` to the last category if it carries the same name, else starts a new one.
    pub fn push_grouped(&mut self, name: &str, meal: Meal) {
        let category = Category::new(name, meal);
        match self.categories.last_mut() {
            Some(last) if last.name == category.name => last.meals.extend(category.meals),
            _ => self.categories.push(category),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Canteen {
    days: Vec<Day>,
}

impl Canteen {
    pub fn push_day(&mut self, day: Day) {
        self.days.push(day);
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    #[cfg(test)]
    pub fn day(&self, date: NaiveDate) -> Option<&Day> {
        self.days.iter().find(|d| d.date == date)
    }
}

fn capped_text(s: &str) -> String {
    let s = remove_excess_whitespace(s);
    truncate_chars(&s, MAX_TEXT_LEN).trim_end().to_owned()
}

fn clean_text(s: &str) -> Option<String> {
    Some(capped_text(s)).filter(|s| !s.is_empty())
}
