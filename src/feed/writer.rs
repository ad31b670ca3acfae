use std::io::Write;

use xml::{
    common::XmlVersion,
    writer::{EmitterConfig, Error, EventWriter, XmlEvent},
};

use super::{Canteen, Day, Meal};

const NAMESPACE: &str = "http://openmensa.org/open-mensa-v2";
const SCHEMA_LOCATION: &str =
    "http://openmensa.org/open-mensa-v2 http://openmensa.org/open-mensa-v2.xsd";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Serializes `canteen` as an OpenMensa v2 document.
pub fn write_feed<W: Write>(canteen: &Canteen, sink: W) -> Result<(), Error> {
    let mut w = EmitterConfig::new()
        .perform_indent(true)
        .create_writer(sink);

    w.write(XmlEvent::StartDocument {
        version: XmlVersion::Version10,
        encoding: Some("UTF-8"),
        standalone: None,
    })?;
    w.write(
        XmlEvent::start_element("openmensa")
            .default_ns(NAMESPACE)
            .ns("xsi", XSI_NAMESPACE)
            .attr("version", "2.0")
            .attr("xsi:schemaLocation", SCHEMA_LOCATION),
    )?;
    w.write(XmlEvent::start_element("canteen"))?;
    for day in canteen.days() {
        write_day(&mut w, day)?;
    }
    w.write(XmlEvent::end_element())?; // canteen
    w.write(XmlEvent::end_element())?; // openmensa

    w.into_inner().write_all(b"\n")?;
    Ok(())
}

fn write_day<W: Write>(w: &mut EventWriter<W>, day: &Day) -> Result<(), Error> {
    let date = day.date().format("%Y-%m-%d").to_string();
    w.write(XmlEvent::start_element("day").attr("date", &date))?;
    if day.categories().is_empty() {
        // a day needs at least one category unless it is closed
        w.write(XmlEvent::start_element("closed"))?;
        w.write(XmlEvent::end_element())?;
    }
    for category in day.categories() {
        w.write(XmlEvent::start_element("category").attr("name", category.name()))?;
        for meal in category.meals() {
            write_meal(w, meal)?;
        }
        w.write(XmlEvent::end_element())?;
    }
    w.write(XmlEvent::end_element())
}

fn write_meal<W: Write>(w: &mut EventWriter<W>, meal: &Meal) -> Result<(), Error> {
    w.write(XmlEvent::start_element("meal"))?;
    text_element(w, XmlEvent::start_element("name"), meal.name())?;
    for note in meal.notes() {
        text_element(w, XmlEvent::start_element("note"), note)?;
    }
    for price in meal.prices() {
        let amount = price.amount.to_string();
        text_element(
            w,
            XmlEvent::start_element("price").attr("role", price.role.as_str()),
            &amount,
        )?;
    }
    w.write(XmlEvent::end_element())
}

fn text_element<'a, W: Write>(
    w: &mut EventWriter<W>,
    start: xml::writer::events::StartElementBuilder<'a>,
    text: &'a str,
) -> Result<(), Error> {
    w.write(start)?;
    w.write(XmlEvent::characters(text))?;
    w.write(XmlEvent::end_element())
}
