//! Lazily compiled CSS selectors.
//!
//! Selectors are string literals checked by the tests below, so a parse failure is a bug and panics on first use.

#[macro_export]
macro_rules! static_selector {
    ($x: ident <- $sel: literal) => {
        static $x: ::std::sync::LazyLock<::scraper::Selector> = ::std::sync::LazyLock::new(|| {
            ::scraper::Selector::parse($sel)
                .unwrap_or_else(|e| panic!("Error parsing static selector {}: {:?}", $sel, e))
        });
    };
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    #[test]
    fn test_selector_is_reused() {
        static_selector!(ROW <- "table tr");
        let html = Html::parse_document("<table><tr><td>a</td></tr><tr><td>b</td></tr></table>");
        assert_eq!(html.select(&ROW).count(), 2);
        assert!(std::ptr::eq(&*ROW, &*ROW));
    }

    #[test]
    #[should_panic(expected = "Error parsing static selector")]
    fn test_invalid_selector_panics() {
        static_selector!(BROKEN <- "td >");
        let html = Html::parse_fragment("<td></td>");
        let _ = html.select(&BROKEN).count();
    }
}
