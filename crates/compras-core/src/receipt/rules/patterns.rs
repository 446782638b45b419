//! Regex patterns and CSS selectors for NFC-e receipt pages.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::Selector;

lazy_static! {
    // Brazilian amount: "4,99", "1234,56" or "1.234,56"
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"(\d{1,3}(?:\.\d{3})+|\d+),(\d+)"
    ).unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // Store header ("razão social" block at the top of the page)
    pub static ref STORE_NAME: Selector = Selector::parse("div.txtTopo").unwrap();

    // Item rows are numbered "Item + 1", "Item + 2", ...
    pub static ref ITEM_ROW: Selector = Selector::parse("tr[id^='Item +']").unwrap();

    // Layouts without row ids
    pub static ref ANY_ROW: Selector = Selector::parse("tr").unwrap();

    pub static ref ITEM_NAME: Selector = Selector::parse(".txtTit").unwrap();

    pub static ref ITEM_PRICE: Selector = Selector::parse(".valor").unwrap();
}
