//! Markup contract of projekt-gutenberg.org.
//!
//! Everything the scraper assumes about the site's HTML lives here, so a
//! change on the site side should only ever touch this file.

use scraper::Selector;

/// Host every book URL is rewritten to.
pub const HOST: &str = "projekt-gutenberg.org";
/// Alternative host accepted on input.
pub const WWW_HOST: &str = "www.projekt-gutenberg.org";

/// Placeholder for metadata the index page does not provide.
pub const UNKNOWN: &str = "Unknown";

pub const META_AUTHOR: &str = "author";
pub const META_TITLE: &str = "title";
pub const META_FIRST_PUBLISHED: &str = "firstpub";

/// The thin gray rule that delimits the chapter text from the site chrome.
pub const MARKER_SELECTOR: &str = r##"hr[size="1"][color="#808080"]"##;

/// Labels of the "back" and "next" navigation links inside the text region.
pub const NAVIGATION_LABELS: [&str; 2] = ["<<\u{a0}zurück", "weiter\u{a0}>>"];

/// Paragraph class rendered as a level 4 heading.
pub const CENTER_BIG_CLASS: &str = "centerbig";
/// Class for letter-spaced (gesperrt) text.
pub const SPACED_CLASS: &str = "spaced";

/// Chapter file that holds the title page of a book.
pub const TITLE_PAGE: &str = "titlepage.html";
/// Separator written after the title page.
pub const TITLE_PAGE_SEPARATOR: &str = "\n----------------\n";

lazy_static! {
    pub static ref MARKER: Selector = Selector::parse(MARKER_SELECTOR).unwrap();
    pub static ref BODY: Selector = Selector::parse("body").unwrap();
    pub static ref CHAPTER_ITEM: Selector = Selector::parse("body ul li").unwrap();
    pub static ref CHAPTER_LINK: Selector = Selector::parse("a[href]").unwrap();
    pub static ref AUTHOR_META: Selector = Selector::parse(&meta_selector(META_AUTHOR)).unwrap();
    pub static ref TITLE_META: Selector = Selector::parse(&meta_selector(META_TITLE)).unwrap();
    pub static ref FIRST_PUBLISHED_META: Selector =
        Selector::parse(&meta_selector(META_FIRST_PUBLISHED)).unwrap();
}

fn meta_selector(name: &str) -> String {
    format!(r#"head meta[name="{name}"]"#)
}

#[test]
fn test_author_meta_selector() {
    let doc = scraper::Html::parse_document(
        r#"<html><head><meta name="author" content="Goethe"></head><body></body></html>"#,
    );
    let found = doc.select(&AUTHOR_META).next().expect("meta not found");
    assert_eq!(Some("Goethe"), found.value().attr("content"));
}
