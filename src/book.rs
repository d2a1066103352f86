use crate::book_url::BookSource;
use crate::client::{Fetch, Page};
use crate::error::BookError;
use crate::index::{parse_index, BookMetadata};
use crate::markdown::chapter_to_markdown;
use crate::site::{TITLE_PAGE, TITLE_PAGE_SEPARATOR};
use scraper::Html;

/// A book whose index has been fetched, ready to download its chapters.
#[derive(Debug)]
pub struct Book {
    pub metadata: BookMetadata,
    pub chapters: Vec<String>,
}

impl Book {
    pub fn fetch_index<F: Fetch>(client: &F, source: &BookSource) -> Result<Self, BookError> {
        let page = match client.fetch(source.base_url())? {
            Page::Found(page) => page,
            Page::NotFound => return Err(BookError::BookNotFound),
        };
        let index = parse_index(&Html::parse_document(&page), source)?;

        Ok(Self {
            metadata: index.metadata,
            chapters: index.chapters,
        })
    }

    /// Downloads all chapters in order and joins them into one Markdown text.
    /// `progress` is called with the 1-based chapter number and the chapter
    /// count before each download.
    pub fn download<F, P>(&self, client: &F, mut progress: P) -> Result<String, BookError>
    where
        F: Fetch,
        P: FnMut(usize, usize),
    {
        let mut markdown = String::new();
        for (i, chapter_url) in self.chapters.iter().enumerate() {
            progress(i + 1, self.chapters.len());
            let page = match client.fetch(chapter_url)? {
                Page::Found(page) => page,
                Page::NotFound => return Err(BookError::ChapterNotFound(chapter_url.clone())),
            };
            markdown.push_str(&chapter_to_markdown(&Html::parse_document(&page))?);

            if is_title_page(chapter_url) {
                markdown.push_str(TITLE_PAGE_SEPARATOR);
            }
        }
        Ok(markdown)
    }
}

fn is_title_page(chapter_url: &str) -> bool {
    chapter_url.rsplit('/').next() == Some(TITLE_PAGE)
}

#[cfg(test)]
use easy_error::{err_msg, Error};
#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

/// Serves pages from memory and records which URLs were requested.
#[cfg(test)]
struct StaticSite {
    pages: HashMap<String, String>,
    broken: Option<String>,
    requested: RefCell<Vec<String>>,
}

#[cfg(test)]
impl StaticSite {
    fn new(pages: Vec<(String, String)>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            broken: None,
            requested: RefCell::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl Fetch for StaticSite {
    fn fetch(&self, url: &str) -> Result<Page, Error> {
        self.requested.borrow_mut().push(url.to_string());
        if self.broken.as_deref() == Some(url) {
            return Err(err_msg(format!("Could not retrieve page {url}")));
        }
        Ok(match self.pages.get(url) {
            Some(page) => Page::Found(page.clone()),
            None => Page::NotFound,
        })
    }
}

#[cfg(test)]
const BASE: &str = "https://projekt-gutenberg.org/goethe/faust1";

#[cfg(test)]
fn index_page(chapters: &[&str]) -> String {
    let items: String = chapters
        .iter()
        .map(|href| format!(r#"<li><a href="{href}">{href}</a></li>"#))
        .collect();
    format!(
        r#"<html><head>
        <meta name="author" content="Goethe">
        <meta name="title" content="Faust">
        <meta name="firstpub" content="1808">
        </head><body><ul>{items}</ul></body></html>"#
    )
}

#[cfg(test)]
fn chapter_page(content: &str) -> String {
    let rule = r##"<hr size="1" color="#808080">"##;
    format!(
        "<html><body><div>Projekt Gutenberg-DE</div>{rule}\
         <a href=\"index.html\">&lt;&lt;&nbsp;zurück</a>{content}\
         <a href=\"next.html\">weiter&nbsp;&gt;&gt;</a>{rule}<div>Impressum</div></body></html>"
    )
}

#[cfg(test)]
fn assemble<F: Fetch>(client: &F, source: &BookSource) -> Result<(BookMetadata, String), BookError> {
    let book = Book::fetch_index(client, source)?;
    let markdown = book.download(client, |_, _| {})?;
    Ok((book.metadata, markdown))
}

#[cfg(test)]
fn source() -> BookSource {
    BookSource::parse("https://www.projekt-gutenberg.org/goethe/faust1/teil1.html").unwrap()
}

#[test]
fn test_single_chapter_book() {
    let site = StaticSite::new(vec![
        (BASE.to_string(), index_page(&["teil1.html"])),
        (format!("{BASE}/teil1.html"), chapter_page("<h1>Faust</h1>")),
    ]);

    let (metadata, markdown) = assemble(&site, &source()).unwrap();
    assert_eq!("# Faust\n", markdown);
    assert_eq!("Goethe -- Faust, 1808.md", metadata.file_name());
}

#[test]
fn test_title_page_is_followed_by_separator() {
    let site = StaticSite::new(vec![
        (BASE.to_string(), index_page(&["titlepage.html", "chap001.html", "chap002.html"])),
        (format!("{BASE}/titlepage.html"), chapter_page(r#"<p class="centerbig">Faust</p>"#)),
        (format!("{BASE}/chap001.html"), chapter_page("<h3>Zueignung</h3>")),
        (format!("{BASE}/chap002.html"), chapter_page("<p>Ihr naht euch wieder</p>")),
    ]);

    let book = Book::fetch_index(&site, &source()).unwrap();
    let mut progress = Vec::new();
    let markdown = book
        .download(&site, |current, total| progress.push((current, total)))
        .unwrap();

    assert_eq!(
        "#### Faust\n\n\n----------------\n### Zueignung\nIhr naht euch wieder\n\n",
        markdown
    );
    assert_eq!(1, markdown.matches("----------------").count());
    assert_eq!(vec![(1, 3), (2, 3), (3, 3)], progress);
    assert_eq!(
        vec![
            BASE.to_string(),
            format!("{BASE}/titlepage.html"),
            format!("{BASE}/chap001.html"),
            format!("{BASE}/chap002.html"),
        ],
        *site.requested.borrow()
    );
}

#[test]
fn test_title_page_must_be_the_last_segment() {
    assert!(is_title_page("https://projekt-gutenberg.org/goethe/faust1/titlepage.html"));
    assert!(!is_title_page("https://projekt-gutenberg.org/goethe/faust1/titlepage.html.bak"));
    assert!(!is_title_page("https://projekt-gutenberg.org/goethe/faust1/mytitlepage.html"));
}

#[test]
fn test_missing_book() {
    let site = StaticSite::new(vec![]);
    assert!(matches!(assemble(&site, &source()), Err(BookError::BookNotFound)));
}

#[test]
fn test_index_without_chapters() {
    let site = StaticSite::new(vec![(BASE.to_string(), index_page(&[]))]);
    assert!(matches!(assemble(&site, &source()), Err(BookError::NoChaptersFound)));
}

#[test]
fn test_first_failing_chapter_aborts() {
    let mut site = StaticSite::new(vec![
        (BASE.to_string(), index_page(&["chap001.html", "chap002.html", "chap003.html"])),
        (format!("{BASE}/chap001.html"), chapter_page("<p>Eins</p>")),
        (format!("{BASE}/chap003.html"), chapter_page("<p>Drei</p>")),
    ]);

    match assemble(&site, &source()) {
        Err(BookError::ChapterNotFound(url)) => assert_eq!(format!("{BASE}/chap002.html"), url),
        other => panic!("unexpected result {other:?}"),
    }
    assert_eq!(3, site.requested.borrow().len());

    site.broken = Some(format!("{BASE}/chap001.html"));
    assert!(matches!(assemble(&site, &source()), Err(BookError::Io(_))));
}

#[test]
fn test_malformed_chapter_aborts() {
    let rule = r##"<hr size="1" color="#808080">"##;
    let site = StaticSite::new(vec![
        (BASE.to_string(), index_page(&["chap001.html"])),
        (format!("{BASE}/chap001.html"), format!("<body>{rule}{rule}{rule}</body>")),
    ]);
    assert!(matches!(assemble(&site, &source()), Err(BookError::ParsingPage)));
}
