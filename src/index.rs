use crate::book_url::BookSource;
use crate::error::BookError;
use crate::site::{AUTHOR_META, CHAPTER_ITEM, CHAPTER_LINK, FIRST_PUBLISHED_META, TITLE_META, UNKNOWN};
use scraper::{Html, Selector};
use std::path::{Path, PathBuf};

/// Bibliographic data from the `<meta>` tags of the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMetadata {
    pub author: String,
    pub title: String,
    pub year: String,
}

impl BookMetadata {
    pub fn from_document(doc: &Html) -> Self {
        Self {
            author: meta_content(doc, &AUTHOR_META),
            title: meta_content(doc, &TITLE_META),
            year: meta_content(doc, &FIRST_PUBLISHED_META),
        }
    }

    /// `<author> -- <title>, <year>`
    pub fn display_title(&self) -> String {
        format!("{} -- {}, {}", self.author, self.title, self.year)
    }

    pub fn file_name(&self) -> String {
        self.display_title() + ".md"
    }

    pub fn output_path<P: AsRef<Path>>(&self, dir: P) -> PathBuf {
        dir.as_ref().join(self.file_name())
    }
}

fn meta_content(doc: &Html, selector: &Selector) -> String {
    doc.select(selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// Contents of a book's index page.
#[derive(Debug)]
pub struct BookIndex {
    pub metadata: BookMetadata,
    /// Absolute chapter URLs in reading order.
    pub chapters: Vec<String>,
}

pub fn parse_index(doc: &Html, source: &BookSource) -> Result<BookIndex, BookError> {
    Ok(BookIndex {
        metadata: BookMetadata::from_document(doc),
        chapters: chapter_urls(doc, source)?,
    })
}

fn chapter_urls(doc: &Html, source: &BookSource) -> Result<Vec<String>, BookError> {
    let mut chapters = Vec::new();
    for item in doc.select(&CHAPTER_ITEM) {
        // The site puts the link next to the entry text rather than around it,
        // so search the whole list item.
        let href = item
            .select(&CHAPTER_LINK)
            .next()
            .and_then(|link| link.value().attr("href"))
            .ok_or(BookError::MissingChapterLink)?;
        chapters.push(source.chapter_url(href));
    }

    if chapters.is_empty() {
        return Err(BookError::NoChaptersFound);
    }
    Ok(chapters)
}

#[cfg(test)]
fn faust_source() -> BookSource {
    BookSource::parse("https://www.projekt-gutenberg.org/goethe/faust1/chap001.html").unwrap()
}

#[test]
fn test_index_is_parsed() {
    let doc = Html::parse_document(
        r#"<html><head>
        <meta name="author" content="Goethe">
        <meta name="title" content="Faust">
        <meta name="firstpub" content="1808">
        </head><body>
        <h3>Inhalt</h3>
        <ul>
          <li><a href="titlepage.html">Titelblatt</a></li>
          <li>Zueignung <a href="chap001.html"></a></li>
          <li><span><a name="x">Vorspiel</a><a href="chap002.html">&nbsp;</a></span></li>
        </ul>
        </body></html>"#,
    );
    let index = parse_index(&doc, &faust_source()).unwrap();

    assert_eq!(
        BookMetadata {
            author: "Goethe".to_string(),
            title: "Faust".to_string(),
            year: "1808".to_string(),
        },
        index.metadata
    );
    assert_eq!(
        vec![
            "https://projekt-gutenberg.org/goethe/faust1/titlepage.html",
            "https://projekt-gutenberg.org/goethe/faust1/chap001.html",
            "https://projekt-gutenberg.org/goethe/faust1/chap002.html",
        ],
        index.chapters
    );
}

#[test]
fn test_missing_metadata_is_unknown() {
    let doc = Html::parse_document(
        r#"<html><head><meta name="author"><meta name="title" content="Faust"></head>
        <body><ul><li><a href="chap001.html">1</a></li></ul></body></html>"#,
    );
    let metadata = parse_index(&doc, &faust_source()).unwrap().metadata;
    assert_eq!("Unknown -- Faust, Unknown", metadata.display_title());
}

#[test]
fn test_no_chapters() {
    let doc = Html::parse_document("<html><head></head><body><p>Leer</p><ul></ul></body></html>");
    assert!(matches!(parse_index(&doc, &faust_source()), Err(BookError::NoChaptersFound)));
}

#[test]
fn test_list_item_without_link() {
    let doc = Html::parse_document(
        r#"<body><ul><li><a href="chap001.html">1</a></li><li><a name="chap002">2</a></li></ul></body>"#,
    );
    assert!(matches!(parse_index(&doc, &faust_source()), Err(BookError::MissingChapterLink)));
}

#[test]
fn test_output_path() {
    let metadata = BookMetadata {
        author: "Goethe".to_string(),
        title: "Faust".to_string(),
        year: "1808".to_string(),
    };
    assert_eq!("Goethe -- Faust, 1808.md", metadata.file_name());
    assert_eq!(
        Path::new("books").join("Goethe -- Faust, 1808.md"),
        metadata.output_path("books")
    );
}
