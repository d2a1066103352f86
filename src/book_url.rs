use crate::error::BookError;
use reqwest::Url;
use crate::site::{HOST, WWW_HOST};

/// A book on projekt-gutenberg.org, identified by the URL of its chapter index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSource {
    base_url: String,
}

impl BookSource {
    /// Reduces any URL below a book (its index or one of its chapters)
    /// to the book's base URL `<scheme>://projekt-gutenberg.org/<author>/<book>`.
    pub fn parse(raw_url: &str) -> Result<Self, BookError> {
        let invalid = || BookError::InvalidUrl(raw_url.to_string());
        let url = Url::parse(raw_url).map_err(|_| invalid())?;

        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(invalid());
        }
        match url.host_str() {
            Some(host) if host == HOST || host == WWW_HOST => {}
            _ => return Err(invalid()),
        }
        if url.port().is_some() {
            return Err(invalid());
        }

        let segments: Vec<&str> = url.path().trim_matches('/').split('/').collect();
        if segments.len() < 2 {
            return Err(invalid());
        }

        Ok(Self {
            base_url: format!("{}://{}/{}/{}", scheme, HOST, segments[0], segments[1]),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a chapter given its link as written in the index.
    pub fn chapter_url(&self, href: &str) -> String {
        format!("{}/{}", self.base_url, href)
    }
}

#[test]
fn test_book_url_is_kept() {
    let source = BookSource::parse("https://projekt-gutenberg.org/goethe/faust1").unwrap();
    assert_eq!("https://projekt-gutenberg.org/goethe/faust1", source.base_url());
}

#[test]
fn test_chapter_suffix_is_discarded() {
    let short = BookSource::parse("http://www.projekt-gutenberg.org/goethe/faust1/").unwrap();
    for long in &[
        "http://www.projekt-gutenberg.org/goethe/faust1/chap001.html",
        "http://projekt-gutenberg.org/goethe/faust1/a/b/c.html?x=1#top",
        "http://projekt-gutenberg.org//goethe/faust1/titlepage.html",
    ] {
        assert_eq!(short, BookSource::parse(long).unwrap(), "{long}");
    }
    assert_eq!("http://projekt-gutenberg.org/goethe/faust1", short.base_url());
}

#[test]
fn test_foreign_urls_are_rejected() {
    for raw in &[
        "ftp://projekt-gutenberg.org/goethe/faust1",
        "https://gutenberg.org/goethe/faust1",
        "https://de.projekt-gutenberg.org/goethe/faust1",
        "https://projekt-gutenberg.org.evil.com/goethe/faust1",
        "https://projekt-gutenberg.org:8080/goethe/faust1",
        "http://www.projekt-gutenberg.org:443/goethe/faust1",
        "projekt-gutenberg.org/goethe/faust1",
        "not a url",
    ] {
        match BookSource::parse(raw) {
            Err(BookError::InvalidUrl(input)) => assert_eq!(*raw, input),
            other => panic!("{raw} was accepted: {other:?}"),
        }
    }
}

#[test]
fn test_short_paths_are_rejected() {
    for raw in &[
        "https://projekt-gutenberg.org",
        "https://projekt-gutenberg.org/",
        "https://projekt-gutenberg.org/goethe",
        "https://projekt-gutenberg.org/goethe/",
    ] {
        assert!(matches!(BookSource::parse(raw), Err(BookError::InvalidUrl(_))), "{raw}");
    }
}

#[test]
fn test_chapter_url() {
    let source = BookSource::parse("https://projekt-gutenberg.org/goethe/faust1").unwrap();
    assert_eq!(
        "https://projekt-gutenberg.org/goethe/faust1/chap002.html",
        source.chapter_url("chap002.html")
    );
}
