use easy_error::Error;
use thiserror::Error as ThisError;

/// Everything that can abort a download.
#[derive(Debug, ThisError)]
pub enum BookError {
    #[error("invalid url '{0}', expected http[s]://[www.]projekt-gutenberg.org/<author>/<book>")]
    InvalidUrl(String),
    #[error("book not found")]
    BookNotFound,
    #[error("no chapters found in index")]
    NoChaptersFound,
    /// A list item in the chapter index has no link in it.
    #[error("missing link in chapter index")]
    MissingChapterLink,
    #[error("chapter not found: {0}")]
    ChapterNotFound(String),
    #[error("error parsing page")]
    ParsingPage,
    /// Network or file system failure.
    #[error(transparent)]
    Io(#[from] Error),
}
