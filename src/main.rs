extern crate easy_error;
extern crate ego_tree;
#[macro_use]
extern crate lazy_static;
extern crate regex;
extern crate reqwest;
extern crate scraper;
extern crate structopt;
extern crate thiserror;

mod book;
mod book_url;
mod client;
mod error;
mod index;
mod markdown;
mod site;
mod status;

use book::Book;
use book_url::BookSource;
use client::SiteClient;
use easy_error::ResultExt;
use error::BookError;
use std::error::Error as StdError;
use std::path::PathBuf;
use std::process;
use structopt::StructOpt;

/// Downloads a book from projekt-gutenberg.org and saves it as a single Markdown file.
#[derive(StructOpt)]
#[structopt(after_help = "Book URL format:
    http[s]://[www.]projekt-gutenberg.org/<author>/<book>[/whateverdoesntmatter]

Output types:
    * <INFO>
    ! <WARNING>  (yellow)
    ! <ERROR>    (red)")]
struct Args {
    /// Output directory
    #[structopt(long, value_name = "DIRECTORY", default_value = ".", parse(from_os_str))]
    dir: PathBuf,
    /// URL of the book or of any of its chapters
    #[structopt(name = "BOOK_URL")]
    book_url: String,
}

/// Rewrites the single-dash `-dir` option to the `--dir` clap understands.
fn normalize_args<I: IntoIterator<Item = String>>(args: I) -> Vec<String> {
    args.into_iter()
        .map(|arg| if arg == "-dir" { "--dir".to_string() } else { arg })
        .collect()
}

fn main() {
    let args = Args::from_iter(normalize_args(std::env::args()));
    if let Err(err) = run(args) {
        status::error(describe(&err));
        process::exit(1);
    }
}

/// The error message followed by the messages of its causes.
fn describe(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        message.push_str(&format!(": {inner}"));
        cause = inner.source();
    }
    message
}

fn run(args: Args) -> Result<(), BookError> {
    status::info(format!("Book URL: {}", args.book_url));
    let source = BookSource::parse(&args.book_url)?;

    let client = SiteClient::default();
    let book = Book::fetch_index(&client, &source)?;
    status::info(format!("Book: {}", book.metadata.display_title()));

    let markdown = book.download(&client, status::progress)?;

    let path = book.metadata.output_path(&args.dir);
    std::fs::write(&path, markdown).context(format!("Could not write {}", path.display()))?;
    status::clear_line();
    status::info(format!("Saved as: {}", path.display()));
    Ok(())
}

#[test]
fn test_error_description_includes_causes() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
    let err = BookError::from(Err::<(), _>(io).context("Could not write out.md").unwrap_err());
    // easy_error appends the location of the `context` call to its message.
    let message = describe(&err);
    assert!(message.starts_with("Could not write out.md (src"), "{message}");
    assert!(message.contains("main.rs:"), "{message}");
    assert!(message.ends_with("): permission denied"), "{message}");
}

#[test]
fn test_single_dash_dir_is_rewritten() {
    let args = vec!["gutenberg-md", "-dir", "out", "https://projekt-gutenberg.org/goethe/faust1"];
    let args = Args::from_iter(normalize_args(args.into_iter().map(String::from)));
    assert_eq!(PathBuf::from("out"), args.dir);
    assert_eq!("https://projekt-gutenberg.org/goethe/faust1", args.book_url);
}

#[test]
fn test_dir_defaults_to_current_directory() {
    let args = Args::from_iter_safe(vec!["gutenberg-md", "https://projekt-gutenberg.org/goethe/faust1"]).unwrap();
    assert_eq!(PathBuf::from("."), args.dir);
}

#[test]
fn test_exactly_one_book_url() {
    assert!(Args::from_iter_safe(vec!["gutenberg-md"]).is_err());
    assert!(Args::from_iter_safe(vec!["gutenberg-md", "a", "b"]).is_err());
    assert!(Args::from_iter_safe(vec!["gutenberg-md", "--depth", "2", "a"]).is_err());
}
