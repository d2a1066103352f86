//! Conversion of a chapter page into Markdown.
//!
//! Every chapter page carries its text between two marker rules (see
//! [`crate::site::MARKER`]); banner and footer outside of them are dropped.
//! The retained elements are walked depth-first and rendered with the small
//! set of tags the site actually uses.

use crate::error::BookError;
use crate::site::{BODY, CENTER_BIG_CLASS, MARKER, NAVIGATION_LABELS, SPACED_CLASS};
use crate::status;
use ego_tree::NodeRef;
use regex::Regex;
use scraper::{ElementRef, Html, Node};

lazy_static! {
    static ref SPACE_RUN: Regex = Regex::new(" {2,}").unwrap();
}

/// Position relative to the two marker rules while scanning the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Before,
    Inside,
    After,
}

impl Region {
    /// State after passing another marker.
    fn advance(self) -> Result<Self, BookError> {
        match self {
            Region::Before => Ok(Region::Inside),
            Region::Inside => Ok(Region::After),
            Region::After => Err(BookError::ParsingPage),
        }
    }
}

fn is_navigation_link(elem: ElementRef) -> bool {
    elem.value().name() == "a" && {
        let text = elem.text().collect::<String>();
        NAVIGATION_LABELS.contains(&text.as_str())
    }
}

/// Renders the text of a chapter page.
pub fn chapter_to_markdown(doc: &Html) -> Result<String, BookError> {
    let mut markdown = String::new();
    let body = match doc.select(&BODY).next() {
        Some(body) => body,
        None => return Ok(markdown),
    };

    let mut region = Region::Before;
    for child in body.children().filter_map(ElementRef::wrap) {
        if MARKER.matches(&child) {
            region = region.advance()?;
        } else if region == Region::Inside && !is_navigation_link(child) {
            markdown.push_str(&node_to_markdown(*child));
        }
    }
    Ok(markdown)
}

/// Renders a single node and everything below it.
pub fn node_to_markdown(node: NodeRef<Node>) -> String {
    match node.value() {
        Node::Text(text) => clean_text(text),
        Node::Element(elem) => {
            let children = || children_to_markdown(node);
            let rendered = match elem.name() {
                "br" => "\n\n".to_string(),
                "h1" => format!("# {}\n", children()),
                "h2" => format!("## {}\n", children()),
                "h3" => format!("### {}\n", children()),
                "h4" => format!("#### {}\n", children()),
                "h5" => format!("##### {}\n", children()),
                "h6" => format!("###### {}\n", children()),
                "p" if has_class(node, CENTER_BIG_CLASS) => format!("#### {}\n\n", children()),
                "p" => children() + "\n\n",
                "div" | "a" | "span" => children(),
                "tt" => format!("`{}`", children()),
                "i" => format!("_{}_", children()),
                "img" => String::new(),
                other => {
                    status::warn(format!("Unknown element: {other}"));
                    String::new()
                }
            };

            if has_class(node, SPACED_CLASS) {
                letter_spaced(&rendered)
            } else {
                rendered
            }
        }
        other => {
            status::warn(format!("Unknown node type: {}", node_kind(other)));
            String::new()
        }
    }
}

fn children_to_markdown(node: NodeRef<Node>) -> String {
    node.children().map(node_to_markdown).collect()
}

fn has_class(node: NodeRef<Node>, class: &str) -> bool {
    match node.value() {
        Node::Element(elem) => elem.classes().any(|name| name == class),
        _ => false,
    }
}

/// Drops line breaks and squeezes runs of spaces; leading and trailing
/// spaces stay since they separate inline elements.
fn clean_text(text: &str) -> String {
    SPACE_RUN.replace_all(&text.replace('\n', ""), " ").into_owned()
}

/// Puts a space between every two characters of already rendered Markdown.
/// Markup added by the element itself is spaced as well, so `_word_` turns
/// into `_ w o r d _`.
fn letter_spaced(rendered: &str) -> String {
    let mut spaced = String::with_capacity(rendered.len() * 2);
    for (i, c) in rendered.chars().enumerate() {
        if i > 0 {
            spaced.push(' ');
        }
        spaced.push(c);
    }
    spaced
}

fn node_kind(node: &Node) -> &'static str {
    if node.is_comment() {
        "comment"
    } else if node.is_doctype() {
        "doctype"
    } else if node.is_document() {
        "document"
    } else if node.is_fragment() {
        "fragment"
    } else {
        "processing instruction"
    }
}

#[cfg(test)]
fn chapter(body: &str) -> Html {
    Html::parse_document(&format!("<html><head><title>Kapitel</title></head><body>{body}</body></html>"))
}

#[cfg(test)]
fn fragment_to_markdown(html: &str) -> String {
    let doc = Html::parse_fragment(html);
    children_to_markdown(*doc.root_element())
}

#[cfg(test)]
const RULE: &str = r##"<hr size="1" color="#808080">"##;

#[test]
fn test_only_text_between_markers_is_kept() {
    let doc = chapter(&format!(
        "<div>Projekt Gutenberg</div>{RULE}<h3>Erster Teil</h3><p>Nacht.</p>{RULE}<div>Impressum</div>"
    ));
    assert_eq!("### Erster Teil\nNacht.\n\n", chapter_to_markdown(&doc).unwrap());
}

#[test]
fn test_navigation_links_are_dropped() {
    let doc = chapter(&format!(
        "{RULE}<a href=\"chap001.html\">&lt;&lt;&nbsp;zurück</a><p>Text</p>\
         <a href=\"chap003.html\">weiter&nbsp;&gt;&gt;</a><a href=\"#anm\">Anmerkung</a>{RULE}"
    ));
    assert_eq!("Text\n\nAnmerkung", chapter_to_markdown(&doc).unwrap());
}

#[test]
fn test_other_rules_are_not_markers() {
    let doc = chapter(&format!("<hr>{RULE}<p>A</p>{RULE}<p>B</p>"));
    assert_eq!("A\n\n", chapter_to_markdown(&doc).unwrap());
}

#[test]
fn test_missing_markers() {
    assert_eq!("", chapter_to_markdown(&chapter("<p>Nur Kopf</p>")).unwrap());
    let doc = chapter(&format!("<p>Kopf</p>{RULE}<p>Ende fehlt</p>"));
    assert_eq!("Ende fehlt\n\n", chapter_to_markdown(&doc).unwrap());
}

#[test]
fn test_third_marker_is_an_error() {
    let doc = chapter(&format!("{RULE}<p>A</p>{RULE}<p>B</p>{RULE}"));
    assert!(matches!(chapter_to_markdown(&doc), Err(BookError::ParsingPage)));
}

#[test]
fn test_text_is_cleaned() {
    assert_eq!("a b c", fragment_to_markdown("a  b   c"));
    assert_eq!("a b c", fragment_to_markdown("a b c"));
    assert_eq!(" Zeile eins Zeile zwei ", fragment_to_markdown("  Zeile eins\n   Zeile zwei "));
}

#[test]
fn test_headings() {
    for level in 1..=6 {
        let html = format!("<h{level}>Titel</h{level}>");
        let expected = format!("{} Titel\n", "#".repeat(level));
        assert_eq!(expected, fragment_to_markdown(&html));
    }
}

#[test]
fn test_paragraphs() {
    assert_eq!("#### Faust\n\n", fragment_to_markdown(r#"<p class="centerbig">Faust</p>"#));
    assert_eq!(
        "#### Faust\n\n",
        fragment_to_markdown(r#"<p class="left centerbig">Faust</p>"#)
    );
    assert_eq!("Habe nun, ach!\n\n", fragment_to_markdown("<p>Habe nun, ach!</p>"));
}

#[test]
fn test_inline_elements() {
    assert_eq!(
        "Zeile_kursiv_`mono`Link Spanne",
        fragment_to_markdown(
            r#"Zeile<i>kursiv</i><tt>mono</tt><a href="x.html">Link</a> <span class="x">Spanne</span>"#
        )
    );
    assert_eq!("eins\n\nzwei", fragment_to_markdown("eins<br>zwei"));
    assert_eq!("<div>", fragment_to_markdown(r#"<div>&lt;div&gt;<img src="bild.png"></div>"#));
}

#[test]
fn test_unknown_markup_renders_nothing() {
    status::take_warnings();
    assert_eq!("vorher nachher", fragment_to_markdown("vorher <b>fett</b>nachher"));
    assert_eq!("ab", fragment_to_markdown("a<!-- Kommentar -->b"));
    assert_eq!(
        vec!["Unknown element: b", "Unknown node type: comment"],
        status::take_warnings()
    );
}

#[test]
fn test_known_markup_is_not_reported() {
    status::take_warnings();
    fragment_to_markdown(r#"<p class="centerbig">A<br><i>b</i><tt>c</tt><img src="d.png"></p>"#);
    assert!(status::take_warnings().is_empty());
}

#[test]
fn test_letter_spacing() {
    assert_eq!("a b", fragment_to_markdown(r#"<span class="spaced">ab</span>"#));
    assert_eq!("D u", fragment_to_markdown(r#"<span class="spaced">Du</span>"#));
}

#[test]
fn test_letter_spacing_includes_markup() {
    // Known quirk: the emphasis markers are spaced like the text.
    assert_eq!("_ w o r d _", fragment_to_markdown(r#"<i class="spaced">word</i>"#));
    assert_eq!("#   T \n", fragment_to_markdown(r#"<h1 class="spaced">T</h1>"#));
}
