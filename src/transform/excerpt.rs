// ABOUTME: Excerpt generation from full post content
// ABOUTME: Selects top-level paragraphs, truncates by word count, and filters tags

use scraper::{ElementRef, Html, Selector};

use super::html::{strip_tags, truncate_words};

/// Tags retained by the default excerpt allow-list.
pub const DEFAULT_ALLOWED_TAGS: &[&str] = &[
    "a", "abbr", "b", "blockquote", "br", "code", "em", "i", "li", "ol", "p", "pre", "s", "small",
    "span", "strong", "sub", "sup", "u", "ul",
];

const ELLIPSIS: &str = "…";

#[derive(Debug, Clone)]
pub struct ExcerptOptions {
    /// Number of leading top-level paragraphs to keep.
    pub paragraphs: usize,
    /// Optional word limit applied after paragraph selection.
    pub words: Option<usize>,
    /// Tag allow-list for the final stripping pass.
    pub allowed_tags: Vec<String>,
}

impl Default for ExcerptOptions {
    fn default() -> Self {
        Self {
            paragraphs: 1,
            words: None,
            allowed_tags: DEFAULT_ALLOWED_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl ExcerptOptions {
    pub fn with_paragraphs(mut self, paragraphs: usize) -> Self {
        self.paragraphs = paragraphs;
        self
    }

    pub fn with_words(mut self, words: usize) -> Self {
        self.words = Some(words);
        self
    }
}

/// Derive an excerpt from raw HTML content.
///
/// Only paragraphs not nested inside another paragraph are considered; the
/// first `paragraphs` of them are re-wrapped in `<p>` tags and concatenated.
/// A word limit truncates the result while preserving tag balance, appending
/// an ellipsis. Finally every tag outside the allow-list is stripped, keeping
/// its text content. The source fragment is never mutated.
pub fn excerpt(content: &str, options: &ExcerptOptions) -> String {
    if content.trim().is_empty() || options.paragraphs == 0 {
        return String::new();
    }

    let fragment = Html::parse_fragment(content);
    let paragraph = Selector::parse("p").expect("static selector");

    let mut joined = String::new();
    let top_level = fragment
        .select(&paragraph)
        .filter(|el| !has_paragraph_ancestor(el));
    for element in top_level.take(options.paragraphs) {
        joined.push_str("<p>");
        joined.push_str(element.inner_html().trim());
        joined.push_str("</p>");
    }

    let truncated = match options.words {
        Some(limit) => truncate_words(&joined, limit, ELLIPSIS),
        None => joined,
    };

    let allowed: Vec<&str> = options.allowed_tags.iter().map(String::as_str).collect();
    strip_tags(&truncated, &allowed)
}

fn has_paragraph_ancestor(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().name() == "p")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_paragraph_word_limited() {
        let content = "<p>A B C D E</p><p>F G</p>";
        let options = ExcerptOptions::default().with_paragraphs(1).with_words(3);
        assert_eq!(excerpt(content, &options), "<p>A B C…</p>");
    }

    #[test]
    fn test_default_takes_one_paragraph() {
        let content = "<p>first</p><p>second</p>";
        assert_eq!(excerpt(content, &ExcerptOptions::default()), "<p>first</p>");
    }

    #[test]
    fn test_multiple_paragraphs_rewrapped() {
        let content = "<div><p>first</p></div><p>second</p><p>third</p>";
        let options = ExcerptOptions::default().with_paragraphs(2);
        assert_eq!(excerpt(content, &options), "<p>first</p><p>second</p>");
    }

    #[test]
    fn test_empty_content_and_zero_paragraphs() {
        assert_eq!(excerpt("", &ExcerptOptions::default()), "");
        assert_eq!(excerpt("   ", &ExcerptOptions::default()), "");
        let zero = ExcerptOptions::default().with_paragraphs(0);
        assert_eq!(excerpt("<p>text</p>", &zero), "");
    }

    #[test]
    fn test_disallowed_tags_collapse_to_text() {
        let content = "<p>hello <script>alert(1)</script><em>world</em></p>";
        let result = excerpt(content, &ExcerptOptions::default());
        assert_eq!(result, "<p>hello alert(1)<em>world</em></p>");
    }

    #[test]
    fn test_empty_allow_list_strips_everything() {
        let mut options = ExcerptOptions::default();
        options.allowed_tags.clear();
        assert_eq!(excerpt("<p>a <b>b</b></p>", &options), "a b");
    }

    #[test]
    fn test_excerpt_is_idempotent() {
        let content = "<p>A B C D E</p><p>F G</p>";
        let options = ExcerptOptions::default().with_paragraphs(1).with_words(3);
        let once = excerpt(content, &options);
        let twice = excerpt(&once, &options);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_content_without_paragraphs_yields_empty() {
        assert_eq!(excerpt("just plain text", &ExcerptOptions::default()), "");
    }
}
