// ABOUTME: Tag-aware text utilities shared by the transform pipeline
// ABOUTME: Tokenizes markup for balance-preserving truncation and allow-list stripping

/// Elements that never take a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

#[derive(Debug)]
enum Token<'a> {
    Tag {
        raw: &'a str,
        name: String,
        closing: bool,
        self_closing: bool,
    },
    Text(&'a str),
}

/// Split markup into tag and text tokens. A stray `<` with no matching `>`
/// is treated as text so malformed fragments pass through unchanged.
fn tokenize(html: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        if lt > 0 {
            tokens.push(Token::Text(&rest[..lt]));
        }
        let tail = &rest[lt..];

        // Comments may contain '>'; skip to their real terminator.
        if let Some(after_comment) = tail.strip_prefix("<!--").and_then(|t| t.find("-->")) {
            let end = 4 + after_comment + 3;
            tokens.push(Token::Tag {
                raw: &tail[..end],
                name: String::new(),
                closing: false,
                self_closing: true,
            });
            rest = &tail[end..];
            continue;
        }

        let Some(gt) = tail.find('>') else {
            tokens.push(Token::Text(tail));
            return tokens;
        };
        let raw = &tail[..=gt];
        let inner = raw[1..raw.len() - 1].trim();
        let closing = inner.starts_with('/');
        let self_closing = inner.ends_with('/') && !closing;
        let name: String = inner
            .trim_start_matches('/')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect::<String>()
            .to_ascii_lowercase();
        tokens.push(Token::Tag {
            raw,
            name,
            closing,
            self_closing,
        });
        rest = &tail[gt + 1..];
    }
    if !rest.is_empty() {
        tokens.push(Token::Text(rest));
    }
    tokens
}

/// Truncate markup after `limit` words, preserving tag balance by closing
/// any still-open elements, and appending `ellipsis` when truncation occurs.
/// Input shorter than the limit is returned unchanged.
pub fn truncate_words(html: &str, limit: usize, ellipsis: &str) -> String {
    let mut out = String::new();
    let mut open: Vec<String> = Vec::new();
    let mut count = 0usize;
    let mut truncated = false;

    'tokens: for token in tokenize(html) {
        match token {
            Token::Tag {
                raw,
                name,
                closing,
                self_closing,
            } => {
                out.push_str(raw);
                if name.is_empty() || self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
                    continue;
                }
                if closing {
                    if let Some(pos) = open.iter().rposition(|n| *n == name) {
                        open.truncate(pos);
                    }
                } else {
                    open.push(name);
                }
            }
            Token::Text(text) => {
                let mut in_word = false;
                for (i, c) in text.char_indices() {
                    if c.is_whitespace() {
                        in_word = false;
                    } else if !in_word {
                        in_word = true;
                        if count == limit {
                            out.push_str(&text[..i]);
                            truncated = true;
                            break 'tokens;
                        }
                        count += 1;
                    }
                }
                out.push_str(text);
            }
        }
    }

    if !truncated {
        return html.to_string();
    }
    out.truncate(out.trim_end().len());
    out.push_str(ellipsis);
    for name in open.iter().rev() {
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }
    out
}

/// Drop every tag whose name is not in the allow-list, retaining text
/// content. Comments and doctype-like tokens are always dropped. An empty
/// allow-list strips everything.
pub fn strip_tags(html: &str, allowed: &[&str]) -> String {
    let mut out = String::new();
    for token in tokenize(html) {
        match token {
            Token::Tag { raw, name, .. } => {
                if !name.is_empty() && allowed.iter().any(|a| a.eq_ignore_ascii_case(&name)) {
                    out.push_str(raw);
                }
            }
            Token::Text(text) => out.push_str(text),
        }
    }
    out
}

/// Reduce markup to whitespace-separated text, substituting a space for each
/// dropped tag so adjacent block elements do not merge words.
pub fn plain_text(html: &str) -> String {
    let mut out = String::new();
    for token in tokenize(html) {
        match token {
            Token::Tag { .. } => out.push(' '),
            Token::Text(text) => out.push_str(text),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_within_limit_is_unchanged() {
        let html = "<p>one two three</p>";
        assert_eq!(truncate_words(html, 3, "…"), html);
        assert_eq!(truncate_words(html, 10, "…"), html);
    }

    #[test]
    fn test_truncate_closes_open_tags() {
        let html = "<p>one <em>two three</em> four</p>";
        assert_eq!(truncate_words(html, 2, "…"), "<p>one <em>two…</em></p>");
    }

    #[test]
    fn test_truncate_counts_words_across_tags() {
        let html = "<p>a b</p><p>c d</p>";
        assert_eq!(truncate_words(html, 3, "…"), "<p>a b</p><p>c…</p>");
    }

    #[test]
    fn test_truncate_ignores_void_elements() {
        let html = "<p>a<br>b c</p>";
        assert_eq!(truncate_words(html, 2, "…"), "<p>a<br>b…</p>");
    }

    #[test]
    fn test_strip_keeps_only_allowed_tags() {
        let html = "<div><p>hi <script>x</script><em>there</em></p></div>";
        assert_eq!(
            strip_tags(html, &["p", "em"]),
            "<p>hi x<em>there</em></p>"
        );
    }

    #[test]
    fn test_strip_everything_with_empty_allow_list() {
        assert_eq!(strip_tags("<p>a <b>b</b></p>", &[]), "a b");
    }

    #[test]
    fn test_strip_drops_comments() {
        assert_eq!(strip_tags("a<!-- x > y -->b", &["p"]), "ab");
    }

    #[test]
    fn test_malformed_fragment_passes_through() {
        assert_eq!(strip_tags("2 < 3 and done", &["p"]), "2 < 3 and done");
        assert_eq!(truncate_words("2 < 3", 10, "…"), "2 < 3");
    }

    #[test]
    fn test_plain_text_separates_block_elements() {
        let text = plain_text("<p>Hello</p><p>World</p>");
        let words: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(words, vec!["Hello", "World"]);
    }
}
