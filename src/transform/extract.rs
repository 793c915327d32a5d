// ABOUTME: Selector-based element extraction from HTML fragments
// ABOUTME: Returns an ordered slice of matches with tag, attributes, and inner markup

use std::collections::BTreeMap;

use scraper::{Html, Selector};

use super::error::{Result, TransformError};

/// One matched element, exposed to block rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedElement {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub inner_html: String,
}

/// Select nodes matching `selector` and return matches in document order,
/// sliced to `[offset, offset + count)`.
pub fn extract_elements(
    content: &str,
    selector: &str,
    offset: usize,
    count: usize,
) -> Result<Vec<ExtractedElement>> {
    let parsed = Selector::parse(selector).map_err(|e| TransformError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })?;

    let fragment = Html::parse_fragment(content);
    Ok(fragment
        .select(&parsed)
        .skip(offset)
        .take(count)
        .map(|element| ExtractedElement {
            tag: element.value().name().to_string(),
            attributes: element
                .value()
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            inner_html: element.inner_html(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = concat!(
        "<h2 id=\"one\">First</h2><p>intro</p>",
        "<h2 id=\"two\">Second</h2><p>more</p>",
        "<h2 id=\"three\">Third</h2>"
    );

    #[test]
    fn test_extracts_matches_in_document_order() {
        let elements = extract_elements(CONTENT, "h2", 0, usize::MAX).unwrap();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].tag, "h2");
        assert_eq!(elements[0].inner_html, "First");
        assert_eq!(elements[0].attributes.get("id"), Some(&"one".to_string()));
        assert_eq!(elements[2].inner_html, "Third");
    }

    #[test]
    fn test_offset_and_count_slice_matches() {
        let elements = extract_elements(CONTENT, "h2", 1, 1).unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].inner_html, "Second");

        let past_end = extract_elements(CONTENT, "h2", 5, 2).unwrap();
        assert!(past_end.is_empty());
    }

    #[test]
    fn test_no_matches_is_empty_not_error() {
        let elements = extract_elements(CONTENT, "table", 0, usize::MAX).unwrap();
        assert!(elements.is_empty());
    }

    #[test]
    fn test_invalid_selector_is_a_transform_fault() {
        let result = extract_elements(CONTENT, "h2[", 0, 1);
        assert!(matches!(
            result,
            Err(TransformError::InvalidSelector { .. })
        ));
    }
}
