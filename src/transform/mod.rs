// ABOUTME: Content transform pipeline for HTML fragments
// ABOUTME: Excerpt generation, element extraction, tag filtering, and reading time

pub mod error;
pub mod excerpt;
pub mod extract;
pub mod html;
pub mod reading_time;

pub use error::{Result, TransformError};
pub use excerpt::{excerpt, ExcerptOptions, DEFAULT_ALLOWED_TAGS};
pub use extract::{extract_elements, ExtractedElement};
pub use html::{plain_text, strip_tags, truncate_words};
pub use reading_time::{reading_time, DEFAULT_WORDS_PER_MINUTE};
