// ABOUTME: Scoped variable lookup over a stack of scope frames
// ABOUTME: Resolves literals, references, and dotted paths innermost-first

use serde_json::Value;
use std::collections::HashMap;

/// A single name -> value mapping pushed for the duration of a nested block.
pub type ScopeFrame = HashMap<String, Value>;

/// Ambient keys that carry "current post" semantics when a helper is given
/// no explicit entity. Helpers never sniff arbitrary properties off the
/// context.
pub const AMBIENT_POST_KEYS: &[&str] = &[
    "id",
    "slug",
    "title",
    "status",
    "published_at",
    "url",
    "content",
];

/// A stack of scope frames; one per top-level render.
///
/// Frames are pushed on block entry and popped on block exit. Resolution
/// walks innermost to outermost and the first defined value wins. An unknown
/// key resolves to nothing, never an error.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Create a stack with a single root frame.
    pub fn with_root(frame: ScopeFrame) -> Self {
        Self {
            frames: vec![frame],
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Push a child scope frame.
    pub fn push(&mut self, frame: ScopeFrame) {
        self.frames.push(frame);
    }

    /// Pop the innermost frame. Popping an empty stack is a no-op.
    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Push a frame and return a guard that pops it when dropped, so nested
    /// block renders always restore the stack depth they entered with.
    pub fn scoped(&mut self, frame: ScopeFrame) -> ScopeGuard<'_> {
        self.frames.push(frame);
        ScopeGuard { stack: self }
    }

    /// Look up a key, scanning frames innermost-first.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(key))
    }

    /// Convenience accessor for string-valued context entries.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Evaluate an expression against the current frame stack: a quoted
    /// string literal, a boolean or numeric literal, or a dotted context
    /// path. Unknown paths resolve to `None`.
    pub fn resolve(&self, expr: &str) -> Option<Value> {
        let expr = expr.trim();
        if expr.is_empty() {
            return None;
        }

        if let Some(literal) = parse_literal(expr) {
            return Some(literal);
        }

        let mut segments = expr.split('.');
        let head = segments.next()?;
        let mut current = self.get(head)?.clone();
        for segment in segments {
            current = current.get(segment)?.clone();
        }
        Some(current)
    }

    /// Collect the ambient "current post" fields present on the stack into a
    /// single object, or `None` when no ambient key is defined.
    pub fn ambient_post(&self) -> Option<Value> {
        let mut fields = serde_json::Map::new();
        for key in AMBIENT_POST_KEYS {
            if let Some(value) = self.get(key) {
                fields.insert((*key).to_string(), value.clone());
            }
        }
        if fields.is_empty() {
            None
        } else {
            Some(Value::Object(fields))
        }
    }
}

/// Pops its frame on drop, restoring the stack to its pre-block depth.
pub struct ScopeGuard<'a> {
    stack: &'a mut ScopeStack,
}

impl ScopeGuard<'_> {
    pub fn stack(&self) -> &ScopeStack {
        self.stack
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.stack.pop();
    }
}

fn parse_literal(expr: &str) -> Option<Value> {
    let bytes = expr.as_bytes();
    if expr.len() >= 2 {
        let quoted = (bytes[0] == b'"' && bytes[expr.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[expr.len() - 1] == b'\'');
        if quoted {
            return Some(Value::String(expr[1..expr.len() - 1].to_string()));
        }
    }
    match expr {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        _ => {}
    }
    if let Ok(int) = expr.parse::<i64>() {
        return Some(Value::from(int));
    }
    if let Ok(float) = expr.parse::<f64>() {
        return Some(Value::from(float));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(pairs: &[(&str, Value)]) -> ScopeFrame {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_innermost_frame_wins() {
        let mut stack = ScopeStack::with_root(frame(&[("title", json!("outer"))]));
        stack.push(frame(&[("title", json!("inner"))]));

        assert_eq!(stack.get("title"), Some(&json!("inner")));
        stack.pop();
        assert_eq!(stack.get("title"), Some(&json!("outer")));
    }

    #[test]
    fn test_unknown_key_resolves_to_nothing() {
        let stack = ScopeStack::with_root(frame(&[("title", json!("hello"))]));
        assert!(stack.get("missing").is_none());
        assert!(stack.resolve("missing.path.here").is_none());
    }

    #[test]
    fn test_scope_guard_restores_depth() {
        let mut stack = ScopeStack::with_root(frame(&[("a", json!(1))]));
        {
            let guard = stack.scoped(frame(&[("b", json!(2))]));
            assert_eq!(guard.stack().depth(), 2);
            assert_eq!(guard.stack().get("b"), Some(&json!(2)));
        }
        assert_eq!(stack.depth(), 1);
        assert!(stack.get("b").is_none());
    }

    #[test]
    fn test_resolve_literals() {
        let stack = ScopeStack::new();
        assert_eq!(stack.resolve("'quoted'"), Some(json!("quoted")));
        assert_eq!(stack.resolve("\"double\""), Some(json!("double")));
        assert_eq!(stack.resolve("true"), Some(json!(true)));
        assert_eq!(stack.resolve("42"), Some(json!(42)));
        assert_eq!(stack.resolve("2.5"), Some(json!(2.5)));
    }

    #[test]
    fn test_resolve_nested_path() {
        let stack = ScopeStack::with_root(frame(&[(
            "post",
            json!({"author": {"name": "cata"}}),
        )]));
        assert_eq!(stack.resolve("post.author.name"), Some(json!("cata")));
        assert!(stack.resolve("post.author.email").is_none());
    }

    #[test]
    fn test_ambient_post_collects_known_keys() {
        let mut stack = ScopeStack::with_root(frame(&[
            ("title", json!("Hello")),
            ("status", json!("published")),
            ("unrelated", json!("ignored")),
        ]));
        stack.push(frame(&[("slug", json!("hello"))]));

        let post = stack.ambient_post().unwrap();
        assert_eq!(post["title"], json!("Hello"));
        assert_eq!(post["slug"], json!("hello"));
        assert!(post.get("unrelated").is_none());

        let empty = ScopeStack::new();
        assert!(empty.ambient_post().is_none());
    }
}
