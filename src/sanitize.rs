//! Free-text sanitizing applied to prompts before they leave the relay.
//!
//! Tags are stripped first and the remaining text is entity-escaped. Text
//! that already contains entities (`&lt;script&gt;`) carries no literal
//! angle brackets, so it survives the strip and only has its `&` escaped.
//! The output is therefore not guaranteed to be idempotent, and this is not
//! an HTML sanitizer: it only keeps markup from reaching the backend verbatim.

/// Strips tag-like substrings and escapes HTML-significant characters.
pub fn sanitize(input: &str) -> String {
    escape_html(&strip_tags(input))
}

/// Removes every `<...>` run, matching from a `<` up to the next `>`.
/// A `<` with no closing `>` after it is kept as-is.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        match rest[open..].find('>') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}

/// Escapes `&`, `<`, `>`, `"` and `'` to their entities in a single pass.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
