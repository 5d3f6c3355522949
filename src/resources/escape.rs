//! Android resource string escaping.
//!
//! aapt treats an unescaped `'` as an error and an unescaped `"` as a quoting
//! delimiter, and a leading `@` or `?` as a reference. Text read from a
//! resource file is decoded into plain text, and text written back is encoded
//! again so machine output can never break the build.

use quick_xml::escape::partial_escape;

/// Decode the resource-level escapes `\'`, `\"`, `\@` and `\?`
///
/// A value wrapped in one pair of unescaped double quotes loses them, as aapt
/// does. Other backslash sequences (`\n`, `\t`, `\\`, `\u0041`) are left
/// untouched so they survive a read/write cycle verbatim.
pub fn unescape_resource_text(text: &str) -> String {
    let text = strip_enclosing_quotes(text);
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some(&next @ ('\'' | '"' | '@' | '?')) => {
                    out.push(next);
                    chars.next();
                }
                Some(&'\\') => {
                    out.push('\\');
                    out.push('\\');
                    chars.next();
                }
                _ => out.push(c),
            }
        } else {
            out.push(c);
        }
    }

    out
}

fn strip_enclosing_quotes(text: &str) -> &str {
    if text.len() < 2 || !text.starts_with('"') || !text.ends_with('"') {
        return text;
    }
    let inner = &text[1..text.len() - 1];
    let trailing_backslashes = inner.chars().rev().take_while(|c| *c == '\\').count();
    if trailing_backslashes % 2 == 0 { inner } else { text }
}

/// Encode plain text for the body of a `<string>` or `<item>` element
pub fn escape_resource_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut preceding_backslashes = 0usize;

    for (i, c) in text.chars().enumerate() {
        let escaped = preceding_backslashes % 2 == 1;
        match c {
            '\'' | '"' if !escaped => {
                out.push('\\');
                out.push(c);
            }
            '@' | '?' if i == 0 => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }

        if c == '\\' {
            preceding_backslashes += 1;
        } else {
            preceding_backslashes = 0;
        }
    }

    partial_escape(out.as_str()).into_owned()
}
