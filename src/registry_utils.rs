use once_cell::sync::Lazy;
use regex::Regex;

static CONTINUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\\r?\n[ \t]*").expect("valid regex"));

pub(crate) const LINE_SEPARATOR: &str = "\r\n";

/// Removes one layer of `quote` from both ends of the trimmed input.
pub fn strip_quotes(s: &str) -> &str {
    strip_surrounding(s, '"', '"')
}

/// Removes one layer of square brackets from both ends of the trimmed input.
pub fn strip_braces(s: &str) -> &str {
    strip_surrounding(s, '[', ']')
}

fn strip_surrounding(s: &str, open: char, close: char) -> &str {
    let value = s.trim();
    if value.len() >= 2 && value.starts_with(open) && value.ends_with(close) {
        &value[open.len_utf8()..value.len() - close.len_utf8()]
    } else {
        value
    }
}

/// Deletes backslash line continuations used to wrap long hex lists.
pub fn strip_continuations(s: &str) -> String {
    CONTINUATION.replace_all(s, "").into_owned()
}

pub fn trim_line_endings(s: &str) -> &str {
    s.trim_end_matches(['\r', '\n'])
}

pub(crate) fn ends_with_line_break(s: &str) -> bool {
    s.ends_with('\n') || s.ends_with('\r')
}

/// Appends `next` onto `existing`, separating the two with a line break if needed.
pub(crate) fn append_block(existing: &mut String, next: &str) {
    if !ends_with_line_break(existing) {
        existing.push_str(LINE_SEPARATOR);
    }
    existing.push_str(next);
}

pub fn hex_digit_value(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        'a'..='f' => Some(c as u8 - b'a' + 10),
        'A'..='F' => Some(c as u8 - b'A' + 10),
        _ => None,
    }
}

/// Best-effort backslash unescaping.
///
/// Returns `None` when the input contains an escape sequence that is not
/// recognised, in which case callers keep the text untouched.
pub fn unescape_string(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let next = chars.next()?;
        match next {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'a' => out.push('\u{7}'),
            'b' => out.push('\u{8}'),
            'e' => out.push('\u{1b}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0'..='7' => {
                let mut code = next as u32 - '0' as u32;
                for _ in 0..2 {
                    match chars.peek() {
                        Some(&d @ '0'..='7') => {
                            code = code * 8 + (d as u32 - '0' as u32);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                out.push(char::from_u32(code)?);
            }
            'x' => out.push(read_hex_escape(&mut chars, 2)?),
            'u' => out.push(read_hex_escape(&mut chars, 4)?),
            c if c.is_alphanumeric() || c == '_' => return None,
            c => out.push(c),
        }
    }
    Some(out)
}

fn read_hex_escape(chars: &mut impl Iterator<Item = char>, digits: usize) -> Option<char> {
    let mut code = 0u32;
    for _ in 0..digits {
        code = code * 16 + hex_digit_value(chars.next()?)? as u32;
    }
    char::from_u32(code)
}

/// Maps increasing byte offsets to 1-based line numbers.
pub(crate) struct LineCounter<'a> {
    text: &'a str,
    offset: usize,
    line: usize,
}

impl<'a> LineCounter<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { text, offset: 0, line: 1 }
    }

    /// Offsets must be queried in non-decreasing order.
    pub(crate) fn line_at(&mut self, offset: usize) -> usize {
        if offset < self.offset {
            self.offset = 0;
            self.line = 1;
        }
        self.line += self.text.as_bytes()[self.offset..offset].iter().filter(|&&b| b == b'\n').count();
        self.offset = offset;
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_one_layer_only() {
        assert_eq!(strip_quotes("  \"\"abc\"\" "), "\"abc\"");
        assert_eq!(strip_braces("[[Key]]"), "[Key]");
        assert_eq!(strip_braces("Key]"), "Key]");
        assert_eq!(strip_quotes("\""), "\"");
    }

    #[test]
    fn removes_continuations() {
        assert_eq!(strip_continuations("01,\\\r\n  02,\\\n\t03"), "01,02,03");
        assert_eq!(strip_continuations("01,02"), "01,02");
    }

    #[test]
    fn unescapes_known_sequences() {
        assert_eq!(unescape_string(r#"C:\\Windows\\"#).as_deref(), Some(r"C:\Windows\"));
        assert_eq!(unescape_string(r#"say \"hi\"\t\x41\u00e9"#).as_deref(), Some("say \"hi\"\tA\u{e9}"));
        assert_eq!(unescape_string(r"\101").as_deref(), Some("A"));
    }

    #[test]
    fn rejects_unknown_escapes() {
        assert_eq!(unescape_string(r"C:\Windows"), None);
        assert_eq!(unescape_string("trailing\\"), None);
        assert_eq!(unescape_string(r"\xZZ"), None);
    }

    #[test]
    fn append_inserts_separator_once() {
        let mut block = String::from("a");
        append_block(&mut block, "b");
        assert_eq!(block, "a\r\nb");
        let mut block = String::from("a\n");
        append_block(&mut block, "b");
        assert_eq!(block, "a\nb");
    }

    #[test]
    fn counts_lines() {
        let mut lines = LineCounter::new("a\nb\nc");
        assert_eq!(lines.line_at(0), 1);
        assert_eq!(lines.line_at(2), 2);
        assert_eq!(lines.line_at(4), 3);
        assert_eq!(lines.line_at(1), 1);
    }
}
