use indexmap::IndexMap;
use indexmap::map::Entry;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::registry_parser::ParseError;
use crate::registry_utils::{
    LineCounter, append_block, strip_braces, strip_quotes, trim_line_endings,
};

static KEY_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*\[.+\][ \t]*(?:[\r\n]+|\z)").expect("valid regex"));

// name: escaped quoted run, plain quoted run, or `@`
// data: escaped quoted run, plain quoted run, or an unquoted run that only
// crosses line breaks through a backslash continuation
static VALUE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?m)^[ \t]*("(?:[^"\\\r\n]|\\[^\r\n])*"|"[^"\r\n]*"|@)="#,
        r#"("(?:[^"\\\r\n]|\\[^\r\n])*"|"[^"\r\n]*"|(?:[^"\\\r\n]|\\[^\r\n]|\\\r?\n)+)"#,
    ))
    .expect("valid regex")
});

/// Raw text of one key, merged across duplicate headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySection {
    /// Line of the first header for this key.
    pub line: usize,
    pub body: String,
}

/// Normalizes the text of a `[Key]` header to the bare key path.
pub fn normalize_key_path(header: &str) -> &str {
    let key = trim_line_endings(header).trim_end();
    let key = key.strip_suffix('=').unwrap_or(key);
    strip_quotes(strip_braces(key))
}

fn has_balanced_brackets(header: &str) -> bool {
    let mut depth = 0i32;
    for c in header.chars() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Splits a document into key sections, keyed by key path in order of first
/// appearance.
pub fn extract_key_sections(content: &str) -> Result<IndexMap<String, KeySection>, ParseError> {
    let mut matches: Vec<_> = KEY_HEADER.find_iter(content).collect();
    check_stray_headers(content, &matches)?;
    if matches.first().is_some_and(|m| is_signature_header(content, m)) {
        matches.remove(0);
    }
    if let Some(first) = matches.first() {
        check_preamble(content, &content[..first.start()])?;
    } else {
        check_preamble(content, content)?;
    }

    let mut lines = LineCounter::new(content);
    let mut sections: IndexMap<String, KeySection> = IndexMap::new();
    for (i, m) in matches.iter().enumerate() {
        let line = lines.line_at(m.start());
        let header = trim_line_endings(m.as_str()).trim();
        let inner = strip_braces(header);
        if !has_balanced_brackets(inner) {
            return Err(ParseError::MalformedHeader {
                line,
                header: header.to_string(),
                reason: "unbalanced brackets",
            });
        }
        let key_path = normalize_key_path(header);
        if key_path.is_empty() {
            return Err(ParseError::MalformedHeader {
                line,
                header: header.to_string(),
                reason: "empty key path",
            });
        }

        let end = matches.get(i + 1).map(|n| n.start()).unwrap_or(content.len());
        let body = trim_line_endings(&content[m.end()..end]);
        match sections.entry(key_path.to_string()) {
            Entry::Occupied(mut existing) => append_block(&mut existing.get_mut().body, body),
            Entry::Vacant(slot) => {
                slot.insert(KeySection { line, body: body.to_string() });
            }
        }
    }
    Ok(sections)
}

/// A leading `[REGEDIT4]` line is the file signature, not a key.
fn is_signature_header(content: &str, header: &regex::Match<'_>) -> bool {
    content[..header.start()].trim_start_matches('\u{feff}').trim().is_empty()
        && normalize_key_path(header.as_str()).eq_ignore_ascii_case("REGEDIT4")
}

/// Lines that open with `[` but are not headers would otherwise be folded
/// silently into the previous key.
fn check_stray_headers(content: &str, headers: &[regex::Match<'_>]) -> Result<(), ParseError> {
    let mut offset = 0usize;
    for (idx, raw_line) in content.split_inclusive('\n').enumerate() {
        let start = offset;
        offset += raw_line.len();
        let text = trim_line_endings(raw_line).trim();
        if !text.starts_with('[') {
            continue;
        }
        if headers.binary_search_by_key(&start, |m| m.start()).is_err() {
            return Err(ParseError::MalformedHeader {
                line: idx + 1,
                header: text.to_string(),
                reason: "unterminated key header",
            });
        }
    }
    Ok(())
}

fn check_preamble(content: &str, preamble: &str) -> Result<(), ParseError> {
    match VALUE_LINE.find(preamble) {
        Some(m) => Err(ParseError::Line {
            line: LineCounter::new(content).line_at(m.start()),
            msg: format!("value without key: {}", trim_line_endings(m.as_str()).trim()),
        }),
        None => Ok(()),
    }
}

/// Splits one key's body into value name to raw value data, in order of first
/// appearance. The default value `@` is stored under the empty name.
pub fn extract_value_lines(body: &str) -> IndexMap<String, String> {
    let mut values: IndexMap<String, String> = IndexMap::new();
    if body.trim().is_empty() {
        return values;
    }
    for caps in VALUE_LINE.captures_iter(body) {
        let raw_name = trim_line_endings(&caps[1]);
        let name = if raw_name == "@" { "" } else { strip_quotes(raw_name) };
        let data = trim_line_endings(&caps[2]);
        match values.entry(name.to_string()) {
            Entry::Occupied(mut existing) => append_block(existing.get_mut(), data),
            Entry::Vacant(slot) => {
                slot.insert(data.to_string());
            }
        }
    }
    values
}
