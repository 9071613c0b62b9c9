use std::borrow::Cow;
use std::fs;
use std::io::Read;
use std::path::Path;

use encoding_rs::UTF_8;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::registry_document::{RegistryDocument, SkippedValue};
use crate::registry_encoding::TextEncoding;
use crate::registry_key::KeyEntries;
use crate::registry_sections::{extract_key_sections, extract_value_lines};
use crate::registry_value::{RegistryValue, ValueDecodeError};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed key header at line {line} ({reason}): {header}")]
    MalformedHeader {
        line: usize,
        header: String,
        reason: &'static str,
    },
    #[error("parse error at line {line}: {msg}")]
    Line { line: usize, msg: String },
    #[error("invalid value {name:?} in key [{key}] (first header at line {key_line}): {raw}")]
    InvalidValue {
        key: String,
        name: String,
        /// Line of the first `[key]` header; duplicate headers are merged.
        key_line: usize,
        raw: String,
        #[source]
        source: ValueDecodeError,
    },
}

/// What to do with a value whose data cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidValuePolicy {
    /// Abort the whole document.
    #[default]
    Fail,
    /// Drop the value, log a warning and record it in
    /// [`RegistryDocument::skipped`].
    Skip,
}

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Leave keys without any value lines out of the document.
    pub skip_empty_keys: bool,
    pub invalid_values: InvalidValuePolicy,
}

#[derive(Debug, Clone, Default)]
pub struct RegistryParser {
    pub options: ParseOptions,
}

impl RegistryParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<RegistryDocument, ParseError> {
        info!("loading registry file");
        let bytes = fs::read(path.as_ref())?;
        self.load_from_bytes(&bytes)
    }

    pub fn load_from_reader<R: Read>(&self, mut reader: R) -> Result<RegistryDocument, ParseError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.load_from_bytes(&bytes)
    }

    pub fn load_from_bytes(&self, bytes: &[u8]) -> Result<RegistryDocument, ParseError> {
        let text = decode_input(bytes);
        self.load_from_text(&text)
    }

    pub fn load_from_text(&self, text: &str) -> Result<RegistryDocument, ParseError> {
        let encoding = TextEncoding::detect(text);
        let sections = extract_key_sections(text)?;
        debug!(keys = sections.len(), encoding = encoding.as_tag(), "split document into key sections");

        let mut document = RegistryDocument::new(encoding);
        for (key_path, section) in sections {
            let raw_values = extract_value_lines(&section.body);
            if raw_values.is_empty() && self.options.skip_empty_keys {
                debug!(key = %key_path, "skipping key without values");
                continue;
            }

            let mut entries = KeyEntries::new(key_path.as_str());
            for (name, raw) in raw_values {
                match RegistryValue::parse(&key_path, name.as_str(), raw.as_str(), encoding) {
                    Ok(value) => entries.set_value_for_loading(value),
                    Err(source) => match self.options.invalid_values {
                        InvalidValuePolicy::Fail => {
                            return Err(ParseError::InvalidValue {
                                key: key_path,
                                name,
                                key_line: section.line,
                                raw,
                                source,
                            });
                        }
                        InvalidValuePolicy::Skip => {
                            warn!(key = %key_path, name = %name, error = %source, "skipping undecodable value");
                            document.record_skipped(SkippedValue {
                                key: key_path.clone(),
                                name,
                                raw_data: raw,
                                error: source,
                            });
                        }
                    },
                }
            }
            document.insert_key(entries);
        }

        debug!(
            keys = document.len(),
            values = document.value_count(),
            skipped = document.skipped().len(),
            "parsed registry document"
        );
        Ok(document)
    }
}

/// Decodes raw file bytes, honouring a UTF-8 or UTF-16 byte-order mark and
/// falling back to UTF-8.
pub fn decode_input(bytes: &[u8]) -> Cow<'_, str> {
    let (text, used, had_errors) = UTF_8.decode(bytes);
    if had_errors {
        warn!(encoding = used.name(), "input contains malformed sequences, replaced lossily");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_utf16_input_with_bom() {
        let mut bytes = vec![0xff, 0xfe];
        bytes.extend("[K]\r\n".encode_utf16().flat_map(|c| c.to_le_bytes()));
        assert_eq!(decode_input(&bytes), "[K]\r\n");
    }

    #[test]
    fn strips_utf8_bom() {
        assert_eq!(decode_input(b"\xef\xbb\xbfREGEDIT4"), "REGEDIT4");
    }

    #[test]
    fn replaces_malformed_utf8() {
        assert_eq!(decode_input(b"a\xffb"), "a\u{fffd}b");
    }
}
