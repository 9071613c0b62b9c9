use std::borrow::Cow;

use encoding_rs::{UTF_16LE, WINDOWS_1252};
use once_cell::sync::Lazy;
use regex::Regex;

static REGEDIT4_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\A\x{feff}?[ ]*(?:\r?\n)*\[?REGEDIT4").expect("valid regex"));

/// Text encoding of hex-encoded string payloads (`hex(2):`, `hex(7):`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// `REGEDIT4` files: one byte per character, ANSI code page.
    Legacy8Bit,
    /// `Windows Registry Editor Version 5.00` files: UTF-16LE code units.
    #[default]
    Utf8,
}

impl TextEncoding {
    pub fn detect(text: &str) -> Self {
        if REGEDIT4_HEADER.is_match(text) {
            TextEncoding::Legacy8Bit
        } else {
            TextEncoding::Utf8
        }
    }

    /// Number of bytes per encoded character unit.
    pub fn unit_width(&self) -> usize {
        match self {
            TextEncoding::Legacy8Bit => 1,
            TextEncoding::Utf8 => 2,
        }
    }

    /// Decodes a hex payload into text without touching NUL characters.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        match self {
            TextEncoding::Legacy8Bit => WINDOWS_1252.decode_without_bom_handling(bytes).0,
            TextEncoding::Utf8 => UTF_16LE.decode_without_bom_handling(bytes).0,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            TextEncoding::Legacy8Bit => "REGEDIT4",
            TextEncoding::Utf8 => "Windows Registry Editor Version 5.00",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_regedit4_header() {
        assert_eq!(TextEncoding::detect("REGEDIT4\r\n\r\n[HKEY_USERS]"), TextEncoding::Legacy8Bit);
        assert_eq!(TextEncoding::detect("  \r\n\r\nregedit4\r\n"), TextEncoding::Legacy8Bit);
        assert_eq!(TextEncoding::detect("\u{feff}REGEDIT4\n"), TextEncoding::Legacy8Bit);
    }

    #[test]
    fn detects_bracketed_regedit4_header() {
        assert_eq!(TextEncoding::detect("[REGEDIT4]\r\n\r\n[HKEY_USERS]"), TextEncoding::Legacy8Bit);
        assert_eq!(TextEncoding::detect("\r\n[regedit4]\r\n"), TextEncoding::Legacy8Bit);
        assert_eq!(TextEncoding::detect("[K]\r\n[REGEDIT4]\r\n"), TextEncoding::Utf8);
    }

    #[test]
    fn defaults_to_unicode() {
        assert_eq!(
            TextEncoding::detect("Windows Registry Editor Version 5.00\r\n"),
            TextEncoding::Utf8
        );
        assert_eq!(TextEncoding::detect(""), TextEncoding::Utf8);
        assert_eq!(TextEncoding::detect("[Key]\r\n\"A\"=\"REGEDIT4\""), TextEncoding::Utf8);
    }

    #[test]
    fn decodes_payloads_per_encoding() {
        assert_eq!(TextEncoding::Utf8.decode(&[0x41, 0x00, 0xe9, 0x00]), "A\u{e9}");
        assert_eq!(TextEncoding::Legacy8Bit.decode(&[0x41, 0xe9, 0x80]), "A\u{e9}\u{20ac}");
    }
}
