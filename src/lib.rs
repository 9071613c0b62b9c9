//! Parser for Windows registry export (`.reg`) files.
//!
//! ```
//! use regfile::{RegistryDocument, RegistryValueData};
//!
//! let text = "Windows Registry Editor Version 5.00\r\n\r\n\
//!             [HKEY_CURRENT_USER\\Software\\Demo]\r\n\
//!             \"Count\"=dword:0000002a\r\n";
//! let doc = RegistryDocument::from_text(text).unwrap();
//! let value = doc.get_value(r"HKEY_CURRENT_USER\Software\Demo", "Count").unwrap();
//! assert_eq!(value.data(), &RegistryValueData::Dword(42));
//! assert_eq!(value.key_path_without_root(), r"Software\Demo");
//! ```

mod registry_document;
mod registry_encoding;
mod registry_hive;
mod registry_key;
mod registry_parser;
mod registry_sections;
mod registry_utils;
mod registry_value;
mod registry_value_kind;

pub use registry_document::{RegistryDocument, SkippedValue};
pub use registry_encoding::TextEncoding;
pub use registry_hive::Hive;
pub use registry_key::KeyEntries;
pub use registry_parser::{InvalidValuePolicy, ParseError, ParseOptions, RegistryParser, decode_input};
pub use registry_sections::{KeySection, extract_key_sections, extract_value_lines, normalize_key_path};
pub use registry_utils::{
    hex_digit_value, strip_braces, strip_continuations, strip_quotes, trim_line_endings,
    unescape_string,
};
pub use registry_value::{RegistryValue, RegistryValueData, ValueDecodeError, parse_hex_bytes};
pub use registry_value_kind::{
    REG_BINARY, REG_DWORD, REG_EXPAND_SZ, REG_FULL_RESOURCE_DESCRIPTOR, REG_LINK, REG_MULTI_SZ,
    REG_NONE, REG_QWORD, REG_RESOURCE_LIST, REG_RESOURCE_REQUIREMENTS_LIST, REG_SZ, RegValueKind,
};
