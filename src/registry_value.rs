use std::fmt;

use encoding_rs::WINDOWS_1252;
use thiserror::Error;

use crate::registry_encoding::TextEncoding;
use crate::registry_hive::Hive;
use crate::registry_utils::{strip_continuations, strip_quotes, unescape_string};
use crate::registry_value_kind::RegValueKind;

/// Failure to decode the data of a single value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueDecodeError {
    #[error("invalid dword {0:?}: expected 1 to 8 hex digits")]
    InvalidDword(String),
    #[error("invalid hex byte {0:?}")]
    InvalidHexByte(String),
    #[error("odd byte count {0} in UTF-16 string data")]
    OddLength(usize),
    #[error("qword data has {0} bytes, expected 1 to 8")]
    InvalidQwordLength(usize),
}

/// Decoded value data, one variant per [`RegValueKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryValueData {
    /// `hex(0):` payload text.
    None(String),
    String(String),
    ExpandString(String),
    Binary(Vec<u8>),
    Dword(u32),
    Link(String),
    MultiString(Vec<String>),
    /// `hex(8):` payload text.
    ResourceList(String),
    /// `hex(9):` payload text.
    FullResourceDescriptor(String),
    /// `hex(a):` payload text.
    ResourceRequirementsList(String),
    Qword(u64),
}

impl RegistryValueData {
    /// Decodes `payload`, the raw data with the kind's prefix already removed.
    pub fn decode(
        kind: RegValueKind,
        payload: &str,
        encoding: TextEncoding,
    ) -> Result<Self, ValueDecodeError> {
        let data = match kind {
            RegValueKind::Sz => RegistryValueData::String(decode_string(payload)),
            RegValueKind::Dword => RegistryValueData::Dword(decode_dword(payload)?),
            RegValueKind::Qword => RegistryValueData::Qword(decode_qword(payload)?),
            RegValueKind::Binary => RegistryValueData::Binary(parse_hex_bytes(payload)?),
            RegValueKind::MultiSz => {
                let text = decode_hex_text(payload, encoding)?;
                let trimmed = text.trim_end_matches('\0');
                let parts = if trimmed.is_empty() {
                    Vec::new()
                } else {
                    trimmed.split('\0').map(str::to_string).collect()
                };
                RegistryValueData::MultiString(parts)
            }
            RegValueKind::ExpandSz => {
                RegistryValueData::ExpandString(decode_terminated(payload, encoding)?)
            }
            RegValueKind::Link => RegistryValueData::Link(decode_terminated(payload, encoding)?),
            RegValueKind::None => RegistryValueData::None(opaque_text(payload)),
            RegValueKind::ResourceList => RegistryValueData::ResourceList(opaque_text(payload)),
            RegValueKind::FullResourceDescriptor => {
                RegistryValueData::FullResourceDescriptor(opaque_text(payload))
            }
            RegValueKind::ResourceRequirementsList => {
                RegistryValueData::ResourceRequirementsList(opaque_text(payload))
            }
        };
        Ok(data)
    }

    pub fn kind(&self) -> RegValueKind {
        match self {
            RegistryValueData::None(_) => RegValueKind::None,
            RegistryValueData::String(_) => RegValueKind::Sz,
            RegistryValueData::ExpandString(_) => RegValueKind::ExpandSz,
            RegistryValueData::Binary(_) => RegValueKind::Binary,
            RegistryValueData::Dword(_) => RegValueKind::Dword,
            RegistryValueData::Link(_) => RegValueKind::Link,
            RegistryValueData::MultiString(_) => RegValueKind::MultiSz,
            RegistryValueData::ResourceList(_) => RegValueKind::ResourceList,
            RegistryValueData::FullResourceDescriptor(_) => RegValueKind::FullResourceDescriptor,
            RegistryValueData::ResourceRequirementsList(_) => {
                RegValueKind::ResourceRequirementsList
            }
            RegistryValueData::Qword(_) => RegValueKind::Qword,
        }
    }
}

/// A single named value of a registry key.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryValue {
    key_path: String,
    hive: Option<Hive>,
    name: String,
    raw_data: String,
    encoding: TextEncoding,
    data: RegistryValueData,
}

impl RegistryValue {
    /// Classifies and decodes `raw_data` (the text after `=`, prefix included).
    pub fn parse(
        key_path: &str,
        name: impl Into<String>,
        raw_data: impl Into<String>,
        encoding: TextEncoding,
    ) -> Result<Self, ValueDecodeError> {
        let key_path = key_path.trim().to_string();
        let raw_data = raw_data.into();
        let kind = RegValueKind::classify(&raw_data);
        let data = RegistryValueData::decode(kind, payload_of(&raw_data, kind), encoding)?;
        let (hive, _) = Hive::split_key_path(&key_path);
        Ok(Self {
            key_path,
            hive,
            name: name.into(),
            raw_data,
            encoding,
            data,
        })
    }

    pub fn key_path(&self) -> &str {
        &self.key_path
    }

    pub fn hive(&self) -> Option<Hive> {
        self.hive
    }

    /// Root hive name, empty when the key path has no well-known root.
    pub fn root(&self) -> &str {
        self.hive.map(|h| h.as_str()).unwrap_or("")
    }

    pub fn key_path_without_root(&self) -> &str {
        Hive::split_key_path(&self.key_path).1
    }

    /// Value name; the default (`@`) value has an empty name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_default(&self) -> bool {
        self.name.is_empty()
    }

    pub fn kind(&self) -> RegValueKind {
        self.data.kind()
    }

    pub fn raw_data(&self) -> &str {
        &self.raw_data
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn data(&self) -> &RegistryValueData {
        &self.data
    }

    pub fn into_data(self) -> RegistryValueData {
        self.data
    }

    /// Raw data without the type prefix.
    pub fn payload(&self) -> &str {
        payload_of(&self.raw_data, self.kind())
    }

    pub fn as_dword(&self) -> Option<u32> {
        match self.data {
            RegistryValueData::Dword(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_qword(&self) -> Option<u64> {
        match self.data {
            RegistryValueData::Qword(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match &self.data {
            RegistryValueData::Binary(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_multi_string(&self) -> Option<&[String]> {
        match &self.data {
            RegistryValueData::MultiString(v) => Some(v),
            _ => None,
        }
    }

    /// Text of `REG_SZ`, `REG_EXPAND_SZ` and `REG_LINK` values.
    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            RegistryValueData::String(v)
            | RegistryValueData::ExpandString(v)
            | RegistryValueData::Link(v) => Some(v),
            _ => None,
        }
    }

    /// The bytes the registry would store for this value.
    ///
    /// Hex-encoded payloads are returned as written; strings are encoded with
    /// the document encoding and a NUL terminator.
    pub fn raw_bytes(&self) -> Result<Vec<u8>, ValueDecodeError> {
        match &self.data {
            RegistryValueData::Dword(v) => Ok(v.to_le_bytes().to_vec()),
            RegistryValueData::Qword(v) => Ok(v.to_le_bytes().to_vec()),
            RegistryValueData::Binary(v) => Ok(v.clone()),
            RegistryValueData::String(v) => Ok(encode_string(v, self.encoding)),
            _ => parse_hex_bytes(self.payload()),
        }
    }
}

impl fmt::Display for RegistryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\\{}={}", self.key_path, self.name, self.raw_data)
    }
}

fn payload_of(raw_data: &str, kind: RegValueKind) -> &str {
    match kind.encoded_prefix() {
        Some(prefix) => {
            let data = raw_data.trim_start();
            data.get(prefix.len()..).unwrap_or("")
        }
        None => raw_data,
    }
}

fn decode_string(payload: &str) -> String {
    let unescaped = unescape_string(payload).unwrap_or_else(|| payload.to_string());
    strip_quotes(&unescaped).to_string()
}

fn decode_dword(payload: &str) -> Result<u32, ValueDecodeError> {
    let digits = payload.trim();
    let invalid = || ValueDecodeError::InvalidDword(digits.to_string());
    if digits.is_empty() || digits.len() > 8 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    u32::from_str_radix(digits, 16).map_err(|_| invalid())
}

fn decode_qword(payload: &str) -> Result<u64, ValueDecodeError> {
    let bytes = parse_hex_bytes(payload)?;
    if bytes.is_empty() || bytes.len() > 8 {
        return Err(ValueDecodeError::InvalidQwordLength(bytes.len()));
    }
    let mut arr = [0u8; 8];
    arr[..bytes.len()].copy_from_slice(&bytes);
    Ok(u64::from_le_bytes(arr))
}

/// Parses a comma separated hex byte list, splicing line continuations and
/// ignoring a single trailing comma.
pub fn parse_hex_bytes(payload: &str) -> Result<Vec<u8>, ValueDecodeError> {
    let spliced = strip_continuations(payload);
    let trimmed = spliced.trim();
    let trimmed = trimmed.strip_suffix(',').unwrap_or(trimmed);
    if trimmed.trim().is_empty() {
        return Ok(Vec::new());
    }
    trimmed
        .split(',')
        .map(|part| {
            let token = part.trim();
            if token.is_empty() || token.len() > 2 || !token.chars().all(|c| c.is_ascii_hexdigit())
            {
                return Err(ValueDecodeError::InvalidHexByte(token.to_string()));
            }
            u8::from_str_radix(token, 16).map_err(|_| ValueDecodeError::InvalidHexByte(token.to_string()))
        })
        .collect()
}

fn decode_hex_text(payload: &str, encoding: TextEncoding) -> Result<String, ValueDecodeError> {
    let bytes = parse_hex_bytes(payload)?;
    if bytes.len() % encoding.unit_width() != 0 {
        return Err(ValueDecodeError::OddLength(bytes.len()));
    }
    Ok(encoding.decode(&bytes).into_owned())
}

fn decode_terminated(payload: &str, encoding: TextEncoding) -> Result<String, ValueDecodeError> {
    let mut text = decode_hex_text(payload, encoding)?;
    if text.ends_with('\0') {
        text.pop();
    }
    Ok(text)
}

fn opaque_text(payload: &str) -> String {
    strip_continuations(payload).trim().to_string()
}

fn encode_string(value: &str, encoding: TextEncoding) -> Vec<u8> {
    match encoding {
        TextEncoding::Legacy8Bit => {
            let mut bytes = WINDOWS_1252.encode(value).0.into_owned();
            bytes.push(0);
            bytes
        }
        TextEncoding::Utf8 => {
            let mut bytes = value.encode_utf16().flat_map(|c| c.to_le_bytes()).collect::<Vec<_>>();
            bytes.extend_from_slice(&[0, 0]);
            bytes
        }
    }
}
