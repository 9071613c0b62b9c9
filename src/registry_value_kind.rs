use std::fmt;

pub const REG_NONE: u32 = 0;
pub const REG_SZ: u32 = 1;
pub const REG_EXPAND_SZ: u32 = 2;
pub const REG_BINARY: u32 = 3;
pub const REG_DWORD: u32 = 4;
pub const REG_LINK: u32 = 6;
pub const REG_MULTI_SZ: u32 = 7;
pub const REG_RESOURCE_LIST: u32 = 8;
pub const REG_FULL_RESOURCE_DESCRIPTOR: u32 = 9;
pub const REG_RESOURCE_REQUIREMENTS_LIST: u32 = 10;
pub const REG_QWORD: u32 = 11;

/// The registry value types that can appear in a `.reg` export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegValueKind {
    None,
    Sz,
    ExpandSz,
    Binary,
    Dword,
    Link,
    MultiSz,
    ResourceList,
    FullResourceDescriptor,
    ResourceRequirementsList,
    Qword,
}

/// Prefixed kinds in classification order. `hex:` comes last so that the
/// `hex(n):` family is tried first.
const PREFIXED: [RegValueKind; 10] = [
    RegValueKind::ResourceRequirementsList,
    RegValueKind::FullResourceDescriptor,
    RegValueKind::ResourceList,
    RegValueKind::Qword,
    RegValueKind::Dword,
    RegValueKind::MultiSz,
    RegValueKind::Link,
    RegValueKind::ExpandSz,
    RegValueKind::None,
    RegValueKind::Binary,
];

impl RegValueKind {
    pub fn id(&self) -> u32 {
        match self {
            RegValueKind::None => REG_NONE,
            RegValueKind::Sz => REG_SZ,
            RegValueKind::ExpandSz => REG_EXPAND_SZ,
            RegValueKind::Binary => REG_BINARY,
            RegValueKind::Dword => REG_DWORD,
            RegValueKind::Link => REG_LINK,
            RegValueKind::MultiSz => REG_MULTI_SZ,
            RegValueKind::ResourceList => REG_RESOURCE_LIST,
            RegValueKind::FullResourceDescriptor => REG_FULL_RESOURCE_DESCRIPTOR,
            RegValueKind::ResourceRequirementsList => REG_RESOURCE_REQUIREMENTS_LIST,
            RegValueKind::Qword => REG_QWORD,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            REG_NONE => Some(RegValueKind::None),
            REG_SZ => Some(RegValueKind::Sz),
            REG_EXPAND_SZ => Some(RegValueKind::ExpandSz),
            REG_BINARY => Some(RegValueKind::Binary),
            REG_DWORD => Some(RegValueKind::Dword),
            REG_LINK => Some(RegValueKind::Link),
            REG_MULTI_SZ => Some(RegValueKind::MultiSz),
            REG_RESOURCE_LIST => Some(RegValueKind::ResourceList),
            REG_FULL_RESOURCE_DESCRIPTOR => Some(RegValueKind::FullResourceDescriptor),
            REG_RESOURCE_REQUIREMENTS_LIST => Some(RegValueKind::ResourceRequirementsList),
            REG_QWORD => Some(RegValueKind::Qword),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RegValueKind::None => "REG_NONE",
            RegValueKind::Sz => "REG_SZ",
            RegValueKind::ExpandSz => "REG_EXPAND_SZ",
            RegValueKind::Binary => "REG_BINARY",
            RegValueKind::Dword => "REG_DWORD",
            RegValueKind::Link => "REG_LINK",
            RegValueKind::MultiSz => "REG_MULTI_SZ",
            RegValueKind::ResourceList => "REG_RESOURCE_LIST",
            RegValueKind::FullResourceDescriptor => "REG_FULL_RESOURCE_DESCRIPTOR",
            RegValueKind::ResourceRequirementsList => "REG_RESOURCE_REQUIREMENTS_LIST",
            RegValueKind::Qword => "REG_QWORD",
        }
    }

    /// The literal that introduces this kind's data in a `.reg` file.
    /// `REG_SZ` is written as a bare quoted string and has none.
    pub fn encoded_prefix(&self) -> Option<&'static str> {
        match self {
            RegValueKind::None => Some("hex(0):"),
            RegValueKind::Sz => None,
            RegValueKind::ExpandSz => Some("hex(2):"),
            RegValueKind::Binary => Some("hex:"),
            RegValueKind::Dword => Some("dword:"),
            RegValueKind::Link => Some("hex(6):"),
            RegValueKind::MultiSz => Some("hex(7):"),
            RegValueKind::ResourceList => Some("hex(8):"),
            RegValueKind::FullResourceDescriptor => Some("hex(9):"),
            RegValueKind::ResourceRequirementsList => Some("hex(a):"),
            RegValueKind::Qword => Some("hex(b):"),
        }
    }

    /// Classifies raw value data by its prefix, ignoring case and leading
    /// whitespace. Unprefixed data is `REG_SZ`.
    pub fn classify(raw: &str) -> Self {
        let data = raw.trim_start();
        PREFIXED
            .into_iter()
            .find(|kind| kind.encoded_prefix().is_some_and(|p| starts_with_ignore_case(data, p)))
            .unwrap_or(RegValueKind::Sz)
    }
}

fn starts_with_ignore_case(data: &str, prefix: &str) -> bool {
    data.len() >= prefix.len()
        && data.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

impl fmt::Display for RegValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
