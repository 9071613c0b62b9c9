use std::fmt;

/// One of the five well-known top-level registry namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hive {
    LocalMachine,
    ClassesRoot,
    Users,
    CurrentConfig,
    CurrentUser,
}

impl Hive {
    pub const ALL: [Hive; 5] = [
        Hive::LocalMachine,
        Hive::ClassesRoot,
        Hive::Users,
        Hive::CurrentConfig,
        Hive::CurrentUser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Hive::LocalMachine => "HKEY_LOCAL_MACHINE",
            Hive::ClassesRoot => "HKEY_CLASSES_ROOT",
            Hive::Users => "HKEY_USERS",
            Hive::CurrentConfig => "HKEY_CURRENT_CONFIG",
            Hive::CurrentUser => "HKEY_CURRENT_USER",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.as_str() == name)
    }

    /// Splits a key path into its hive and the remaining sub-path.
    ///
    /// The match is case-sensitive. One leading backslash is removed from the
    /// sub-path; without a known hive the whole path is returned.
    pub fn split_key_path(path: &str) -> (Option<Hive>, &str) {
        for hive in Self::ALL {
            if let Some(rest) = path.strip_prefix(hive.as_str()) {
                return (Some(hive), rest.strip_prefix('\\').unwrap_or(rest));
            }
        }
        (None, path)
    }
}

impl fmt::Display for Hive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
