//! Storage scope taxonomy.

use serde::{Deserialize, Serialize};

/// Lifecycle variant of the named integer counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageScope {
    /// One storage location for the entire process; all threads observe and
    /// mutate the same value. Concurrent writes are unsynchronized.
    Process,
    /// One storage location per thread that ever touches the symbol,
    /// independently zero-initialized, destroyed with the owning thread.
    Thread,
}

impl StorageScope {
    /// Symbol prefix used by the exported counter library for this scope
    /// (`normal_var` / `tls_var` in the C-ABI surface).
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            StorageScope::Process => "normal_var",
            StorageScope::Thread => "tls_var",
        }
    }
}

impl std::fmt::Display for StorageScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageScope::Process => write!(f, "process"),
            StorageScope::Thread => write!(f, "thread"),
        }
    }
}

impl std::str::FromStr for StorageScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "process" | "normal" => Ok(StorageScope::Process),
            "thread" | "tls" => Ok(StorageScope::Thread),
            other => Err(format!("unknown storage scope: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_parses_both_spellings() {
        assert_eq!("tls".parse::<StorageScope>().unwrap(), StorageScope::Thread);
        assert_eq!(
            "normal".parse::<StorageScope>().unwrap(),
            StorageScope::Process
        );
        assert_eq!(
            "process".parse::<StorageScope>().unwrap(),
            StorageScope::Process
        );
        assert!("stack".parse::<StorageScope>().is_err());
    }

    #[test]
    fn scope_symbol_matches_exported_names() {
        assert_eq!(StorageScope::Process.symbol(), "normal_var");
        assert_eq!(StorageScope::Thread.symbol(), "tls_var");
    }

    #[test]
    fn scope_display_roundtrips_through_fromstr() {
        for scope in [StorageScope::Process, StorageScope::Thread] {
            let rendered = scope.to_string();
            assert_eq!(rendered.parse::<StorageScope>().unwrap(), scope);
        }
    }
}
