//! Basic type definitions for the relay
//!
//! Provides newtype wrappers and pure predicates:
//! - `ConnId`: UUID-based unique connection identifier
//! - `is_valid_nickname`: display-name format check

use uuid::Uuid;

/// Maximum nickname length in characters
pub const MAX_NICKNAME_LEN: usize = 12;

/// Unique connection identifier (newtype pattern)
///
/// Wraps a UUID v4 for type-safe connection identification.
/// Implements Hash and Eq for use as HashMap keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnId(pub Uuid);

impl ConnId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check a display name against `^[A-Za-z][A-Za-z0-9_]{0,11}$`
///
/// Names are case-sensitive and never normalized.
pub fn is_valid_nickname(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    first.is_ascii_alphabetic()
        && name.len() <= MAX_NICKNAME_LEN
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conn_id_unique() {
        let id1 = ConnId::new();
        let id2 = ConnId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_valid_nicknames() {
        assert!(is_valid_nickname("a"));
        assert!(is_valid_nickname("alice"));
        assert!(is_valid_nickname("Bob_42"));
        assert!(is_valid_nickname("abcdefghijkl"));
    }

    #[test]
    fn test_invalid_nicknames() {
        assert!(!is_valid_nickname(""));
        assert!(!is_valid_nickname("al!ce"));
        assert!(!is_valid_nickname("1alice"));
        assert!(!is_valid_nickname("_alice"));
        assert!(!is_valid_nickname("abcdefghijklm"));
        assert!(!is_valid_nickname("al ice"));
        // Non-ASCII letters are rejected even though they are alphabetic
        assert!(!is_valid_nickname("élodie"));
    }
}
