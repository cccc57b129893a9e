//! Rate limit key prefixes and classification.
//!
//! Keys are opaque strings of the form `<prefix><identifier>`. The resolver
//! only ever emits the four prefixes below; anything else classifies as
//! [`KeyType::Unknown`].

use std::fmt;

pub const USER_PREFIX: &str = "user:";
pub const SERVICE_PREFIX: &str = "service:";
pub const IP_PREFIX: &str = "ip:";
pub const AUTH_PREFIX: &str = "auth:";

const UNKNOWN: &str = "unknown";

/// Identifiers longer than this are truncated in diagnostics.
const MAX_IDENTIFIER_LEN: usize = 100;

/// The class of caller a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    User,
    Service,
    Ip,
    Auth,
    Unknown,
}

impl KeyType {
    /// Classify a key by its prefix.
    pub fn of(key: &str) -> Self {
        if key.trim().is_empty() {
            return KeyType::Unknown;
        }
        PREFIXES
            .iter()
            .find(|(prefix, _)| key.starts_with(prefix))
            .map(|(_, key_type)| *key_type)
            .unwrap_or(KeyType::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::User => "user",
            KeyType::Service => "service",
            KeyType::Ip => "ip",
            KeyType::Auth => "auth",
            KeyType::Unknown => UNKNOWN,
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const PREFIXES: [(&str, KeyType); 4] = [
    (USER_PREFIX, KeyType::User),
    (SERVICE_PREFIX, KeyType::Service),
    (IP_PREFIX, KeyType::Ip),
    (AUTH_PREFIX, KeyType::Auth),
];

/// The key with its prefix stripped.
///
/// A blank key yields `"unknown"`; a key with an unrecognised prefix is
/// returned whole.
pub fn identifier(key: &str) -> &str {
    if key.trim().is_empty() {
        return UNKNOWN;
    }
    PREFIXES
        .iter()
        .find_map(|(prefix, _)| key.strip_prefix(prefix))
        .unwrap_or(key)
}

/// The identifier, truncated so it is safe to put in a log line.
pub fn display_identifier(key: &str) -> String {
    let id = identifier(key);
    match id.char_indices().nth(MAX_IDENTIFIER_LEN) {
        Some((cut, _)) => format!("{}...", &id[..cut]),
        None => id.to_string(),
    }
}
