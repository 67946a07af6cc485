//! Folder name sanitization.
//!
//! A [`FolderName`] is the canonical, filesystem-legal form of a
//! user-supplied name: lowercase ASCII letters and digits separated by
//! single `_` or `-` characters. It doubles as the remote directory name.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest canonical name, in bytes.
pub const MAX_NAME_LEN: usize = 100;

/// Name used when nothing survives sanitization.
pub const FALLBACK_NAME: &str = "folder";

/// A canonical folder name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderName(String);

/// Result of sanitizing raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    /// The canonical name.
    pub name: FolderName,
    /// Whether sanitization changed more than letter case.
    pub changed: bool,
}

impl FolderName {
    /// Sanitize arbitrary text into a canonical folder name.
    ///
    /// Total and idempotent: `sanitize(sanitize(x).name) == sanitize(x).name`.
    pub fn sanitize(raw: &str) -> Sanitized {
        let name = sanitize(raw);
        let changed = name != raw.to_lowercase();
        Sanitized {
            name: Self(name),
            changed,
        }
    }

    /// Accept `raw` only if it is already canonical.
    pub fn parse(raw: &str) -> Option<Self> {
        let name = sanitize(raw);
        (name == raw).then_some(Self(name))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FolderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FolderName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len().min(MAX_NAME_LEN));
    let mut pending: Option<char> = None;

    for c in raw.chars().flat_map(char::to_lowercase).map(fold_accent) {
        match c {
            'a'..='z' | '0'..='9' => {
                if let Some(sep) = pending.take() {
                    if !out.is_empty() {
                        out.push(sep);
                    }
                }
                out.push(c);
            }
            '-' => {
                if pending != Some('_') {
                    pending = Some('-');
                }
            }
            '_' => pending = Some('_'),
            c if c.is_whitespace() => pending = Some('_'),
            _ => {}
        }
    }

    if out.len() > MAX_NAME_LEN {
        out.truncate(MAX_NAME_LEN);
        let kept = out.trim_end_matches(['_', '-']).len();
        out.truncate(kept);
    }

    if out.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        out
    }
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}
