//! Drive-qualified namespace paths (`HKCU:\Software\Vendor`).

use crate::error::ResolveError;
use std::fmt;
use unicode_normalization::UnicodeNormalization;

pub const SEPARATOR: char = '\\';

/// A path anchored at a drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedPath {
    pub drive: String,
    pub segments: Vec<String>,
}

impl QualifiedPath {
    pub fn root(drive: impl Into<String>) -> Self {
        Self {
            drive: drive.into(),
            segments: Vec::new(),
        }
    }

    /// Parse `expression` relative to `current`. Drive-qualified expressions
    /// ignore `current`.
    pub fn parse(expression: &str, current: &QualifiedPath) -> Result<Self, ResolveError> {
        let normalized = normalize_path_string(expression);
        let (mut path, rest) = match split_drive(&normalized) {
            Some((drive, rest)) => {
                if drive.is_empty() {
                    return Err(ResolveError::InvalidPattern {
                        pattern: expression.to_string(),
                        reason: "empty drive name".to_string(),
                    });
                }
                (QualifiedPath::root(drive), rest)
            }
            None if normalized.starts_with(SEPARATOR) => {
                (QualifiedPath::root(current.drive.clone()), normalized.as_str())
            }
            None => (current.clone(), normalized.as_str()),
        };

        for segment in rest.split(SEPARATOR) {
            match segment {
                "" | "." => {}
                ".." => {
                    path.segments.pop();
                }
                other => path.segments.push(other.to_string()),
            }
        }
        Ok(path)
    }

    /// Case-insensitive lookup key.
    pub fn key(&self) -> String {
        self.to_string().to_lowercase()
    }

    pub fn parent(&self) -> Option<QualifiedPath> {
        if self.segments.is_empty() {
            return None;
        }
        let mut parent = self.clone();
        parent.segments.pop();
        Some(parent)
    }

    /// Forward-slash form used for pattern matching.
    pub fn match_form(&self) -> String {
        self.to_string().replace(SEPARATOR, "/")
    }
}

impl fmt::Display for QualifiedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.drive, SEPARATOR)?;
        write!(f, "{}", self.segments.join(&SEPARATOR.to_string()))
    }
}

/// Split `DRIVE:rest` when the colon precedes any separator.
pub fn split_drive(path: &str) -> Option<(&str, &str)> {
    let colon = path.find(':')?;
    match path.find(SEPARATOR) {
        Some(sep) if sep < colon => None,
        _ => Some((&path[..colon], &path[colon + 1..])),
    }
}

/// Normalize a path string without consulting the namespace
///
/// NFC-normalizes, turns `/` into `\`, collapses repeated separators and
/// strips trailing ones (a drive root keeps its separator).
pub fn normalize_path_string(path: &str) -> String {
    let normalized: String = path.nfc().collect();
    let mut result = String::with_capacity(normalized.len());
    for ch in normalized.chars() {
        let ch = if ch == '/' { SEPARATOR } else { ch };
        if ch == SEPARATOR && result.ends_with(SEPARATOR) {
            continue;
        }
        result.push(ch);
    }

    while result.len() > 1 && result.ends_with(SEPARATOR) && !result.ends_with(":\\") {
        result.pop();
    }
    result
}

pub fn has_wildcards(path: &str) -> bool {
    path.contains(['*', '?', '['])
}
