use std::fmt;
use std::str::FromStr;

use crate::error::AppError;
use crate::models::ENTERPRISE_USER_SCHEMA;

/// Patch operation kinds (RFC 7644 section 3.5.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchOpKind {
    Add,
    Replace,
    Remove,
}

impl FromStr for PatchOpKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "add" => Ok(PatchOpKind::Add),
            "replace" => Ok(PatchOpKind::Replace),
            "remove" => Ok(PatchOpKind::Remove),
            _ => Err(AppError::UnsupportedOperation(s.to_string())),
        }
    }
}

impl fmt::Display for PatchOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOpKind::Add => write!(f, "add"),
            PatchOpKind::Replace => write!(f, "replace"),
            PatchOpKind::Remove => write!(f, "remove"),
        }
    }
}

/// Normalized slash-delimited attribute path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchPath(String);

impl PatchPath {
    /// Strips the leading slash and rewrites the enterprise URN prefix
    /// (`urn:...:enterprise:2.0:User:department`) to `enterpriseExtension/department`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);

        let normalized = match trimmed.strip_prefix(ENTERPRISE_USER_SCHEMA) {
            Some("") => "enterpriseExtension".to_string(),
            Some(rest) => match rest.strip_prefix(':') {
                Some(attr) => format!("enterpriseExtension/{}", attr),
                None => trimmed.to_string(),
            },
            None => trimmed.to_string(),
        };

        PatchPath(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
