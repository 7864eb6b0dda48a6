//! CRUX UID generation
//!
//! Scheme-prefixed, typed identifiers: `urn:crux:uid::<type_hint>::<suffix>`.
//! The type hint names what the identifier refers to (a trace event, a raw
//! signal, a persona profile); the suffix is a v4 UUID.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

const SCHEME_PREFIX: &str = "urn:crux:uid::";

pub type Result<T> = std::result::Result<T, UidError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UidError {
    #[error("empty uid type hint")]
    EmptyTypeHint,

    #[error("invalid uid type hint `{0}` (alphanumeric, `_` and `-` only)")]
    InvalidTypeHint(String),

    #[error("malformed crux uid: {0}")]
    Malformed(String),
}

/// A typed CRUX identifier.
///
/// Serializes as its string form. Collision-free for practical purposes
/// (UUID v4 suffix), not cryptographic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CruxUid(String);

impl CruxUid {
    /// Generate a fresh uid for `type_hint`.
    ///
    /// Fails only on an unusable type hint; callers inside a stage must treat
    /// that as fatal for the stage.
    pub fn generate(type_hint: &str) -> Result<Self> {
        validate_type_hint(type_hint)?;
        Ok(Self(format!(
            "{}{}::{}",
            SCHEME_PREFIX,
            type_hint,
            Uuid::new_v4().simple()
        )))
    }

    /// Infallible best-effort id used when synthesizing error Seeds.
    pub fn error_fallback() -> Self {
        Self(format!(
            "{}error_seed::{}",
            SCHEME_PREFIX,
            Uuid::new_v4().simple()
        ))
    }

    /// Parse an existing uid string, validating the scheme shape.
    pub fn parse(raw: &str) -> Result<Self> {
        let rest = raw
            .strip_prefix(SCHEME_PREFIX)
            .ok_or_else(|| UidError::Malformed(raw.to_string()))?;
        let (hint, suffix) = rest
            .split_once("::")
            .ok_or_else(|| UidError::Malformed(raw.to_string()))?;
        validate_type_hint(hint)?;
        if suffix.is_empty() {
            return Err(UidError::Malformed(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The type hint segment, if the uid is well-formed.
    pub fn type_hint(&self) -> Option<&str> {
        self.0
            .strip_prefix(SCHEME_PREFIX)
            .and_then(|rest| rest.split_once("::"))
            .map(|(hint, _)| hint)
    }
}

impl fmt::Display for CruxUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_type_hint(type_hint: &str) -> Result<()> {
    if type_hint.is_empty() {
        return Err(UidError::EmptyTypeHint);
    }
    if !type_hint
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(UidError::InvalidTypeHint(type_hint.to_string()));
    }
    Ok(())
}
