//! Row locking and optimizer hint params

use crate::errors::QueryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row lock requested for the rows a query reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum LockKind {
    ForUpdate = 0,
    ForNoKeyUpdate = 1,
    ForShare = 2,
    ForKeyShare = 3,
}

impl LockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockKind::ForUpdate => "FOR UPDATE",
            LockKind::ForNoKeyUpdate => "FOR NO KEY UPDATE",
            LockKind::ForShare => "FOR SHARE",
            LockKind::ForKeyShare => "FOR KEY SHARE",
        }
    }
}

impl fmt::Display for LockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for LockKind {
    type Error = QueryError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(LockKind::ForUpdate),
            1 => Ok(LockKind::ForNoKeyUpdate),
            2 => Ok(LockKind::ForShare),
            3 => Ok(LockKind::ForKeyShare),
            other => Err(QueryError::UnknownLockKind(other)),
        }
    }
}

/// Lock the matching rows for the rest of the current transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithLock {
    pub kind: LockKind,
}

pub fn with_lock(kind: LockKind) -> WithLock {
    WithLock { kind }
}

/// Shorthand for `with_lock(LockKind::ForUpdate)`.
pub fn lock_for_update() -> WithLock {
    with_lock(LockKind::ForUpdate)
}

/// Optimizer hint handed to the backend untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithHint {
    pub hint: String,
}

/// ```
/// use query_params::with_hint;
///
/// let hint = with_hint("INL_HASH_JOIN(user)");
/// assert_eq!(hint.hint, "INL_HASH_JOIN(user)");
/// ```
pub fn with_hint(hint: impl Into<String>) -> WithHint {
    WithHint { hint: hint.into() }
}
