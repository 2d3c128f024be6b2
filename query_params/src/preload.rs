//! Preload params
//!
//! A preload asks the store to eagerly fetch a related entity together with
//! the primary rows. Nested params apply to the relation only.

use crate::param::Param;
use serde::{Deserialize, Serialize};

/// Eager-load the relation `name`, optionally narrowed by its own params.
///
/// ```
/// use query_params::{filter, preload};
///
/// // Load every article's author
/// let bare = preload("Author", Vec::<query_params::Param>::new());
///
/// // Only active authors
/// let narrowed = preload("Author", [filter("active", true)]);
/// # let _ = (bare, narrowed);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preload {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
}

impl Preload {
    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }
}

pub fn preload<I, P>(name: impl Into<String>, params: I) -> Preload
where
    I: IntoIterator<Item = P>,
    P: Into<Param>,
{
    Preload {
        name: name.into(),
        params: params.into_iter().map(Into::into).collect(),
    }
}
