//! GROUP BY params

use crate::filter::Filter;
use serde::{Deserialize, Serialize};

/// Group results by one or more fields.
///
/// `option` is a dialect-specific modifier appended verbatim (for example
/// `WITH ROLLUP`). `having` filters apply after aggregation.
///
/// Grouping ties calling code to the shape of the underlying table, so use it sparingly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupBy {
    pub field_names: Vec<String>,
    #[serde(default)]
    pub option: String,
    #[serde(default)]
    pub having: Vec<Filter>,
}

impl GroupBy {
    /// Return a copy with the given modifier. Having filters are kept.
    pub fn with_option(self, option: impl Into<String>) -> Self {
        Self {
            option: option.into(),
            ..self
        }
    }

    /// Return a copy with the given having filters. The modifier is kept.
    pub fn with_having<I>(self, having: I) -> Self
    where
        I: IntoIterator<Item = Filter>,
    {
        Self {
            having: having.into_iter().collect(),
            ..self
        }
    }

    pub fn has_having(&self) -> bool {
        !self.having.is_empty()
    }
}

/// Group by the given fields.
pub fn group_by<I, S>(field_names: I) -> GroupBy
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    GroupBy {
        field_names: field_names.into_iter().map(Into::into).collect(),
        option: String::new(),
        having: Vec::new(),
    }
}
