//! Projection params

use serde::{Deserialize, Serialize};

/// Restrict the fields returned by a query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Select {
    pub field_names: Vec<String>,
}

/// Select only the given fields, in the order given.
pub fn select<I, S>(field_names: I) -> Select
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Select {
        field_names: field_names.into_iter().map(Into::into).collect(),
    }
}
