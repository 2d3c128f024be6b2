//! Sort params

use serde::{Deserialize, Serialize};

/// One sort key. Several `OrderBy` params sort in the order they appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field_name: String,
    #[serde(default)]
    pub desc: bool,
}

impl OrderBy {
    pub fn direction(&self) -> &'static str {
        if self.desc {
            "DESC"
        } else {
            "ASC"
        }
    }
}

/// Order by `field_name`, descending when `desc` is true.
///
/// ```
/// use query_params::order_by;
///
/// // name ascending, then id descending
/// let params = query_params::params![order_by("Name", false), order_by("ID", true)];
/// assert_eq!(params.len(), 2);
/// ```
pub fn order_by(field_name: impl Into<String>, desc: bool) -> OrderBy {
    OrderBy {
        field_name: field_name.into(),
        desc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_by() {
        let asc = order_by("name", false);
        assert_eq!(asc.field_name, "name");
        assert!(!asc.desc);
        assert_eq!(asc.direction(), "ASC");

        let desc = order_by("id", true);
        assert!(desc.desc);
        assert_eq!(desc.direction(), "DESC");
    }
}
