//! Ordered param collection with filter lookup

use crate::filter::Filter;
use crate::param::{kind, Param};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordered, immutable list of params.
///
/// Filters are indexed by field name at construction. When a field is
/// filtered more than once, the index points at the last filter for it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Param>", into = "Vec<Param>")]
pub struct Params {
    params: Vec<Param>,
    filter_index: HashMap<String, usize>,
}

impl Params {
    pub fn new(params: Vec<Param>) -> Self {
        let mut filter_index = HashMap::new();
        for (i, param) in params.iter().enumerate() {
            let Some(f) = param.as_filter() else {
                continue;
            };
            if filter_index.insert(f.field_name.clone(), i).is_some() {
                tracing::trace!(field = %f.field_name, "later filter replaces earlier one in index");
            }
        }

        Self {
            params,
            filter_index,
        }
    }

    /// All params in declaration order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Every param of the given kind, in declaration order.
    ///
    /// Returns an empty vector when nothing matches.
    pub fn get(&self, kind: &str) -> Vec<&Param> {
        self.params.iter().filter(|p| p.kind() == kind).collect()
    }

    /// The last filter declared for `field_name`.
    pub fn get_filter(&self, field_name: &str) -> Option<&Filter> {
        self.filter_index
            .get(field_name)
            .and_then(|&i| self.params.get(i))
            .and_then(Param::as_filter)
    }

    pub fn filters(&self) -> Vec<&Filter> {
        self.get(kind::FILTER)
            .into_iter()
            .filter_map(Param::as_filter)
            .collect()
    }

    pub fn into_inner(self) -> Vec<Param> {
        self.params
    }
}

impl From<Vec<Param>> for Params {
    fn from(params: Vec<Param>) -> Self {
        Params::new(params)
    }
}

impl From<Params> for Vec<Param> {
    fn from(params: Params) -> Self {
        params.params
    }
}

impl FromIterator<Param> for Params {
    fn from_iter<T: IntoIterator<Item = Param>>(iter: T) -> Self {
        Params::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// Build a reusable accessor for the filter on `field_name`.
///
/// ```
/// use query_params::{filter, filter_getter, params};
///
/// let get_tag = filter_getter("tag");
/// let params = params![filter("tag", "rust")];
/// assert!(get_tag(&params).is_some());
/// ```
pub fn filter_getter(
    field_name: impl Into<String>,
) -> impl Fn(&Params) -> Option<Filter> + Clone + Send + Sync {
    let field_name = field_name.into();
    move |params: &Params| params.get_filter(&field_name).cloned()
}

/// Build a [`Params`] from a list of anything convertible into [`Param`].
///
/// ```
/// use query_params::{filter, order_by, paginate, params, Operator};
///
/// let params = params![
///     filter("age", 20).with_op(Operator::Gt),
///     order_by("name", false),
///     paginate(0, 10),
/// ];
/// assert_eq!(params.len(), 3);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Params::default()
    };
    ($($param:expr),+ $(,)?) => {
        $crate::Params::new(vec![$($crate::Param::from($param)),+])
    };
}
