//! Convenience re-exports for building params

pub use crate::filter::{filter, or, Filter, Or};
pub use crate::grouping::{group_by, GroupBy};
pub use crate::locking::{lock_for_update, with_hint, with_lock, LockKind};
pub use crate::operator::Operator;
pub use crate::ordering::order_by;
pub use crate::pagination::paginate;
pub use crate::param::{custom, kind, Param};
pub use crate::params::{filter_getter, Params};
pub use crate::preload::preload;
pub use crate::select::select;
pub use crate::params;
