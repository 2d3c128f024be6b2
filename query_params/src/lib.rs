//! Query Params - backend independent query intent
//!
//! This crate models *what* a caller asked a store for: filters, OR groups,
//! ordering, grouping, projection, pagination, preloads, row locks and
//! optimizer hints. Turning that intent into a concrete query is the job of a
//! lowering layer such as `store_object::scope`.
//!
//! ```
//! use query_params::{filter, or, order_by, paginate, params, Operator};
//!
//! let params = params![
//!     or([filter("status", "draft"), filter("status", "review")]).unwrap(),
//!     filter("age", 20).with_op(Operator::Gte),
//!     order_by("created_at", true),
//!     paginate(0, 20),
//! ];
//!
//! assert_eq!(params.get("orderby").len(), 1);
//! assert!(params.get_filter("age").is_some());
//! ```

pub mod errors;
pub mod filter;
pub mod grouping;
pub mod locking;
pub mod operator;
pub mod ordering;
pub mod pagination;
pub mod param;
pub mod params;
pub mod preload;
pub mod prelude;
pub mod select;

pub use errors::QueryError;
pub use filter::{filter, or, Filter, Or};
pub use grouping::{group_by, GroupBy};
pub use locking::{lock_for_update, with_hint, with_lock, LockKind, WithHint, WithLock};
pub use operator::Operator;
pub use ordering::{order_by, OrderBy};
pub use pagination::{paginate, Paginate};
pub use param::{custom, kind, CustomParam, Param};
pub use params::{filter_getter, Params};
pub use preload::{preload, Preload};
pub use select::{select, Select};
