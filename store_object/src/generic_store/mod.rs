pub mod core;
pub mod statements;
pub mod store_object;
pub mod transaction;

pub use core::{default_scope_builder, GenericStore, DEFAULT_BATCH_SIZE};
pub use transaction::{IsolationLevel, OpScope, StoreTransaction, TxOptions};
