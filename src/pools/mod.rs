pub mod mode;
pub mod table;

pub use mode::resolve_mode;
pub use table::{PoolEntry, PoolTable};
