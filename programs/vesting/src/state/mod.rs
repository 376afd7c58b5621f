pub mod allocation;
pub mod deny_list;
pub mod pool;

pub use allocation::*;
pub use deny_list::*;
pub use pool::*;
