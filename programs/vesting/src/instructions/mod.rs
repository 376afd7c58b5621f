pub mod create_pool;
pub mod modify_pool;
pub mod set_paused;
pub mod add_allocation;
pub mod remove_allocation;
pub mod set_allocation_amount;
pub mod revoke_allocation;
pub mod claim;
pub mod set_blocked;
pub mod set_admin;
pub mod quote;

pub use create_pool::*;
pub use modify_pool::*;
pub use set_paused::*;
pub use add_allocation::*;
pub use remove_allocation::*;
pub use set_allocation_amount::*;
pub use revoke_allocation::*;
pub use claim::*;
pub use set_blocked::*;
pub use set_admin::*;
pub use quote::*;
