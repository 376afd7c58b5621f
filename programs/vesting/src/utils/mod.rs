pub mod schedule_index;
pub mod time;
pub mod vesting;
