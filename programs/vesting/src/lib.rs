#![allow(clippy::result_large_err)]
//! Token grant vesting engine.
//!
//! Pools describe how a grant unlocks over time (linear, fixed intervals,
//! calendar months or a custom table); allocations record each beneficiary's
//! grant and what has been paid so far. Claims aggregate every pool sharing
//! an asset into one transfer and never pay the same unit twice.

pub mod constants;
pub mod engine;
pub mod error;
pub mod instructions;
pub mod state;
pub mod utils;

pub use engine::{
    AssetMetadata, AssetTransfer, EngineConfig, EngineState, TimeSource, VestingEngine,
};
pub use error::VestingError;
pub use instructions::*;
pub use state::*;
