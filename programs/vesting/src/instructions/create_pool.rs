use anchor_lang::prelude::*;

use crate::engine::{TimeSource, VestingEngine};
use crate::error::VestingError;
use crate::state::{PoolConfig, VestingPool};

impl<C: TimeSource> VestingEngine<C> {
    /// Registers a new pool and returns its id. Ids start at 1 and are never reused.
    pub fn create_pool(&mut self, signer: &Pubkey, config: PoolConfig) -> Result<u64> {
        self.require_admin(signer)?;
        if self.state.config.require_future_start {
            require!(config.start > self.now(), VestingError::InvalidConfig);
        }

        let pool_id = self.state.next_pool_id;
        let pool = VestingPool::new(pool_id, config, self.max_steps())?;
        self.state.next_pool_id = pool_id
            .checked_add(1)
            .ok_or(VestingError::MathOverflow)?;

        emit!(PoolCreated {
            pool_id,
            name: pool.name.clone(),
            asset: pool.asset,
            start: pool.start,
            cliff: pool.cliff,
            initial_unlock_bps: pool.initial_unlock_bps,
            strategy: pool.strategy.kind().to_string(),
            revocable: pool.revocable,
        });
        self.state.pools.insert(pool_id, pool);

        Ok(pool_id)
    }
}

#[event]
pub struct PoolCreated {
    pub pool_id: u64,
    pub name: String,
    pub asset: Pubkey,
    pub start: i64,
    pub cliff: i64,
    pub initial_unlock_bps: u16,
    pub strategy: String,
    pub revocable: bool,
}
