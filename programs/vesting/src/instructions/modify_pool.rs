use anchor_lang::prelude::*;

use crate::engine::{TimeSource, VestingEngine};
use crate::error::VestingError;
use crate::state::PoolUpdate;
use crate::utils::vesting::vested_amount;

impl<C: TimeSource> VestingEngine<C> {
    /// Edits timing and unlock parameters of an existing pool in place.
    ///
    /// The strategy variant is fixed. The edit is rejected if any live
    /// allocation would end up with less vested than it has already been paid.
    pub fn modify_pool(&mut self, signer: &Pubkey, pool_id: u64, update: PoolUpdate) -> Result<()> {
        self.require_admin(signer)?;
        let now = self.now();
        let max_steps = self.max_steps();

        let pool = self.pool(pool_id)?;
        let next = pool.with_update(&update, max_steps)?;

        for allocation in next.allocations.values() {
            if allocation.disabled || allocation.revoked {
                continue;
            }
            let vested = vested_amount(&next, allocation, now)?;
            require!(
                vested >= allocation.distributed_amount,
                VestingError::VestedBelowDistributed
            );
        }

        emit!(PoolModified {
            pool_id,
            start: next.start,
            cliff: next.cliff,
            initial_unlock_bps: next.initial_unlock_bps,
            schedule_changed: next.strategy != pool.strategy,
        });
        *self.pool_mut(pool_id)? = next;

        Ok(())
    }
}

#[event]
pub struct PoolModified {
    pub pool_id: u64,
    pub start: i64,
    pub cliff: i64,
    pub initial_unlock_bps: u16,
    pub schedule_changed: bool,
}
