use anchor_lang::prelude::*;

use crate::engine::{TimeSource, VestingEngine};
use crate::error::VestingError;

impl<C: TimeSource> VestingEngine<C> {
    /// Soft-removes a beneficiary. The record stays for history and keeps the
    /// beneficiary from being whitelisted in this pool again.
    pub fn remove_allocation(
        &mut self,
        signer: &Pubkey,
        pool_id: u64,
        beneficiary: Pubkey,
    ) -> Result<()> {
        self.require_admin(signer)?;
        let pool = self.pool_mut(pool_id)?;
        let allocation = pool
            .allocations
            .get_mut(&beneficiary)
            .filter(|a| !a.disabled)
            .ok_or(VestingError::NotWhitelisted)?;
        allocation.disabled = true;

        emit!(AllocationRemoved {
            pool_id,
            beneficiary,
            distributed_amount: allocation.distributed_amount,
        });
        Ok(())
    }
}

#[event]
pub struct AllocationRemoved {
    pub pool_id: u64,
    pub beneficiary: Pubkey,
    pub distributed_amount: u64,
}
