use anchor_lang::prelude::*;

use crate::engine::{TimeSource, VestingEngine};
use crate::error::VestingError;
use crate::utils::vesting::vested_amount;

impl<C: TimeSource> VestingEngine<C> {
    /// Overwrites a beneficiary's grant.
    ///
    /// The new grant may not drop below what was already paid, nor below what
    /// that grant would have vested by now.
    pub fn set_allocation_amount(
        &mut self,
        signer: &Pubkey,
        pool_id: u64,
        beneficiary: Pubkey,
        new_total: u64,
    ) -> Result<()> {
        self.require_admin(signer)?;
        require!(new_total > 0, VestingError::InvalidAllocation);
        let now = self.now();

        let pool = self.pool(pool_id)?;
        let current = *pool
            .live_allocation(&beneficiary)
            .ok_or(VestingError::NotWhitelisted)?;
        require!(!current.revoked, VestingError::AllocationRevoked);
        require!(
            new_total >= current.distributed_amount,
            VestingError::AmountBelowDistributed
        );

        let mut next = current;
        next.total_granted = new_total;
        require!(
            vested_amount(pool, &next, now)? >= next.distributed_amount,
            VestingError::VestedBelowDistributed
        );

        let pool = self.pool_mut(pool_id)?;
        if let Some(allocation) = pool.allocations.get_mut(&beneficiary) {
            *allocation = next;
        }

        emit!(AllocationAmountSet {
            pool_id,
            beneficiary,
            old_total: current.total_granted,
            new_total,
        });
        Ok(())
    }
}

#[event]
pub struct AllocationAmountSet {
    pub pool_id: u64,
    pub beneficiary: Pubkey,
    pub old_total: u64,
    pub new_total: u64,
}
