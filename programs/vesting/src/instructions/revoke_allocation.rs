use anchor_lang::prelude::*;

use crate::engine::{TimeSource, VestingEngine};
use crate::error::VestingError;

impl<C: TimeSource> VestingEngine<C> {
    /// Freezes an allocation at what it has been paid so far. Unclaimed vested
    /// tokens are forfeited along with everything still locked.
    pub fn revoke_allocation(
        &mut self,
        signer: &Pubkey,
        pool_id: u64,
        beneficiary: Pubkey,
    ) -> Result<()> {
        self.require_admin(signer)?;
        let now = self.now();
        let pool = self.pool_mut(pool_id)?;
        require!(pool.revocable, VestingError::NotRevocable);

        let allocation = pool
            .allocations
            .get_mut(&beneficiary)
            .filter(|a| !a.disabled)
            .ok_or(VestingError::NotWhitelisted)?;
        require!(!allocation.revoked, VestingError::AllocationRevoked);
        allocation.revoked = true;
        allocation.revoke_time = now;

        emit!(AllocationRevoked {
            pool_id,
            beneficiary,
            distributed_amount: allocation.distributed_amount,
            forfeited: allocation
                .total_granted
                .saturating_sub(allocation.distributed_amount),
            revoke_time: now,
        });
        Ok(())
    }
}

#[event]
pub struct AllocationRevoked {
    pub pool_id: u64,
    pub beneficiary: Pubkey,
    pub distributed_amount: u64,
    pub forfeited: u64,
    pub revoke_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::*;
    use crate::state::{PoolConfig, StrategyConfig};

    fn pool(revocable: bool) -> PoolConfig {
        PoolConfig {
            name: "team".to_string(),
            asset: Pubkey::new_unique(),
            start: 0,
            cliff_duration: 0,
            initial_unlock_bps: 0,
            revocable,
            strategy: StrategyConfig::Linear { duration: 100 },
        }
    }

    #[test]
    fn revoke_freezes_at_distributed() {
        let admin = Pubkey::new_unique();
        let clock = ManualClock::at(0);
        let mut e = engine(admin, &clock);
        let id = e.create_pool(&admin, pool(true)).unwrap();
        let gina = Pubkey::new_unique();
        e.add_allocation(&admin, id, gina, 1_000).unwrap();

        clock.set(30);
        let asset = e.pool(id).unwrap().asset;
        let mut transfer = RecordingTransfer::default();
        e.claim(gina, asset, None, &mut transfer).unwrap();

        clock.set(60);
        e.revoke_allocation(&admin, id, gina).unwrap();
        let record = e.allocation(id, &gina).unwrap();
        assert!(record.revoked);
        assert_eq!(record.revoke_time, 60);

        clock.set(1_000);
        assert_eq!(e.vested_amount(id, &gina).unwrap(), 300);
        assert_eq!(e.releasable_amount(id, &gina).unwrap(), 0);
        assert_eq!(
            e.claim(gina, asset, None, &mut transfer).unwrap_err(),
            anchor_err(VestingError::NothingToClaim)
        );

        assert_eq!(
            e.revoke_allocation(&admin, id, gina).unwrap_err(),
            anchor_err(VestingError::AllocationRevoked)
        );
    }

    #[test]
    fn irrevocable_pool() {
        let admin = Pubkey::new_unique();
        let clock = ManualClock::at(0);
        let mut e = engine(admin, &clock);
        let id = e.create_pool(&admin, pool(false)).unwrap();
        let hank = Pubkey::new_unique();
        e.add_allocation(&admin, id, hank, 1_000).unwrap();
        assert_eq!(
            e.revoke_allocation(&admin, id, hank).unwrap_err(),
            anchor_err(VestingError::NotRevocable)
        );
        assert_eq!(
            e.revoke_allocation(&hank, id, hank).unwrap_err(),
            anchor_err(VestingError::Unauthorized)
        );
    }
}
