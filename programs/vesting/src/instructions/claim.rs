use std::collections::BTreeSet;

use anchor_lang::prelude::*;

use crate::engine::{AssetTransfer, TimeSource, VestingEngine};
use crate::error::VestingError;
use crate::utils::vesting::releasable_amount;

/// One pool's contribution to a claim.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimShare {
    pub pool_id: u64,
    pub amount: u64,
    /// Allocation's `distributed_amount` once the claim is committed.
    pub distributed_after: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ClaimReceipt {
    pub beneficiary: Pubkey,
    pub asset: Pubkey,
    /// Total handed to the transfer collaborator.
    pub amount: u64,
    pub shares: Vec<ClaimShare>,
}

impl<C: TimeSource> VestingEngine<C> {
    /// Pays out everything releasable to `beneficiary` in `asset`, across every
    /// matching pool or only the listed ones, as one transfer.
    ///
    /// Nothing is recorded unless the transfer succeeds: the plan is computed
    /// first, the transfer runs, and only then are the pools' distributed
    /// amounts advanced.
    pub fn claim<T: AssetTransfer + ?Sized>(
        &mut self,
        beneficiary: Pubkey,
        asset: Pubkey,
        pool_ids: Option<&[u64]>,
        transfer: &mut T,
    ) -> Result<ClaimReceipt> {
        require!(!self.is_blocked(&beneficiary), VestingError::Blocked);
        let now = self.now();

        let selected: Option<BTreeSet<u64>> = match pool_ids {
            Some(ids) => {
                for id in ids.iter() {
                    self.pool(*id)?;
                }
                Some(ids.iter().copied().collect())
            }
            None => None,
        };

        let mut shares = Vec::new();
        let mut total: u64 = 0;
        for (pool_id, pool) in self.state.pools.iter() {
            if pool.asset != asset {
                continue;
            }
            if let Some(selected) = &selected {
                if !selected.contains(pool_id) {
                    continue;
                }
            }
            let Some(allocation) = pool.live_allocation(&beneficiary) else {
                continue;
            };
            if pool.paused {
                msg!("pool {} is paused; skipped for {}", pool_id, beneficiary);
                continue;
            }

            let amount = releasable_amount(pool, allocation, now)?;
            if amount == 0 {
                continue;
            }
            let distributed_after = allocation
                .distributed_amount
                .checked_add(amount)
                .ok_or(VestingError::MathOverflow)?;
            total = total.checked_add(amount).ok_or(VestingError::MathOverflow)?;
            shares.push(ClaimShare {
                pool_id: *pool_id,
                amount,
                distributed_after,
            });
        }
        require!(total > 0, VestingError::NothingToClaim);

        if let Err(err) = transfer.transfer(&asset, &beneficiary, total) {
            msg!("transfer of {} to {} failed: {}", total, beneficiary, err);
            return Err(VestingError::TransferFailed.into());
        }

        for share in shares.iter() {
            let allocation = self
                .state
                .pools
                .get_mut(&share.pool_id)
                .and_then(|pool| pool.allocations.get_mut(&beneficiary));
            if let Some(allocation) = allocation {
                allocation.distributed_amount = share.distributed_after;
            }
            emit!(TokensClaimed {
                pool_id: share.pool_id,
                beneficiary,
                asset,
                amount: share.amount,
                distributed_total: share.distributed_after,
            });
        }

        Ok(ClaimReceipt {
            beneficiary,
            asset,
            amount: total,
            shares,
        })
    }
}

#[event]
pub struct TokensClaimed {
    pub pool_id: u64,
    pub beneficiary: Pubkey,
    pub asset: Pubkey,
    pub amount: u64,
    pub distributed_total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::*;
    use crate::state::{PoolConfig, StrategyConfig};

    struct Fixture {
        e: VestingEngine<ManualClock>,
        clock: ManualClock,
        admin: Pubkey,
        asset: Pubkey,
    }

    fn fixture() -> Fixture {
        let admin = Pubkey::new_unique();
        let clock = ManualClock::at(0);
        Fixture {
            e: engine(admin, &clock),
            clock,
            admin,
            asset: Pubkey::new_unique(),
        }
    }

    fn linear(asset: Pubkey, duration: i64) -> PoolConfig {
        PoolConfig {
            name: "pool".to_string(),
            asset,
            start: 0,
            cliff_duration: 0,
            initial_unlock_bps: 0,
            revocable: true,
            strategy: StrategyConfig::Linear { duration },
        }
    }

    #[test]
    fn aggregates_two_pools_into_one_transfer() {
        let mut f = fixture();
        let a = f.e.create_pool(&f.admin, linear(f.asset, 100)).unwrap();
        let b = f.e.create_pool(&f.admin, linear(f.asset, 100)).unwrap();
        let ivy = Pubkey::new_unique();
        f.e.add_allocation(&f.admin, a, ivy, 100).unwrap();
        f.e.add_allocation(&f.admin, b, ivy, 150).unwrap();

        f.clock.set(40);
        assert_eq!(f.e.releasable_amount(a, &ivy).unwrap(), 40);
        assert_eq!(f.e.releasable_amount(b, &ivy).unwrap(), 60);

        let mut transfer = RecordingTransfer::default();
        let receipt = f.e.claim(ivy, f.asset, None, &mut transfer).unwrap();
        assert_eq!(receipt.amount, 100);
        assert_eq!(transfer.sent, vec![(f.asset, ivy, 100)]);
        assert_eq!(f.e.allocation(a, &ivy).unwrap().distributed_amount, 40);
        assert_eq!(f.e.allocation(b, &ivy).unwrap().distributed_amount, 60);

        // Immediately claiming again has nothing left.
        assert_eq!(
            f.e.claim(ivy, f.asset, None, &mut transfer).unwrap_err(),
            anchor_err(VestingError::NothingToClaim)
        );
        assert_eq!(transfer.sent.len(), 1);
    }

    #[test]
    fn other_assets_and_unselected_pools_are_untouched() {
        let mut f = fixture();
        let other_asset = Pubkey::new_unique();
        let a = f.e.create_pool(&f.admin, linear(f.asset, 10)).unwrap();
        let b = f.e.create_pool(&f.admin, linear(f.asset, 10)).unwrap();
        let c = f.e.create_pool(&f.admin, linear(other_asset, 10)).unwrap();
        let jack = Pubkey::new_unique();
        for id in [a, b, c] {
            f.e.add_allocation(&f.admin, id, jack, 10).unwrap();
        }
        f.clock.set(10);

        let mut transfer = RecordingTransfer::default();
        let receipt = f
            .e
            .claim(jack, f.asset, Some(&[b, b]), &mut transfer)
            .unwrap();
        assert_eq!(receipt.amount, 10);
        assert_eq!(receipt.shares.len(), 1);
        assert_eq!(f.e.allocation(a, &jack).unwrap().distributed_amount, 0);
        assert_eq!(f.e.allocation(b, &jack).unwrap().distributed_amount, 10);
        assert_eq!(f.e.allocation(c, &jack).unwrap().distributed_amount, 0);

        assert_eq!(
            f.e.claim(jack, f.asset, Some(&[77]), &mut transfer).unwrap_err(),
            anchor_err(VestingError::PoolNotFound)
        );
    }

    #[test]
    fn failed_transfer_commits_nothing() {
        let mut f = fixture();
        let a = f.e.create_pool(&f.admin, linear(f.asset, 10)).unwrap();
        let kim = Pubkey::new_unique();
        f.e.add_allocation(&f.admin, a, kim, 10).unwrap();
        f.clock.set(5);

        let mut transfer = RecordingTransfer {
            fail: true,
            ..Default::default()
        };
        assert_eq!(
            f.e.claim(kim, f.asset, None, &mut transfer).unwrap_err(),
            anchor_err(VestingError::TransferFailed)
        );
        assert_eq!(f.e.allocation(a, &kim).unwrap().distributed_amount, 0);

        transfer.fail = false;
        assert_eq!(f.e.claim(kim, f.asset, None, &mut transfer).unwrap().amount, 5);
    }

    #[test]
    fn blocked_and_paused() {
        let mut f = fixture();
        let a = f.e.create_pool(&f.admin, linear(f.asset, 10)).unwrap();
        let b = f.e.create_pool(&f.admin, linear(f.asset, 10)).unwrap();
        let leo = Pubkey::new_unique();
        f.e.add_allocation(&f.admin, a, leo, 10).unwrap();
        f.e.add_allocation(&f.admin, b, leo, 20).unwrap();
        f.clock.set(10);

        let mut transfer = RecordingTransfer::default();
        f.e.set_blocked(&f.admin, leo, true).unwrap();
        assert_eq!(
            f.e.claim(leo, f.asset, None, &mut transfer).unwrap_err(),
            anchor_err(VestingError::Blocked)
        );
        f.e.set_blocked(&f.admin, leo, false).unwrap();

        f.e.set_paused(&f.admin, b, true).unwrap();
        let receipt = f.e.claim(leo, f.asset, None, &mut transfer).unwrap();
        assert_eq!(receipt.amount, 10);
        assert_eq!(f.e.allocation(b, &leo).unwrap().distributed_amount, 0);

        f.e.set_paused(&f.admin, b, false).unwrap();
        assert_eq!(f.e.claim(leo, f.asset, None, &mut transfer).unwrap().amount, 20);
    }

    #[test]
    fn no_allocation_means_nothing_to_claim() {
        let mut f = fixture();
        f.e.create_pool(&f.admin, linear(f.asset, 10)).unwrap();
        f.clock.set(100);
        let mut transfer = RecordingTransfer::default();
        assert_eq!(
            f.e.claim(Pubkey::new_unique(), f.asset, None, &mut transfer)
                .unwrap_err(),
            anchor_err(VestingError::NothingToClaim)
        );
    }
}
